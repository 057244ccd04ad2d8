use crate::cmd::{Invocation, Runner};
use crate::error::ProvisionResult;

fn systemctl(action: &str, unit: &str) -> Invocation {
    Invocation::new("systemctl").args(&[action, unit]).elevated()
}

/// Enable a unit at boot and start it now.
pub fn enable_now(runner: &dyn Runner, unit: &str) -> ProvisionResult<()> {
    runner.run(&Invocation::new("systemctl").args(&["enable", "--now", unit]).elevated())?;
    Ok(())
}

pub fn enable(runner: &dyn Runner, unit: &str) -> ProvisionResult<()> {
    runner.run(&systemctl("enable", unit))?;
    Ok(())
}

/// Best-effort start of a unit that is installed but not running.
pub fn try_start(runner: &dyn Runner, unit: &str) -> bool {
    runner.check(&systemctl("start", unit))
}

/// Reload a unit's configuration, restarting it if it cannot be
/// reloaded (e.g. it is not running).
pub fn reload_or_restart(runner: &dyn Runner, unit: &str) -> ProvisionResult<()> {
    if runner.check(&systemctl("reload", unit)) {
        return Ok(());
    }
    runner.run(&systemctl("restart", unit))?;
    Ok(())
}
