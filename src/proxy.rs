use tracing::{info, warn};

use crate::cmd::{self, Invocation, Runner};
use crate::error::{ProvisionError, ProvisionResult};
use crate::nginx::{self, NginxSite};
use crate::systemd;

/// Install the site, validate nginx's merged configuration, and
/// reload the daemon. A failing config test leaves the running
/// daemon untouched.
pub fn configure(runner: &dyn Runner, site: &NginxSite) -> ProvisionResult<()> {
    info!("Configuring nginx for {}...", site.domain);

    let available = site.available_path();
    let enabled = site.enabled_path();

    cmd::write_file(runner, &available, &nginx::render(site))?;
    runner.run(
        &Invocation::new("rm")
            .args(&["-f", &site.default_enabled_path()])
            .elevated(),
    )?;
    runner.run(
        &Invocation::new("ln")
            .args(&["-sf", &available, &enabled])
            .elevated(),
    )?;

    test_config(runner)?;

    open_firewall(runner);

    systemd::reload_or_restart(runner, "nginx")?;
    systemd::enable(runner, "nginx")?;

    info!("nginx serving {} -> localhost:{}", site.domain, site.upstream_port);
    Ok(())
}

/// `nginx -t`; the error carries nginx's own diagnostic.
pub fn test_config(runner: &dyn Runner) -> ProvisionResult<()> {
    let output = runner.exec(&Invocation::new("nginx").arg("-t").elevated())?;
    if output.success() {
        return Ok(());
    }
    Err(ProvisionError::ConfigTest(output.stderr.trim().to_string()))
}

/// Allow HTTP and HTTPS through ufw when it is active. Hosts without
/// ufw, or with it disabled, are left alone.
fn open_firewall(runner: &dyn Runner) {
    let Ok(status) = runner.run(&Invocation::new("ufw").arg("status").elevated()) else {
        return;
    };
    if !status.starts_with("Status: active") {
        return;
    }
    info!("ufw is active, allowing 'Nginx Full'");
    if let Err(e) = runner.run(
        &Invocation::new("ufw")
            .args(&["allow", "Nginx Full"])
            .elevated(),
    ) {
        warn!("could not open ports 80/443 in ufw: {e}");
    }
}
