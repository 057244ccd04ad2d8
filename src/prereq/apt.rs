use tracing::info;

use crate::cmd::{Invocation, Runner};
use crate::error::ProvisionResult;

/// apt-get wrapper that refreshes the package cache at most once per
/// run, and only when something actually has to be installed.
#[derive(Debug, Default)]
pub struct Apt {
    fresh: bool,
}

impl Apt {
    #[must_use]
    pub const fn new() -> Self {
        Self { fresh: false }
    }

    /// Force the next install to refresh the cache, e.g. after
    /// adding a repository.
    pub const fn invalidate(&mut self) {
        self.fresh = false;
    }

    /// Finish any interrupted dpkg run, then refresh the cache.
    pub fn update(&mut self, runner: &dyn Runner) -> ProvisionResult<()> {
        if self.fresh {
            return Ok(());
        }
        info!("Updating package cache...");
        runner.run(
            &Invocation::new("env")
                .args(&["DEBIAN_FRONTEND=noninteractive", "dpkg", "--configure", "-a"])
                .elevated(),
        )?;
        runner.run(&Self::apt_get(&["update"]))?;
        self.fresh = true;
        Ok(())
    }

    pub fn install(&mut self, runner: &dyn Runner, packages: &[&str]) -> ProvisionResult<()> {
        self.update(runner)?;
        info!(packages = %packages.join(" "), "Installing packages");
        let mut args = vec!["install", "-y"];
        args.extend_from_slice(packages);
        runner.run(&Self::apt_get(&args).interactive())?;
        Ok(())
    }

    /// Purge whichever of `packages` are currently installed.
    pub fn purge(&mut self, runner: &dyn Runner, packages: &[&str]) -> ProvisionResult<()> {
        let installed: Vec<&str> = packages
            .iter()
            .copied()
            .filter(|p| Self::is_installed(runner, p))
            .collect();
        if installed.is_empty() {
            return Ok(());
        }
        info!(packages = %installed.join(" "), "Removing broken packages");
        let mut args = vec!["purge", "-y"];
        args.extend_from_slice(&installed);
        runner.run(&Self::apt_get(&args).interactive())?;
        Ok(())
    }

    /// Whether dpkg reports `package` as fully installed.
    #[must_use]
    pub fn is_installed(runner: &dyn Runner, package: &str) -> bool {
        runner
            .run(&Invocation::new("dpkg-query").args(&["-W", "-f=${Status}", package]))
            .is_ok_and(|status| status == "install ok installed")
    }

    fn apt_get(args: &[&str]) -> Invocation {
        Invocation::new("env")
            .args(&["DEBIAN_FRONTEND=noninteractive", "apt-get"])
            .args(args)
            .elevated()
    }
}
