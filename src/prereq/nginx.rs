use crate::cmd::{Invocation, Runner};
use crate::error::ProvisionResult;
use crate::prereq::{Apt, Prerequisite};
use crate::systemd;

/// nginx from the Ubuntu archive.
pub struct Nginx;

impl Prerequisite for Nginx {
    fn name(&self) -> &'static str {
        "nginx"
    }

    fn probe(&self, runner: &dyn Runner) -> bool {
        runner.check(&Invocation::new("nginx").arg("-v").elevated())
    }

    fn is_installed(&self, runner: &dyn Runner) -> bool {
        runner.command_exists("nginx") || Apt::is_installed(runner, "nginx")
    }

    fn install(&self, runner: &dyn Runner, apt: &mut Apt) -> ProvisionResult<()> {
        apt.install(runner, &["nginx"])?;
        systemd::enable_now(runner, "nginx")
    }

    fn packages(&self) -> &'static [&'static str] {
        &["nginx", "nginx-common", "nginx-core"]
    }

    fn service(&self) -> Option<&'static str> {
        Some("nginx")
    }
}
