use crate::cmd::{Invocation, Runner};
use crate::error::ProvisionResult;
use crate::prereq::{Apt, Prerequisite};

const NGINX_PLUGIN: &str = "python3-certbot-nginx";

/// certbot together with its nginx installer plugin.
pub struct Certbot;

impl Prerequisite for Certbot {
    fn name(&self) -> &'static str {
        "certbot"
    }

    fn probe(&self, runner: &dyn Runner) -> bool {
        runner.check(&Invocation::new("certbot").arg("--version"))
            && Apt::is_installed(runner, NGINX_PLUGIN)
    }

    fn is_installed(&self, runner: &dyn Runner) -> bool {
        runner.command_exists("certbot")
    }

    fn install(&self, runner: &dyn Runner, apt: &mut Apt) -> ProvisionResult<()> {
        apt.install(runner, &["certbot", NGINX_PLUGIN])
    }

    fn packages(&self) -> &'static [&'static str] {
        &["certbot", NGINX_PLUGIN]
    }
}
