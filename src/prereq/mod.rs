pub mod apt;
pub mod certbot;
pub mod docker;
pub mod nginx;

use tracing::{info, warn};

use crate::cmd::Runner;
use crate::error::{ProvisionError, ProvisionResult};
use crate::systemd;

pub use apt::Apt;
pub use certbot::Certbot;
pub use docker::{ComposePlugin, Docker};
pub use nginx::Nginx;

/// A host tool the workflow depends on, with its own probe and
/// install procedure.
pub trait Prerequisite {
    /// Human-readable name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Whether the tool is installed and working right now.
    fn probe(&self, runner: &dyn Runner) -> bool;

    /// Whether some installation is present at all, working or not.
    fn is_installed(&self, runner: &dyn Runner) -> bool;

    /// Install the tool from scratch.
    fn install(&self, runner: &dyn Runner, apt: &mut Apt) -> ProvisionResult<()>;

    /// Packages purged before a clean reinstall.
    fn packages(&self) -> &'static [&'static str];

    /// systemd unit backing the tool, if any.
    fn service(&self) -> Option<&'static str> {
        None
    }
}

/// What [`ensure_all`] had to do for one tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    AlreadySatisfied,
    Installed,
    /// Installed but stopped; starting its service fixed it.
    Started,
    Reinstalled,
}

#[derive(Debug, Default)]
pub struct PrerequisiteReport {
    pub entries: Vec<(&'static str, Outcome)>,
}

impl PrerequisiteReport {
    #[must_use]
    pub fn all_satisfied(&self) -> bool {
        self.entries
            .iter()
            .all(|(_, o)| *o == Outcome::AlreadySatisfied)
    }

    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<Outcome> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, o)| *o)
    }
}

/// The four tools provisioning needs, in install order.
#[must_use]
pub fn default_set() -> Vec<Box<dyn Prerequisite>> {
    vec![
        Box::new(Docker),
        Box::new(ComposePlugin),
        Box::new(Nginx),
        Box::new(Certbot),
    ]
}

/// Make sure every tool is installed and working, then verify them
/// all once more.
pub fn ensure_all(
    runner: &dyn Runner,
    tools: &[Box<dyn Prerequisite>],
) -> ProvisionResult<PrerequisiteReport> {
    info!("Checking prerequisites...");

    let mut apt = Apt::new();
    let mut report = PrerequisiteReport::default();

    for tool in tools {
        let outcome = ensure(runner, &mut apt, tool.as_ref())?;
        report.entries.push((tool.name(), outcome));
    }

    verify_all(runner, tools)?;

    if report.all_satisfied() {
        info!("All prerequisites already satisfied");
    } else {
        info!("Prerequisites OK");
    }
    Ok(report)
}

fn ensure(
    runner: &dyn Runner,
    apt: &mut Apt,
    tool: &dyn Prerequisite,
) -> ProvisionResult<Outcome> {
    let name = tool.name();

    if tool.probe(runner) {
        info!("{name}: already installed");
        return Ok(Outcome::AlreadySatisfied);
    }

    let outcome = if tool.is_installed(runner) {
        warn!("{name}: installed but not working");

        if let Some(unit) = tool.service() {
            if systemd::try_start(runner, unit) && tool.probe(runner) {
                info!("{name}: started {unit}");
                return Ok(Outcome::Started);
            }
        }

        info!("{name}: reinstalling");
        apt.purge(runner, tool.packages())?;
        tool.install(runner, apt)?;
        Outcome::Reinstalled
    } else {
        info!("{name}: installing");
        tool.install(runner, apt)?;
        Outcome::Installed
    };

    if tool.probe(runner) {
        info!("{name}: installed");
    } else {
        warn!("{name}: still not working after install");
    }
    Ok(outcome)
}

fn verify_all(runner: &dyn Runner, tools: &[Box<dyn Prerequisite>]) -> ProvisionResult<()> {
    for tool in tools {
        if !tool.probe(runner) {
            return Err(ProvisionError::PrerequisiteMissing(format!(
                "{} failed verification after installation",
                tool.name()
            )));
        }
    }
    Ok(())
}
