use std::fmt;

use tracing::info;

use crate::certificate;
use crate::cmd::Runner;
use crate::compose;
use crate::config::Settings;
use crate::deploy;
use crate::dns;
use crate::error::ProvisionResult;
use crate::nginx;
use crate::prereq::{self, Prerequisite};
use crate::proxy;

/// Milestones of a provisioning run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Validated,
    PrereqsReady,
    DnsConfirmed,
    ContainerRunning,
    ProxyConfigured,
    CertIssued,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "START",
            Self::Validated => "VALIDATED",
            Self::PrereqsReady => "PREREQS_READY",
            Self::ContainerRunning => "CONTAINER_RUNNING",
            Self::DnsConfirmed => "DNS_CONFIRMED",
            Self::ProxyConfigured => "PROXY_CONFIGURED",
            Self::CertIssued => "CERT_ISSUED",
            Self::Done => "DONE",
        })
    }
}

/// How a run that did not abort ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Everything was provisioned, but the final public HTTPS probe
    /// failed.
    DoneWithWarning(String),
}

/// Drives the provisioning stages in order and halts on the first
/// error.
pub struct Pipeline<'a> {
    settings: Settings,
    runner: &'a dyn Runner,
    prerequisites: Vec<Box<dyn Prerequisite>>,
    stage: Stage,
}

impl<'a> Pipeline<'a> {
    /// `settings` has already been validated, so the pipeline starts
    /// at [`Stage::Validated`].
    #[must_use]
    pub fn new(settings: Settings, runner: &'a dyn Runner) -> Self {
        Self {
            settings,
            runner,
            prerequisites: prereq::default_set(),
            stage: Stage::Validated,
        }
    }

    /// Replace the set of prerequisite tools checked before deploying.
    #[must_use]
    pub fn prerequisites(mut self, tools: Vec<Box<dyn Prerequisite>>) -> Self {
        self.prerequisites = tools;
        self
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The last stage reached; after a failed [`run`](Self::run) this
    /// is the stage the run aborted from.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, stage: Stage) {
        info!(stage = %stage, "reached {stage}");
        self.stage = stage;
    }

    pub fn run(&mut self) -> ProvisionResult<Outcome> {
        let runner = self.runner;

        prereq::ensure_all(runner, &self.prerequisites)?;
        self.advance(Stage::PrereqsReady);

        deploy::ensure_absent(runner, &self.settings.app)?;
        dns::verify(runner, &self.settings)?;
        self.advance(Stage::DnsConfirmed);

        let app = &self.settings.app;
        deploy::prepare(runner, app)?;
        deploy::pull(runner, app)?;
        deploy::start(runner, app)?;
        deploy::wait_ready(runner, app, self.settings.readiness)?;
        self.advance(Stage::ContainerRunning);

        proxy::configure(runner, &self.settings.nginx)?;
        self.advance(Stage::ProxyConfigured);

        certificate::obtain(runner, &self.settings)?;
        self.advance(Stage::CertIssued);

        let warning = certificate::probe(runner, &self.settings);
        self.advance(Stage::Done);

        Ok(warning.map_or(Outcome::Done, Outcome::DoneWithWarning))
    }
}

/// Print the generated files and planned actions without running
/// anything.
pub fn dry_run(settings: &Settings) -> ProvisionResult<()> {
    let compose_content = compose::render(&settings.app)?;
    let site_content = nginx::render(&settings.nginx);

    eprintln!("=== Dry run: no changes will be made ===");
    eprintln!();

    eprintln!("--- {} ---", settings.app.compose_file());
    println!("{compose_content}");

    eprintln!("--- {} ---", settings.nginx.available_path());
    println!("{site_content}");

    eprintln!("--- Actions that would be performed ---");
    for (i, step) in plan(settings).iter().enumerate() {
        eprintln!("{}. {step}", i + 1);
    }

    Ok(())
}

/// Human-readable list of the steps a run performs.
#[must_use]
pub fn plan(settings: &Settings) -> Vec<String> {
    let app = &settings.app;
    let site = &settings.nginx;
    vec![
        "Install missing prerequisites: docker, docker compose, nginx, certbot".to_string(),
        format!("Abort if a container named '{}' already exists", app.name),
        format!("Check that {} resolves to this host's public IP", settings.domain),
        format!("Write {} and pull {}", app.compose_file(), app.image),
        format!(
            "Start '{}' and wait for {} (up to {} attempts)",
            app.name,
            app.health_url(),
            settings.readiness.max_attempts
        ),
        format!("Enable {} and disable {}", site.enabled_path(), site.default_enabled_path()),
        "Test and reload nginx".to_string(),
        format!(
            "Run certbot for {} ({}){}",
            settings.domain,
            settings.email,
            if settings.staging { " against staging" } else { "" }
        ),
        format!("Probe {}", settings.public_url()),
    ]
}
