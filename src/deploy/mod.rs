use std::thread;
use std::time::Instant;

use serde::Deserialize;
use tracing::{info, warn};

use crate::app::App;
use crate::cmd::{self, Invocation, Runner};
use crate::compose;
use crate::config::Readiness;
use crate::error::{ProvisionError, ProvisionResult};

/// One line of `docker ps --format '{{json .}}'`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerSummary {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Names")]
    pub names: String,
    #[serde(rename = "State", default)]
    pub state: String,
    #[serde(rename = "Status", default)]
    pub status: String,
}

impl ContainerSummary {
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        self.names
            .split(',')
            .any(|n| n.trim().trim_start_matches('/') == name)
    }
}

/// Parse `docker ps --format '{{json .}}'` output, one object per
/// line.
pub fn parse_ps(output: &str) -> ProvisionResult<Vec<ContainerSummary>> {
    output
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).map_err(ProvisionError::from))
        .collect()
}

/// Find a container (running or stopped) with exactly `name`.
pub fn find_container(
    runner: &dyn Runner,
    name: &str,
) -> ProvisionResult<Option<ContainerSummary>> {
    let filter = format!("name=^/?{name}$");
    let output = runner.run(
        &Invocation::new("docker")
            .args(&["ps", "-a", "--filter", &filter, "--format", "{{json .}}"])
            .elevated(),
    )?;
    Ok(parse_ps(&output)?.into_iter().find(|c| c.has_name(name)))
}

/// Refuse to continue if a container with the app's name exists;
/// it may hold data we must not clobber.
pub fn ensure_absent(runner: &dyn Runner, app: &App) -> ProvisionResult<()> {
    if let Some(existing) = find_container(runner, &app.name)? {
        warn!(
            id = %existing.id,
            state = %existing.state,
            "Container '{}' already exists ({})",
            app.name,
            existing.status
        );
        return Err(ProvisionError::ContainerExists(app.name.clone()));
    }
    Ok(())
}

/// Create the data directory and write the compose file.
pub fn prepare(runner: &dyn Runner, app: &App) -> ProvisionResult<()> {
    info!("Preparing {}...", app.base_dir);
    runner.run(
        &Invocation::new("mkdir")
            .args(&["-p", &app.data_dir])
            .elevated(),
    )?;
    runner.run(
        &Invocation::new("chown")
            .args(&["-R", &app.data_owner, &app.data_dir])
            .elevated(),
    )?;
    cmd::write_file(runner, &app.compose_file(), &compose::render(app)?)
}

fn compose_cmd(app: &App, args: &[&str]) -> Invocation {
    let file = app.compose_file();
    Invocation::new("docker")
        .args(&["compose", "-f", &file])
        .args(args)
        .elevated()
        .interactive()
}

pub fn pull(runner: &dyn Runner, app: &App) -> ProvisionResult<()> {
    info!("Pulling {}...", app.image);
    runner.run(&compose_cmd(app, &["pull"]))?;
    Ok(())
}

pub fn start(runner: &dyn Runner, app: &App) -> ProvisionResult<()> {
    info!("Starting container '{}'...", app.name);
    runner.run(&compose_cmd(app, &["up", "-d"]))?;
    Ok(())
}

/// Poll the app's local health endpoint until it answers or the
/// attempt budget runs out.
pub fn wait_ready(runner: &dyn Runner, app: &App, readiness: Readiness) -> ProvisionResult<()> {
    let url = app.health_url();
    let max = readiness.max_attempts;
    info!("Waiting for {url} to become ready...");

    let probe = Invocation::new("curl").args(&["-fsS", "-o", "/dev/null", "--max-time", "5", &url]);

    for attempt in 1..=max {
        let started = Instant::now();
        if runner.check(&probe) {
            info!("  Health check ({attempt}/{max}): ready");
            return Ok(());
        }
        info!("  Health check ({attempt}/{max}): not ready, retrying...");
        // the probe's own time counts against the interval
        if attempt < max {
            thread::sleep(readiness.interval.saturating_sub(started.elapsed()));
        }
    }

    Err(ProvisionError::HealthcheckTimeout(app.name.clone(), max))
}
