use serde::Deserialize;

use crate::cmd::{self, Invocation, Runner};
use crate::error::{ProvisionError, ProvisionResult};
use crate::prereq::{Apt, Prerequisite};
use crate::systemd;

const KEYRING: &str = "/etc/apt/keyrings/docker.asc";
const SOURCES_LIST: &str = "/etc/apt/sources.list.d/docker.list";
const GPG_URL: &str = "https://download.docker.com/linux/ubuntu/gpg";

const ENGINE_PACKAGES: &[&str] = &[
    "docker-ce",
    "docker-ce-cli",
    "containerd.io",
    "docker-buildx-plugin",
    "docker-compose-plugin",
];

/// Docker Engine from Docker's own apt repository.
pub struct Docker;

/// The `docker compose` CLI plugin.
pub struct ComposePlugin;

#[derive(Deserialize)]
struct ComposeVersion {
    version: String,
}

/// The apt source line for Docker's Ubuntu repository.
#[must_use]
pub fn repo_line(arch: &str, codename: &str) -> String {
    format!(
        "deb [arch={arch} signed-by={KEYRING}] \
         https://download.docker.com/linux/ubuntu {codename} stable\n"
    )
}

/// Ubuntu release codename from `/etc/os-release`.
fn os_codename(runner: &dyn Runner) -> ProvisionResult<String> {
    let codename = runner.run(&Invocation::new("sh").args(&[
        "-c",
        ". /etc/os-release && echo \"$VERSION_CODENAME\"",
    ]))?;
    if codename.is_empty() {
        return Err(ProvisionError::PrerequisiteMissing(
            "cannot determine the Ubuntu release codename".into(),
        ));
    }
    Ok(codename)
}

fn add_repository(runner: &dyn Runner, apt: &mut Apt) -> ProvisionResult<()> {
    apt.install(runner, &["ca-certificates", "curl", "gnupg"])?;

    runner.run(
        &Invocation::new("install")
            .args(&["-m", "0755", "-d", "/etc/apt/keyrings"])
            .elevated(),
    )?;
    runner.run(
        &Invocation::new("curl")
            .args(&["-fsSL", GPG_URL, "-o", KEYRING])
            .elevated(),
    )?;
    runner.run(&Invocation::new("chmod").args(&["a+r", KEYRING]).elevated())?;

    let arch = runner.run(&Invocation::new("dpkg").arg("--print-architecture"))?;
    let codename = os_codename(runner)?;
    cmd::write_file(runner, SOURCES_LIST, &repo_line(&arch, &codename))?;

    apt.invalidate();
    Ok(())
}

impl Prerequisite for Docker {
    fn name(&self) -> &'static str {
        "docker"
    }

    fn probe(&self, runner: &dyn Runner) -> bool {
        let info = Invocation::new("docker")
            .args(&["info", "--format", "{{json .ServerVersion}}"])
            .elevated();
        runner
            .run(&info)
            .ok()
            .and_then(|out| serde_json::from_str::<String>(&out).ok())
            .is_some_and(|version| !version.is_empty())
    }

    fn is_installed(&self, runner: &dyn Runner) -> bool {
        runner.command_exists("docker")
    }

    fn install(&self, runner: &dyn Runner, apt: &mut Apt) -> ProvisionResult<()> {
        add_repository(runner, apt)?;
        apt.install(runner, ENGINE_PACKAGES)?;
        systemd::enable_now(runner, "docker")
    }

    fn packages(&self) -> &'static [&'static str] {
        &[
            "docker-ce",
            "docker-ce-cli",
            "containerd.io",
            "docker-buildx-plugin",
            "docker-compose-plugin",
            "docker.io",
            "containerd",
            "runc",
        ]
    }

    fn service(&self) -> Option<&'static str> {
        Some("docker")
    }
}

impl Prerequisite for ComposePlugin {
    fn name(&self) -> &'static str {
        "docker compose"
    }

    fn probe(&self, runner: &dyn Runner) -> bool {
        let version = Invocation::new("docker")
            .args(&["compose", "version", "--format", "json"])
            .elevated();
        runner
            .run(&version)
            .ok()
            .and_then(|out| serde_json::from_str::<ComposeVersion>(&out).ok())
            .is_some_and(|v| !v.version.is_empty())
    }

    fn is_installed(&self, runner: &dyn Runner) -> bool {
        Apt::is_installed(runner, "docker-compose-plugin")
    }

    fn install(&self, runner: &dyn Runner, apt: &mut Apt) -> ProvisionResult<()> {
        apt.install(runner, &["docker-compose-plugin"])
    }

    fn packages(&self) -> &'static [&'static str] {
        &["docker-compose-plugin"]
    }
}
