//! Scripted stand-in for the system command runner.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use n8n_provision::cmd::{CommandOutput, Invocation, Runner};
use n8n_provision::error::ProvisionResult;
use n8n_provision::{Readiness, Settings};

pub const HOST_IP: &str = "203.0.113.10";
pub const DOMAIN: &str = "example.com";
pub const EMAIL: &str = "admin@example.com";

pub fn ok(stdout: &str) -> CommandOutput {
    CommandOutput {
        code: 0,
        stdout: stdout.to_string(),
        ..Default::default()
    }
}

pub fn failed(stderr: &str) -> CommandOutput {
    CommandOutput {
        code: 1,
        stderr: stderr.to_string(),
        ..Default::default()
    }
}

struct Rule {
    prefix: String,
    outputs: VecDeque<CommandOutput>,
}

/// Answers commands by the first matching prefix of their command
/// line (most recently added rule wins). A rule with several outputs
/// plays them in order and then keeps repeating the last one.
/// Unmatched commands succeed with empty output.
#[derive(Default)]
pub struct FakeRunner {
    rules: RefCell<Vec<Rule>>,
    calls: RefCell<Vec<(String, Option<String>)>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, prefix: &str, stdout: &str) -> Self {
        self.sequence(prefix, vec![ok(stdout)])
    }

    pub fn fail(self, prefix: &str) -> Self {
        self.sequence(prefix, vec![failed("")])
    }

    pub fn fail_with(self, prefix: &str, stderr: &str) -> Self {
        self.sequence(prefix, vec![failed(stderr)])
    }

    pub fn sequence(self, prefix: &str, outputs: Vec<CommandOutput>) -> Self {
        self.rules.borrow_mut().push(Rule {
            prefix: prefix.to_string(),
            outputs: outputs.into(),
        });
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(l, _)| l.clone()).collect()
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.count(prefix) > 0
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|(l, _)| l.starts_with(prefix))
            .count()
    }

    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.calls
            .borrow()
            .iter()
            .position(|(l, _)| l.starts_with(prefix))
    }

    /// stdin fed to the first call matching `prefix`.
    pub fn stdin_of(&self, prefix: &str) -> Option<String> {
        self.calls
            .borrow()
            .iter()
            .find(|(l, _)| l.starts_with(prefix))
            .and_then(|(_, stdin)| stdin.clone())
    }
}

impl Runner for FakeRunner {
    fn exec(&self, invocation: &Invocation) -> ProvisionResult<CommandOutput> {
        let line = invocation.to_string();
        let stdin = invocation
            .stdin
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned());
        self.calls.borrow_mut().push((line.clone(), stdin));

        let mut rules = self.rules.borrow_mut();
        let Some(rule) = rules.iter_mut().rev().find(|r| line.starts_with(&r.prefix)) else {
            return Ok(ok(""));
        };
        let output = if rule.outputs.len() > 1 {
            rule.outputs.pop_front().unwrap_or_default()
        } else {
            rule.outputs.front().cloned().unwrap_or_default()
        };
        Ok(output)
    }
}

pub const DOCKER_INFO: &str = "docker info";
pub const COMPOSE_VERSION: &str = "docker compose version";
pub const NGINX_VERSION: &str = "nginx -v";
pub const CERTBOT_VERSION: &str = "certbot --version";
pub const WHICH: &str = "which";
pub const IP_ECHO: &str = "curl -fsS --max-time 10 https://api.ipify.org";
pub const DIG: &str = "dig +short A";
pub const GETENT: &str = "getent ahostsv4";
pub const HEALTH: &str = "curl -fsS -o /dev/null --max-time 5 http://localhost:5678/healthz";
pub const PUBLIC_PROBE: &str = "curl -fsS -o /dev/null --max-time 10 https://example.com";
pub const APT_GET: &str = "env DEBIAN_FRONTEND=noninteractive apt-get";
pub const DOCKER_PS: &str = "docker ps -a";
pub const COMPOSE_UP: &str = "docker compose -f /opt/n8n/docker-compose.yml up -d";
pub const COMPOSE_PULL: &str = "docker compose -f /opt/n8n/docker-compose.yml pull";
pub const CERTBOT: &str = "certbot --nginx";

fn dpkg_status(package: &str) -> String {
    format!("dpkg-query -W -f=${{Status}} {package}")
}

/// A host where every tool is installed and working.
pub fn equipped_host() -> FakeRunner {
    FakeRunner::new()
        .on(DOCKER_INFO, "\"27.3.1\"")
        .on(COMPOSE_VERSION, r#"{"version":"v2.29.7"}"#)
        .on(&dpkg_status("python3-certbot-nginx"), "install ok installed")
        .on(&dpkg_status("docker-compose-plugin"), "install ok installed")
}

/// An equipped host whose DNS already points at it and whose
/// container becomes healthy immediately.
pub fn ready_host() -> FakeRunner {
    equipped_host()
        .on(IP_ECHO, HOST_IP)
        .on(DIG, HOST_IP)
        .on("ufw status", "Status: inactive")
}

pub fn mark_installed(runner: FakeRunner, package: &str) -> FakeRunner {
    runner.on(&dpkg_status(package), "install ok installed")
}

pub fn settings() -> Settings {
    Settings::new(DOMAIN, EMAIL)
        .expect("valid test input")
        .readiness(Readiness {
            max_attempts: 3,
            interval: Duration::ZERO,
        })
        .probe_delay(Duration::ZERO)
}
