use std::time::Duration;

use crate::app::App;
use crate::error::ProvisionResult;
use crate::nginx::NginxSite;
use crate::validate::{validate_domain, validate_email};

/// Polling budget for the application's health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for Readiness {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(5),
        }
    }
}

/// Everything one provisioning run needs, fixed once the input has
/// been validated. Every step receives it by reference.
#[derive(Debug, Clone)]
pub struct Settings {
    pub domain: String,
    pub email: String,
    pub app: App,
    pub nginx: NginxSite,
    pub readiness: Readiness,
    pub ip_echo_url: String,
    pub ip_echo_timeout: Duration,
    /// Pause before probing the public HTTPS endpoint.
    pub probe_delay: Duration,
    /// Request a certificate from the Let's Encrypt staging CA.
    pub staging: bool,
}

impl Settings {
    /// Validate `domain` and `email` and build the default n8n
    /// settings for them.
    pub fn new(domain: &str, email: &str) -> ProvisionResult<Self> {
        validate_domain(domain)?;
        validate_email(email)?;

        let app = App::n8n(domain);
        let nginx = NginxSite::new(domain, app.port);

        Ok(Self {
            domain: domain.to_string(),
            email: email.to_string(),
            app,
            nginx,
            readiness: Readiness::default(),
            ip_echo_url: "https://api.ipify.org".to_string(),
            ip_echo_timeout: Duration::from_secs(10),
            probe_delay: Duration::from_secs(5),
            staging: false,
        })
    }

    #[must_use]
    pub const fn readiness(mut self, readiness: Readiness) -> Self {
        self.readiness = readiness;
        self
    }

    #[must_use]
    pub fn ip_echo_url(mut self, url: &str) -> Self {
        self.ip_echo_url = url.to_string();
        self
    }

    #[must_use]
    pub const fn probe_delay(mut self, delay: Duration) -> Self {
        self.probe_delay = delay;
        self
    }

    #[must_use]
    pub const fn staging(mut self, staging: bool) -> Self {
        self.staging = staging;
        self
    }

    #[must_use]
    pub fn public_url(&self) -> String {
        format!("https://{}", self.domain)
    }
}
