use clap::Parser;

use crate::config::Settings;
use crate::error::ProvisionResult;

#[derive(Debug, Parser)]
#[command(name = "n8n-provision")]
#[command(about = "Provision n8n behind nginx with a Let's Encrypt certificate")]
#[command(
    after_help = "Example:\n  n8n-provision --domain=n8n.example.com --email=admin@example.com"
)]
pub struct Cli {
    /// Public domain name; must already resolve to this host
    #[arg(long, env = "N8N_DOMAIN", value_name = "FQDN")]
    pub domain: String,

    /// Contact email registered with Let's Encrypt
    #[arg(long, env = "N8N_EMAIL", value_name = "ADDRESS")]
    pub email: String,

    /// Print the generated files and planned actions without
    /// changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Use the Let's Encrypt staging environment
    #[arg(long)]
    pub staging: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Validate the arguments and build the run settings.
    pub fn settings(&self) -> ProvisionResult<Settings> {
        Ok(Settings::new(&self.domain, &self.email)?.staging(self.staging))
    }
}
