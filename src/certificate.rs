use std::thread;

use tracing::{info, warn};

use crate::cmd::{Invocation, Runner};
use crate::config::Settings;
use crate::error::{ProvisionError, ProvisionResult};

/// certbot arguments for a non-interactive nginx install of a
/// certificate covering exactly `settings.domain`.
#[must_use]
pub fn certbot_args(settings: &Settings) -> Vec<String> {
    let mut args: Vec<String> = [
        "--nginx",
        "--non-interactive",
        "--agree-tos",
        "--email",
        settings.email.as_str(),
        "-d",
        settings.domain.as_str(),
        "--redirect",
    ]
    .iter()
    .map(|a| (*a).to_string())
    .collect();
    if settings.staging {
        args.push("--test-cert".to_string());
    }
    args
}

/// Obtain a certificate and let certbot rewrite the site for HTTPS
/// with an HTTP redirect.
pub fn obtain(runner: &dyn Runner, settings: &Settings) -> ProvisionResult<()> {
    info!(
        "Requesting certificate for {}{}...",
        settings.domain,
        if settings.staging { " (staging)" } else { "" }
    );

    let args = certbot_args(settings);
    let refs: Vec<&str> = args.iter().map(String::as_str).collect();
    let invocation = Invocation::new("certbot")
        .args(&refs)
        .elevated()
        .interactive();

    runner.run(&invocation).map_err(|e| {
        ProvisionError::Certificate(format!(
            "{e}. Check that ports 80 and 443 are reachable from the \
             internet and see /var/log/letsencrypt/letsencrypt.log"
        ))
    })?;

    info!("Certificate installed for {}", settings.domain);
    Ok(())
}

/// GET the public HTTPS endpoint after a short settle delay. Returns
/// a warning message instead of failing.
pub fn probe(runner: &dyn Runner, settings: &Settings) -> Option<String> {
    let url = settings.public_url();
    thread::sleep(settings.probe_delay);

    info!("Checking {url}...");
    let output = runner.exec(
        &Invocation::new("curl").args(&["-fsS", "-o", "/dev/null", "--max-time", "10", &url]),
    );

    match output {
        Ok(o) if o.success() => {
            info!("{url} is reachable");
            None
        }
        Ok(o) => {
            let message = format!(
                "{url} is not answering yet (curl exit {}: {}). \
                 The certificate is installed; DNS or caches may need \
                 a few more minutes",
                o.code,
                o.stderr.trim()
            );
            warn!("{message}");
            Some(message)
        }
        Err(e) => {
            let message = format!("could not probe {url}: {e}");
            warn!("{message}");
            Some(message)
        }
    }
}
