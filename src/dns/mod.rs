use std::net::IpAddr;
use std::time::Duration;

use tracing::{debug, info};

use crate::cmd::{Invocation, Runner};
use crate::config::Settings;
use crate::error::{ProvisionError, ProvisionResult};

/// Fetch this host's public IP from an IP-echo HTTP endpoint.
pub fn public_ip(runner: &dyn Runner, url: &str, timeout: Duration) -> ProvisionResult<String> {
    let timeout = timeout.as_secs().max(1).to_string();
    let body = runner
        .run(&Invocation::new("curl").args(&["-fsS", "--max-time", &timeout, url]))
        .map_err(|e| {
            ProvisionError::DnsLookup(format!(
                "could not determine this host's public IP from {url} ({e}). \
                 Check outbound network access"
            ))
        })?;

    body.parse::<IpAddr>()
        .map(|_| body.clone())
        .map_err(|_| ProvisionError::DnsLookup(format!("unexpected response from {url}: '{body}'")))
}

/// Resolve the A record for `domain`, trying `dig` first and the
/// system resolver (`getent`) if `dig` yields nothing.
pub fn resolve(runner: &dyn Runner, domain: &str) -> ProvisionResult<String> {
    let dig = runner
        .run(&Invocation::new("dig").args(&["+short", "A", domain]))
        .map(|out| parse_dig(&out))
        .unwrap_or_default();
    if let Some(addr) = dig.first() {
        return Ok(addr.to_string());
    }

    debug!(domain, "dig returned no address, falling back to getent");
    let getent = runner
        .run(&Invocation::new("getent").args(&["ahostsv4", domain]))
        .map(|out| parse_getent(&out))
        .unwrap_or_default();
    if let Some(addr) = getent.first() {
        return Ok(addr.to_string());
    }

    Err(ProvisionError::DnsLookup(format!(
        "{domain} does not resolve to any address. Create an A record \
         for {domain} pointing at this host and wait for it to propagate"
    )))
}

/// Addresses in `dig +short` output, skipping CNAME targets.
#[must_use]
pub fn parse_dig(output: &str) -> Vec<IpAddr> {
    output
        .lines()
        .filter_map(|line| line.trim().parse().ok())
        .collect()
}

/// Addresses in `getent ahosts*` output (first column).
#[must_use]
pub fn parse_getent(output: &str) -> Vec<IpAddr> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .filter_map(|field| field.parse().ok())
        .collect()
}

/// Check that the configured domain points at this host. Returns the
/// confirmed address.
pub fn verify(runner: &dyn Runner, settings: &Settings) -> ProvisionResult<String> {
    info!("Verifying DNS for {}...", settings.domain);

    let expected = public_ip(runner, &settings.ip_echo_url, settings.ip_echo_timeout)?;
    let actual = resolve(runner, &settings.domain)?;

    info!("  Host public IP: {expected}");
    info!("  {} resolves to: {actual}", settings.domain);

    if expected != actual {
        return Err(ProvisionError::DnsMismatch {
            domain: settings.domain.clone(),
            expected,
            actual,
        });
    }

    info!("DNS OK: {} -> {actual}", settings.domain);
    Ok(actual)
}
