//! Syntax checks for the operator-supplied domain and email.
//!
//! Both checks are loose: the domain check accepts
//! anything made of letters, digits, dots, and hyphens that has at
//! least one dot, and the email check only looks for a
//! `local@host.tld` shape.

use crate::error::{ProvisionError, ProvisionResult};

pub fn validate_domain(domain: &str) -> ProvisionResult<()> {
    if domain.is_empty() {
        return Err(ProvisionError::InvalidInput("domain is empty".into()));
    }
    if domain.chars().any(char::is_whitespace) {
        return Err(ProvisionError::InvalidInput(format!(
            "domain '{domain}' contains whitespace"
        )));
    }
    if !domain.contains('.') {
        return Err(ProvisionError::InvalidInput(format!(
            "domain '{domain}' must contain at least one dot"
        )));
    }
    if let Some(bad) = domain
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '.' || *c == '-'))
    {
        return Err(ProvisionError::InvalidInput(format!(
            "domain '{domain}' contains invalid character '{bad}' \
             (allowed: letters, digits, '.', '-')"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> ProvisionResult<()> {
    if email.is_empty() {
        return Err(ProvisionError::InvalidInput("email is empty".into()));
    }
    if !is_email_shaped(email) {
        return Err(ProvisionError::InvalidInput(format!(
            "email '{email}' is not of the form user@host.tld"
        )));
    }
    Ok(())
}

/// Matches `^[^@]+@[^@]+\.[^@]+$`.
fn is_email_shaped(email: &str) -> bool {
    let Some((local, host)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || host.contains('@') {
        return false;
    }
    host.char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < host.len())
}
