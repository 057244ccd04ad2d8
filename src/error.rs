pub type ProvisionResult<T> = Result<T, ProvisionError>;

#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("command failed: {command} (exit code {code}){}", stderr_suffix(.stderr))]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("root privileges required: {0}")]
    PrivilegeRequired(String),

    #[error("prerequisite missing: {0}")]
    PrerequisiteMissing(String),

    #[error(
        "container '{0}' already exists. Remove it manually \
         (docker rm -f {0}) after backing up its data, then re-run"
    )]
    ContainerExists(String),

    #[error("DNS lookup failed: {0}")]
    DnsLookup(String),

    #[error(
        "DNS for {domain} resolves to {actual}, expected this host's \
         public IP {expected}. Point an A record for {domain} at \
         {expected}, wait for propagation, then re-run"
    )]
    DnsMismatch {
        domain: String,
        expected: String,
        actual: String,
    },

    #[error(
        "container '{0}' started but did not become healthy after {1} attempts"
    )]
    HealthcheckTimeout(String, u32),

    #[error("nginx configuration test failed: {0}")]
    ConfigTest(String),

    #[error("certificate issuance failed: {0}")]
    Certificate(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}
