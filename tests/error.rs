use n8n_provision::error::ProvisionError;

#[test]
fn display_invalid_input() {
    let err = ProvisionError::InvalidInput("domain is empty".into());
    assert_eq!(err.to_string(), "invalid input: domain is empty");
}

#[test]
fn display_command_failed_with_stderr() {
    let err = ProvisionError::CommandFailed {
        command: "nginx -t".into(),
        code: 1,
        stderr: "unexpected \"}\"".into(),
    };
    assert_eq!(
        err.to_string(),
        "command failed: nginx -t (exit code 1): unexpected \"}\""
    );
}

#[test]
fn display_command_failed_without_stderr() {
    let err = ProvisionError::CommandFailed {
        command: "false".into(),
        code: 1,
        stderr: String::new(),
    };
    assert_eq!(err.to_string(), "command failed: false (exit code 1)");
}

#[test]
fn display_command_not_found() {
    let err = ProvisionError::CommandNotFound("docker".into());
    assert_eq!(err.to_string(), "command not found: docker");
}

#[test]
fn display_prerequisite_missing() {
    let err = ProvisionError::PrerequisiteMissing("certbot".into());
    assert_eq!(err.to_string(), "prerequisite missing: certbot");
}

#[test]
fn container_exists_explains_removal() {
    let err = ProvisionError::ContainerExists("n8n".into());
    let msg = err.to_string();
    assert!(msg.contains("container 'n8n' already exists"));
    assert!(msg.contains("docker rm -f n8n"));
}

#[test]
fn dns_mismatch_names_both_addresses() {
    let err = ProvisionError::DnsMismatch {
        domain: "example.com".into(),
        expected: "203.0.113.10".into(),
        actual: "198.51.100.7".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("resolves to 198.51.100.7"));
    assert!(msg.contains("expected this host's public IP 203.0.113.10"));
    assert!(msg.contains("re-run"));
}

#[test]
fn healthcheck_timeout_is_distinct() {
    let err = ProvisionError::HealthcheckTimeout("n8n".into(), 30);
    assert_eq!(
        err.to_string(),
        "container 'n8n' started but did not become healthy after 30 attempts"
    );
}

#[test]
fn from_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err: ProvisionError = io_err.into();
    assert!(matches!(err, ProvisionError::Io(_)));
}

#[test]
fn from_json_error() {
    let json_err = serde_json::from_str::<Vec<u64>>("invalid").unwrap_err();
    let err: ProvisionError = json_err.into();
    assert!(matches!(err, ProvisionError::Json(_)));
}
