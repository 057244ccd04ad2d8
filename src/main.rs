use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use n8n_provision::cmd::{Privilege, System};
use n8n_provision::error::ProvisionError;
use n8n_provision::pipeline;
use n8n_provision::{Cli, Outcome, Pipeline};

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            if cli.verbose {
                EnvFilter::new("n8n_provision=debug")
            } else {
                EnvFilter::new("n8n_provision=info")
            }
        }))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            if matches!(
                e.downcast_ref::<ProvisionError>(),
                Some(ProvisionError::InvalidInput(_))
            ) {
                eprintln!();
                eprintln!("Usage: n8n-provision --domain=<fqdn> --email=<address>");
                eprintln!("Run with --help for more information.");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = cli.settings()?;

    if cli.dry_run {
        return Ok(pipeline::dry_run(&settings)?);
    }

    let privilege = Privilege::detect().context("resolving privileges")?;
    let runner = System::new(privilege);
    let mut workflow = Pipeline::new(settings, &runner);

    let outcome = workflow
        .run()
        .with_context(|| format!("provisioning aborted after reaching {}", workflow.stage()))?;

    let s = workflow.settings();
    eprintln!();
    eprintln!("========================================");
    match &outcome {
        Outcome::Done => eprintln!("n8n provisioned successfully!"),
        Outcome::DoneWithWarning(_) => eprintln!("n8n provisioned, with warnings"),
    }
    eprintln!("========================================");
    eprintln!();
    eprintln!("URL: {}", s.public_url());
    eprintln!("Container: {}", s.app.name);
    eprintln!("Data: {}", s.app.data_dir);
    eprintln!("nginx site: {}", s.nginx.available_path());
    if let Outcome::DoneWithWarning(warning) = &outcome {
        eprintln!();
        eprintln!("Warning: {warning}");
    }
    eprintln!();

    Ok(())
}
