//! Provision a self-hosted [n8n](https://n8n.io) instance behind
//! nginx with a Let's Encrypt certificate on a fresh Ubuntu host.
//!
//! One command takes a bare server to a working HTTPS endpoint:
//!
//! ```sh
//! n8n-provision --domain=n8n.example.com --email=admin@example.com
//! ```
//!
//! # Overview
//!
//! A run is a [`Pipeline`] of strictly sequential stages, each one a
//! precondition for the next:
//!
//! 1. **Validate** - check the domain and email syntax
//!    ([`validate`]) and build the immutable [`Settings`]
//! 2. **Prerequisites** - make sure Docker, the compose plugin,
//!    nginx, and certbot are installed and working ([`prereq`])
//! 3. **Deploy** - refuse to touch an existing `n8n` container,
//!    confirm the domain resolves to this host ([`dns`]), then pull
//!    and start the container and wait for its health endpoint
//!    ([`deploy`])
//! 4. **Expose** - install the nginx site ([`proxy`]), obtain the
//!    certificate, and probe the public URL ([`certificate`])
//!
//! Every fatal condition is a [`ProvisionError`] and stops the run.
//! Only the final HTTPS probe is soft: it turns the result into
//! [`Outcome::DoneWithWarning`].
//!
//! # External tools
//!
//! Nothing is reimplemented: every step shells out to `apt-get`,
//! `docker`, `dig`, `nginx`, `certbot`, or `curl` through a
//! [`Runner`](cmd::Runner). The [`System`](cmd::System) runner
//! prefixes `sudo` on elevated commands when not already root, so
//! the steps themselves never care how privileges are obtained.
//!
//! # Preview
//!
//! `--dry-run` prints the generated `docker-compose.yml`, the nginx
//! site, and the list of actions without touching the host.
//!
//! # Library use
//!
//! ```rust,no_run
//! use n8n_provision::cmd::{Privilege, System};
//! use n8n_provision::{Pipeline, Settings};
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::new("n8n.example.com", "admin@example.com")?;
//!     let runner = System::new(Privilege::detect()?);
//!
//!     let outcome = Pipeline::new(settings, &runner).run()?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```

// Allow noisy pedantic lints that don't add value for a
// provisioning tool crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod app;
pub mod certificate;
pub mod cli;
pub mod cmd;
pub mod compose;
pub mod config;
pub mod deploy;
pub mod dns;
pub mod error;
pub mod nginx;
pub mod pipeline;
pub mod prereq;
pub mod proxy;
pub mod systemd;
pub mod validate;

pub use app::App;
pub use cli::Cli;
pub use config::{Readiness, Settings};
pub use error::{ProvisionError, ProvisionResult};
pub use nginx::NginxSite;
pub use pipeline::{Outcome, Pipeline, Stage};
