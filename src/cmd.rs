use std::fmt;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread::{self, ScopedJoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{ProvisionError, ProvisionResult};

/// A single external command, described before it runs.
///
/// Invocations marked [`elevated`](Invocation::elevated) are run
/// with root privileges by the [`System`] runner, so call sites
/// never branch on whether the tool itself runs as root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<Vec<u8>>,
    pub elevated: bool,
    pub interactive: bool,
}

impl Invocation {
    #[must_use]
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            stdin: None,
            elevated: false,
            interactive: false,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: &str) -> Self {
        self.args.push(arg.to_string());
        self
    }

    #[must_use]
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|a| (*a).to_string()));
        self
    }

    #[must_use]
    pub fn stdin(mut self, data: &[u8]) -> Self {
        self.stdin = Some(data.to_vec());
        self
    }

    #[must_use]
    pub const fn elevated(mut self) -> Self {
        self.elevated = true;
        self
    }

    /// Stream the child's stdout/stderr to the terminal instead of
    /// capturing them.
    #[must_use]
    pub const fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Structured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `-1` when the process was killed by a signal.
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl CommandOutput {
    #[must_use]
    pub const fn success(&self) -> bool {
        self.code == 0
    }
}

/// Executes [`Invocation`]s. The production implementation is
/// [`System`]; tests substitute a scripted fake.
pub trait Runner {
    /// Run the command to completion. Only spawn failures are
    /// errors; a non-zero exit is reported in the output.
    fn exec(&self, invocation: &Invocation) -> ProvisionResult<CommandOutput>;

    /// Run a command and return its trimmed stdout. Fails if the
    /// command returns a non-zero exit code.
    fn run(&self, invocation: &Invocation) -> ProvisionResult<String> {
        let output = self.exec(invocation)?;
        if output.success() {
            Ok(output.stdout.trim().to_string())
        } else {
            Err(ProvisionError::CommandFailed {
                command: invocation.to_string(),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            })
        }
    }

    /// Whether the command ran and exited zero.
    fn check(&self, invocation: &Invocation) -> bool {
        self.exec(invocation).is_ok_and(|o| o.success())
    }

    /// Check if a program exists on PATH.
    fn command_exists(&self, program: &str) -> bool {
        self.check(&Invocation::new("which").arg(program))
    }
}

/// How elevated invocations get root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    /// Already running as root.
    Root,
    /// Prefix elevated commands with `sudo`.
    Sudo,
}

impl Privilege {
    /// Resolve the privilege mode once at startup.
    pub fn detect() -> ProvisionResult<Self> {
        let probe = System::new(Self::Root);
        let uid = probe.run(&Invocation::new("id").arg("-u"))?;
        if uid == "0" {
            return Ok(Self::Root);
        }
        if probe.command_exists("sudo") {
            debug!(uid = %uid, "not running as root, elevating with sudo");
            return Ok(Self::Sudo);
        }
        Err(ProvisionError::PrivilegeRequired(
            "run as root or install sudo".into(),
        ))
    }
}

/// Runs invocations as local child processes.
pub struct System {
    privilege: Privilege,
}

impl System {
    #[must_use]
    pub const fn new(privilege: Privilege) -> Self {
        Self { privilege }
    }

    /// The program and arguments actually spawned for an invocation.
    #[must_use]
    pub fn command_line(&self, invocation: &Invocation) -> (String, Vec<String>) {
        if invocation.elevated && self.privilege == Privilege::Sudo {
            let mut args = vec![invocation.program.clone()];
            args.extend(invocation.args.iter().cloned());
            ("sudo".to_string(), args)
        } else {
            (invocation.program.clone(), invocation.args.clone())
        }
    }
}

impl Runner for System {
    fn exec(&self, invocation: &Invocation) -> ProvisionResult<CommandOutput> {
        let (program, args) = self.command_line(invocation);
        debug!(command = %invocation, elevated = invocation.elevated, "exec");

        let mut command = Command::new(&program);
        command.args(&args);
        command.stdin(if invocation.stdin.is_some() {
            Stdio::piped()
        } else if invocation.interactive {
            Stdio::inherit()
        } else {
            Stdio::null()
        });
        if invocation.interactive {
            command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        } else {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
        }

        let started = Instant::now();
        let mut child = command.spawn().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ProvisionError::CommandNotFound(program.clone())
            } else {
                ProvisionError::Io(e)
            }
        })?;

        // stdin is fed from its own thread while stdout is drained;
        // `tee` echoes its input and would otherwise fill the pipe.
        let pipe = child.stdin.take();
        let (output, fed) = thread::scope(|scope| {
            let feeder = pipe
                .zip(invocation.stdin.as_deref())
                .map(|(mut pipe, data)| scope.spawn(move || pipe.write_all(data)));
            let output = child.wait_with_output();
            (output, feeder.map(ScopedJoinHandle::join))
        });
        let output = output?;
        match fed {
            Some(Ok(Err(e))) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e.into()),
            Some(Err(_)) => return Err(io::Error::other("stdin writer panicked").into()),
            _ => {}
        }
        let duration = started.elapsed();
        let code = output.status.code().unwrap_or(-1);

        debug!(
            command = %invocation,
            code,
            elapsed_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            "exited"
        );

        Ok(CommandOutput {
            code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration,
        })
    }
}

/// Write `content` to `path` with root privileges via `tee`.
pub fn write_file(runner: &dyn Runner, path: &str, content: &str) -> ProvisionResult<()> {
    let invocation = Invocation::new("tee")
        .arg(path)
        .stdin(content.as_bytes())
        .elevated();
    runner.run(&invocation)?;
    Ok(())
}
