use std::{
    io::Read,
    path::Path,
    process::{Child, Command, Stdio},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error};

use crate::{
    models::app_state::CommandOutput,
    utils::{
        errors::{ResultTrait as _, ResultWithError},
        shlex::ShlexUtils,
    },
};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct CommandUtils {}

impl CommandUtils {
    /// Runs `cmd` through `sh -c`, used for user supplied shell snippets.
    pub fn run_command_str(cmd: &str, cwd: &Path) -> ResultWithError<CommandOutput> {
        let output = Command::new("sh")
            .current_dir(cwd)
            .arg("-c")
            .arg(cmd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .auto_err(format!("Failed to execute command: {cmd}"))?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status: output.status.code().unwrap_or(-1),
        })
    }

    /// Runs a shell-quoted command line without a shell, capturing both streams.
    ///
    /// When `timeout` elapses the child is killed and an error is returned.
    pub fn run_command(
        cmd: &str,
        cwd: &Path,
        timeout: Option<Duration>,
    ) -> ResultWithError<CommandOutput> {
        debug!("Running `{}` in {}", cmd, cwd.display());

        let mut command = ShlexUtils::parse_command(cmd)?;
        // Own process group, so a timeout also stops whatever the runner spawned.
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut command, 0);

        let mut child = command
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .auto_err(format!("Failed to start command: {cmd}"))?;

        let stdout = Self::capture(child.stdout.take());
        let stderr = Self::capture(child.stderr.take());

        let status = Self::wait_with_deadline(&mut child, timeout.map(|t| Instant::now() + t))?;

        // Readers of a killed command are detached rather than joined.
        let Some(status) = status else {
            return Err(format!(
                "Command timed out after {:?}: {cmd}",
                timeout.unwrap_or_default()
            )
            .into());
        };

        Ok(CommandOutput {
            stdout: Self::join_capture(stdout),
            stderr: Self::join_capture(stderr),
            status,
        })
    }

    fn capture<R>(stream: Option<R>) -> Option<JoinHandle<String>>
    where
        R: Read + Send + 'static,
    {
        stream.map(|mut stream| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                if let Err(err) = stream.read_to_end(&mut buf) {
                    error!("Failed to read command output: {}", err);
                }
                String::from_utf8_lossy(&buf).to_string()
            })
        })
    }

    fn join_capture(handle: Option<JoinHandle<String>>) -> String {
        handle
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default()
    }

    /// Returns `None` when the deadline passed and the child was killed.
    fn wait_with_deadline(
        child: &mut Child,
        deadline: Option<Instant>,
    ) -> ResultWithError<Option<i32>> {
        loop {
            if let Some(status) = child.try_wait().auto_err("Failed to poll command")? {
                return Ok(Some(status.code().unwrap_or(-1)));
            }

            if let Some(deadline) = deadline
                && Instant::now() >= deadline
            {
                Self::kill_group(child);
                let _ = child.wait();
                return Ok(None);
            }

            thread::sleep(POLL_INTERVAL);
        }
    }

    #[cfg(unix)]
    fn kill_group(child: &mut Child) {
        use nix::{
            sys::signal::{Signal, killpg},
            unistd::Pid,
        };

        let pgid = Pid::from_raw(child.id() as i32);
        if let Err(err) = killpg(pgid, Signal::SIGKILL) {
            error!("Failed to kill process group {}: {}", pgid, err);
            if let Err(err) = child.kill() {
                error!("Failed to kill timed out command: {}", err);
            }
        }
    }

    #[cfg(not(unix))]
    fn kill_group(child: &mut Child) {
        if let Err(err) = child.kill() {
            error!("Failed to kill timed out command: {}", err);
        }
    }

    pub fn display_loader(msg: String) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠸", "⠴", "⠦", "⠇", "✔"]);
        spinner.set_style(style);
        spinner.set_message(msg);
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    }
}
