use std::process::{Command, Stdio};

use tracing::{error, info};

use crate::{
    hooks::iface::{Hook, HookContext, HookType},
    models::config::HookConfig,
    utils::{
        errors::{EmptyResult, ResultTrait, ResultWithError},
        file_logger::FileLogger,
        shlex::ShlexUtils,
    },
};

/// Custom hook that gets implementation based on yaml config.
pub struct HookCustom {
    config: HookConfig,
}

impl HookCustom {
    pub fn new(config: HookConfig) -> Self {
        HookCustom { config }
    }

    fn get_command(&self, ctx: &HookContext) -> ResultWithError<Command> {
        let mut cmd = ShlexUtils::parse_command(&self.config.command)?;
        cmd.current_dir(ctx.workspace_root()?)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(env) = &self.config.env {
            cmd.envs(env);
        }

        Ok(cmd)
    }

    fn log_output(name: &str, stdout: &[u8], stderr: &[u8]) {
        if !stdout.is_empty() {
            FileLogger::new(&format!("{name}.stdout.log")).log(&String::from_utf8_lossy(stdout));
        }
        if !stderr.is_empty() {
            FileLogger::new(&format!("{name}.stderr.log")).log(&String::from_utf8_lossy(stderr));
        }
    }

    fn run_async(&self, ctx: &HookContext) -> EmptyResult {
        let mut cmd = self.get_command(ctx)?;
        let child = cmd
            .spawn()
            .auto_err(format!("Failed to start custom hook async: {}", self.config.name))?;
        let name = self.config.name.clone();

        std::thread::spawn(move || match child.wait_with_output() {
            Ok(output) => {
                if !output.status.success() {
                    error!(
                        "[{name}] Custom hook async exited with non-zero status: {}",
                        output.status
                    );
                }
                Self::log_output(&name, &output.stdout, &output.stderr);
            }
            Err(e) => {
                error!("[{name}] Failed to wait for custom hook async: {}", e);
            }
        });

        Ok(())
    }

    fn run_sync(&self, ctx: &HookContext) -> EmptyResult {
        let mut cmd = self.get_command(ctx)?;
        let output = cmd
            .output()
            .auto_err(format!("Failed to start custom hook sync: {}", self.config.name))?;
        Self::log_output(&self.config.name, &output.stdout, &output.stderr);

        if !output.status.success() {
            return Err(format!(
                "Custom hook {} exited with status {}",
                self.config.name, output.status
            )
            .into());
        }
        Ok(())
    }
}

impl Hook for HookCustom {
    fn get_type(&self) -> HookType {
        self.config.hook_type
    }

    fn continue_on_error(&self) -> bool {
        self.config.continue_on_error
    }

    fn run(&self, ctx: &HookContext) -> EmptyResult {
        info!("Executing custom hook: {}", self.config.name);

        if self.config.is_async {
            self.run_async(ctx)
        } else {
            self.run_sync(ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{app_state::AppState, args::AppArgs, config::Config};
    use clap::Parser as _;
    use std::collections::HashMap;

    fn hook(command: &str) -> HookCustom {
        HookCustom::new(HookConfig {
            name: "test-hook".into(),
            hook_type: HookType::BeforeAll,
            is_async: false,
            continue_on_error: false,
            command: command.into(),
            env: Some(HashMap::from([("HOOK_MARKER".into(), "done".into())])),
        })
    }

    #[test]
    fn sync_hooks_run_in_the_workspace_with_env() {
        let dir = tempfile::tempdir().unwrap();
        let args = AppArgs::parse_from(["appforge", "schema"]);
        let config = Config::default();
        let state = AppState {
            workspace_root: dir.path().to_path_buf(),
            ..Default::default()
        };
        let ctx = HookContext::new(&args, &config, state);

        hook("sh -c 'echo $HOOK_MARKER > marker.txt'")
            .run(&ctx)
            .unwrap();
        let marker = std::fs::read_to_string(dir.path().join("marker.txt")).unwrap();
        assert_eq!(marker.trim(), "done");

        assert!(hook("sh -c 'exit 2'").run(&ctx).is_err());
    }
}
