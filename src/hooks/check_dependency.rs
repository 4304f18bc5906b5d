use std::path::Path;

use tracing::{error, info};

use crate::{
    hooks::iface::{Hook, HookContext, HookType},
    models::{args::Command, config::Dependency},
    utils::{
        command::CommandUtils,
        errors::{EmptyResult, ResultTrait as _, ResultWithError},
        semver::SemverUtils,
        shlex::ShlexUtils,
    },
};

/// Hook to check system dependencies as specified in the configuration.
pub struct HookCheckDependency {}

impl HookCheckDependency {
    pub fn new() -> Self {
        HookCheckDependency {}
    }

    fn validate_dependency(&self, dep: &Dependency, cwd: &Path) -> ResultWithError<bool> {
        let res = CommandUtils::run_command_str(dep.version_command.as_str(), cwd)
            .auto_err(format!("Failed to execute command: {}", dep.version_command))?;
        let output = res.stdout.trim().to_owned();

        if !res.success() || !SemverUtils::is_valid_version(&output) {
            error!(
                "❌ {} version command did not return a valid version",
                dep.name
            );
            return Ok(false);
        }

        if SemverUtils::is_version_greater_or_equal(&dep.min_version, &output)? {
            info!("✅ {} OK ({} ≥ {})", dep.name, &output, dep.min_version);
            Ok(true)
        } else {
            info!(
                "❌ {} too old ({} < {})",
                dep.name, &output, dep.min_version
            );
            Ok(false)
        }
    }

    /// The task runner program has to be on PATH before anything is run.
    fn validate_runner(&self, command: &str) -> ResultWithError<bool> {
        let program = ShlexUtils::program(command)?;
        match which::which(&program) {
            Ok(path) => {
                info!("✅ {} found at {}", program, path.display());
                Ok(true)
            }
            Err(_) => {
                error!("❌ {} not found in PATH", program);
                Ok(false)
            }
        }
    }
}

impl Hook for HookCheckDependency {
    fn get_type(&self) -> HookType {
        HookType::VerifySystem
    }

    fn continue_on_error(&self) -> bool {
        true
    }

    fn run(&self, ctx: &HookContext) -> EmptyResult {
        info!("Checking dependencies...");
        let cwd = ctx.workspace_root()?;

        // Generate-only suites never invoke the task runner.
        let needs_runner = !matches!(
            ctx.args.command,
            Command::Suite {
                generate_only: true,
                ..
            }
        );
        let mut ok = !needs_runner || self.validate_runner(&ctx.config.runner.command)?;
        for dep in ctx.config.dependencies.iter() {
            ok &= self.validate_dependency(dep, &cwd)?;
        }

        if !ok {
            return Err("Some dependencies are not met".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{app_state::AppState, args::AppArgs, config::Config};
    use clap::Parser as _;

    fn dependency(min_version: &str, version_command: &str) -> Dependency {
        Dependency {
            name: "tool".into(),
            min_version: min_version.into(),
            version_command: version_command.into(),
        }
    }

    #[test]
    fn compares_reported_versions() {
        let dir = tempfile::tempdir().unwrap();
        let hook = HookCheckDependency::new();

        assert!(hook
            .validate_dependency(&dependency("12.0.0", "echo v14.17.0"), dir.path())
            .unwrap());
        assert!(!hook
            .validate_dependency(&dependency("16.0.0", "echo v14.17.0"), dir.path())
            .unwrap());
        assert!(!hook
            .validate_dependency(&dependency("1.0.0", "echo no version here"), dir.path())
            .unwrap());
    }

    #[test]
    fn fails_when_runner_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let args = AppArgs::parse_from(["appforge", "schema"]);
        let run_with_runner = |command: &str| {
            let mut config = Config::default();
            config.runner.command = command.into();
            let state = AppState {
                workspace_root: dir.path().to_path_buf(),
                ..Default::default()
            };
            let ctx = HookContext::new(&args, &config, state);
            HookCheckDependency::new().run(&ctx)
        };

        assert!(run_with_runner("appforge-missing-runner-binary build").is_err());
        assert!(run_with_runner("sh -c true").is_ok());
    }

    #[test]
    fn generate_only_suites_skip_the_runner_check() {
        let dir = tempfile::tempdir().unwrap();
        let args = AppArgs::parse_from(["appforge", "suite", "--generate-only"]);
        let mut config = Config::default();
        config.runner.command = "appforge-missing-runner-binary".into();
        let state = AppState {
            workspace_root: dir.path().to_path_buf(),
            ..Default::default()
        };
        let ctx = HookContext::new(&args, &config, state);
        assert!(HookCheckDependency::new().run(&ctx).is_ok());
    }
}
