use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use serde::Serialize;
use tracing::{error, info};

use crate::{
    code_gen::code_gen::{CodeGen, WriteMode},
    code_run::run::{CodeRun, VerifyPlan},
    hooks::iface::{Hook, HookContext},
    models::{
        app_state::{AppState, Results, ScenarioResult, StageResult},
        args::AppArgs,
        config::Config,
        scenario::Scenario,
        workspace::Workspace,
    },
    utils::{
        command::CommandUtils,
        errors::{EmptyResult, ResultTrait as _},
    },
};

const GENERATE_STAGE: &str = "generate";

/// Settings of one suite run.
#[derive(Debug, Clone, Default)]
pub struct SuiteOptions {
    pub workspace: PathBuf,
    pub filter: Option<String>,
    pub generate_only: bool,
    pub report: Option<PathBuf>,
}

#[derive(Serialize)]
struct SuiteReport<'a> {
    passed: usize,
    failed: usize,
    total: usize,
    #[serde(flatten)]
    results: &'a Results,
}

/// Generates and verifies every scenario in a scratch workspace.
pub struct Suite<'a> {
    args: &'a AppArgs,
    config: &'a Config,
    hooks: &'a [Box<dyn Hook>],
}

impl<'a> Suite<'a> {
    pub fn new(args: &'a AppArgs, config: &'a Config, hooks: &'a [Box<dyn Hook>]) -> Self {
        Self {
            args,
            config,
            hooks,
        }
    }

    /// Runs every scenario below `scenario_root` matching the filter. All
    /// scenarios run even after a failure; the suite fails if any did.
    pub fn execute(&self, scenario_root: &Path, options: &SuiteOptions) -> EmptyResult {
        let scenarios: Vec<_> = Scenario::load_all(scenario_root)?
            .into_iter()
            .filter(|scenario| {
                options
                    .filter
                    .as_deref()
                    .is_none_or(|filter| scenario.name.contains(filter))
            })
            .collect();
        if scenarios.is_empty() {
            return Err("No scenario matches the filter".into());
        }
        info!("Running {} scenarios", scenarios.len());

        let workspace = Workspace::ensure(&options.workspace, &self.config.workspace.npm_scope)?;
        let ctx = HookContext::new(
            self.args,
            self.config,
            AppState {
                workspace_root: workspace.root().to_path_buf(),
                ..Default::default()
            },
        );

        let code_run = CodeRun::new(self.config, self.hooks);
        code_run.with_hooks(&ctx, || {
            if !options.generate_only {
                self.install(workspace.root())?;
            }

            for scenario in &scenarios {
                let result = self.run_scenario(&ctx, &code_run, scenario, options.generate_only);
                ctx.record(result)?;
            }

            let state = ctx.read_state()?;
            if let Some(path) = &options.report {
                Self::write_report(path, &state.results)?;
            }
            CodeRun::report(&state.results)
        })
    }

    /// Installs workspace packages once, skipped when `node_modules` exists.
    fn install(&self, root: &Path) -> EmptyResult {
        let Some(cmd) = &self.config.runner.install_command else {
            return Ok(());
        };
        if root.join("node_modules").exists() {
            info!("node_modules present, skipping {}", cmd);
            return Ok(());
        }

        let spinner = CommandUtils::display_loader(format!("Running: {cmd}"));
        let output = CommandUtils::run_command_str(cmd, root);
        spinner.finish_and_clear();

        let output = output?;
        if !output.success() {
            error!("❌ {} failed: {}", cmd, output.stderr.trim());
            return Err(format!("Install command exited with status {}", output.status).into());
        }
        info!("✅ {} completed", cmd);
        Ok(())
    }

    fn run_scenario(
        &self,
        ctx: &HookContext,
        code_run: &CodeRun,
        scenario: &Scenario,
        generate_only: bool,
    ) -> ScenarioResult {
        let started = Instant::now();
        let options = scenario.options_for_run();
        let timeout = scenario.timeout_secs.unwrap_or(self.config.runner.timeout_secs);
        let plan = VerifyPlan {
            skip: scenario.skip.clone(),
            files_only: generate_only,
            ..VerifyPlan::new(Duration::from_secs(timeout))
        };

        info!("▶ {}: {}", scenario.name, scenario.description);

        let generated = CodeGen::new(self.config, self.hooks).execute(
            ctx,
            &options,
            WriteMode {
                overwrite: true,
                ..Default::default()
            },
        );
        let normalized = match generated {
            Ok(normalized) => normalized,
            Err(e) => {
                error!("❌ {} could not be generated: {}", scenario.name, e);
                return ScenarioResult {
                    scenario: scenario.name.clone(),
                    project: options.name.clone(),
                    passed: false,
                    duration_ms: started.elapsed().as_millis(),
                    stages: vec![StageResult::failed(GENERATE_STAGE, e.to_string())],
                };
            }
        };

        let mut result = match code_run.verify(ctx, &scenario.name, &normalized, &plan) {
            Ok(result) => result,
            Err(e) => ScenarioResult {
                scenario: scenario.name.clone(),
                project: normalized.project_name.clone(),
                passed: false,
                duration_ms: 0,
                stages: vec![StageResult::failed("verify", e.to_string())],
            },
        };
        result.stages.insert(0, StageResult::ok(GENERATE_STAGE));
        result.duration_ms = started.elapsed().as_millis();
        result
    }

    fn write_report(path: &Path, results: &Results) -> EmptyResult {
        let report = SuiteReport {
            passed: results.passed(),
            failed: results.failed(),
            total: results.scenarios.len(),
            results,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&report)?)
            .auto_err(format!("Could not write report {}", path.display()))?;
        info!("✅ Report written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser as _;

    fn config(runner: &str) -> Config {
        let mut config = Config::default();
        config.runner.command = runner.into();
        config.runner.formatter = None;
        config.runner.timeout_secs = 30;
        config
    }

    #[test]
    fn generate_only_suite_passes_for_every_builtin_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let args = AppArgs::parse_from(["appforge", "suite"]);
        let config = config("false");
        let report = dir.path().join("out/report.json");
        let options = SuiteOptions {
            workspace: dir.path().join("proj"),
            filter: None,
            generate_only: true,
            report: Some(report.clone()),
        };

        Suite::new(&args, &config, &[])
            .execute(dir.path(), &options)
            .unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(report).unwrap()).unwrap();
        assert_eq!(report["total"], Scenario::builtin_matrix().len());
        assert_eq!(report["failed"], 0);
        assert_eq!(report["scenarios"][0]["stages"][0]["stage"], "generate");
        assert!(dir.path().join("proj/nx.json").exists());
    }

    #[test]
    fn failing_runner_fails_the_suite_after_all_scenarios() {
        let dir = tempfile::tempdir().unwrap();
        let args = AppArgs::parse_from(["appforge", "suite"]);
        let config = config("false");
        let report = dir.path().join("report.json");
        let options = SuiteOptions {
            workspace: dir.path().join("proj"),
            filter: Some("style-s".into()),
            generate_only: false,
            report: Some(report.clone()),
        };

        assert!(Suite::new(&args, &config, &[])
            .execute(dir.path(), &options)
            .is_err());

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(report).unwrap()).unwrap();
        // style-scss, style-styl, style-styled-components
        assert_eq!(report["total"], 3);
        assert_eq!(report["failed"], 3);
        assert_eq!(report["scenarios"][0]["stages"][2]["stage"], "build");
    }

    #[test]
    fn unmatched_filter_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = AppArgs::parse_from(["appforge", "suite"]);
        let config = config("false");
        let options = SuiteOptions {
            workspace: dir.path().join("proj"),
            filter: Some("no-such-scenario".into()),
            ..Default::default()
        };
        assert!(Suite::new(&args, &config, &[])
            .execute(dir.path(), &options)
            .is_err());
        assert!(!dir.path().join("proj").exists());
    }
}
