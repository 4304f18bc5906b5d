use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::{
    code_run::{
        expectations::{self, FileExpectations},
        run_iface::{CodeRunTrait as _, RunContext},
        steps::RunnerStep,
    },
    hooks::iface::{Hook, HookContext, HookListExt as _, HookType},
    models::{
        app_state::{Results, ScenarioResult, StageResult},
        config::Config,
        options::{ApplicationOptions, NormalizedOptions},
        scenario::StageKind,
        workspace::Workspace,
    },
    utils::{
        errors::{EmptyResult, ResultWithError},
        execution::Deadline,
    },
};

/// Which stages of a verification run are executed.
#[derive(Debug, Clone)]
pub struct VerifyPlan {
    pub skip: Vec<StageKind>,
    /// Stop after the file and tag checks
    pub files_only: bool,
    pub deadline: Deadline,
}

impl VerifyPlan {
    pub fn new(timeout: Duration) -> Self {
        Self {
            skip: Vec::new(),
            files_only: false,
            deadline: Deadline::after(timeout),
        }
    }

    fn runs(&self, stage: StageKind) -> bool {
        !self.skip.contains(&stage)
    }
}

/// Main controller to verify generated projects.
pub struct CodeRun<'a> {
    config: &'a Config,
    hooks: &'a [Box<dyn Hook>],
}

impl<'a> CodeRun<'a> {
    pub fn new(config: &'a Config, hooks: &'a [Box<dyn Hook>]) -> Self {
        Self { config, hooks }
    }

    /// Runs the pre hooks, `body`, then the post hooks. Post hooks that
    /// continue on error still run when something before them failed.
    pub fn with_hooks(
        &self,
        ctx: &HookContext,
        body: impl FnOnce() -> EmptyResult,
    ) -> EmptyResult {
        let mut has_error = false;

        for hook_type in HookType::pre_hooks() {
            if let Err(err) = self.hooks.run_hooks_of_type(ctx, hook_type, has_error) {
                error!("Pre-hook {:?} failed: {}", hook_type, err);
                has_error = true;
            }
        }

        let res = if has_error {
            Err("Pre-hook failed".into())
        } else {
            body()
        };

        for hook_type in HookType::post_hooks() {
            if let Err(err) = self
                .hooks
                .run_hooks_of_type(ctx, hook_type, has_error || res.is_err())
            {
                error!("Post-hook {:?} failed: {}", hook_type, err);
                has_error = true;
            }
        }

        info!("Execution finished");

        match res {
            Ok(()) if has_error => Err("Post-hook failed".into()),
            res => res,
        }
    }

    /// `verify` command: checks one existing project.
    pub fn execute(
        &self,
        ctx: &HookContext,
        options: &ApplicationOptions,
        files_only: bool,
    ) -> EmptyResult {
        let normalized = options.normalize(&self.config.workspace.apps_dir)?;
        let plan = VerifyPlan {
            files_only,
            ..VerifyPlan::new(Duration::from_secs(self.config.runner.timeout_secs))
        };

        self.with_hooks(ctx, || {
            let result = self.verify(ctx, "verify", &normalized, &plan)?;
            ctx.record(result)?;
            Self::report(&ctx.read_state()?.results)
        })
    }

    /// Runs the file checks and then every applicable pipeline step until the
    /// first failure.
    pub fn verify(
        &self,
        ctx: &HookContext,
        scenario: &str,
        options: &NormalizedOptions,
        plan: &VerifyPlan,
    ) -> ResultWithError<ScenarioResult> {
        let started = Instant::now();
        let root = ctx.workspace_root()?;
        let mut stages: Vec<StageResult> = Vec::new();

        info!("Verifying {} ({})", options.project_name, scenario);

        if plan.runs(StageKind::Files) {
            stages.push(FileExpectations::for_options(options).check(&root));
        }
        if plan.runs(StageKind::Tags) && options.options.tags.is_some() {
            let workspace = Workspace::open(&root)?;
            stages.push(expectations::check_tags(&workspace, options)?);
        }

        if !plan.files_only && stages.iter().all(|stage| stage.passed) {
            let run_ctx = RunContext {
                root: &root,
                runner: &self.config.runner.command,
                options,
                deadline: &plan.deadline,
            };

            for step in RunnerStep::pipeline(&self.config.pipeline) {
                if !step.applies(options) || !plan.runs(step.stage()) {
                    continue;
                }
                let result = step.run(&run_ctx);
                let failed = !result.passed;
                stages.push(result);
                if failed {
                    break;
                }
            }
        }

        let passed = stages.iter().all(|stage| stage.passed);
        Ok(ScenarioResult {
            scenario: scenario.to_string(),
            project: options.project_name.clone(),
            passed,
            duration_ms: started.elapsed().as_millis(),
            stages,
        })
    }

    /// Logs one line per scenario plus totals, failing when any scenario failed.
    pub fn report(results: &Results) -> EmptyResult {
        for result in &results.scenarios {
            match result.first_failure() {
                None => info!(
                    "✅ Succeeded: {} ({}) in {}ms",
                    result.scenario, result.project, result.duration_ms
                ),
                Some(stage) => error!(
                    "❌ Failed: {} ({}) at {}: {}",
                    result.scenario,
                    result.project,
                    stage.stage,
                    stage.message.as_deref().unwrap_or_default()
                ),
            }
        }

        let passed = results.passed();
        let failed = results.failed();
        info!(
            "✅ Passed: {passed}  ❌ Failed: {failed}  📋 Total: {}",
            passed + failed
        );

        if failed > 0 {
            return Err("Some scenarios failed".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        code_gen::code_gen::{CodeGen, WriteMode},
        models::{app_state::AppState, args::AppArgs},
    };
    use clap::Parser as _;

    /// A runner that prints every default marker to both streams.
    const FAKE_RUNNER: &str = concat!(
        "sh -c 'for s in \"Built at\" \"All files pass linting\" ",
        "\"Test Suites: 1 passed, 1 total\" \"All specs passed!\"; ",
        "do echo \"$s\"; echo \"$s\" >&2; done' --",
    );

    fn setup(config: &Config) -> (tempfile::TempDir, NormalizedOptions) {
        let dir = tempfile::tempdir().unwrap();
        Workspace::ensure(dir.path(), "proj").unwrap();
        let args = AppArgs::parse_from(["appforge", "schema"]);
        let ctx = HookContext::new(
            &args,
            config,
            AppState {
                workspace_root: dir.path().to_path_buf(),
                ..Default::default()
            },
        );
        let mut options = ApplicationOptions::new("demo");
        options.skip_format = true;
        options.tags = Some("a,b".into());
        let normalized = CodeGen::new(config, &[])
            .execute(&ctx, &options, WriteMode::default())
            .unwrap();
        (dir, normalized)
    }

    fn verify(
        config: &Config,
        dir: &tempfile::TempDir,
        options: &NormalizedOptions,
        plan: &VerifyPlan,
    ) -> ScenarioResult {
        let args = AppArgs::parse_from(["appforge", "schema"]);
        let ctx = HookContext::new(
            &args,
            config,
            AppState {
                workspace_root: dir.path().to_path_buf(),
                ..Default::default()
            },
        );
        CodeRun::new(config, &[])
            .verify(&ctx, "test", options, plan)
            .unwrap()
    }

    #[test]
    fn runs_every_stage_with_a_passing_runner() {
        let mut config = Config::default();
        config.runner.command = FAKE_RUNNER.into();
        let (dir, options) = setup(&config);

        let result = verify(&config, &dir, &options, &VerifyPlan::new(Duration::from_secs(30)));
        assert!(result.passed, "{:?}", result.first_failure());
        let stages: Vec<_> = result.stages.iter().map(|s| s.stage.as_str()).collect();
        assert_eq!(stages, vec!["files", "tags", "build", "lint", "test", "e2e"]);
    }

    #[test]
    fn stops_at_the_first_failing_step() {
        let mut config = Config::default();
        config.runner.command = "echo".into();
        let (dir, options) = setup(&config);

        let result = verify(&config, &dir, &options, &VerifyPlan::new(Duration::from_secs(30)));
        assert!(!result.passed);
        assert_eq!(result.stages.len(), 3);
        assert_eq!(result.first_failure().unwrap().stage, "build");
    }

    #[test]
    fn files_only_and_skips_limit_the_stages() {
        let mut config = Config::default();
        config.runner.command = "false".into();
        let (dir, options) = setup(&config);

        let plan = VerifyPlan {
            files_only: true,
            ..VerifyPlan::new(Duration::from_secs(30))
        };
        let result = verify(&config, &dir, &options, &plan);
        assert!(result.passed);
        assert_eq!(result.stages.len(), 2);

        let plan = VerifyPlan {
            skip: vec![
                StageKind::Tags,
                StageKind::Build,
                StageKind::Lint,
                StageKind::Test,
                StageKind::E2e,
            ],
            ..VerifyPlan::new(Duration::from_secs(30))
        };
        let result = verify(&config, &dir, &options, &plan);
        assert!(result.passed);
        assert_eq!(result.stages.len(), 1);
    }

    #[test]
    fn report_fails_when_any_scenario_failed() {
        let mut results = Results::default();
        results.scenarios.push(ScenarioResult {
            scenario: "ok".into(),
            project: "a".into(),
            passed: true,
            duration_ms: 1,
            stages: vec![StageResult::ok("files")],
        });
        assert!(CodeRun::report(&results).is_ok());

        results.scenarios.push(ScenarioResult {
            scenario: "bad".into(),
            project: "b".into(),
            passed: false,
            duration_ms: 1,
            stages: vec![StageResult::failed("build", "exited with status 1")],
        });
        assert!(CodeRun::report(&results).is_err());
    }
}
