use tracing::{error, info};

use crate::{
    code_run::run_iface::{CodeRunTrait, RunContext},
    models::{
        app_state::{CommandOutput, StageResult},
        config::{OutputStream, PipelineConfig, StepConfig},
        options::NormalizedOptions,
        scenario::StageKind,
    },
    utils::{command::CommandUtils, errors::ResultWithError, file_logger::FileLogger},
};

/// A step that invokes the task runner and looks for a marker in its output.
pub struct RunnerStep {
    stage: StageKind,
    config: StepConfig,
}

impl RunnerStep {
    pub fn new(stage: StageKind, config: StepConfig) -> Self {
        Self { stage, config }
    }

    /// build, lint, test and e2e in the order they run.
    pub fn pipeline(config: &PipelineConfig) -> Vec<Box<dyn CodeRunTrait>> {
        vec![
            Box::new(Self::new(StageKind::Build, config.build.clone())),
            Box::new(Self::new(StageKind::Lint, config.lint.clone())),
            Box::new(Self::new(StageKind::Test, config.test.clone())),
            Box::new(Self::new(StageKind::E2e, config.e2e.clone())),
        ]
    }

    fn project(&self, options: &NormalizedOptions) -> String {
        format!("{}{}", options.project_name, self.config.project_suffix)
    }

    pub fn command_line(
        &self,
        runner: &str,
        options: &NormalizedOptions,
    ) -> ResultWithError<String> {
        let project = self.project(options);
        let words = [self.config.target.as_str(), project.as_str()]
            .into_iter()
            .chain(self.config.args.iter().map(String::as_str));
        let tail = shlex::try_join(words)?;
        Ok(format!("{runner} {tail}"))
    }

    fn matches(&self, output: &CommandOutput) -> bool {
        let expect = self.config.expect.as_str();
        match self.config.stream {
            OutputStream::Stdout => output.stdout.contains(expect),
            OutputStream::Stderr => output.stderr.contains(expect),
            OutputStream::Any => output.stdout.contains(expect) || output.stderr.contains(expect),
        }
    }

    fn judge(&self, output: &CommandOutput) -> StageResult {
        let stage = self.stage.to_string();
        if !output.success() {
            return StageResult::failed(stage, format!("exited with status {}", output.status));
        }
        if !self.matches(output) {
            return StageResult::failed(
                stage,
                format!(
                    "expected `{}` in {:?} output",
                    self.config.expect, self.config.stream
                ),
            );
        }
        StageResult::ok(stage)
    }

    fn log_output(&self, options: &NormalizedOptions, output: &CommandOutput) -> FileLogger {
        let logger = FileLogger::new(&format!("{}.{}.log", options.project_name, self.stage));
        logger.log(&output.stdout);
        logger.log(&output.stderr);
        logger
    }
}

impl CodeRunTrait for RunnerStep {
    fn stage(&self) -> StageKind {
        self.stage
    }

    fn applies(&self, options: &NormalizedOptions) -> bool {
        match self.stage {
            StageKind::Test => options.has_jest(),
            StageKind::E2e => options.has_cypress(),
            _ => true,
        }
    }

    fn run(&self, ctx: &RunContext) -> StageResult {
        let stage = self.stage.to_string();
        let Some(remaining) = ctx.deadline.remaining() else {
            return StageResult::failed(
                stage,
                format!("deadline of {:?} exceeded", ctx.deadline.budget()),
            );
        };

        let cmd = match self.command_line(ctx.runner, ctx.options) {
            Ok(cmd) => cmd,
            Err(e) => return StageResult::failed(stage, e.to_string()),
        };

        let spinner = CommandUtils::display_loader(format!("Running: {cmd}"));
        let output = CommandUtils::run_command(&cmd, ctx.root, Some(remaining));
        spinner.finish_and_clear();

        let result = match output {
            Ok(output) => {
                let logger = self.log_output(ctx.options, &output);
                let result = self.judge(&output);
                if !result.passed {
                    error!("Output logged to {}", logger.path().display());
                }
                result
            }
            Err(e) => StageResult::failed(stage, e.to_string()),
        };

        match &result.message {
            None => info!("✅ {} {}", self.stage, self.project(ctx.options)),
            Some(message) => error!("❌ {} {}: {}", self.stage, self.project(ctx.options), message),
        }
        result
    }
}
