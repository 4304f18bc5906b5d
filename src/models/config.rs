use std::{collections::HashMap, fs, path::Path};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    hooks::iface::HookType,
    utils::{
        errors::{ResultTrait, ResultWithError},
        variables::VariablesUtils,
    },
};

pub const CONFIG_FILE: &str = "appforge.yaml";

/// Configuration loaded from `appforge.yaml` in the workspace root.
#[derive(Debug, Deserialize, Serialize, Clone, JsonSchema, Default)]
pub struct Config {
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    #[serde(default)]
    pub hooks: Vec<HookConfig>,
}

impl Config {
    /// Loads `appforge.yaml` from `dir`, falling back to defaults when absent.
    pub fn from_dir(dir: &Path) -> ResultWithError<Self> {
        let config_path = dir.join(CONFIG_FILE);
        debug!("Loading config from {:?}", config_path);

        let mut config = if config_path.exists() {
            let content =
                fs::read_to_string(&config_path).auto_err("Could not read config file")?;
            Self::from_yaml(&VariablesUtils::expand_env_vars(&content))?
        } else {
            debug!("No {} found, using defaults", CONFIG_FILE);
            Config::default()
        };

        config.load_default_configs();
        debug!("Config default values loaded");

        Ok(config)
    }

    pub fn from_yaml(content: &str) -> ResultWithError<Self> {
        // An empty file deserializes to null rather than an empty map.
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(content).auto_err("Invalid config format")
    }

    fn load_default_configs(&mut self) {
        if !self.dependencies.iter().any(|d| d.name == "node") {
            self.dependencies.push(Dependency {
                name: "node".into(),
                min_version: "12.0.0".into(),
                version_command: "node --version".into(),
            });
        }
    }

    pub fn hooks_of_type(&self, hook_type: HookType) -> impl Iterator<Item = &HookConfig> {
        self.hooks
            .iter()
            .filter(move |hook| hook.hook_type == hook_type)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, JsonSchema)]
pub struct WorkspaceConfig {
    /// Directory applications are generated into
    #[serde(default = "WorkspaceConfig::default_apps_dir")]
    pub apps_dir: String,
    /// npm scope written to nx.json when a workspace is created
    #[serde(default = "WorkspaceConfig::default_npm_scope")]
    pub npm_scope: String,
}

impl WorkspaceConfig {
    fn default_apps_dir() -> String {
        "apps".into()
    }

    fn default_npm_scope() -> String {
        "proj".into()
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            apps_dir: Self::default_apps_dir(),
            npm_scope: Self::default_npm_scope(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, JsonSchema)]
pub struct RunnerConfig {
    /// Task runner command line, targets are appended to it
    #[serde(default = "RunnerConfig::default_command")]
    pub command: String,
    /// Run once after a scratch workspace is created, e.g. `npm install`
    #[serde(default)]
    pub install_command: Option<String>,
    /// Formatter invoked with the generated file paths appended
    #[serde(default = "RunnerConfig::default_formatter")]
    pub formatter: Option<String>,
    /// Per-scenario time budget in seconds
    #[serde(default = "RunnerConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl RunnerConfig {
    fn default_command() -> String {
        "npx nx".into()
    }

    fn default_formatter() -> Option<String> {
        Some("npx prettier --write".into())
    }

    fn default_timeout_secs() -> u64 {
        180
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            command: Self::default_command(),
            install_command: None,
            formatter: Self::default_formatter(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutputStream {
    Stdout,
    Stderr,
    Any,
}

/// How one pipeline step is invoked and judged.
#[derive(Debug, Deserialize, Serialize, Clone, JsonSchema)]
pub struct StepConfig {
    pub target: String,
    /// Appended to the project name, `-e2e` targets the Cypress project
    #[serde(default)]
    pub project_suffix: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub stream: OutputStream,
    /// Text that must appear in `stream` for the step to pass
    pub expect: String,
}

impl StepConfig {
    fn new(target: &str, stream: OutputStream, expect: &str) -> Self {
        Self {
            target: target.into(),
            project_suffix: String::new(),
            args: Vec::new(),
            stream,
            expect: expect.into(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, JsonSchema)]
pub struct PipelineConfig {
    #[serde(default = "PipelineConfig::default_build")]
    pub build: StepConfig,
    #[serde(default = "PipelineConfig::default_lint")]
    pub lint: StepConfig,
    #[serde(default = "PipelineConfig::default_test")]
    pub test: StepConfig,
    #[serde(default = "PipelineConfig::default_e2e")]
    pub e2e: StepConfig,
}

impl PipelineConfig {
    fn default_build() -> StepConfig {
        StepConfig::new("build", OutputStream::Stdout, "Built at")
    }

    fn default_lint() -> StepConfig {
        StepConfig::new("lint", OutputStream::Stdout, "All files pass linting")
    }

    fn default_test() -> StepConfig {
        StepConfig::new(
            "test",
            OutputStream::Stderr,
            "Test Suites: 1 passed, 1 total",
        )
    }

    fn default_e2e() -> StepConfig {
        StepConfig {
            project_suffix: "-e2e".into(),
            args: vec!["--headless".into()],
            ..StepConfig::new("e2e", OutputStream::Stdout, "All specs passed!")
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            build: Self::default_build(),
            lint: Self::default_lint(),
            test: Self::default_test(),
            e2e: Self::default_e2e(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, JsonSchema)]
pub struct Dependency {
    pub name: String,
    pub min_version: String,
    pub version_command: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, JsonSchema)]
pub struct HookConfig {
    pub name: String,
    pub hook_type: HookType,
    #[serde(rename = "async")]
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub continue_on_error: bool,
    pub command: String,
    #[serde(default)]
    pub env: Option<HashMap<String, String>>,
}
