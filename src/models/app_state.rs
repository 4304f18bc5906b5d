use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Default, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Shared state for hooks and the verification pipeline.
#[derive(Debug, Default, Clone)]
pub struct AppState {
    pub workspace_root: PathBuf,
    pub results: Results,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct Results {
    pub scenarios: Vec<ScenarioResult>,
}

impl Results {
    pub fn passed(&self) -> usize {
        self.scenarios.iter().filter(|s| s.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.scenarios.len() - self.passed()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario: String,
    pub project: String,
    pub passed: bool,
    pub duration_ms: u128,
    pub stages: Vec<StageResult>,
}

impl ScenarioResult {
    pub fn first_failure(&self) -> Option<&StageResult> {
        self.stages.iter().find(|stage| !stage.passed)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StageResult {
    pub stage: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StageResult {
    pub fn ok(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            passed: true,
            message: None,
        }
    }

    pub fn failed(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            passed: false,
            message: Some(message.into()),
        }
    }
}
