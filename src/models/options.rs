use std::fmt;

use clap::ValueEnum;
use lazy_static::lazy_static;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::string::StringUtils;

lazy_static! {
    static ref NAME_RE: Regex =
        Regex::new(r"^[a-zA-Z][a-zA-Z0-9_-]*$").expect("name pattern is a valid regex");
}

/// Styling solution used by the generated components.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, ValueEnum,
)]
pub enum Style {
    #[default]
    #[serde(rename = "css")]
    #[value(name = "css")]
    Css,
    #[serde(rename = "scss")]
    #[value(name = "scss")]
    Scss,
    #[serde(rename = "styl")]
    #[value(name = "styl")]
    Styl,
    #[serde(rename = "less")]
    #[value(name = "less")]
    Less,
    #[serde(rename = "styled-components")]
    #[value(name = "styled-components")]
    StyledComponents,
    #[serde(rename = "@emotion/styled")]
    #[value(name = "@emotion/styled")]
    EmotionStyled,
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Css => "css",
            Style::Scss => "scss",
            Style::Styl => "styl",
            Style::Less => "less",
            Style::StyledComponents => "styled-components",
            Style::EmotionStyled => "@emotion/styled",
        }
    }

    /// File extension of standalone style sheets, `None` for CSS-in-JS.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Style::Css => Some("css"),
            Style::Scss => Some("scss"),
            Style::Styl => Some("styl"),
            Style::Less => Some("less"),
            Style::StyledComponents | Style::EmotionStyled => None,
        }
    }

    /// Package providing the `styled` factory for CSS-in-JS styles.
    pub fn styled_package(&self) -> Option<&'static str> {
        match self {
            Style::StyledComponents => Some("styled-components"),
            Style::EmotionStyled => Some("@emotion/styled"),
            _ => None,
        }
    }

    pub fn all() -> [Style; 6] {
        [
            Style::Css,
            Style::Scss,
            Style::Styl,
            Style::Less,
            Style::StyledComponents,
            Style::EmotionStyled,
        ]
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum UnitTestRunner {
    #[default]
    Jest,
    None,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum E2eTestRunner {
    #[default]
    Cypress,
    None,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Linter {
    #[default]
    Eslint,
    Tslint,
}

impl Linter {
    pub fn config_file(&self) -> &'static str {
        match self {
            Linter::Eslint => ".eslintrc",
            Linter::Tslint => "tslint.json",
        }
    }
}

/// The generation request: everything the generator output depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationOptions {
    pub name: String,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub unit_test_runner: UnitTestRunner,
    #[serde(default)]
    pub e2e_test_runner: E2eTestRunner,
    #[serde(default)]
    pub linter: Linter,
    #[serde(default)]
    pub js: bool,
    #[serde(default)]
    pub capacitor: bool,
    #[serde(default)]
    pub skip_format: bool,
    /// Subdirectory of the apps directory the project is placed in
    #[serde(default)]
    pub directory: Option<String>,
    /// Comma-separated tags recorded in nx.json
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub pascal_case_files: Option<bool>,
    #[serde(default)]
    pub class_component: Option<bool>,
}

impl ApplicationOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            style: Style::default(),
            unit_test_runner: UnitTestRunner::default(),
            e2e_test_runner: E2eTestRunner::default(),
            linter: Linter::default(),
            js: false,
            capacitor: false,
            skip_format: false,
            directory: None,
            tags: None,
            pascal_case_files: None,
            class_component: None,
        }
    }

    /// Checks the request and derives every name and path the generator uses.
    pub fn normalize(&self, apps_dir: &str) -> Result<NormalizedOptions, OptionsError> {
        let apps_dir = Self::check_apps_dir(apps_dir)?;

        let name = self.name.trim();
        if name.is_empty() {
            return Err(OptionsError::EmptyName);
        }
        if !NAME_RE.is_match(name) {
            return Err(OptionsError::InvalidName(name.to_string()));
        }

        let directory = match self.directory.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => Some(Self::normalize_directory(dir)?),
            _ => None,
        };

        if self.js && self.linter == Linter::Tslint {
            return Err(OptionsError::TslintWithJs);
        }

        let tags = self.parse_tags()?;

        let file_name = StringUtils::to_kebab_case(name);
        let project_directory = match &directory {
            Some(dir) => format!("{dir}/{file_name}"),
            None => file_name.clone(),
        };
        let project_name = project_directory.replace('/', "-");

        if self.e2e_test_runner == E2eTestRunner::Cypress && project_name.ends_with("-e2e") {
            return Err(OptionsError::E2eNameCollision(project_name));
        }

        let project_root = format!("{apps_dir}/{project_directory}");
        let pascal = self.pascal_case_files.unwrap_or(false);

        Ok(NormalizedOptions {
            options: self.clone(),
            class_name: StringUtils::to_pascal_case(name),
            e2e_project_name: format!("{project_name}-e2e"),
            e2e_root: format!("{project_root}-e2e"),
            project_name,
            project_root,
            parsed_tags: tags,
            app_file_name: if pascal { "App" } else { "app" }.to_string(),
            home_file_name: if pascal { "Home" } else { "home" }.to_string(),
            explore_container_file_name: if pascal {
                "ExploreContainer"
            } else {
                "explore-container"
            }
            .to_string(),
        })
    }

    /// The apps dir comes from the config file and must stay inside the workspace.
    fn check_apps_dir(apps_dir: &str) -> Result<String, OptionsError> {
        let trimmed = apps_dir.trim();
        if trimmed.is_empty() || trimmed.starts_with('/') || trimmed.starts_with('\\') {
            return Err(OptionsError::InvalidAppsDir(apps_dir.to_string()));
        }

        let segments: Vec<_> = trimmed
            .split(['/', '\\'])
            .filter(|segment| !segment.is_empty())
            .collect();
        if segments.is_empty() || segments.iter().any(|segment| !NAME_RE.is_match(segment)) {
            return Err(OptionsError::InvalidAppsDir(apps_dir.to_string()));
        }

        Ok(segments.join("/"))
    }

    fn normalize_directory(dir: &str) -> Result<String, OptionsError> {
        if dir.starts_with('/') || dir.starts_with('\\') {
            return Err(OptionsError::InvalidDirectory(dir.to_string()));
        }

        let segments: Vec<_> = dir
            .split(['/', '\\'])
            .filter(|segment| !segment.is_empty())
            .collect();
        if segments
            .iter()
            .any(|segment| *segment == ".." || !NAME_RE.is_match(segment))
        {
            return Err(OptionsError::InvalidDirectory(dir.to_string()));
        }

        Ok(segments
            .iter()
            .map(|segment| StringUtils::to_kebab_case(segment))
            .collect::<Vec<_>>()
            .join("/"))
    }

    fn parse_tags(&self) -> Result<Vec<String>, OptionsError> {
        let Some(tags) = self.tags.as_deref() else {
            return Ok(Vec::new());
        };

        let mut parsed = Vec::new();
        for tag in tags.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if tag.chars().any(char::is_whitespace) {
                return Err(OptionsError::InvalidTag(tag.to_string()));
            }
            parsed.push(tag.to_string());
        }
        Ok(parsed)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("project name must not be empty")]
    EmptyName,
    #[error("invalid project name '{0}', expected letters, digits, '-' or '_' starting with a letter")]
    InvalidName(String),
    #[error("invalid directory '{0}', expected a relative path of valid names")]
    InvalidDirectory(String),
    #[error("invalid apps directory '{0}', expected a relative path inside the workspace")]
    InvalidAppsDir(String),
    #[error("tslint cannot lint JavaScript sources, use --linter eslint with --js")]
    TslintWithJs,
    #[error("project name '{0}' collides with its generated Cypress project")]
    E2eNameCollision(String),
    #[error("tag '{0}' must not contain whitespace")]
    InvalidTag(String),
}

/// A validated request with all derived names and paths.
///
/// Paths are workspace-relative and always use `/`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedOptions {
    pub options: ApplicationOptions,
    pub project_name: String,
    pub project_root: String,
    pub e2e_project_name: String,
    pub e2e_root: String,
    pub parsed_tags: Vec<String>,
    pub class_name: String,
    pub app_file_name: String,
    pub home_file_name: String,
    pub explore_container_file_name: String,
}

impl NormalizedOptions {
    pub fn component_ext(&self) -> &'static str {
        if self.options.js { "js" } else { "tsx" }
    }

    pub fn script_ext(&self) -> &'static str {
        if self.options.js { "js" } else { "ts" }
    }

    pub fn style(&self) -> Style {
        self.options.style
    }

    pub fn has_jest(&self) -> bool {
        self.options.unit_test_runner == UnitTestRunner::Jest
    }

    pub fn has_cypress(&self) -> bool {
        self.options.e2e_test_runner == E2eTestRunner::Cypress
    }

    pub fn is_class_component(&self) -> bool {
        self.options.class_component.unwrap_or(false)
    }

    pub fn linter(&self) -> Linter {
        self.options.linter
    }

    /// Path below the project root, e.g. `src/app/app.tsx`.
    pub fn in_project(&self, relative: &str) -> String {
        format!("{}/{}", self.project_root, relative)
    }

    pub fn in_e2e(&self, relative: &str) -> String {
        format!("{}/{}", self.e2e_root, relative)
    }

    /// Relative path from a project root back to the workspace root.
    pub fn offset_from_root(&self) -> String {
        let depth = self.project_root.split('/').filter(|s| !s.is_empty()).count();
        "../".repeat(depth)
    }
}
