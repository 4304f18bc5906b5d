use std::{fmt, path::Path};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    models::options::{ApplicationOptions, E2eTestRunner, Linter, Style, UnitTestRunner},
    utils::{
        dir::{DirUtils, YamlType},
        errors::ResultWithError,
        string::StringUtils,
    },
};

pub const SCENARIO_DIR: &str = "scenarios";
const DEFAULT_PREFIX: &str = "ionic-react";

/// Stages a scenario goes through after generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Files,
    Tags,
    Build,
    Lint,
    Test,
    E2e,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageKind::Files => "files",
            StageKind::Tags => "tags",
            StageKind::Build => "build",
            StageKind::Lint => "lint",
            StageKind::Test => "test",
            StageKind::E2e => "e2e",
        };
        f.write_str(name)
    }
}

/// Option values a scenario changes relative to the suite defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptionOverrides {
    pub style: Option<Style>,
    pub unit_test_runner: Option<UnitTestRunner>,
    pub e2e_test_runner: Option<E2eTestRunner>,
    pub linter: Option<Linter>,
    pub js: Option<bool>,
    pub capacitor: Option<bool>,
    pub skip_format: Option<bool>,
    pub directory: Option<String>,
    pub tags: Option<String>,
    pub pascal_case_files: Option<bool>,
    pub class_component: Option<bool>,
}

impl OptionOverrides {
    pub fn apply(&self, mut options: ApplicationOptions) -> ApplicationOptions {
        if let Some(style) = self.style {
            options.style = style;
        }
        if let Some(runner) = self.unit_test_runner {
            options.unit_test_runner = runner;
        }
        if let Some(runner) = self.e2e_test_runner {
            options.e2e_test_runner = runner;
        }
        if let Some(linter) = self.linter {
            options.linter = linter;
        }
        if let Some(js) = self.js {
            options.js = js;
        }
        if let Some(capacitor) = self.capacitor {
            options.capacitor = capacitor;
        }
        if let Some(skip_format) = self.skip_format {
            options.skip_format = skip_format;
        }
        if self.directory.is_some() {
            options.directory = self.directory.clone();
        }
        if self.tags.is_some() {
            options.tags = self.tags.clone();
        }
        if self.pascal_case_files.is_some() {
            options.pascal_case_files = self.pascal_case_files;
        }
        if self.class_component.is_some() {
            options.class_component = self.class_component;
        }
        options
    }
}

/// One case of the harness: options to generate with and stages to skip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Scenario {
    /// Defaults to the file name without `.scenario.yaml`
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Prefix of the unique project name
    #[serde(default = "Scenario::default_prefix")]
    pub name_prefix: String,
    #[serde(default)]
    pub options: OptionOverrides,
    #[serde(default)]
    pub skip: Vec<StageKind>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Scenario {
    fn default_prefix() -> String {
        DEFAULT_PREFIX.into()
    }

    fn builtin(name: &str, description: &str, options: OptionOverrides) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            name_prefix: Self::default_prefix(),
            options,
            skip: Vec::new(),
            timeout_secs: None,
        }
    }

    /// Options for one run: suite defaults, scenario overrides, fresh name.
    pub fn options_for_run(&self) -> ApplicationOptions {
        let base = ApplicationOptions::new(StringUtils::unique_name(&self.name_prefix));
        self.options.apply(base)
    }

    /// The default generation matrix.
    pub fn builtin_matrix() -> Vec<Scenario> {
        let mut scenarios = vec![
            Self::builtin(
                "application",
                "should generate an application",
                OptionOverrides::default(),
            ),
            Self::builtin(
                "js",
                "should generate JavaScript files",
                OptionOverrides {
                    js: Some(true),
                    ..Default::default()
                },
            ),
            Self::builtin(
                "directory",
                "should create src in the specified directory",
                OptionOverrides {
                    directory: Some("subdir".into()),
                    capacitor: Some(false),
                    ..Default::default()
                },
            ),
            Self::builtin(
                "tags",
                "should add tags to nx.json",
                OptionOverrides {
                    tags: Some("e2etag,e2ePackage".into()),
                    capacitor: Some(false),
                    ..Default::default()
                },
            ),
            Self::builtin(
                "unit-test-runner-none",
                "should not generate Jest mocks",
                OptionOverrides {
                    unit_test_runner: Some(UnitTestRunner::None),
                    ..Default::default()
                },
            ),
        ];

        for style in Style::all().into_iter().filter(|s| *s != Style::Css) {
            let name = format!("style-{}", style.as_str().replace(['@', '/'], "-"));
            let name = name.replace("--", "-");
            scenarios.push(Self::builtin(
                &name,
                &format!("should generate application with {style} styles"),
                OptionOverrides {
                    style: Some(style),
                    ..Default::default()
                },
            ));
        }

        scenarios.push(Self::builtin(
            "pascal-case-files",
            "should generate with pascal case files",
            OptionOverrides {
                pascal_case_files: Some(true),
                ..Default::default()
            },
        ));
        scenarios.push(Self::builtin(
            "class-component",
            "should generate with class components",
            OptionOverrides {
                class_component: Some(true),
                ..Default::default()
            },
        ));

        scenarios
    }

    /// Built-in scenarios followed by `scenarios/**/*.scenario.yaml` below `root`.
    pub fn load_all(root: &Path) -> ResultWithError<Vec<Scenario>> {
        let mut scenarios = Self::builtin_matrix();
        let custom = DirUtils::parse_all::<Scenario>(&root.join(SCENARIO_DIR), YamlType::Scenario)?;
        scenarios.extend(custom.into_iter().map(|yaml| {
            let mut scenario = yaml.content;
            if scenario.name.is_empty() {
                scenario.name = yaml.file_name;
            }
            scenario
        }));
        Ok(scenarios)
    }
}
