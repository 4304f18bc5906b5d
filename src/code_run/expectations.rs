use std::path::Path;

use crate::{
    models::{
        app_state::StageResult,
        options::{NormalizedOptions, Style},
        scenario::StageKind,
        workspace::Workspace,
    },
    utils::errors::ResultWithError,
};

/// Paths that must and must not exist after generating a project.
#[derive(Debug, Default, PartialEq)]
pub struct FileExpectations {
    pub present: Vec<String>,
    pub absent: Vec<String>,
}

impl FileExpectations {
    pub fn for_options(options: &NormalizedOptions) -> Self {
        let mut expected = Self::default();
        let c = options.component_ext();
        let s = options.script_ext();
        let app = &options.app_file_name;
        let home = &options.home_file_name;
        let explore = &options.explore_container_file_name;

        for path in [
            "ionic.config.json".to_string(),
            "src/index.html".into(),
            "src/manifest.json".into(),
            "src/assets/icon/favicon.png".into(),
            "src/assets/icon/icon.png".into(),
            format!("src/app/{app}.{c}"),
            format!("src/app/pages/{home}.{c}"),
            format!("src/app/components/{explore}.{c}"),
            format!("src/main.{c}"),
            format!("src/polyfills.{s}"),
            format!("src/environments/environment.{s}"),
            format!("src/environments/environment.prod.{s}"),
            ".babelrc".into(),
            ".browserslistrc".into(),
            "tsconfig.json".into(),
            "tsconfig.app.json".into(),
            options.linter().config_file().into(),
        ] {
            expected.present.push(options.in_project(&path));
        }

        let style = options.style();
        match style.extension() {
            Some(ext) => {
                expected.present.extend([
                    options.in_project(&format!("src/app/pages/{home}.{ext}")),
                    options.in_project(&format!("src/app/components/{explore}.{ext}")),
                    options.in_project(&format!("src/app/theme/variables.{ext}")),
                ]);
            }
            None => {
                expected
                    .present
                    .push(options.in_project("src/app/theme/variables.css"));
                for ext in Style::all().iter().filter_map(|s| s.extension()) {
                    expected.absent.extend([
                        options.in_project(&format!("src/app/pages/{home}.{ext}")),
                        options.in_project(&format!("src/app/components/{explore}.{ext}")),
                    ]);
                }
            }
        }

        let jest = [
            "jest.config.js".to_string(),
            "tsconfig.spec.json".into(),
            "src/app/__mocks__/fileMock.js".into(),
            format!("src/setup-tests.{s}"),
            format!("src/app/{app}.spec.{c}"),
        ]
        .map(|path| options.in_project(&path));
        if options.has_jest() {
            expected.present.extend(jest);
        } else {
            expected.absent.extend(jest);
        }

        let e2e = [
            "cypress.json".to_string(),
            "tsconfig.json".into(),
            "tsconfig.e2e.json".into(),
            options.linter().config_file().into(),
            "src/fixtures/example.json".into(),
            format!("src/integration/app.spec.{s}"),
            "src/plugins/index.js".into(),
            format!("src/support/app.po.{s}"),
            format!("src/support/commands.{s}"),
            format!("src/support/index.{s}"),
        ]
        .map(|path| options.in_e2e(&path));
        if options.has_cypress() {
            expected.present.extend(e2e);
        } else {
            expected.absent.push(options.e2e_root.clone());
        }

        let capacitor = options.in_project("capacitor.config.json");
        if options.options.capacitor {
            expected.present.push(capacitor);
        } else {
            expected.absent.push(capacitor);
        }

        expected
    }

    /// Fails with the complete lists of missing and unexpected paths.
    pub fn check(&self, root: &Path) -> StageResult {
        let missing: Vec<_> = self
            .present
            .iter()
            .filter(|path| !root.join(path).exists())
            .cloned()
            .collect();
        let unexpected: Vec<_> = self
            .absent
            .iter()
            .filter(|path| root.join(path).exists())
            .cloned()
            .collect();

        if missing.is_empty() && unexpected.is_empty() {
            return StageResult::ok(StageKind::Files.to_string());
        }

        let mut message = Vec::new();
        if !missing.is_empty() {
            message.push(format!("missing: {}", missing.join(", ")));
        }
        if !unexpected.is_empty() {
            message.push(format!("unexpected: {}", unexpected.join(", ")));
        }
        StageResult::failed(StageKind::Files.to_string(), message.join("; "))
    }
}

/// The project entry in nx.json must carry exactly the requested tags.
pub fn check_tags(
    workspace: &Workspace,
    options: &NormalizedOptions,
) -> ResultWithError<StageResult> {
    let stage = StageKind::Tags.to_string();
    let result = match workspace.project_tags(&options.project_name)? {
        None => StageResult::failed(
            stage,
            format!("{} is not registered in nx.json", options.project_name),
        ),
        Some(tags) if tags == options.parsed_tags => StageResult::ok(stage),
        Some(tags) => StageResult::failed(
            stage,
            format!(
                "expected tags [{}], found [{}]",
                options.parsed_tags.join(", "),
                tags.join(", ")
            ),
        ),
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        code_gen::code_gen::CodeGen,
        models::{
            options::{ApplicationOptions, UnitTestRunner},
            workspace::Workspace,
        },
    };

    fn generated(options: ApplicationOptions) -> (tempfile::TempDir, NormalizedOptions) {
        let dir = tempfile::tempdir().unwrap();
        let options = options.normalize("apps").unwrap();
        CodeGen::generate(&options)
            .unwrap()
            .write_to(dir.path())
            .unwrap();
        (dir, options)
    }

    #[test]
    fn generated_projects_meet_their_expectations() {
        let mut variants = Vec::new();
        for style in Style::all() {
            let mut options = ApplicationOptions::new("demo");
            options.style = style;
            variants.push(options);
        }
        let mut js = ApplicationOptions::new("demo");
        js.js = true;
        js.unit_test_runner = UnitTestRunner::None;
        js.capacitor = true;
        variants.push(js);

        for options in variants {
            let (dir, normalized) = generated(options);
            let result = FileExpectations::for_options(&normalized).check(dir.path());
            assert!(result.passed, "{:?}", result.message);
        }
    }

    #[test]
    fn reports_missing_and_unexpected_files() {
        let (dir, options) = generated(ApplicationOptions::new("demo"));
        std::fs::remove_file(dir.path().join("apps/demo/src/app/app.tsx")).unwrap();
        std::fs::write(dir.path().join("apps/demo/capacitor.config.json"), "{}").unwrap();

        let result = FileExpectations::for_options(&options).check(dir.path());
        assert!(!result.passed);
        let message = result.message.unwrap();
        assert!(message.contains("missing: apps/demo/src/app/app.tsx"));
        assert!(message.contains("unexpected: apps/demo/capacitor.config.json"));
    }

    #[test]
    fn tags_must_match_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::ensure(dir.path(), "proj").unwrap();
        let mut options = ApplicationOptions::new("demo");
        options.tags = Some("e2etag,e2ePackage".into());
        let options = options.normalize("apps").unwrap();

        assert!(!check_tags(&workspace, &options).unwrap().passed);

        let projects = crate::code_gen::project::ProjectDefinition::registrations(&options);
        workspace.register(&projects).unwrap();
        assert!(check_tags(&workspace, &options).unwrap().passed);
    }
}
