use serde_json::{Map, Value, json};

use crate::{
    code_gen::{capacitor::GenCapacitor, lint::GenLint},
    models::{options::NormalizedOptions, workspace::ProjectRegistration},
};

/// Builds the nx.json and workspace.json entries for a generated app and its
/// e2e project.
pub struct ProjectDefinition;

impl ProjectDefinition {
    pub fn registrations(options: &NormalizedOptions) -> Vec<ProjectRegistration> {
        let mut projects = vec![ProjectRegistration {
            name: options.project_name.clone(),
            tags: options.parsed_tags.clone(),
            implicit_dependencies: Vec::new(),
            definition: Self::app(options),
        }];

        if options.has_cypress() {
            projects.push(ProjectRegistration {
                name: options.e2e_project_name.clone(),
                tags: Vec::new(),
                implicit_dependencies: vec![options.project_name.clone()],
                definition: Self::e2e(options),
            });
        }

        projects
    }

    fn app(options: &NormalizedOptions) -> Value {
        let root = &options.project_root;
        let mut targets = Map::new();
        targets.insert("build".into(), Self::build_target(options));
        targets.insert(
            "serve".into(),
            json!({
                "executor": "@nrwl/web:dev-server",
                "options": { "buildTarget": format!("{}:build", options.project_name) },
                "configurations": {
                    "production": {
                        "buildTarget": format!("{}:build:production", options.project_name)
                    }
                }
            }),
        );

        let mut tsconfigs = vec![format!("{root}/tsconfig.app.json")];
        if options.has_jest() {
            tsconfigs.push(format!("{root}/tsconfig.spec.json"));
        }
        targets.insert(
            "lint".into(),
            GenLint::target(options.linter(), root, &tsconfigs),
        );

        if options.has_jest() {
            targets.insert(
                "test".into(),
                json!({
                    "executor": "@nrwl/jest:jest",
                    "options": {
                        "jestConfig": format!("{root}/jest.config.js"),
                        "passWithNoTests": true
                    }
                }),
            );
        }
        if options.options.capacitor {
            targets.extend(GenCapacitor::targets(options));
        }

        json!({
            "root": root,
            "sourceRoot": format!("{root}/src"),
            "projectType": "application",
            "targets": targets
        })
    }

    fn build_target(options: &NormalizedOptions) -> Value {
        let root = &options.project_root;
        let script = options.script_ext();
        let styles: Vec<String> = match options.style().extension() {
            Some(ext) => vec![format!("{root}/src/app/theme/variables.{ext}")],
            None => Vec::new(),
        };

        json!({
            "executor": "@nrwl/web:build",
            "outputs": ["{options.outputPath}"],
            "options": {
                "outputPath": format!("dist/{root}"),
                "index": format!("{root}/src/index.html"),
                "main": format!("{root}/src/main.{}", options.component_ext()),
                "polyfills": format!("{root}/src/polyfills.{script}"),
                "tsConfig": format!("{root}/tsconfig.app.json"),
                "assets": [
                    format!("{root}/src/assets"),
                    format!("{root}/src/manifest.json")
                ],
                "styles": styles,
                "scripts": [],
                "webpackConfig": "@nrwl/react/plugins/webpack"
            },
            "configurations": {
                "production": {
                    "fileReplacements": [{
                        "replace": format!("{root}/src/environments/environment.{script}"),
                        "with": format!("{root}/src/environments/environment.prod.{script}")
                    }],
                    "optimization": true,
                    "outputHashing": "all",
                    "sourceMap": false,
                    "extractCss": true,
                    "namedChunks": false,
                    "extractLicenses": true,
                    "vendorChunk": false,
                    "budgets": [{
                        "type": "initial",
                        "maximumWarning": "2mb",
                        "maximumError": "5mb"
                    }]
                }
            }
        })
    }

    fn e2e(options: &NormalizedOptions) -> Value {
        let root = &options.e2e_root;
        json!({
            "root": root,
            "sourceRoot": format!("{root}/src"),
            "projectType": "application",
            "targets": {
                "e2e": {
                    "executor": "@nrwl/cypress:cypress",
                    "options": {
                        "cypressConfig": format!("{root}/cypress.json"),
                        "tsConfig": format!("{root}/tsconfig.e2e.json"),
                        "devServerTarget": format!("{}:serve", options.project_name)
                    },
                    "configurations": {
                        "production": {
                            "devServerTarget": format!("{}:serve:production", options.project_name)
                        }
                    }
                },
                "lint": GenLint::target(
                    options.linter(),
                    root,
                    &[format!("{root}/tsconfig.e2e.json")]
                )
            }
        })
    }
}
