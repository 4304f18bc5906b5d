use serde_json::json;

use crate::{
    code_gen::gen_iface::CodeGenTrait,
    models::{
        file_set::FileSet,
        options::{Linter, NormalizedOptions},
    },
    utils::errors::EmptyResult,
};

/// Linter configuration for the app and, when present, its e2e project.
pub struct GenLint;

impl CodeGenTrait for GenLint {
    fn name(&self) -> &'static str {
        "lint"
    }

    fn run(&self, options: &NormalizedOptions, files: &mut FileSet) -> EmptyResult {
        let linter = options.linter();
        let file = linter.config_file();

        files.add_json(
            options.in_project(file),
            &Self::config(linter, "plugin:@nrwl/nx/react"),
        )?;
        if options.has_cypress() {
            files.add_json(
                options.in_e2e(file),
                &Self::config(linter, "plugin:cypress/recommended"),
            )?;
        }
        Ok(())
    }
}

impl GenLint {
    fn config(linter: Linter, eslint_preset: &str) -> serde_json::Value {
        match linter {
            Linter::Eslint => json!({
                "extends": [eslint_preset],
                "ignorePatterns": ["!**/*"],
                "overrides": [
                    { "files": ["*.ts", "*.tsx", "*.js", "*.jsx"], "rules": {} },
                    { "files": ["*.ts", "*.tsx"], "rules": {} },
                    { "files": ["*.js", "*.jsx"], "rules": {} }
                ],
                "rules": {}
            }),
            Linter::Tslint => json!({
                "extends": ["tslint:recommended", "tslint-react"],
                "linterOptions": { "exclude": ["!**/*"] },
                "rules": {}
            }),
        }
    }

    /// The workspace.json lint target for a project rooted at `root`.
    pub fn target(linter: Linter, root: &str, tsconfigs: &[String]) -> serde_json::Value {
        match linter {
            Linter::Eslint => json!({
                "executor": "@nrwl/linter:eslint",
                "options": { "lintFilePatterns": [format!("{root}/**/*.{{ts,tsx,js,jsx}}")] }
            }),
            Linter::Tslint => json!({
                "executor": "@angular-devkit/build-angular:tslint",
                "options": {
                    "tsConfig": tsconfigs,
                    "exclude": ["**/node_modules/**", format!("!{root}/**/*")]
                }
            }),
        }
    }
}
