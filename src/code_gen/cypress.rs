use serde_json::json;

use crate::{
    code_gen::{
        gen_iface::CodeGenTrait,
        template::{TemplateUtils, TemplateVars},
    },
    models::{file_set::FileSet, options::NormalizedOptions},
    utils::errors::EmptyResult,
};

const APP_SPEC: &str = r#"import { getTitle } from '../support/app.po';

describe('{{project_name}}', () => {
  beforeEach(() => cy.visit('/'));

  it('should display the home page title', () => {
    getTitle().contains('Blank');
  });

  it('should point newcomers to the component docs', () => {
    cy.contains('Ready to create an app?');
  });
});
"#;

const PLUGINS: &str = r#"// ***********************************************************
// This plugins/index.js can be used to load plugins
//
// You can change the location of this file or turn off loading
// the plugins file with the 'pluginsFile' configuration option.
// ***********************************************************

const { preprocessTypescript } = require('@nrwl/cypress/plugins/preprocessor');

module.exports = (on, config) => {
  // `on` is used to hook into various events Cypress emits
  // `config` is the resolved Cypress config

  // Preprocess Typescript file using Nx helper
  on('file:preprocessor', preprocessTypescript(config));
};
"#;

const COMMANDS: &str = r#"// ***********************************************
// Custom commands are created here and shared by every spec, see
// https://on.cypress.io/custom-commands
// ***********************************************

Cypress.Commands.add('login', (email, password) => {
  console.log('Custom command example: Login', email, password);
});
"#;

const COMMANDS_TYPES: &str = r#"// eslint-disable-next-line @typescript-eslint/no-namespace
declare namespace Cypress {
  // eslint-disable-next-line @typescript-eslint/no-unused-vars
  interface Chainable<Subject> {
    login(email: string, password: string): void;
  }
}

"#;

const SUPPORT_INDEX: &str = r#"// ***********************************************************
// This support file is processed and loaded automatically
// before the test files.
// ***********************************************************

// Import commands.js using ES2015 syntax:
import './commands';
"#;

/// The Cypress e2e project that drives the built application.
pub struct GenCypress;

impl CodeGenTrait for GenCypress {
    fn name(&self) -> &'static str {
        "cypress"
    }

    fn applies(&self, options: &NormalizedOptions) -> bool {
        options.has_cypress()
    }

    fn run(&self, options: &NormalizedOptions, files: &mut FileSet) -> EmptyResult {
        let vars = TemplateVars::from_options(options);
        let script = options.script_ext();
        let offset = options.offset_from_root();

        files.add_json(
            options.in_e2e("cypress.json"),
            &json!({
                "fileServerFolder": ".",
                "fixturesFolder": "./src/fixtures",
                "integrationFolder": "./src/integration",
                "modifyObstructiveCode": false,
                "pluginsFile": "./src/plugins/index",
                "supportFile": format!("./src/support/index.{script}"),
                "video": true,
                "videosFolder": format!("{offset}dist/cypress/{}/videos", options.e2e_root),
                "screenshotsFolder": format!("{offset}dist/cypress/{}/screenshots", options.e2e_root),
                "chromeWebSecurity": false
            }),
        )?;
        files.add_json(
            options.in_e2e("tsconfig.json"),
            &json!({
                "extends": format!("{offset}tsconfig.base.json"),
                "files": [],
                "include": [],
                "references": [{ "path": "./tsconfig.e2e.json" }]
            }),
        )?;
        files.add_json(
            options.in_e2e("tsconfig.e2e.json"),
            &json!({
                "extends": "./tsconfig.json",
                "compilerOptions": {
                    "sourceMap": false,
                    "outDir": format!("{offset}dist/out-tsc"),
                    "allowJs": true,
                    "types": ["cypress", "node"]
                },
                "include": ["src/**/*.ts", "src/**/*.js"]
            }),
        )?;
        files.add_json(
            options.in_e2e("src/fixtures/example.json"),
            &json!({
                "name": "Using fixtures to represent data",
                "email": "hello@cypress.io"
            }),
        )?;

        files.add_text(
            options.in_e2e(&format!("src/integration/app.spec.{script}")),
            TemplateUtils::render(APP_SPEC, &vars)?,
        );
        files.add_text(options.in_e2e("src/plugins/index.js"), PLUGINS);
        files.add_text(
            options.in_e2e(&format!("src/support/app.po.{script}")),
            "export const getTitle = () => cy.get('ion-title');\n",
        );

        let commands = if options.options.js {
            COMMANDS.to_string()
        } else {
            format!("{COMMANDS_TYPES}{COMMANDS}")
        };
        files.add_text(options.in_e2e(&format!("src/support/commands.{script}")), commands);
        files.add_text(
            options.in_e2e(&format!("src/support/index.{script}")),
            SUPPORT_INDEX,
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::options::ApplicationOptions;

    #[test]
    fn e2e_project_lives_next_to_the_app() {
        let mut options = ApplicationOptions::new("demo");
        options.directory = Some("subdir".into());
        let options = options.normalize("apps").unwrap();
        let mut files = FileSet::new();
        GenCypress.run(&options, &mut files).unwrap();

        let paths: Vec<_> = files.paths().collect();
        assert_eq!(
            paths,
            vec![
                "apps/subdir/demo-e2e/cypress.json",
                "apps/subdir/demo-e2e/src/fixtures/example.json",
                "apps/subdir/demo-e2e/src/integration/app.spec.ts",
                "apps/subdir/demo-e2e/src/plugins/index.js",
                "apps/subdir/demo-e2e/src/support/app.po.ts",
                "apps/subdir/demo-e2e/src/support/commands.ts",
                "apps/subdir/demo-e2e/src/support/index.ts",
                "apps/subdir/demo-e2e/tsconfig.e2e.json",
                "apps/subdir/demo-e2e/tsconfig.json",
            ]
        );

        let cypress: serde_json::Value =
            serde_json::from_str(files.text("apps/subdir/demo-e2e/cypress.json").unwrap())
                .unwrap();
        assert_eq!(
            cypress["videosFolder"],
            "../../../dist/cypress/apps/subdir/demo-e2e/videos"
        );
        let spec = files
            .text("apps/subdir/demo-e2e/src/integration/app.spec.ts")
            .unwrap();
        assert!(spec.contains("describe('subdir-demo', () => {"));
    }

    #[test]
    fn javascript_commands_skip_type_declarations() {
        let mut options = ApplicationOptions::new("demo");
        options.js = true;
        let options = options.normalize("apps").unwrap();
        let mut files = FileSet::new();
        GenCypress.run(&options, &mut files).unwrap();

        let commands = files.text("apps/demo-e2e/src/support/commands.js").unwrap();
        assert!(!commands.contains("declare namespace"));
        assert!(commands.contains("Cypress.Commands.add('login'"));
    }
}
