use serde_json::json;

use crate::{
    code_gen::{
        gen_iface::CodeGenTrait,
        template::{TemplateUtils, TemplateVars},
    },
    models::{file_set::FileSet, options::NormalizedOptions},
    utils::errors::EmptyResult,
};

const JEST_CONFIG: &str = r#"module.exports = {
  displayName: '{{project_name}}',
  preset: '{{offset}}jest.preset.js',
  setupFilesAfterEnv: ['<rootDir>/src/setup-tests.{{script_ext}}'],
  transform: {
    '^.+\\.[tj]sx?$': 'babel-jest',
  },
  moduleNameMapper: {
    '\\.(jpg|jpeg|png|gif|svg)$': '<rootDir>/src/app/__mocks__/fileMock.js',
  },
  moduleFileExtensions: ['ts', 'tsx', 'js', 'jsx'],
  coverageDirectory: '{{offset}}coverage/{{project_root}}',
};
"#;

const APP_SPEC: &str = r#"import React from 'react';
import { render } from '@testing-library/react';

import App from './{{app_file}}';

describe('App', () => {
  it('should render successfully', () => {
    const { baseElement } = render(<App />);

    expect(baseElement).toBeTruthy();
  });
});
"#;

const SETUP_TESTS: &str = r#"// Ionic components query media features that jsdom does not implement.
Object.defineProperty(window, 'matchMedia', {
  writable: true,
  value: (query{{query_type}}) => ({
    matches: false,
    media: query,
    onchange: null,
    addListener: () => undefined,
    removeListener: () => undefined,
    addEventListener: () => undefined,
    removeEventListener: () => undefined,
    dispatchEvent: () => false,
  }),
});
"#;

/// Jest unit test setup with a single smoke spec for the app shell.
pub struct GenJest;

impl CodeGenTrait for GenJest {
    fn name(&self) -> &'static str {
        "jest"
    }

    fn applies(&self, options: &NormalizedOptions) -> bool {
        options.has_jest()
    }

    fn run(&self, options: &NormalizedOptions, files: &mut FileSet) -> EmptyResult {
        let mut vars = TemplateVars::from_options(options);
        vars.set(
            "query_type",
            if options.options.js { "" } else { ": string" },
        );

        files.add_text(
            options.in_project("jest.config.js"),
            TemplateUtils::render(JEST_CONFIG, &vars)?,
        );
        files.add_text(
            options.in_project("src/app/__mocks__/fileMock.js"),
            "module.exports = 'test-file-stub';\n",
        );
        files.add_text(
            options.in_project(&format!("src/setup-tests.{}", options.script_ext())),
            TemplateUtils::render(SETUP_TESTS, &vars)?,
        );
        files.add_text(
            options.in_project(&format!(
                "src/app/{}.spec.{}",
                options.app_file_name,
                options.component_ext()
            )),
            TemplateUtils::render(APP_SPEC, &vars)?,
        );

        let offset = options.offset_from_root();
        files.add_json(
            options.in_project("tsconfig.spec.json"),
            &json!({
                "extends": "./tsconfig.json",
                "compilerOptions": {
                    "outDir": format!("{offset}dist/out-tsc"),
                    "module": "commonjs",
                    "types": ["jest", "node"]
                },
                "include": [
                    "**/*.spec.ts",
                    "**/*.spec.tsx",
                    "**/*.spec.js",
                    "**/*.spec.jsx",
                    "**/*.d.ts"
                ]
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::options::ApplicationOptions;

    #[test]
    fn writes_config_mocks_and_exactly_one_spec() {
        let options = ApplicationOptions::new("demo").normalize("apps").unwrap();
        let mut files = FileSet::new();
        GenJest.run(&options, &mut files).unwrap();

        let specs: Vec<_> = files.spec_sources().collect();
        assert_eq!(specs, vec!["apps/demo/src/app/app.spec.tsx"]);
        assert!(files.contains("apps/demo/tsconfig.spec.json"));
        assert!(files.contains("apps/demo/src/app/__mocks__/fileMock.js"));

        let config = files.text("apps/demo/jest.config.js").unwrap();
        assert!(config.contains("displayName: 'demo'"));
        assert!(config.contains("preset: '../../jest.preset.js'"));
        assert!(config.contains("'^.+\\\\.[tj]sx?$': 'babel-jest'"));
        assert!(config.contains("coverageDirectory: '../../coverage/apps/demo'"));

        let setup = files.text("apps/demo/src/setup-tests.ts").unwrap();
        assert!(setup.contains("value: (query: string) => ({"));
    }

    #[test]
    fn skipped_without_jest() {
        let mut options = ApplicationOptions::new("demo");
        options.unit_test_runner = crate::models::options::UnitTestRunner::None;
        assert!(!GenJest.applies(&options.normalize("apps").unwrap()));
    }

    #[test]
    fn javascript_setup_has_no_annotations() {
        let mut options = ApplicationOptions::new("demo");
        options.js = true;
        let options = options.normalize("apps").unwrap();
        let mut files = FileSet::new();
        GenJest.run(&options, &mut files).unwrap();

        let setup = files.text("apps/demo/src/setup-tests.js").unwrap();
        assert!(setup.contains("value: (query) => ({"));
        assert!(files.contains("apps/demo/src/app/app.spec.js"));
    }
}
