use serde_json::json;

use crate::{
    code_gen::{
        gen_iface::CodeGenTrait,
        template::{TemplateUtils, TemplateVars},
    },
    models::{
        file_set::FileSet,
        options::{NormalizedOptions, Style},
    },
    utils::errors::EmptyResult,
};

const MAIN_TEMPLATE: &str = r#"import React from 'react';
import ReactDOM from 'react-dom';

import App from './app/{{app_file}}';

ReactDOM.render(
  <React.StrictMode>
    <App />
  </React.StrictMode>,
  document.getElementById('root')
);
"#;

const POLYFILLS: &str = r#"/**
 * Polyfill stable language features. These imports will be optimized by `@babel/preset-env`.
 *
 * See: https://github.com/zloirock/core-js#babel
 */
import 'core-js/stable';
import 'regenerator-runtime/runtime';
"#;

const BROWSERSLIST: &str = r#"# This file is used by:
# 1. autoprefixer to adjust CSS to support the below specified browsers
# 2. babel preset-env to adjust included polyfills
#
# For additional information regarding the format and rule options, please see:
# https://github.com/browserslist/browserslist#queries
#
# If you need to support different browsers in production, you may tweak the list below.

last 1 Chrome version
last 1 Firefox version
last 2 Edge major versions
last 2 Safari major version
last 2 iOS major versions
Firefox ESR
not IE 9-11 # For IE 9-11 support, remove 'not'.
"#;

/// Base React application files: entry point, polyfills, environments and
/// compiler configuration.
pub struct GenReact;

impl CodeGenTrait for GenReact {
    fn name(&self) -> &'static str {
        "react"
    }

    fn run(&self, options: &NormalizedOptions, files: &mut FileSet) -> EmptyResult {
        let vars = TemplateVars::from_options(options);
        let script = options.script_ext();

        files.add_text(
            options.in_project(&format!("src/main.{}", options.component_ext())),
            TemplateUtils::render(MAIN_TEMPLATE, &vars)?,
        );
        files.add_text(
            options.in_project(&format!("src/polyfills.{script}")),
            POLYFILLS,
        );
        files.add_text(
            options.in_project(&format!("src/environments/environment.{script}")),
            "// This file can be replaced during build by using the `fileReplacements` array.\n\
             // When building for production, this file is replaced with `environment.prod.ts`.\n\n\
             export const environment = {\n  production: false,\n};\n",
        );
        files.add_text(
            options.in_project(&format!("src/environments/environment.prod.{script}")),
            "export const environment = {\n  production: true,\n};\n",
        );
        files.add_text(options.in_project(".browserslistrc"), BROWSERSLIST);

        files.add_json(options.in_project(".babelrc"), &Self::babelrc(options.style()))?;
        self.add_tsconfigs(options, files)?;

        Ok(())
    }
}

impl GenReact {
    fn babelrc(style: Style) -> serde_json::Value {
        match style {
            Style::StyledComponents => json!({
                "presets": ["@nrwl/react/babel"],
                "plugins": [["styled-components", { "pure": true, "ssr": true }]]
            }),
            Style::EmotionStyled => json!({
                "presets": ["@nrwl/react/babel", "@emotion/babel-preset-css-prop"],
                "plugins": []
            }),
            _ => json!({
                "presets": ["@nrwl/react/babel"],
                "plugins": []
            }),
        }
    }

    fn add_tsconfigs(&self, options: &NormalizedOptions, files: &mut FileSet) -> EmptyResult {
        let offset = options.offset_from_root();

        let mut references = vec![json!({ "path": "./tsconfig.app.json" })];
        if options.has_jest() {
            references.push(json!({ "path": "./tsconfig.spec.json" }));
        }

        files.add_json(
            options.in_project("tsconfig.json"),
            &json!({
                "extends": format!("{offset}tsconfig.base.json"),
                "compilerOptions": {
                    "jsx": "react",
                    "allowJs": true,
                    "esModuleInterop": true,
                    "allowSyntheticDefaultImports": true
                },
                "files": [],
                "include": [],
                "references": references
            }),
        )?;

        files.add_json(
            options.in_project("tsconfig.app.json"),
            &json!({
                "extends": "./tsconfig.json",
                "compilerOptions": {
                    "outDir": format!("{offset}dist/out-tsc"),
                    "types": ["node"]
                },
                "files": [
                    format!("{offset}node_modules/@nrwl/react/typings/cssmodule.d.ts"),
                    format!("{offset}node_modules/@nrwl/react/typings/image.d.ts")
                ],
                "exclude": ["**/*.spec.ts", "**/*.spec.tsx", "**/*.spec.js", "**/*.spec.jsx"],
                "include": ["**/*.js", "**/*.jsx", "**/*.ts", "**/*.tsx"]
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::options::{ApplicationOptions, UnitTestRunner};

    fn generate(options: ApplicationOptions) -> (NormalizedOptions, FileSet) {
        let normalized = options.normalize("apps").unwrap();
        let mut files = FileSet::new();
        GenReact.run(&normalized, &mut files).unwrap();
        (normalized, files)
    }

    #[test]
    fn entry_point_imports_the_app_file() {
        let mut options = ApplicationOptions::new("demo");
        options.pascal_case_files = Some(true);
        let (_, files) = generate(options);

        let main = files.text("apps/demo/src/main.tsx").unwrap();
        assert!(main.contains("import App from './app/App';"));
        assert!(files.contains("apps/demo/src/polyfills.ts"));
        assert!(files.contains("apps/demo/src/environments/environment.prod.ts"));
    }

    #[test]
    fn js_sources_use_js_extensions() {
        let mut options = ApplicationOptions::new("demo");
        options.js = true;
        let (_, files) = generate(options);

        assert!(files.contains("apps/demo/src/main.js"));
        assert!(files.contains("apps/demo/src/polyfills.js"));
        assert!(!files.contains("apps/demo/src/main.tsx"));
    }

    #[test]
    fn tsconfig_references_spec_config_only_with_jest() {
        let (_, files) = generate(ApplicationOptions::new("demo"));
        let tsconfig: serde_json::Value =
            serde_json::from_str(files.text("apps/demo/tsconfig.json").unwrap()).unwrap();
        assert_eq!(tsconfig["references"].as_array().unwrap().len(), 2);
        assert_eq!(tsconfig["extends"], "../../tsconfig.base.json");

        let mut options = ApplicationOptions::new("demo");
        options.unit_test_runner = UnitTestRunner::None;
        let (_, files) = generate(options);
        let tsconfig: serde_json::Value =
            serde_json::from_str(files.text("apps/demo/tsconfig.json").unwrap()).unwrap();
        assert_eq!(tsconfig["references"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn babel_config_follows_the_style() {
        let mut options = ApplicationOptions::new("demo");
        options.style = Style::StyledComponents;
        let (_, files) = generate(options);
        assert!(files
            .text("apps/demo/.babelrc")
            .unwrap()
            .contains("styled-components"));
    }
}
