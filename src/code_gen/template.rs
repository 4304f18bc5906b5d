use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::{models::options::NormalizedOptions, utils::errors::ResultWithError};

lazy_static! {
    static ref PLACEHOLDER_RE: Regex = Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}")
        .expect("placeholder pattern is a valid regex");
}

/// Values substituted into `{{name}}` placeholders.
#[derive(Debug, Default, Clone)]
pub struct TemplateVars(BTreeMap<&'static str, String>);

impl TemplateVars {
    pub fn from_options(options: &NormalizedOptions) -> Self {
        let mut vars = Self::default();
        vars.set("project_name", &options.project_name)
            .set("e2e_project_name", &options.e2e_project_name)
            .set("project_root", &options.project_root)
            .set("e2e_root", &options.e2e_root)
            .set("class_name", &options.class_name)
            .set("offset", options.offset_from_root())
            .set("app_file", &options.app_file_name)
            .set("home_file", &options.home_file_name)
            .set("explore_file", &options.explore_container_file_name)
            .set("component_ext", options.component_ext())
            .set("script_ext", options.script_ext());
        vars
    }

    pub fn set(&mut self, key: &'static str, value: impl Into<String>) -> &mut Self {
        self.0.insert(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

pub struct TemplateUtils;

impl TemplateUtils {
    /// Replaces every `{{name}}`; an unknown name is an error so typos never
    /// leak into generated files.
    pub fn render(template: &str, vars: &TemplateVars) -> ResultWithError<String> {
        let mut missing = Vec::new();
        let rendered = PLACEHOLDER_RE.replace_all(template, |caps: &Captures| {
            let key = &caps[1];
            match vars.get(key) {
                Some(value) => value.to_string(),
                None => {
                    missing.push(key.to_string());
                    String::new()
                }
            }
        });

        if !missing.is_empty() {
            missing.sort();
            missing.dedup();
            return Err(format!("Unknown template variables: {}", missing.join(", ")).into());
        }
        Ok(rendered.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_placeholders_with_optional_spaces() {
        let mut vars = TemplateVars::default();
        vars.set("name", "demo").set("ext", "tsx");
        let out = TemplateUtils::render("import App from './{{name}}.{{ ext }}';", &vars).unwrap();
        assert_eq!(out, "import App from './demo.tsx';");
    }

    #[test]
    fn leaves_single_braces_alone() {
        let vars = TemplateVars::default();
        let src = "const App = () => { return <div style={{ color: 'red' }} />; };";
        // `{{ color: 'red' }}` is not a placeholder because of the colon.
        assert_eq!(TemplateUtils::render(src, &vars).unwrap(), src);
    }

    #[test]
    fn reports_unknown_variables() {
        let vars = TemplateVars::default();
        let err = TemplateUtils::render("{{b}} {{a}} {{b}}", &vars).unwrap_err();
        assert_eq!(err.to_string(), "Unknown template variables: a, b");
    }
}
