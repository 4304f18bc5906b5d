use serde_json::{Map, Value, json};

use crate::{
    code_gen::gen_iface::CodeGenTrait,
    models::{file_set::FileSet, options::NormalizedOptions},
    utils::errors::EmptyResult,
};

const APP_ID: &str = "io.ionic.starter";

/// Capacitor commands exposed as project targets, with their default args.
const CAP_TARGETS: [(&str, &str); 6] = [
    ("cap", "--help"),
    ("add", "add"),
    ("copy", "copy"),
    ("open", "open"),
    ("sync", "sync"),
    ("update", "update"),
];

/// Native-shell integration through Capacitor.
pub struct GenCapacitor;

impl CodeGenTrait for GenCapacitor {
    fn name(&self) -> &'static str {
        "capacitor"
    }

    fn applies(&self, options: &NormalizedOptions) -> bool {
        options.options.capacitor
    }

    fn run(&self, options: &NormalizedOptions, files: &mut FileSet) -> EmptyResult {
        files.add_json(
            options.in_project("capacitor.config.json"),
            &json!({
                "appId": APP_ID,
                "appName": options.project_name,
                "webDir": format!("{}dist/{}", options.offset_from_root(), options.project_root),
                "bundledWebRuntime": false,
                "npmClient": "npm",
                "cordova": {}
            }),
        )
    }
}

impl GenCapacitor {
    pub fn targets(options: &NormalizedOptions) -> Map<String, Value> {
        CAP_TARGETS
            .iter()
            .map(|(target, cmd)| {
                let mut value = json!({
                    "executor": "@nxtend/capacitor:cap",
                    "options": { "cmd": cmd }
                });
                if *target != "cap" {
                    value["configurations"] = json!({
                        "ios": { "cmd": format!("{cmd} ios") },
                        "android": { "cmd": format!("{cmd} android") }
                    });
                }
                (target.to_string(), value)
            })
            .chain(std::iter::once((
                "serve-native".to_string(),
                json!({
                    "executor": "@nrwl/workspace:run-commands",
                    "options": {
                        "commands": [format!("npx cap run --project {}", options.project_name)],
                        "cwd": options.project_root
                    }
                }),
            )))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::options::ApplicationOptions;

    #[test]
    fn web_dir_points_at_build_output() {
        let mut options = ApplicationOptions::new("demo");
        options.capacitor = true;
        let options = options.normalize("apps").unwrap();
        let mut files = FileSet::new();
        GenCapacitor.run(&options, &mut files).unwrap();

        let config: Value =
            serde_json::from_str(files.text("apps/demo/capacitor.config.json").unwrap()).unwrap();
        assert_eq!(config["webDir"], "../../dist/apps/demo");
        assert_eq!(config["appName"], "demo");
    }

    #[test]
    fn exposes_cap_targets() {
        let options = ApplicationOptions::new("demo").normalize("apps").unwrap();
        let targets = GenCapacitor::targets(&options);
        let names: Vec<_> = targets.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["cap", "add", "copy", "open", "sync", "update", "serve-native"]
        );
        assert_eq!(targets["sync"]["configurations"]["ios"]["cmd"], "sync ios");
        assert!(targets["cap"].get("configurations").is_none());
    }
}
