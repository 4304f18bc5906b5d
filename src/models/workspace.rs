use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::utils::errors::{EmptyResult, OptionResultTrait as _, ResultTrait as _, ResultWithError};

pub const NX_JSON: &str = "nx.json";
pub const WORKSPACE_JSON: &str = "workspace.json";
pub const JEST_PRESET: &str = "jest.preset.js";

const JEST_PRESET_CONTENT: &str = r#"const nxPreset = require('@nrwl/jest/preset');

module.exports = { ...nxPreset };
"#;

/// One entry to add to the project registry.
#[derive(Debug, Clone)]
pub struct ProjectRegistration {
    pub name: String,
    pub tags: Vec<String>,
    pub implicit_dependencies: Vec<String>,
    /// The `workspace.json` entry: root, sourceRoot, projectType, targets
    pub definition: Value,
}

/// The multi-project directory whose metadata the generator updates.
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn open(root: impl Into<PathBuf>) -> ResultWithError<Self> {
        let root = root.into();
        if !root.join(NX_JSON).exists() || !root.join(WORKSPACE_JSON).exists() {
            return Err(format!(
                "{} is not a workspace, {} and {} are required",
                root.display(),
                NX_JSON,
                WORKSPACE_JSON
            )
            .into());
        }
        Ok(Self { root })
    }

    /// Creates any missing workspace file, leaving existing ones untouched.
    pub fn ensure(root: impl Into<PathBuf>, npm_scope: &str) -> ResultWithError<Self> {
        let root = root.into();
        fs::create_dir_all(&root).auto_err(format!("Failed to create {}", root.display()))?;

        let seeds = [
            (
                NX_JSON,
                json!({
                    "npmScope": npm_scope,
                    "affected": { "defaultBase": "master" },
                    "implicitDependencies": {
                        "workspace.json": "*",
                        "package.json": { "dependencies": "*", "devDependencies": "*" },
                        "tsconfig.base.json": "*",
                        "nx.json": "*"
                    },
                    "projects": {}
                }),
            ),
            (WORKSPACE_JSON, json!({ "version": 2, "projects": {} })),
            (
                "package.json",
                json!({
                    "name": npm_scope,
                    "version": "0.0.0",
                    "license": "MIT",
                    "private": true,
                    "scripts": { "nx": "nx" }
                }),
            ),
            (
                "tsconfig.base.json",
                json!({
                    "compileOnSave": false,
                    "compilerOptions": {
                        "rootDir": ".",
                        "sourceMap": true,
                        "declaration": false,
                        "moduleResolution": "node",
                        "emitDecoratorMetadata": true,
                        "experimentalDecorators": true,
                        "importHelpers": true,
                        "target": "es2015",
                        "module": "esnext",
                        "lib": ["es2017", "dom"],
                        "skipLibCheck": true,
                        "skipDefaultLibCheck": true,
                        "baseUrl": ".",
                        "paths": {}
                    },
                    "exclude": ["node_modules", "tmp"]
                }),
            ),
        ];

        for (file, content) in seeds {
            let path = root.join(file);
            if path.exists() {
                debug!("{} already present", file);
                continue;
            }
            Self::write_json(&path, &content)?;
            info!("Created {}", path.display());
        }

        let preset = root.join(JEST_PRESET);
        if !preset.exists() {
            fs::write(&preset, JEST_PRESET_CONTENT)
                .auto_err(format!("Could not write {}", preset.display()))?;
            info!("Created {}", preset.display());
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn read_nx_json(&self) -> ResultWithError<Value> {
        Self::read_json(&self.root.join(NX_JSON))
    }

    pub fn read_workspace_json(&self) -> ResultWithError<Value> {
        Self::read_json(&self.root.join(WORKSPACE_JSON))
    }

    pub fn project_exists(&self, name: &str) -> ResultWithError<bool> {
        let nx = self.read_nx_json()?;
        let workspace = self.read_workspace_json()?;
        Ok(nx["projects"].get(name).is_some() || workspace["projects"].get(name).is_some())
    }

    /// Tags recorded in nx.json for `name`, `None` when the project is unknown.
    pub fn project_tags(&self, name: &str) -> ResultWithError<Option<Vec<String>>> {
        let nx = self.read_nx_json()?;
        let Some(project) = nx["projects"].get(name) else {
            return Ok(None);
        };

        let tags = project["tags"]
            .as_array()
            .map(|tags| {
                tags.iter()
                    .filter_map(|tag| tag.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        Ok(Some(tags))
    }

    /// Adds or replaces projects in both nx.json and workspace.json.
    pub fn register(&self, projects: &[ProjectRegistration]) -> EmptyResult {
        let mut nx = self.read_nx_json()?;
        let mut workspace = self.read_workspace_json()?;

        {
            let nx_projects = Self::object_field(&mut nx, "projects", NX_JSON)?;
            for project in projects {
                let mut entry = Map::new();
                entry.insert("tags".into(), json!(project.tags));
                if !project.implicit_dependencies.is_empty() {
                    entry.insert(
                        "implicitDependencies".into(),
                        json!(project.implicit_dependencies),
                    );
                }
                nx_projects.insert(project.name.clone(), Value::Object(entry));
            }
        }

        {
            let ws_projects = Self::object_field(&mut workspace, "projects", WORKSPACE_JSON)?;
            for project in projects {
                ws_projects.insert(project.name.clone(), project.definition.clone());
            }
        }

        Self::write_json(&self.root.join(NX_JSON), &nx)?;
        Self::write_json(&self.root.join(WORKSPACE_JSON), &workspace)?;

        for project in projects {
            info!("Registered project {}", project.name);
        }
        Ok(())
    }

    fn object_field<'a>(
        value: &'a mut Value,
        field: &str,
        file: &str,
    ) -> ResultWithError<&'a mut Map<String, Value>> {
        let object = value
            .as_object_mut()
            .auto_err(format!("{file} must contain a JSON object"))?;
        object
            .entry(field)
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .auto_err(format!("'{field}' in {file} must be an object"))
    }

    fn read_json(path: &Path) -> ResultWithError<Value> {
        let content =
            fs::read_to_string(path).auto_err(format!("Could not read {}", path.display()))?;
        serde_json::from_str(&content).auto_err(format!("Invalid JSON in {}", path.display()))
    }

    fn write_json(path: &Path, value: &Value) -> EmptyResult {
        let mut content = serde_json::to_string_pretty(value)?;
        content.push('\n');
        fs::write(path, content).auto_err(format!("Could not write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(name: &str, tags: &[&str]) -> ProjectRegistration {
        ProjectRegistration {
            name: name.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            implicit_dependencies: Vec::new(),
            definition: json!({ "root": format!("apps/{name}"), "projectType": "application" }),
        }
    }

    #[test]
    fn ensure_seeds_missing_files_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{\"name\": \"mine\"}").unwrap();

        let ws = Workspace::ensure(dir.path(), "proj").unwrap();
        let nx = ws.read_nx_json().unwrap();
        assert_eq!(nx["npmScope"], "proj");
        assert!(dir.path().join("tsconfig.base.json").exists());
        assert!(dir.path().join(JEST_PRESET).exists());

        let package = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert_eq!(package, "{\"name\": \"mine\"}");

        assert!(Workspace::open(dir.path()).is_ok());
    }

    #[test]
    fn open_rejects_plain_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Workspace::open(dir.path()).is_err());
    }

    #[test]
    fn registers_projects_with_tags() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::ensure(dir.path(), "proj").unwrap();

        let mut e2e = registration("demo-e2e", &[]);
        e2e.implicit_dependencies = vec!["demo".into()];
        ws.register(&[registration("demo", &["e2etag", "e2ePackage"]), e2e])
            .unwrap();

        assert_eq!(
            ws.project_tags("demo").unwrap(),
            Some(vec!["e2etag".to_string(), "e2ePackage".to_string()])
        );
        assert_eq!(ws.project_tags("demo-e2e").unwrap(), Some(Vec::new()));
        assert_eq!(ws.project_tags("missing").unwrap(), None);
        assert!(ws.project_exists("demo").unwrap());

        let nx = ws.read_nx_json().unwrap();
        assert_eq!(nx["projects"]["demo-e2e"]["implicitDependencies"], json!(["demo"]));
        let workspace = ws.read_workspace_json().unwrap();
        assert_eq!(workspace["projects"]["demo"]["root"], "apps/demo");
    }

    #[test]
    fn registration_keeps_existing_projects() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::ensure(dir.path(), "proj").unwrap();
        ws.register(&[registration("first", &[])]).unwrap();
        ws.register(&[registration("second", &["x"])]).unwrap();

        assert!(ws.project_exists("first").unwrap());
        assert!(ws.project_exists("second").unwrap());
        let nx = ws.read_nx_json().unwrap();
        let names: Vec<_> = nx["projects"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
