use std::{fs, path::PathBuf};

use schemars::{JsonSchema, schema_for};
use tracing::info;

use crate::{
    models::{config::Config, options::ApplicationOptions, scenario::Scenario},
    utils::errors::{EmptyResult, ResultTrait as _},
};

/// Writes JSON Schemas for the files users author by hand.
pub struct SchemaGen {
    out_dir: PathBuf,
}

impl SchemaGen {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    pub fn execute(&self) -> EmptyResult {
        self.generate_single::<ApplicationOptions>("application_options.json")?;
        self.generate_single::<Config>("config.json")?;
        self.generate_single::<Scenario>("scenario.json")?;
        Ok(())
    }

    fn generate_single<T>(&self, file_name: &str) -> EmptyResult
    where
        T: JsonSchema,
    {
        let schema = schema_for!(T);
        let schema_str = serde_json::to_string_pretty(&schema)?;

        fs::create_dir_all(&self.out_dir)
            .auto_err(format!("Could not create {}", self.out_dir.display()))?;
        let path = self.out_dir.join(file_name);
        fs::write(&path, schema_str).auto_err(format!("Could not write {}", path.display()))?;
        info!("✅ Schema generated successfully at {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_all_schemas() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("schemas");
        SchemaGen::new(out.clone()).execute().unwrap();

        let options: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("application_options.json")).unwrap())
                .unwrap();
        assert!(options["properties"]["unitTestRunner"].is_object());
        assert!(options["required"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("name")));
        assert!(out.join("config.json").exists());
        assert!(out.join("scenario.json").exists());
    }
}
