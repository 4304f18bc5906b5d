use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::utils::errors::{OptionResultTrait as _, ResultTrait, ResultWithError};

pub enum YamlType {
    Scenario,
}

impl YamlType {
    fn suffixes(&self) -> &'static [&'static str] {
        match self {
            YamlType::Scenario => &[".scenario.yaml", ".scenario.yml"],
        }
    }
}

#[derive(Debug)]
pub struct YamlResult<T> {
    pub file_name: String,
    pub content: T,
}

pub struct DirUtils;

impl DirUtils {
    pub fn curr_dir() -> ResultWithError<PathBuf> {
        std::env::current_dir().auto_err("Could not read current directory")
    }

    pub fn config_dir() -> ResultWithError<PathBuf> {
        let dir = dirs::config_dir().auto_err("Could not determine config directory")?;
        Ok(dir.join("appforge"))
    }

    /// Resolves `path` against the current directory unless it is absolute.
    pub fn resolve(path: &Path) -> ResultWithError<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(Self::curr_dir()?.join(path))
        }
    }

    /// Parses every YAML file of `yaml_type` below `root`, sorted by path.
    ///
    /// A missing `root` yields an empty list.
    pub fn parse_all<T>(root: &Path, yaml_type: YamlType) -> ResultWithError<Vec<YamlResult<T>>>
    where
        T: DeserializeOwned,
    {
        if !root.exists() {
            debug!("{:?} does not exist, no YAML files loaded", root);
            return Ok(Vec::new());
        }

        debug!("Searching for YAML files in {:?}", root);
        let mut paths = Self::find_files(root, yaml_type.suffixes())?;
        paths.sort();

        let mut results = Vec::with_capacity(paths.len());
        for path in paths {
            let Some(file_name) = path.file_name() else {
                continue;
            };
            let file_name = file_name.to_string_lossy().to_string();
            let Some(stem) = yaml_type
                .suffixes()
                .iter()
                .find_map(|suffix| file_name.strip_suffix(suffix))
            else {
                continue;
            };

            let content = fs::read_to_string(&path)
                .auto_err(format!("Failed to read file: {:?}", path))?;
            let parsed: T = serde_yaml::from_str(&content)
                .auto_err(format!("Failed to parse YAML: {:?}", path))?;

            results.push(YamlResult {
                file_name: stem.to_string(),
                content: parsed,
            });
        }

        Ok(results)
    }

    fn find_files(root: &Path, suffixes: &[&str]) -> ResultWithError<Vec<PathBuf>> {
        let mut found = Vec::new();

        // Use an explicit stack to traverse directories recursively
        let mut dirs = vec![root.to_path_buf()];

        while let Some(dir) = dirs.pop() {
            for entry in fs::read_dir(&dir).auto_err("Could not read directory")? {
                let entry = entry.auto_err("Could not read directory entry")?;
                let path = entry.path();

                if path.is_dir() {
                    dirs.push(path);
                    continue;
                }

                let matches = path
                    .file_name()
                    .map(|name| name.to_string_lossy())
                    .is_some_and(|name| suffixes.iter().any(|suffix| name.ends_with(suffix)));
                if matches {
                    found.push(path);
                }
            }
        }

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn parses_matching_yaml_recursively_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("b.scenario.yaml"), "name: second").unwrap();
        fs::write(nested.join("c.scenario.yml"), "name: third").unwrap();
        fs::write(dir.path().join("a.scenario.yaml"), "name: first").unwrap();
        fs::write(dir.path().join("ignored.yaml"), "name: nope").unwrap();

        let found = DirUtils::parse_all::<Named>(dir.path(), YamlType::Scenario).unwrap();
        let names: Vec<_> = found.iter().map(|r| r.content.name.as_str()).collect();
        let stems: Vec<_> = found.iter().map(|r| r.file_name.as_str()).collect();

        assert_eq!(names, vec!["first", "second", "third"]);
        assert_eq!(stems, vec!["a", "b", "c"]);
    }

    #[test]
    fn missing_directory_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let found =
            DirUtils::parse_all::<Named>(&dir.path().join("absent"), YamlType::Scenario).unwrap();
        assert!(found.is_empty());
    }
}
