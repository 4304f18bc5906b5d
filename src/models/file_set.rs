use std::{collections::BTreeMap, fs, path::Path};

use tracing::debug;

use crate::utils::errors::{EmptyResult, ResultTrait as _};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    Binary(Vec<u8>),
}

impl FileContent {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FileContent::Text(text) => text.as_bytes(),
            FileContent::Binary(bytes) => bytes,
        }
    }
}

/// Files produced by a generator run, keyed by workspace-relative path.
///
/// Ordered so that listing and writing are deterministic.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileSet {
    files: BTreeMap<String, FileContent>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_text(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files
            .insert(path.into(), FileContent::Text(content.into()));
    }

    pub fn add_binary(&mut self, path: impl Into<String>, content: Vec<u8>) {
        self.files.insert(path.into(), FileContent::Binary(content));
    }

    pub fn add_json(&mut self, path: impl Into<String>, value: &serde_json::Value) -> EmptyResult {
        let path = path.into();
        let mut content =
            serde_json::to_string_pretty(value).auto_err(format!("Failed to render {path}"))?;
        content.push('\n');
        self.add_text(path, content);
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&FileContent> {
        self.files.get(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Writes every file below `root`, creating parent directories.
    pub fn write_to(&self, root: &Path) -> EmptyResult {
        for (path, content) in &self.files {
            let target = root.join(path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .auto_err(format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&target, content.as_bytes())
                .auto_err(format!("Failed to write {}", target.display()))?;
            debug!("Wrote {}", path);
        }
        Ok(())
    }
}

#[cfg(test)]
impl FileSet {
    pub fn text(&self, path: &str) -> Option<&str> {
        match self.get(path)? {
            FileContent::Text(text) => Some(text),
            FileContent::Binary(_) => None,
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Test sources like `src/app/app.spec.tsx`, leaving out `tsconfig.spec.json`.
    pub fn spec_sources(&self) -> impl Iterator<Item = &str> {
        self.paths().filter(|path| {
            path.contains("/src/")
                && [".spec.tsx", ".spec.ts", ".spec.js"]
                    .iter()
                    .any(|ext| path.ends_with(ext))
        })
    }
}
