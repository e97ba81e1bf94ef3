//! Where artifacts come from.

use std::path::{Component, Path, PathBuf};

use crate::models::Artifact;

use super::PipelineError;

/// Lists and fetches the artifacts of one source.
///
/// Listing failure aborts a run; fetch failure only skips that artifact.
pub trait ArtifactSource: Send + Sync {
    /// Keys of every artifact, in a stable order. Folders are never listed.
    fn list(&self) -> Result<Vec<String>, PipelineError>;

    fn fetch(&self, key: &str) -> Result<Artifact, PipelineError>;
}

/// Artifacts stored as files under a local directory.
///
/// Keys are `/`-separated paths relative to the root; an optional prefix
/// narrows the listing the way an object-store prefix would.
#[derive(Debug, Clone)]
pub struct DirectoryArtifactSource {
    root: PathBuf,
    prefix: Option<String>,
}

impl DirectoryArtifactSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            prefix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        let prefix = prefix.trim_start_matches('/');
        self.prefix = (!prefix.is_empty()).then(|| prefix.to_string());
        self
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, PipelineError> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.is_empty() || escapes {
            return Err(PipelineError::Source(format!("Invalid artifact key: {key}")));
        }
        Ok(self.root.join(relative))
    }
}

impl ArtifactSource for DirectoryArtifactSource {
    fn list(&self) -> Result<Vec<String>, PipelineError> {
        if !self.root.is_dir() {
            return Err(PipelineError::Source(format!(
                "Source directory not found: {}",
                self.root.display()
            )));
        }

        let mut keys = Vec::new();
        collect_files(&self.root, "", &mut keys)?;
        if let Some(prefix) = &self.prefix {
            keys.retain(|key| key.starts_with(prefix.as_str()));
        }
        keys.sort();

        tracing::debug!(root = %self.root.display(), artifacts = keys.len(), "Listed source artifacts");
        Ok(keys)
    }

    fn fetch(&self, key: &str) -> Result<Artifact, PipelineError> {
        let path = self.resolve(key)?;
        let content = std::fs::read(&path)?;
        Ok(Artifact::new(key, content))
    }
}

fn collect_files(dir: &Path, relative: &str, keys: &mut Vec<String>) -> Result<(), PipelineError> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let key = if relative.is_empty() {
            name
        } else {
            format!("{relative}/{name}")
        };

        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(&entry.path(), &key, keys)?;
        } else if file_type.is_file() {
            keys.push(key);
        }
    }
    Ok(())
}
