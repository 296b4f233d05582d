use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::foundation::error::{ArabsubError, ArabsubResult};
use crate::text::shaper::ParleyShaper;

/// Maps font names to font files and hands out shapers ("font handle by name + size").
#[derive(Debug, Default, Clone)]
pub struct FontRegistry {
    fonts: BTreeMap<String, PathBuf>,
}

impl FontRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.fonts.insert(name.into(), path.into());
    }

    /// Register every `.ttf`/`.otf` file directly inside `dir` under its file stem.
    ///
    /// Returns how many fonts were added. Existing names are kept.
    pub fn scan_dir(&mut self, dir: &Path) -> ArabsubResult<usize> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            ArabsubError::layout(format!("failed to read font dir '{}': {e}", dir.display()))
        })?;
        let mut added = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            let is_font = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"));
            if !is_font {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if self.fonts.contains_key(stem) {
                continue;
            }
            tracing::info!(font = stem, "found font");
            self.fonts.insert(stem.to_owned(), path.clone());
            added += 1;
        }
        Ok(added)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.fonts.keys().map(String::as_str).collect()
    }

    /// Path registered for `name`.
    pub fn path(&self, name: &str) -> Option<&Path> {
        self.fonts.get(name).map(PathBuf::as_path)
    }

    /// Load a shaper for `name` at `size_px`.
    pub fn shaper(&self, name: &str, size_px: f32) -> ArabsubResult<ParleyShaper> {
        let path = self
            .path(name)
            .ok_or_else(|| ArabsubError::layout(format!("font '{name}' is not registered")))?;
        ParleyShaper::from_path(path, size_px)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/fonts.rs"]
mod tests;
