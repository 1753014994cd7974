// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Random document selection.
//
// Lists one directory (not recursive), keeps regular files whose extension is
// on the allow-list, and picks one uniformly at random.

use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use printsweep_core::error::{PrintsweepError, Result};

/// Picks documents from a directory by extension.
#[derive(Debug, Clone)]
pub struct DocumentSelector {
    dir: PathBuf,
    extensions: Vec<String>,
}

impl DocumentSelector {
    /// `extensions` are matched case-insensitively, with or without a dot.
    pub fn new(dir: impl Into<PathBuf>, extensions: &[String]) -> Self {
        Self {
            dir: dir.into(),
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All eligible documents, sorted by path.
    pub fn candidates(&self) -> Result<Vec<PathBuf>> {
        let entries =
            std::fs::read_dir(&self.dir).map_err(|source| PrintsweepError::DirectoryUnreadable {
                dir: self.dir.clone(),
                source,
            })?;

        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PrintsweepError::DirectoryUnreadable {
                dir: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && self.is_eligible(&path) {
                found.push(path);
            }
        }
        found.sort();
        Ok(found)
    }

    /// Pick one eligible document using the thread-local RNG.
    pub fn select(&self) -> Result<PathBuf> {
        self.select_with(&mut rand::thread_rng())
    }

    /// Pick one eligible document using `rng`.
    pub fn select_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<PathBuf> {
        let candidates = self.candidates()?;
        let chosen = candidates
            .choose(rng)
            .cloned()
            .ok_or_else(|| PrintsweepError::NoDocumentAvailable {
                dir: self.dir.clone(),
            })?;
        debug!(
            document = %chosen.display(),
            candidates = candidates.len(),
            "document selected"
        );
        Ok(chosen)
    }

    fn is_eligible(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }
}

/// Pick a random PDF from `dir`.
pub fn select_random_document(dir: impl Into<PathBuf>) -> Result<PathBuf> {
    DocumentSelector::new(dir, &["pdf".to_string()]).select()
}
