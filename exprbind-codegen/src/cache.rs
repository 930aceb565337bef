//! Fingerprint-keyed cache of generation units.
//!
//! A unit depends only on the configuration and on the candidates of its
//! group, so a hash of both identifies it. When the hash is unchanged since the
//! previous run the cached unit is re-emitted verbatim.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::GeneratorConfig;
use crate::diagnostics::Diagnostic;
use crate::error::CacheError;
use crate::types::{CandidateDeclaration, GenerationUnit};

/// Hex SHA-256 over the configuration and a group's candidates.
pub fn fingerprint(
    config: &GeneratorConfig,
    candidates: &[CandidateDeclaration],
) -> Result<String, CacheError> {
    let mut hasher = Sha256::new();
    serde_json::to_writer(&mut hasher, &(config, candidates))?;
    hasher.update(env!("CARGO_PKG_VERSION").as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// A unit together with the diagnostics produced while generating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedUnit {
    pub unit: GenerationUnit,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCache {
    entries: BTreeMap<String, CachedUnit>,
}

impl UnitCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, fingerprint: &str) -> Option<&CachedUnit> {
        self.entries.get(fingerprint)
    }

    pub fn insert(&mut self, entry: CachedUnit) {
        self.entries.insert(entry.unit.fingerprint.clone(), entry);
    }

    /// Drops every entry whose fingerprint is not in `live`.
    pub fn prune<'a>(&mut self, live: impl IntoIterator<Item = &'a str>) -> usize {
        let live: HashSet<&str> = live.into_iter().collect();
        let before = self.entries.len();
        self.entries.retain(|fingerprint, _| live.contains(fingerprint.as_str()));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads a cache written by [`save`](Self::save); a missing file is an empty cache.
    pub fn load(path: &Path) -> Result<Self, CacheError> {
        match fs::read(path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(CacheError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(self)?;
        fs::write(path, bytes).map_err(|source| CacheError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
