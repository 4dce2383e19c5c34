//! Read-only lookup tables for display names.
//!
//! Loaded once at startup from `reference_data.json` (override with
//! `SNAPSHOT_REFERENCE_PATH`) and shared between calls behind an `Arc`.

use std::{
    collections::HashMap,
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;
use thiserror::Error;

pub const BUILTIN_REFERENCE_DATA: &str = include_str!("data/reference_data.json");

#[derive(Debug, Error)]
pub enum ReferenceDataError {
    #[error("failed to read reference data {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse reference data: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReferenceFile {
    npc_names: Vec<NpcNameEntry>,
    super_uniques: Vec<SuperUniqueEntry>,
}

#[derive(Debug, Deserialize)]
struct NpcNameEntry {
    class_id: u32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct SuperUniqueEntry {
    name: String,
    stats_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    npc_names: HashMap<u32, String>,
    /// Keyed by internal monster-stats name.
    super_uniques: HashMap<String, String>,
}

impl ReferenceData {
    /// Later entries replace earlier ones with the same key.
    pub fn from_parts<N, S>(npc_names: N, super_uniques: S) -> Self
    where
        N: IntoIterator<Item = (u32, String)>,
        S: IntoIterator<Item = (String, String)>,
    {
        Self {
            npc_names: npc_names.into_iter().collect(),
            super_uniques: super_uniques
                .into_iter()
                .map(|(name, stats_name)| (stats_name, name))
                .collect(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ReferenceDataError> {
        let file: ReferenceFile = serde_json::from_str(json)?;
        Ok(Self::from_parts(
            file.npc_names
                .into_iter()
                .map(|entry| (entry.class_id, entry.name)),
            file.super_uniques
                .into_iter()
                .map(|entry| (entry.name, entry.stats_name)),
        ))
    }

    pub fn from_file(path: &Path) -> Result<Self, ReferenceDataError> {
        let contents = fs::read_to_string(path).map_err(|source| ReferenceDataError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn builtin() -> Arc<Self> {
        Arc::new(Self::from_json_str(BUILTIN_REFERENCE_DATA).unwrap_or_default())
    }

    pub fn npc_name(&self, class_id: u32) -> Option<&str> {
        self.npc_names.get(&class_id).map(String::as_str)
    }

    pub fn super_unique_name(&self, stats_name: &str) -> Option<&str> {
        self.super_uniques.get(stats_name).map(String::as_str)
    }
}

pub fn load_reference_data_from_env() -> Arc<ReferenceData> {
    let Some(path) = env::var("SNAPSHOT_REFERENCE_PATH").ok().map(PathBuf::from) else {
        tracing::info!(
            target: "snapshot_service::config",
            "reference_data.loaded=builtin"
        );
        return ReferenceData::builtin();
    };

    match ReferenceData::from_file(&path) {
        Ok(reference) => {
            tracing::info!(
                target: "snapshot_service::config",
                path = %path.display(),
                npc_names = reference.npc_names.len(),
                super_uniques = reference.super_uniques.len(),
                "reference_data.loaded=file"
            );
            Arc::new(reference)
        }
        Err(err) => {
            tracing::warn!(
                target: "snapshot_service::config",
                path = %path.display(),
                error = %err,
                "reference_data.load_failed"
            );
            ReferenceData::builtin()
        }
    }
}
