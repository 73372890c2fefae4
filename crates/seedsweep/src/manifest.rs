//! Build manifest written next to the exported decks.

use std::path::{Path, PathBuf};

use seedsweep_core::ParameterSet;
use seedsweep_core::Schema;
use seedsweep_core::batch::BuildResults;
use serde::Serialize;

use crate::config::ConfigError;

/// Build status of one parameter set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Built,
    Failed,
    /// Never started because the batch was cancelled
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub set: ParameterSet<f64>,
    pub status: EntryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What was asked for and what came out of one `build` run
#[derive(Debug, Clone, Serialize)]
pub struct BuildManifest {
    pub generated_at: jiff::Timestamp,
    pub program: String,
    pub schema: Schema,
    pub builds: Vec<ManifestEntry>,
}

impl BuildManifest {
    pub fn new(program: &str, schema: &Schema, results: &BuildResults) -> Self {
        let builds = results
            .sets
            .iter()
            .map(|set| match results.get(set.indices()) {
                Some(Ok(artifact)) => ManifestEntry {
                    set: set.clone(),
                    status: EntryStatus::Built,
                    export: Some(artifact.export_path.clone()),
                    error: None,
                },
                Some(Err(err)) => ManifestEntry {
                    set: set.clone(),
                    status: EntryStatus::Failed,
                    export: None,
                    error: Some(err.to_string()),
                },
                None => ManifestEntry {
                    set: set.clone(),
                    status: EntryStatus::Skipped,
                    export: None,
                    error: None,
                },
            })
            .collect();

        Self {
            generated_at: jiff::Timestamp::now(),
            program: program.to_string(),
            schema: schema.clone(),
            builds,
        }
    }

    pub fn count(&self, status: EntryStatus) -> usize {
        self.builds.iter().filter(|b| b.status == status).count()
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_saphyr::to_string(self)
            .map_err(|e| ConfigError::Serialize(format!("Failed to serialize manifest: {}", e)))
    }

    /// Write the manifest, replacing any previous one
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let yaml = self.to_yaml()?;
        seedsweep_core::io::atomic_write(path, &yaml)
            .map_err(|e| ConfigError::Io(format!("Failed to write manifest: {}", e)))
    }
}
