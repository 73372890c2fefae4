//! Sweep settings stored in config.yaml
//!
//! ```yaml
//! mesher:
//!   program: cubit
//!   args: [-batch, -nographics, -nojournal, -input]
//! template:
//!   base_geometry: base.cub
//!   surface: 1
//! output_dir: meshes
//! stem: model
//! ```
//!
//! Every field is optional; missing ones take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use seedsweep_core::batch::BatchConfig;
use seedsweep_core::mesh::{ExternalMeshBuilder, MeshTemplate};
use serde::{Deserialize, Serialize};

/// Error types for configuration file operations
#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Serialize(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// How to invoke the external meshing tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MesherSettings {
    pub program: String,
    /// Arguments placed before the journal path
    pub args: Vec<String>,
}

impl Default for MesherSettings {
    fn default() -> Self {
        Self {
            program: "cubit".to_string(),
            args: ["-batch", "-nographics", "-nojournal", "-input"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSettings {
    pub mesher: MesherSettings,
    pub template: MeshTemplate,
    /// Directory receiving decks, journals and the manifest
    pub output_dir: PathBuf,
    /// Prefix of every exported deck name
    pub stem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            mesher: MesherSettings::default(),
            template: MeshTemplate::default(),
            output_dir: PathBuf::from("meshes"),
            stem: "model".to_string(),
            jobs: None,
        }
    }
}

impl SweepSettings {
    /// Get the config file path inside a data directory
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join("config.yaml")
    }

    /// Load settings from `path`, returning defaults if the file doesn't exist.
    ///
    /// A file that exists but doesn't parse is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read config: {}", e)))?;

        serde_saphyr::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Save settings to `path`, creating its directory if needed
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let yaml = serde_saphyr::to_string(self)
            .map_err(|e| ConfigError::Serialize(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Io(format!("Failed to create config directory: {}", e))
            })?;
        }

        seedsweep_core::io::atomic_write(path, &yaml)
            .map_err(|e| ConfigError::Io(format!("Failed to write config: {}", e)))
    }

    /// Builder that runs the configured tool, writing journals under the output directory
    pub fn mesh_builder(&self) -> ExternalMeshBuilder {
        ExternalMeshBuilder::new(&self.mesher.program, self.journal_dir())
            .args(self.mesher.args.iter().cloned())
    }

    pub fn journal_dir(&self) -> PathBuf {
        self.output_dir.join("journals")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join("manifest.yaml")
    }

    pub fn batch_config(&self) -> BatchConfig {
        match self.jobs {
            Some(jobs) => BatchConfig {
                parallel_jobs: jobs.max(1),
            },
            None => BatchConfig::default(),
        }
    }
}
