//! Capability interface over the external meshing tool.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::error::ExternalToolError;
use crate::io::atomic_write;
use crate::validate::Seed;

/// Everything the external tool needs to produce one artifact
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRequest {
    /// Identifier of the parameter set, used for the journal file name
    pub label: String,
    pub seed: Seed,
    /// Rendered journal script
    pub journal: String,
    /// Where the tool is told to export the deck
    pub export_path: PathBuf,
}

/// The analysis deck produced for one parameter set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshArtifact {
    pub label: String,
    pub seed: Seed,
    pub export_path: PathBuf,
    /// Journal that produced the deck, when it was written to disk
    pub journal_path: Option<PathBuf>,
}

/// Something that can turn a [`MeshRequest`] into a [`MeshArtifact`].
///
/// Production code uses [`ExternalMeshBuilder`]; tests substitute their own.
pub trait MeshBuilder {
    fn build(&self, request: &MeshRequest) -> Result<MeshArtifact, ExternalToolError>;
}

impl<B: MeshBuilder + ?Sized> MeshBuilder for &B {
    fn build(&self, request: &MeshRequest) -> Result<MeshArtifact, ExternalToolError> {
        (**self).build(request)
    }
}

/// Runs the meshing tool as a child process, one invocation per request.
///
/// The journal is written to `journal_dir/<label>.jou` and passed as the last
/// argument: `program <args...> <journal>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalMeshBuilder {
    pub program: String,
    pub args: Vec<String>,
    pub journal_dir: PathBuf,
}

impl ExternalMeshBuilder {
    pub fn new(program: impl Into<String>, journal_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            journal_dir: journal_dir.into(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Path the journal for `label` is written to
    pub fn journal_path(&self, label: &str) -> PathBuf {
        self.journal_dir.join(format!("{label}.jou"))
    }

    fn write_journal(&self, request: &MeshRequest) -> Result<PathBuf, ExternalToolError> {
        std::fs::create_dir_all(&self.journal_dir).map_err(|e| {
            ExternalToolError::Io(format!(
                "create journal directory {} failed: {e}",
                self.journal_dir.display()
            ))
        })?;
        let path = self.journal_path(&request.label);
        atomic_write(&path, &request.journal).map_err(|e| {
            ExternalToolError::Io(format!("write journal {} failed: {e}", path.display()))
        })?;
        Ok(path)
    }

    /// Remove a deck left by an earlier run, so only this run's export counts
    fn clear_export(&self, export_path: &Path) -> Result<(), ExternalToolError> {
        match std::fs::remove_file(export_path) {
            Ok(()) => {
                tracing::debug!("Removed previous export {}", export_path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ExternalToolError::Io(format!(
                "remove previous export {} failed: {e}",
                export_path.display()
            ))),
        }
    }

    fn command(&self, journal_path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(journal_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl MeshBuilder for ExternalMeshBuilder {
    fn build(&self, request: &MeshRequest) -> Result<MeshArtifact, ExternalToolError> {
        let journal_path = self.write_journal(request)?;
        self.clear_export(&request.export_path)?;

        tracing::debug!(
            label = %request.label,
            seed = %request.seed,
            journal = %journal_path.display(),
            "Running {}",
            self.program
        );

        let output = self
            .command(&journal_path)
            .output()
            .map_err(|e| ExternalToolError::Spawn {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ExternalToolError::Failed {
                program: self.program.clone(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        if !request.export_path.exists() {
            return Err(ExternalToolError::MissingArtifact(
                request.export_path.clone(),
            ));
        }

        Ok(MeshArtifact {
            label: request.label.clone(),
            seed: request.seed,
            export_path: request.export_path.clone(),
            journal_path: Some(journal_path),
        })
    }
}
