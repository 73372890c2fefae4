use std::fmt;
use std::path::PathBuf;

/// Errors raised while turning a textual argument into a seed value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    /// The argument is not a float at all
    InvalidFormat(String),
    /// The argument parsed but lies below zero
    OutOfDomain(String),
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentError::InvalidFormat(arg) => write!(f, "invalid float value: '{arg}'"),
            ArgumentError::OutOfDomain(arg) => write!(f, "invalid positive float: '{arg}'"),
        }
    }
}

impl std::error::Error for ArgumentError {}

/// Errors related to the shape of a parameter schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The schema declares no parameters
    EmptySchema,
    /// A parameter name is the empty string
    EmptyName,
    /// A parameter name is declared twice
    DuplicateParameter(String),
    /// A parameter has no candidate values
    EmptyDomain(String),
    /// A parameter lists the same candidate value more than once
    DuplicateValue(String),
    /// A parameter required downstream is not declared
    MissingParameter(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::EmptySchema => write!(f, "schema declares no parameters"),
            SchemaError::EmptyName => write!(f, "parameter name must not be empty"),
            SchemaError::DuplicateParameter(name) => {
                write!(f, "parameter '{name}' is declared more than once")
            }
            SchemaError::EmptyDomain(name) => {
                write!(f, "parameter '{name}' has no candidate values")
            }
            SchemaError::DuplicateValue(name) => {
                write!(f, "parameter '{name}' repeats a candidate value")
            }
            SchemaError::MissingParameter(name) => {
                write!(f, "schema does not declare parameter '{name}'")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// Failures reported by the external meshing tool.
///
/// These are opaque: the core never tries to interpret the tool's output,
/// it only carries it back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalToolError {
    /// The tool could not be started
    Spawn { program: String, message: String },
    /// The tool ran and exited unsuccessfully
    Failed {
        program: String,
        /// Exit code, `None` when terminated by a signal
        status: Option<i32>,
        /// Everything the tool wrote to stderr, unmodified
        stderr: String,
    },
    /// The tool reported success but the export file is not there
    MissingArtifact(PathBuf),
    /// Writing the journal or reading back the result failed
    Io(String),
}

impl fmt::Display for ExternalToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalToolError::Spawn { program, message } => {
                write!(f, "failed to start '{program}': {message}")
            }
            ExternalToolError::Failed {
                program,
                status,
                stderr,
            } => {
                match status {
                    Some(code) => write!(f, "'{program}' exited with status {code}")?,
                    None => write!(f, "'{program}' was terminated by a signal")?,
                }
                let stderr = stderr.trim_end();
                if !stderr.is_empty() {
                    write!(f, ": {stderr}")?;
                }
                Ok(())
            }
            ExternalToolError::MissingArtifact(path) => {
                write!(f, "expected export {} was not written", path.display())
            }
            ExternalToolError::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ExternalToolError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_display_trims_trailing_newlines_only() {
        let err = ExternalToolError::Failed {
            program: "cubit".to_string(),
            status: Some(1),
            stderr: "  bad surface\n\n".to_string(),
        };
        assert_eq!(err.to_string(), "'cubit' exited with status 1:   bad surface");

        let quiet = ExternalToolError::Failed {
            program: "cubit".to_string(),
            status: None,
            stderr: "\n".to_string(),
        };
        assert_eq!(quiet.to_string(), "'cubit' was terminated by a signal");
    }
}

impl From<std::io::Error> for ExternalToolError {
    fn from(err: std::io::Error) -> Self {
        ExternalToolError::Io(err.to_string())
    }
}

/// Errors raised when reading or writing the schema interchange format
#[derive(Debug)]
pub enum InterchangeError {
    Json(serde_json::Error),
    YamlParse(serde_saphyr::Error),
    YamlSerialize(serde_saphyr::ser::Error),
    Schema(SchemaError),
}

impl fmt::Display for InterchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterchangeError::Json(e) => write!(f, "JSON error: {e}"),
            InterchangeError::YamlParse(e) => write!(f, "YAML parse error: {e}"),
            InterchangeError::YamlSerialize(e) => write!(f, "YAML serialization error: {e}"),
            InterchangeError::Schema(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for InterchangeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InterchangeError::Json(e) => Some(e),
            InterchangeError::YamlParse(e) => Some(e),
            InterchangeError::YamlSerialize(e) => Some(e),
            InterchangeError::Schema(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for InterchangeError {
    fn from(err: serde_json::Error) -> Self {
        InterchangeError::Json(err)
    }
}

impl From<serde_saphyr::Error> for InterchangeError {
    fn from(err: serde_saphyr::Error) -> Self {
        InterchangeError::YamlParse(err)
    }
}

impl From<serde_saphyr::ser::Error> for InterchangeError {
    fn from(err: serde_saphyr::ser::Error) -> Self {
        InterchangeError::YamlSerialize(err)
    }
}

impl From<SchemaError> for InterchangeError {
    fn from(err: SchemaError) -> Self {
        InterchangeError::Schema(err)
    }
}

/// Errors raised while turning a schema into build requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    Schema(SchemaError),
    /// A seed candidate is outside the validated domain
    Argument(ArgumentError),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::Schema(e) => write!(f, "{e}"),
            PlanError::Argument(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PlanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlanError::Schema(e) => Some(e),
            PlanError::Argument(e) => Some(e),
        }
    }
}

impl From<SchemaError> for PlanError {
    fn from(err: SchemaError) -> Self {
        PlanError::Schema(err)
    }
}

impl From<ArgumentError> for PlanError {
    fn from(err: ArgumentError) -> Self {
        PlanError::Argument(err)
    }
}
