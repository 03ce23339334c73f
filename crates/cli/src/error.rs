//! `field-studio` failures and the exit code each one ends the process with.
//!
//! | code | meaning |
//! |------|---------|
//! | 0    | frame written / list printed |
//! | 2    | rejected by clap before `run` |
//! | 10   | scene could not be built (name, size, source list) |
//! | 11   | frame file could not be written |
//! | 12   | bad `--params` JSON or `--log-level` |
//! | 13   | JSON output could not be produced |

use field_studio_core::FieldError;
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    Scene(FieldError),
    Io(String),
    Input(String),
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Scene(_) => 10,
            Self::Io(_) => 11,
            Self::Input(_) => 12,
            Self::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scene(e) => write!(f, "{e}"),
            Self::Io(msg) => write!(f, "write failed: {msg}"),
            Self::Input(msg) | Self::Serialization(msg) => f.write_str(msg),
        }
    }
}

/// Frame-file failures surface as `Io`; everything else is a scene error.
impl From<FieldError> for CliError {
    fn from(e: FieldError) -> Self {
        match e {
            FieldError::Io(msg) => Self::Io(msg),
            other => Self::Scene(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
