use std::fmt;
use std::io;
use std::result;

/// Unifies the errors surfaced by the optimizer and its configuration layer.
///
/// Anything that goes wrong is reported before or at the point it happens;
/// the search loop itself never retries and never continues past a failed
/// phase.
#[derive(Debug)]
pub enum Error {
    /// A configuration field failed validation before initialization.
    Config(String),
    /// A configuration file could not be read.
    Io(io::Error),
    /// A configuration document could not be parsed.
    Parse(serde_yaml::Error),
    /// Two tensors that must share a shape disagree on (M, K, N).
    ShapeMismatch {
        /// Dimensions the operation required.
        expected: (usize, usize, usize),
        /// Dimensions actually supplied.
        found: (usize, usize, usize),
    },
    /// One of the scoped evaluation threads panicked.
    WorkerPanic,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "invalid configuration: {}", msg),
            Error::Io(err) => write!(f, "failed to read configuration: {}", err),
            Error::Parse(err) => write!(f, "failed to parse configuration: {}", err),
            Error::ShapeMismatch { expected, found } => write!(
                f,
                "tensor shape mismatch: expected (M, K, N) = {:?}, found {:?}",
                expected, found
            ),
            Error::WorkerPanic => write!(f, "one of the colony's evaluation workers panicked"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Error {
        Error::Parse(err)
    }
}

/// Crate-wide result alias.
pub type Result<T> = result::Result<T, Error>;
