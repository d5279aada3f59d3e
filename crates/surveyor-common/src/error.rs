use std::error::Error;
use std::fmt;

/// Failure to turn a raw stored chunk record into a readable column.
///
/// Recoverable per-section quirks are not represented here: those are
/// logged at decode time and the best-effort section is kept.
#[derive(Debug)]
pub enum DecodeError {
    /// The record's status marker is below "full" (and not the legacy
    /// empty marker), so the column holds no renderable terrain.
    NotGenerated,
    /// A section failed to parse in a non-recoverable way.
    Corrupt {
        x: i32,
        z: i32,
        message: String,
    },
    Io(std::io::Error),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::NotGenerated => write!(f, "chunk is not fully generated"),
            DecodeError::Corrupt { x, z, message } => {
                write!(f, "corrupt chunk record [{}, {}]: {}", x, z, message)
            }
            DecodeError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DecodeError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DecodeError {
    fn from(err: std::io::Error) -> Self {
        DecodeError::Io(err)
    }
}

/// Caller-facing failures of the tile API. Missing chunk data is not an
/// error (it renders as an empty tile); these are programmer errors.
#[derive(Debug)]
pub enum RenderError {
    UnknownWorld(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::UnknownWorld(id) => write!(f, "unknown world identifier: {}", id),
        }
    }
}

impl Error for RenderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DecodeError::Corrupt {
            x: 3,
            z: -7,
            message: "bad palette".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "corrupt chunk record [3, -7]: bad palette"
        );
        assert_eq!(
            RenderError::UnknownWorld("minecraft:moon".to_string()).to_string(),
            "unknown world identifier: minecraft:moon"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: DecodeError = io_err.into();
        assert!(matches!(err, DecodeError::Io(_)));
        assert!(err.source().is_some());
    }
}
