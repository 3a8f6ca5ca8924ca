//! Error types for facet loading.

use std::path::PathBuf;

use crate::host::Message;
use crate::identity::Facet;

/// Error raised while loading one facet of a component.
#[derive(Debug, thiserror::Error)]
pub enum CadreError {
    /// The physical `.vue` file does not exist.
    #[error("Vue file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    /// Reading the physical file failed for a reason other than absence.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The descriptor parser reported at least one error.
    #[error("Vue SFC parse errors: {0}")]
    Parse(String),

    /// The template, script or style compiler reported at least one error.
    #[error("{}", compile_message(*facet, *block, message))]
    Compile {
        facet: Facet,
        /// 1-based style block index, for style failures.
        block: Option<usize>,
        message: String,
    },

    /// Anything else, e.g. a panic inside the compiler.
    #[error("{0}")]
    Unknown(String),
}

fn compile_message(facet: Facet, block: Option<usize>, message: &str) -> String {
    let kind = match facet {
        Facet::Template => "Template",
        Facet::Script | Facet::WholeFile => "Script",
        Facet::Style => "Style",
    };
    match block {
        Some(index) => format!("{kind} compilation errors (block {index}): {message}"),
        None => format!("{kind} compilation errors: {message}"),
    }
}

impl CadreError {
    /// Build an I/O error, promoting `NotFound` to [`CadreError::MissingFile`].
    pub fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::MissingFile { path }
        } else {
            Self::Io { path, source }
        }
    }

    /// Convert into the diagnostic handed back to the host.
    pub fn to_message(&self) -> Message {
        Message {
            text: self.to_string(),
            location: None,
        }
    }
}

/// Result type for facet loading.
pub type CadreResult<T> = Result<T, CadreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_becomes_missing_file() {
        let err = CadreError::from_io(
            PathBuf::from("/p/A.vue"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, CadreError::MissingFile { .. }));
        assert_eq!(err.to_string(), "Vue file not found: /p/A.vue");
    }

    #[test]
    fn test_other_io_error_keeps_source() {
        let err = CadreError::from_io(
            PathBuf::from("/p/A.vue"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "Failed to read /p/A.vue: denied");
    }

    #[test]
    fn test_compile_messages() {
        let template = CadreError::Compile {
            facet: Facet::Template,
            block: None,
            message: "Unexpected EOF".into(),
        };
        assert_eq!(
            template.to_string(),
            "Template compilation errors: Unexpected EOF"
        );

        let style = CadreError::Compile {
            facet: Facet::Style,
            block: Some(2),
            message: "Unclosed block".into(),
        };
        let message = style.to_message();
        assert_eq!(
            message.text,
            "Style compilation errors (block 2): Unclosed block"
        );
        assert!(message.location.is_none());
    }
}
