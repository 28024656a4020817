//! Error types for content access

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a content source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid front-matter in {path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    #[error("invalid catalog file {path:?}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no content with id {0}")]
    NotFound(String),
}

/// Problems with a post's front-matter block
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("unterminated JSON front-matter")]
    Unterminated,

    #[error("failed to parse JSON front-matter: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown status: {0}")]
    UnknownStatus(String),
}

impl SourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SourceError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn front_matter(path: impl Into<PathBuf>, source: FrontMatterError) -> Self {
        SourceError::FrontMatter {
            path: path.into(),
            source,
        }
    }
}

pub type SourceResult<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_front_matter_error_keeps_source() {
        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = SourceError::front_matter("posts/a.md", FrontMatterError::from(json));
        assert!(err.to_string().starts_with("invalid front-matter in \"posts/a.md\""));
        let source = err.source().unwrap();
        assert!(source.to_string().starts_with("failed to parse JSON front-matter"));
        assert!(source.source().is_some());
    }
}
