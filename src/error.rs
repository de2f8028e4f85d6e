use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or acting on a folder tree.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("IO error at path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to launch '{program}': {source}")]
    Reveal {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, TreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_path() {
        let err = TreeError::NotADirectory(PathBuf::from("/tmp/file.txt"));
        assert_eq!(err.to_string(), "Not a directory: /tmp/file.txt");
    }

    #[test]
    fn config_error_converts() {
        let config_err = ConfigError::Read {
            path: PathBuf::from("missing.toml"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let err: TreeError = config_err.into();
        assert!(matches!(err, TreeError::Config(_)));
        assert!(err.to_string().contains("missing.toml"));
    }
}
