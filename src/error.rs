//! Error enum
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Csv(csv::Error),
    Yaml(serde_yaml::Error),
    Walk(walkdir::Error),
    /// A record (treebank block, probe line, model config) that can't be used.
    MalformedRecord(String),
    /// A tag specification entry that isn't a `language,feature_pos` pair.
    InvalidTagSpec(String),
    /// A dataset directory that doesn't follow the `feature_pos/language` layout.
    InvalidLayout(PathBuf),
    Custom(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::Csv(e) => write!(f, "tsv error: {}", e),
            Error::Yaml(e) => write!(f, "yaml error: {}", e),
            Error::Walk(e) => write!(f, "directory walk error: {}", e),
            Error::MalformedRecord(m) => write!(f, "malformed record: {}", m),
            Error::InvalidTagSpec(s) => write!(f, "invalid tag specification entry: {:?}", s),
            Error::InvalidLayout(p) => write!(f, "unexpected dataset layout: {:?}", p),
            Error::Custom(s) => write!(f, "{}", s),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Error {
        Error::Csv(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Error {
        Error::Yaml(e)
    }
}

impl From<walkdir::Error> for Error {
    fn from(e: walkdir::Error) -> Error {
        Error::Walk(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}
