use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single `scan` invocation.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("Package not found on the class path: {0}")]
    PackageNotFound(String),
    #[error("I/O error while walking the class directory: {0}")]
    Io(#[from] walkdir::Error),
    /// A name that enumeration produced (or the condition type) did not load.
    /// The enumerator and the loader are expected to observe the same class path,
    /// so this is never a recoverable condition.
    #[error("Unexpected error: class {name} could not be loaded")]
    InvariantViolation {
        name: String,
        #[source]
        source: LoadError,
    },
}

/// The root package resolved to a location the scanner cannot enumerate.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Unsupported resource protocol: {0}. The file and jar protocols are supported.")]
    UnsupportedProtocol(String),
    #[error("Malformed resource location {location}: {reason}")]
    MalformedLocation { location: String, reason: String },
}

/// Failure to resolve a binary class name to a linked class.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Class not found: {0}")]
    NotFound(String),
    #[error("Class {class} depends on missing class {dependency}")]
    MissingDependency { class: String, dependency: String },
    #[error("Circular class hierarchy involving {0}")]
    Circularity(String),
    #[error("Malformed class file for {name}: {reason}")]
    Malformed { name: String, reason: String },
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Archive error reading {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

pub type Result<T> = std::result::Result<T, ScanError>;
pub type LoadResult<T> = std::result::Result<T, LoadError>;
