//! Discovers the class names stored under a root package.
//!
//! Two storage layouts are supported: a directory tree reached through a `file:`
//! URL and a jar archive reached through a `jar:` URL. Both are exposed as the same
//! lazy [`DiscoveredUnits`] iterator so callers can stop pulling names at any point.

use crate::classfile::CLASS_FILE_SUFFIX;
use crate::error::{ConfigurationError, Result, ScanError};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use url::Url;
use walkdir::WalkDir;
use zip::ZipArchive;
use zip::result::ZipError;

pub const PROTOCOL_FILE: &str = "file";
pub const PROTOCOL_JAR: &str = "jar";

/// Separator between the archive URL and the entry path inside a `jar:` URL.
const JAR_SEPARATOR: &str = "!/";

/// A validated root package: its dotted name and slash-separated path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootPackage {
    name: String,
    path: String,
}

impl RootPackage {
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(ScanError::InvalidArgument(
                "root package must not be empty".to_string(),
            ));
        }
        let valid = name
            .split('.')
            .all(|segment| !segment.is_empty() && !segment.contains(['/', '\\']));
        if !valid {
            return Err(ScanError::InvalidArgument(format!(
                "malformed root package: {name}"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            path: name.replace('.', "/"),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slash-separated form used for resource lookup and archive entry matching.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn depth(&self) -> usize {
        self.name.split('.').count()
    }
}

/// The single physical container a root package resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootLocation {
    /// Loose class files. `base` is the class-path root, `package_dir` the
    /// directory of the root package below it.
    Directory { base: PathBuf, package_dir: PathBuf },
    Archive { archive: PathBuf },
}

impl RootLocation {
    pub fn from_url(url: &Url, root: &RootPackage) -> std::result::Result<Self, ConfigurationError> {
        let malformed = |reason: &str| ConfigurationError::MalformedLocation {
            location: url.to_string(),
            reason: reason.to_string(),
        };

        match url.scheme() {
            PROTOCOL_FILE => {
                let package_dir = url
                    .to_file_path()
                    .map_err(|_| malformed("not a local file path"))?;
                let base = package_dir
                    .ancestors()
                    .nth(root.depth())
                    .ok_or_else(|| malformed("shallower than the root package"))?
                    .to_path_buf();
                Ok(Self::Directory { base, package_dir })
            }
            PROTOCOL_JAR => {
                let (archive_url, _) = url
                    .path()
                    .split_once(JAR_SEPARATOR)
                    .ok_or_else(|| malformed("missing !/ separator"))?;
                let archive = Url::parse(archive_url)
                    .ok()
                    .filter(|inner| inner.scheme() == PROTOCOL_FILE)
                    .and_then(|inner| inner.to_file_path().ok())
                    .ok_or_else(|| malformed("archive is not a local file"))?;
                Ok(Self::Archive { archive })
            }
            other => Err(ConfigurationError::UnsupportedProtocol(other.to_string())),
        }
    }

    /// Lazily enumerates the binary names of the classes under `root`.
    pub fn units(&self, root: &RootPackage) -> DiscoveredUnits {
        match self {
            Self::Directory { base, package_dir } => {
                debug!("Walking class directory {}", package_dir.display());
                DiscoveredUnits::Directory(DirectoryUnits {
                    base: base.clone(),
                    walker: WalkDir::new(package_dir).into_iter(),
                })
            }
            Self::Archive { archive } => {
                debug!("Reading archive {}", archive.display());
                DiscoveredUnits::Archive(ArchiveUnits::open(archive, root))
            }
        }
    }
}

/// Collects at most `limit` names from `location`.
pub fn enumerate(location: &RootLocation, root: &RootPackage, limit: usize) -> Result<Vec<String>> {
    location.units(root).take(limit).collect()
}

/// Names produced by one enumeration. Dropping it releases the underlying
/// directory handles or archive file.
pub enum DiscoveredUnits {
    Directory(DirectoryUnits),
    Archive(ArchiveUnits),
}

impl Iterator for DiscoveredUnits {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Directory(units) => units.next(),
            Self::Archive(units) => units.next().map(Ok),
        }
    }
}

pub struct DirectoryUnits {
    base: PathBuf,
    walker: walkdir::IntoIter,
}

impl Iterator for DirectoryUnits {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(ScanError::Io(e))),
            };
            // Symlinks are not followed during the walk, but a link to a class
            // file still names a class.
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }
            if let Some(name) = directory_unit_name(&self.base, entry.path()) {
                return Some(Ok(name));
            }
        }
    }
}

fn directory_unit_name(base: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(base).ok()?;
    let mut segments = Vec::new();
    for component in relative.components() {
        match component.as_os_str().to_str() {
            Some(segment) => segments.push(segment),
            None => {
                warn!("Skipping non UTF-8 class file {}", file.display());
                return None;
            }
        }
    }
    unit_name(&segments.join("/"))
}

/// Walks the entries of a jar in stored order. Open and read errors end the
/// walk; names already produced stand.
pub struct ArchiveUnits {
    reader: Option<ZipArchive<BufReader<File>>>,
    next_index: usize,
    archive: PathBuf,
    prefix: String,
}

impl ArchiveUnits {
    fn open(archive: &Path, root: &RootPackage) -> Self {
        let reader = File::open(archive)
            .map_err(ZipError::from)
            .and_then(|file| ZipArchive::new(BufReader::new(file)));
        let reader = match reader {
            Ok(reader) => Some(reader),
            Err(e) => {
                warn!("Failed to open archive {}: {}", archive.display(), e);
                None
            }
        };
        Self {
            reader,
            next_index: 0,
            archive: archive.to_path_buf(),
            prefix: format!("{}/", root.path()),
        }
    }
}

impl Iterator for ArchiveUnits {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let reader = self.reader.as_mut()?;
            if self.next_index >= reader.len() {
                self.reader = None;
                return None;
            }
            // Raw access reads the local header only, so data-descriptor
            // entries and unsupported compression methods are fine here.
            let next = reader
                .by_index_raw(self.next_index)
                .map(|entry| entry.name().replace('\\', "/"));
            self.next_index += 1;
            let entry_name = match next {
                Ok(name) => name,
                Err(e) => {
                    warn!("Stopped reading archive {}: {}", self.archive.display(), e);
                    self.reader = None;
                    return None;
                }
            };
            if !entry_name.starts_with(&self.prefix) {
                continue;
            }
            if let Some(name) = unit_name(&entry_name) {
                return Some(name);
            }
        }
    }
}

/// Converts a slash-separated class file path to a binary name. Returns `None`
/// for non-class files and for `package-info` / `module-info`, which are not types.
fn unit_name(relative: &str) -> Option<String> {
    let stem = relative.strip_suffix(CLASS_FILE_SUFFIX)?;
    let simple = stem.rsplit('/').next().unwrap_or(stem);
    if simple.is_empty() || simple.contains('-') {
        return None;
    }
    Some(stem.replace('/', "."))
}
