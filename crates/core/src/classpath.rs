//! Loader over an ordered class path of directories and jar files.

use crate::classfile::class_file_path;
use crate::error::{LoadError, LoadResult};
use crate::loader::{ClassLoader, HeaderSource, Linker};
use crate::model::{ClassHeader, ClassRef};
use std::ffi::OsStr;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use url::Url;
use zip::ZipArchive;
use zip::result::ZipError;

/// Environment variable holding the default class path.
pub const CLASSPATH_ENV: &str = "CLASSPATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassPathEntry {
    Directory(PathBuf),
    Archive(PathBuf),
}

impl ClassPathEntry {
    /// Classifies an existing path. Returns `None` for paths that do not exist.
    pub fn detect(path: &Path) -> Option<Self> {
        let path = std::path::absolute(path).ok()?;
        if path.is_dir() {
            Some(Self::Directory(path))
        } else if path.is_file() {
            Some(Self::Archive(path))
        } else {
            None
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(path) | Self::Archive(path) => path,
        }
    }

    fn resource(&self, path: &str) -> LoadResult<Option<Url>> {
        match self {
            Self::Directory(dir) => {
                let candidate = dir.join(path);
                if !candidate.exists() {
                    return Ok(None);
                }
                Ok(Url::from_file_path(&candidate).ok())
            }
            Self::Archive(jar) => {
                let archive = open_archive(jar)?;
                let prefix = format!("{}/", path.trim_end_matches('/'));
                let present = archive
                    .file_names()
                    .any(|name| name.replace('\\', "/").starts_with(&prefix));
                if !present {
                    return Ok(None);
                }
                let Ok(jar_url) = Url::from_file_path(jar) else {
                    return Ok(None);
                };
                Ok(Url::parse(&format!("jar:{jar_url}!/{path}")).ok())
            }
        }
    }

    fn read_class(&self, name: &str) -> LoadResult<Option<Vec<u8>>> {
        let relative = class_file_path(name);
        match self {
            Self::Directory(dir) => {
                let file = dir.join(&relative);
                match std::fs::read(&file) {
                    Ok(bytes) => Ok(Some(bytes)),
                    Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                    Err(source) => Err(LoadError::Io { path: file, source }),
                }
            }
            Self::Archive(jar) => {
                let mut archive = open_archive(jar)?;
                let mut entry = match archive.by_name(&relative) {
                    Ok(entry) => entry,
                    Err(ZipError::FileNotFound) => return Ok(None),
                    Err(source) => {
                        return Err(LoadError::Zip {
                            path: jar.clone(),
                            source,
                        });
                    }
                };
                let mut bytes = Vec::new();
                entry
                    .read_to_end(&mut bytes)
                    .map_err(|source| LoadError::Io {
                        path: jar.clone(),
                        source,
                    })?;
                Ok(Some(bytes))
            }
        }
    }
}

fn open_archive(jar: &Path) -> LoadResult<ZipArchive<File>> {
    let file = File::open(jar).map_err(|source| LoadError::Io {
        path: jar.to_path_buf(),
        source,
    })?;
    ZipArchive::new(file).map_err(|source| LoadError::Zip {
        path: jar.to_path_buf(),
        source,
    })
}

/// Resolves classes from class files found on an ordered class path.
pub struct ClassPathLoader {
    entries: Vec<ClassPathEntry>,
    linker: Linker,
}

impl ClassPathLoader {
    /// Builds a loader from paths. Paths that do not exist are skipped.
    pub fn new<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Self {
        let entries = paths
            .into_iter()
            .filter_map(|path| {
                let path = path.as_ref();
                let entry = ClassPathEntry::detect(path);
                if entry.is_none() {
                    warn!("Skipping missing class path entry {}", path.display());
                }
                entry
            })
            .collect();
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<ClassPathEntry>) -> Self {
        Self {
            entries,
            linker: Linker::new(),
        }
    }

    /// Parses a platform path list (`:` separated on Unix, `;` on Windows).
    pub fn parse(class_path: impl AsRef<OsStr>) -> Self {
        Self::new(std::env::split_paths(class_path.as_ref()).filter(|p| !p.as_os_str().is_empty()))
    }

    /// Loader over the `CLASSPATH` environment variable. Empty when unset.
    pub fn from_env() -> Self {
        match std::env::var_os(CLASSPATH_ENV) {
            Some(value) => Self::parse(value),
            None => {
                debug!("{} is not set, using an empty class path", CLASSPATH_ENV);
                Self::from_entries(Vec::new())
            }
        }
    }

    pub fn entries(&self) -> &[ClassPathEntry] {
        &self.entries
    }

    pub fn is_initialized(&self, name: &str) -> bool {
        self.linker.is_initialized(name)
    }
}

impl std::fmt::Debug for ClassPathLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassPathLoader")
            .field("entries", &self.entries)
            .finish()
    }
}

impl HeaderSource for ClassPathLoader {
    fn find_header(&self, name: &str) -> LoadResult<Option<ClassHeader>> {
        for entry in &self.entries {
            if let Some(bytes) = entry.read_class(name)? {
                trace!("Reading {} from {}", name, entry.path().display());
                return ClassHeader::parse(name, bytes).map(Some);
            }
        }
        Ok(None)
    }
}

impl ClassLoader for ClassPathLoader {
    fn resources(&self, path: &str) -> Vec<Url> {
        self.entries
            .iter()
            .filter_map(|entry| match entry.resource(path) {
                Ok(found) => found,
                Err(e) => {
                    warn!("Failed to look up {} in {}: {}", path, entry.path().display(), e);
                    None
                }
            })
            .collect()
    }

    fn load_class(&self, name: &str) -> LoadResult<ClassRef> {
        self.linker.load(self, name)
    }

    fn initialize_class(&self, name: &str) -> LoadResult<ClassRef> {
        self.linker.initialize(self, name, &mut |class| {
            debug!("Initialized {}", class.name());
        })
    }
}
