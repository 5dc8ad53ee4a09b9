//! Scans a root package for classes matching a condition type.
//!
//! The scan pipeline:
//! 1. Resolve the root package to a single location through the loader
//! 2. Enumerate class names under it (directory walk or archive entries)
//! 3. Load each name, test it with the matcher, initialize accepted matches
//! 4. Stop as soon as the result holds `max_count` classes

use crate::enumerate::{RootLocation, RootPackage};
use crate::error::{Result, ScanError};
use crate::loader::ClassLoader;
use crate::matcher::{AnnotationMatcher, Matcher, SubtypeMatcher};
use crate::model::ClassRef;
use tracing::{debug, trace, warn};

/// Match limit meaning "no limit".
pub const UNBOUNDED: usize = usize::MAX;

pub struct ClassScanner<L> {
    loader: L,
}

impl<L: ClassLoader> ClassScanner<L> {
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Classes under `root` annotated with `annotation`.
    pub fn scan_annotated(
        &self,
        root: &str,
        annotation: &str,
        max_count: usize,
    ) -> Result<Vec<ClassRef>> {
        self.scan(root, annotation, &AnnotationMatcher, max_count)
    }

    /// Proper subtypes of `parent` under `root`.
    pub fn scan_instance_of(
        &self,
        root: &str,
        parent: &str,
        max_count: usize,
    ) -> Result<Vec<ClassRef>> {
        self.scan(root, parent, &SubtypeMatcher, max_count)
    }

    /// Classes under `root` accepted by `matcher` against `condition`, in
    /// discovery order, at most `max_count` of them.
    ///
    /// Only the location the loader lists first for `root` is scanned.
    pub fn scan<M: Matcher + ?Sized>(
        &self,
        root: &str,
        condition: &str,
        matcher: &M,
        max_count: usize,
    ) -> Result<Vec<ClassRef>> {
        let root = RootPackage::new(root)?;
        validate_condition(condition)?;
        if max_count == 0 {
            return Ok(Vec::new());
        }

        let location = self.locate(&root)?;
        debug!("Scanning {} in {:?}", root.name(), location);

        let units = location.units(&root);
        let found = self.scan_units(units, condition, matcher, max_count)?;
        debug!("Found {} classes under {}", found.len(), root.name());
        Ok(found)
    }

    /// Matches an explicit list of class names, in the given order.
    pub fn scan_names<M: Matcher + ?Sized>(
        &self,
        names: &[impl AsRef<str>],
        condition: &str,
        matcher: &M,
        max_count: usize,
    ) -> Result<Vec<ClassRef>> {
        validate_condition(condition)?;
        if max_count == 0 {
            return Ok(Vec::new());
        }
        let units = names.iter().map(|name| Ok(name.as_ref().to_string()));
        self.scan_units(units, condition, matcher, max_count)
    }

    /// Resolves `root` to the location that gets scanned: the first one the
    /// loader lists. Extra locations are logged and ignored.
    pub fn locate(&self, root: &RootPackage) -> Result<RootLocation> {
        let mut urls = self.loader.resources(root.path()).into_iter();
        let Some(url) = urls.next() else {
            return Err(ScanError::PackageNotFound(root.name().to_string()));
        };
        let ignored: Vec<String> = urls.map(|u| u.to_string()).collect();
        if !ignored.is_empty() {
            warn!(
                "Package {} has {} more locations that will not be scanned: {}",
                root.name(),
                ignored.len(),
                ignored.join(", ")
            );
        }
        Ok(RootLocation::from_url(&url, root)?)
    }

    fn scan_units<M: Matcher + ?Sized>(
        &self,
        units: impl Iterator<Item = Result<String>>,
        condition: &str,
        matcher: &M,
        max_count: usize,
    ) -> Result<Vec<ClassRef>> {
        let condition = self.resolve(condition, |name| self.loader.load_class(name))?;

        let mut found = Vec::with_capacity(max_count.min(10));
        for unit in units {
            let name = unit?;
            let scanned = self.resolve(&name, |name| self.loader.load_class(name))?;
            if !matcher.matches(&scanned, &condition) {
                trace!("Rejected {}", name);
                continue;
            }

            trace!("Accepted {}", name);
            let initialized = self.resolve(&name, |name| self.loader.initialize_class(name))?;
            found.push(initialized);
            if found.len() == max_count {
                break;
            }
        }
        Ok(found)
    }

    fn resolve<F>(&self, name: &str, load: F) -> Result<ClassRef>
    where
        F: FnOnce(&str) -> crate::error::LoadResult<ClassRef>,
    {
        load(name).map_err(|source| ScanError::InvariantViolation {
            name: name.to_string(),
            source,
        })
    }
}

fn validate_condition(condition: &str) -> Result<()> {
    if condition.trim().is_empty() {
        return Err(ScanError::InvalidArgument(
            "condition type must not be empty".to_string(),
        ));
    }
    Ok(())
}
