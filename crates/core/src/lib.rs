//! Class path scanner for compiled Java classes.
//!
//! Given a root package and a condition type, [`ClassScanner`] enumerates the classes
//! stored under the package, either as loose class files in a directory or as entries
//! of a jar, and returns those accepted by a [`Matcher`]:
//!
//! - [`AnnotationMatcher`]: classes carrying an annotation (honouring `@Inherited`)
//! - [`SubtypeMatcher`]: proper subtypes of a class or interface
//! - any `Fn(&JavaClass, &JavaClass) -> bool`
//!
//! Names are resolved through a [`ClassLoader`]. [`ClassPathLoader`] reads real class
//! files; [`RegistryLoader`] serves metadata registered up front.
//!
//! The free functions below scan with the default loader built from `CLASSPATH`.

pub mod classfile;
pub mod classpath;
pub mod enumerate;
pub mod error;
pub mod loader;
pub mod logging;
pub mod matcher;
pub mod model;
pub mod registry;
pub mod scanner;

pub use classpath::{ClassPathEntry, ClassPathLoader};
pub use enumerate::{RootLocation, RootPackage};
pub use error::{ConfigurationError, LoadError, Result, ScanError};
pub use loader::ClassLoader;
pub use matcher::{AnnotationMatcher, Matcher, SubtypeMatcher};
pub use model::{ClassHeader, ClassKind, ClassRef, JavaClass};
pub use registry::RegistryLoader;
pub use scanner::{ClassScanner, UNBOUNDED};

fn default_scanner() -> ClassScanner<ClassPathLoader> {
    ClassScanner::new(ClassPathLoader::from_env())
}

/// Classes under `root` annotated with `annotation`, using the `CLASSPATH` loader.
pub fn scan_annotated(root: &str, annotation: &str) -> Result<Vec<ClassRef>> {
    scan_annotated_max(root, annotation, UNBOUNDED)
}

/// Like [`scan_annotated`], returning at most `max_count` classes.
pub fn scan_annotated_max(root: &str, annotation: &str, max_count: usize) -> Result<Vec<ClassRef>> {
    default_scanner().scan_annotated(root, annotation, max_count)
}

/// Proper subtypes of `parent` under `root`, using the `CLASSPATH` loader.
pub fn scan_instance_of(root: &str, parent: &str) -> Result<Vec<ClassRef>> {
    scan_instance_of_max(root, parent, UNBOUNDED)
}

/// Like [`scan_instance_of`], returning at most `max_count` classes.
pub fn scan_instance_of_max(root: &str, parent: &str, max_count: usize) -> Result<Vec<ClassRef>> {
    default_scanner().scan_instance_of(root, parent, max_count)
}

/// General scan with the `CLASSPATH` loader. See [`ClassScanner::scan`] to pass a loader.
pub fn scan<M: Matcher + ?Sized>(
    root: &str,
    condition: &str,
    matcher: &M,
    max_count: usize,
) -> Result<Vec<ClassRef>> {
    default_scanner().scan(root, condition, matcher, max_count)
}
