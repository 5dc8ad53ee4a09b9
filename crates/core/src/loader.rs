//! The type-loading facility the scanner resolves names through.
//!
//! Loading happens in two phases, mirroring a JVM class loader: [`ClassLoader::load_class`]
//! links a class without initializing it, [`ClassLoader::initialize_class`] additionally
//! runs initialization. The scanner only pays for the second phase on accepted matches.

use crate::error::{LoadError, LoadResult};
use crate::model::{ClassHeader, ClassKind, ClassRef, INHERITED_ANNOTATION, JavaClass};
use dashmap::{DashMap, DashSet};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::trace;
use url::Url;

/// Packages provided by the Java platform itself. Their classes may be absent
/// from a class path without that being an error.
const PLATFORM_PACKAGES: &[&str] = &["java.", "javax.", "jdk.", "sun."];

pub trait ClassLoader {
    /// Every location providing the slash-separated resource `path`, in search order.
    fn resources(&self, path: &str) -> Vec<Url>;

    /// First location providing `path`.
    fn resource(&self, path: &str) -> Option<Url> {
        self.resources(path).into_iter().next()
    }

    /// Resolves a binary class name without initializing the class.
    fn load_class(&self, name: &str) -> LoadResult<ClassRef>;

    /// Resolves a binary class name and initializes it (superclasses first).
    /// Initialization happens at most once per loader.
    fn initialize_class(&self, name: &str) -> LoadResult<ClassRef>;
}

impl<L: ClassLoader + ?Sized> ClassLoader for &L {
    fn resources(&self, path: &str) -> Vec<Url> {
        (**self).resources(path)
    }

    fn resource(&self, path: &str) -> Option<Url> {
        (**self).resource(path)
    }

    fn load_class(&self, name: &str) -> LoadResult<ClassRef> {
        (**self).load_class(name)
    }

    fn initialize_class(&self, name: &str) -> LoadResult<ClassRef> {
        (**self).initialize_class(name)
    }
}

impl<L: ClassLoader + ?Sized> ClassLoader for Arc<L> {
    fn resources(&self, path: &str) -> Vec<Url> {
        (**self).resources(path)
    }

    fn resource(&self, path: &str) -> Option<Url> {
        (**self).resource(path)
    }

    fn load_class(&self, name: &str) -> LoadResult<ClassRef> {
        (**self).load_class(name)
    }

    fn initialize_class(&self, name: &str) -> LoadResult<ClassRef> {
        (**self).initialize_class(name)
    }
}

pub fn is_platform_class(name: &str) -> bool {
    PLATFORM_PACKAGES.iter().any(|prefix| name.starts_with(prefix))
}

/// Where a loader reads declared class metadata from.
pub(crate) trait HeaderSource {
    /// `Ok(None)` when the class does not exist in this source.
    fn find_header(&self, name: &str) -> LoadResult<Option<ClassHeader>>;
}

/// Links headers into [`JavaClass`]es and caches the result.
pub(crate) struct Linker {
    linked: DashMap<String, ClassRef>,
    initialized: DashSet<String>,
}

impl Linker {
    pub(crate) fn new() -> Self {
        Self {
            linked: DashMap::new(),
            initialized: DashSet::new(),
        }
    }

    pub(crate) fn load(&self, source: &dyn HeaderSource, name: &str) -> LoadResult<ClassRef> {
        let mut linking = Vec::new();
        match self.link(source, name, &mut linking)? {
            Some(class) => Ok(class),
            None if is_platform_class(name) => Ok(self.opaque(name)),
            None => Err(LoadError::NotFound(name.to_string())),
        }
    }

    /// A platform class absent from the source: no supertypes, no annotations.
    /// Subtype and annotation checks only need its name.
    fn opaque(&self, name: &str) -> ClassRef {
        trace!("Using opaque platform class {}", name);
        let header = ClassHeader {
            name: name.to_string(),
            kind: ClassKind::Class,
            superclass: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
        };
        let class = Arc::new(JavaClass::linked(header, BTreeSet::new(), BTreeSet::new()));
        self.linked
            .entry(name.to_string())
            .or_insert(class)
            .value()
            .clone()
    }

    /// Initializes `name` and its superclass chain, root first. `on_init` runs once
    /// for every class initialized by this call.
    pub(crate) fn initialize(
        &self,
        source: &dyn HeaderSource,
        name: &str,
        on_init: &mut dyn FnMut(&JavaClass),
    ) -> LoadResult<ClassRef> {
        let class = self.load(source, name)?;
        if self.initialized.contains(class.name()) {
            return Ok(class);
        }

        if let Some(superclass) = class.superclass() {
            if self.linked.contains_key(superclass) {
                self.initialize(source, superclass, on_init)?;
            }
        }

        if self.initialized.insert(class.name().to_string()) {
            trace!("Initializing {}", class.name());
            on_init(&class);
        }
        Ok(class)
    }

    pub(crate) fn is_initialized(&self, name: &str) -> bool {
        self.initialized.contains(name)
    }

    fn cached(&self, name: &str) -> Option<ClassRef> {
        self.linked.get(name).map(|entry| entry.value().clone())
    }

    /// Links `name`, returning `None` when the source does not know it.
    fn link(
        &self,
        source: &dyn HeaderSource,
        name: &str,
        linking: &mut Vec<String>,
    ) -> LoadResult<Option<ClassRef>> {
        if let Some(class) = self.cached(name) {
            return Ok(Some(class));
        }
        if linking.iter().any(|n| n == name) {
            return Err(LoadError::Circularity(name.to_string()));
        }
        let Some(header) = source.find_header(name)? else {
            return Ok(None);
        };

        linking.push(name.to_string());
        let mut supertypes = BTreeSet::new();
        let mut inherited = BTreeSet::new();

        for (position, supertype) in header.direct_supertypes().enumerate() {
            supertypes.insert(supertype.to_string());
            match self.link(source, supertype, linking)? {
                Some(linked) => {
                    supertypes.extend(linked.supertypes().map(str::to_string));
                    // Only the superclass (always listed first) passes annotations down.
                    if position == 0 && header.superclass.is_some() {
                        for annotation in linked.annotations() {
                            if self.is_inherited_annotation(source, annotation)? {
                                inherited.insert(annotation.to_string());
                            }
                        }
                    }
                }
                None if is_platform_class(supertype) => {
                    trace!("Treating {} as an opaque platform class", supertype);
                }
                None => {
                    linking.pop();
                    return Err(LoadError::MissingDependency {
                        class: name.to_string(),
                        dependency: supertype.to_string(),
                    });
                }
            }
        }
        linking.pop();

        let mut annotations: BTreeSet<String> = header.annotations.iter().cloned().collect();
        annotations.extend(inherited);

        let class = Arc::new(JavaClass::linked(header, annotations, supertypes));
        trace!("Linked {}", class.name());
        let entry = self
            .linked
            .entry(name.to_string())
            .or_insert_with(|| class.clone());
        Ok(Some(entry.value().clone()))
    }

    fn is_inherited_annotation(
        &self,
        source: &dyn HeaderSource,
        annotation: &str,
    ) -> LoadResult<bool> {
        if let Some(linked) = self.cached(annotation) {
            return Ok(linked.annotations().any(|a| a == INHERITED_ANNOTATION));
        }
        // Annotation types that cannot be found are not inherited.
        Ok(source
            .find_header(annotation)?
            .is_some_and(|header| header.is_annotated_with(INHERITED_ANNOTATION)))
    }
}
