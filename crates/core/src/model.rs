//! Class metadata as seen by the scanner.
//!
//! A [`ClassHeader`] is what a single class declares about itself. A [`JavaClass`]
//! is a header after linking: its full supertype closure and the annotations that
//! are effectively present, including those inherited along the superclass chain.

use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Annotation that marks another annotation type as inherited by subclasses.
pub const INHERITED_ANNOTATION: &str = "java.lang.annotation.Inherited";

/// Linked class handle shared between the loader cache and scan results.
pub type ClassRef = Arc<JavaClass>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

impl std::fmt::Display for ClassKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::Annotation => "annotation",
        };
        f.write_str(label)
    }
}

/// Declared metadata of one class. Names are binary names (`com.example.Outer$Inner`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHeader {
    pub name: String,
    pub kind: ClassKind,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    /// Runtime-visible annotation types declared directly on the class.
    pub annotations: Vec<String>,
}

impl ClassHeader {
    /// A plain class extending `java.lang.Object`.
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Class,
            superclass: Some("java.lang.Object".to_string()),
            interfaces: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            kind: ClassKind::Interface,
            ..Self::class(name)
        }
    }

    /// An annotation type; annotation types implement `java.lang.annotation.Annotation`.
    pub fn annotation(name: impl Into<String>) -> Self {
        Self {
            kind: ClassKind::Annotation,
            interfaces: vec!["java.lang.annotation.Annotation".to_string()],
            ..Self::class(name)
        }
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn annotated_with(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    /// Direct supertypes: the superclass first, then interfaces in declaration order.
    pub fn direct_supertypes(&self) -> impl Iterator<Item = &str> {
        self.superclass
            .iter()
            .chain(self.interfaces.iter())
            .map(String::as_str)
    }

    pub fn is_annotated_with(&self, annotation: &str) -> bool {
        self.annotations.iter().any(|a| a == annotation)
    }
}

/// A linked class.
#[derive(Debug, Clone, Serialize)]
pub struct JavaClass {
    name: String,
    kind: ClassKind,
    superclass: Option<String>,
    interfaces: Vec<String>,
    /// Effective runtime annotations: declared ones plus inherited ones.
    annotations: BTreeSet<String>,
    /// Every proper supertype, transitively. Never contains the class itself.
    #[serde(skip)]
    supertypes: BTreeSet<String>,
}

impl JavaClass {
    pub(crate) fn linked(
        header: ClassHeader,
        annotations: BTreeSet<String>,
        supertypes: BTreeSet<String>,
    ) -> Self {
        Self {
            name: header.name,
            kind: header.kind,
            superclass: header.superclass,
            interfaces: header.interfaces,
            annotations,
            supertypes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without the package prefix.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn superclass(&self) -> Option<&str> {
        self.superclass.as_deref()
    }

    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    pub fn annotations(&self) -> impl Iterator<Item = &str> {
        self.annotations.iter().map(String::as_str)
    }

    pub fn supertypes(&self) -> impl Iterator<Item = &str> {
        self.supertypes.iter().map(String::as_str)
    }

    /// True when `annotation` is present on this class, directly or inherited.
    pub fn is_annotation_present(&self, annotation: &JavaClass) -> bool {
        self.annotations.contains(&annotation.name)
    }

    /// True when a value of type `other` can be assigned to this type,
    /// that is when this class is `other` or one of its supertypes.
    pub fn is_assignable_from(&self, other: &JavaClass) -> bool {
        self.name == other.name || other.supertypes.contains(&self.name)
    }
}

impl PartialEq for JavaClass {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for JavaClass {}

impl std::fmt::Display for JavaClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
