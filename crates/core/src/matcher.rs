//! Strategies deciding whether a scanned class satisfies the condition type.

use crate::model::JavaClass;

pub trait Matcher {
    fn matches(&self, scanned: &JavaClass, condition: &JavaClass) -> bool;
}

/// Matches classes carrying the condition annotation, directly or inherited.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationMatcher;

impl Matcher for AnnotationMatcher {
    fn matches(&self, scanned: &JavaClass, condition: &JavaClass) -> bool {
        scanned.is_annotation_present(condition)
    }
}

/// Matches proper subtypes of the condition type. The condition type itself is
/// never reported as its own subtype.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubtypeMatcher;

impl Matcher for SubtypeMatcher {
    fn matches(&self, scanned: &JavaClass, condition: &JavaClass) -> bool {
        scanned != condition && condition.is_assignable_from(scanned)
    }
}

impl<F> Matcher for F
where
    F: Fn(&JavaClass, &JavaClass) -> bool,
{
    fn matches(&self, scanned: &JavaClass, condition: &JavaClass) -> bool {
        self(scanned, condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::ClassLoader;
    use crate::model::{ClassHeader, ClassKind};
    use crate::registry::RegistryLoader;

    fn loader() -> RegistryLoader {
        RegistryLoader::new().with_classes([
            ClassHeader::annotation("com.example.Marker"),
            ClassHeader::annotation("com.example.Other"),
            ClassHeader::interface("com.example.Shape"),
            ClassHeader::class("com.example.Circle")
                .implements("com.example.Shape")
                .annotated_with("com.example.Marker"),
            ClassHeader::class("com.example.Unit").extends("com.example.Circle"),
            ClassHeader::class("com.example.Plain"),
        ])
    }

    #[test]
    fn test_subtype_excludes_self() {
        let loader = loader();
        let shape = loader.load_class("com.example.Shape").unwrap();
        assert!(!SubtypeMatcher.matches(&shape, &shape));
    }

    #[test]
    fn test_subtype_direct_and_transitive() {
        let loader = loader();
        let shape = loader.load_class("com.example.Shape").unwrap();
        let circle = loader.load_class("com.example.Circle").unwrap();
        let unit = loader.load_class("com.example.Unit").unwrap();
        let plain = loader.load_class("com.example.Plain").unwrap();

        assert!(SubtypeMatcher.matches(&circle, &shape));
        assert!(SubtypeMatcher.matches(&unit, &shape));
        assert!(SubtypeMatcher.matches(&unit, &circle));
        assert!(!SubtypeMatcher.matches(&plain, &shape));
        assert!(!SubtypeMatcher.matches(&shape, &circle));
    }

    #[test]
    fn test_annotation_presence() {
        let loader = loader();
        let marker = loader.load_class("com.example.Marker").unwrap();
        let other = loader.load_class("com.example.Other").unwrap();
        let circle = loader.load_class("com.example.Circle").unwrap();
        let unit = loader.load_class("com.example.Unit").unwrap();

        assert!(AnnotationMatcher.matches(&circle, &marker));
        assert!(!AnnotationMatcher.matches(&circle, &other));
        // Marker is not @Inherited.
        assert!(!AnnotationMatcher.matches(&unit, &marker));
    }

    #[test]
    fn test_closure_matcher() {
        let loader = loader();
        let shape = loader.load_class("com.example.Shape").unwrap();
        let marker = loader.load_class("com.example.Marker").unwrap();
        let is_annotation_type =
            |scanned: &JavaClass, _: &JavaClass| scanned.kind() == ClassKind::Annotation;

        assert!(is_annotation_type.matches(&marker, &shape));
        assert!(!is_annotation_type.matches(&shape, &shape));
    }
}
