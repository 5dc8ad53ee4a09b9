//! Reads the declared hierarchy and runtime annotations out of class-file bytes.

use crate::error::{LoadError, LoadResult};
use crate::model::{ClassHeader, ClassKind};
use ristretto_classfile::attributes::Attribute;
use ristretto_classfile::{ClassAccessFlags, ClassFile, ConstantPool};
use std::io::Cursor;

pub const CLASS_FILE_SUFFIX: &str = ".class";

impl ClassHeader {
    /// Parses a class file. `expected` names the class being loaded and is only
    /// used for error reporting.
    pub fn parse(expected: &str, bytes: Vec<u8>) -> LoadResult<Self> {
        let malformed = |reason: String| LoadError::Malformed {
            name: expected.to_string(),
            reason,
        };

        let class = ClassFile::from_bytes(&mut Cursor::new(bytes))
            .map_err(|e| malformed(format!("{e:?}")))?;
        let pool = &class.constant_pool;

        let name = class_name(pool, class.this_class).map_err(&malformed)?;
        let superclass = if class.super_class == 0 {
            None
        } else {
            Some(class_name(pool, class.super_class).map_err(&malformed)?)
        };
        let interfaces = class
            .interfaces
            .iter()
            .map(|index| class_name(pool, *index))
            .collect::<Result<Vec<_>, _>>()
            .map_err(&malformed)?;

        let mut annotations = Vec::new();
        for attribute in &class.attributes {
            if let Attribute::RuntimeVisibleAnnotations {
                annotations: declared,
                ..
            } = attribute
            {
                for annotation in declared {
                    let descriptor = pool
                        .try_get_utf8(annotation.type_index)
                        .map_err(|e| malformed(format!("{e:?}")))?;
                    match descriptor_to_name(descriptor) {
                        Some(type_name) => annotations.push(type_name),
                        None => {
                            return Err(malformed(format!(
                                "invalid annotation descriptor {descriptor}"
                            )));
                        }
                    }
                }
            }
        }

        Ok(ClassHeader {
            name,
            kind: kind_of(class.access_flags),
            superclass,
            interfaces,
            annotations,
        })
    }
}

fn class_name(pool: &ConstantPool, index: u16) -> Result<String, String> {
    pool.try_get_class(index)
        .map(|internal| internal.replace('/', "."))
        .map_err(|e| format!("{e:?}"))
}

fn kind_of(flags: ClassAccessFlags) -> ClassKind {
    // Annotation types also carry INTERFACE, so test ANNOTATION first.
    if flags.contains(ClassAccessFlags::ANNOTATION) {
        ClassKind::Annotation
    } else if flags.contains(ClassAccessFlags::INTERFACE) {
        ClassKind::Interface
    } else if flags.contains(ClassAccessFlags::ENUM) {
        ClassKind::Enum
    } else {
        ClassKind::Class
    }
}

/// Converts a field descriptor such as `Lcom/example/Marker;` to `com.example.Marker`.
pub fn descriptor_to_name(descriptor: &str) -> Option<String> {
    descriptor
        .strip_prefix('L')
        .and_then(|rest| rest.strip_suffix(';'))
        .filter(|internal| !internal.is_empty())
        .map(|internal| internal.replace('/', "."))
}

/// Path of the class file for a binary name, relative to a class-path root.
pub fn class_file_path(binary_name: &str) -> String {
    format!("{}{}", binary_name.replace('.', "/"), CLASS_FILE_SUFFIX)
}
