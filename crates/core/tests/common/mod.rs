//! Fixtures writing minimal but valid class files, class directories and jars.

use std::fs::File;
use std::io::Write;
use std::path::Path;

const ACC_PUBLIC: u16 = 0x0001;
const ACC_SUPER: u16 = 0x0020;
const ACC_INTERFACE: u16 = 0x0200;
const ACC_ABSTRACT: u16 = 0x0400;
const ACC_ANNOTATION: u16 = 0x2000;

#[allow(dead_code)]
pub const INHERITED: &str = "java.lang.annotation.Inherited";

#[derive(Clone)]
pub struct ClassSpec {
    name: String,
    access: u16,
    superclass: Option<String>,
    interfaces: Vec<String>,
    annotations: Vec<String>,
}

#[allow(dead_code)]
impl ClassSpec {
    pub fn class(name: &str) -> Self {
        Self {
            name: name.to_string(),
            access: ACC_PUBLIC | ACC_SUPER,
            superclass: Some("java.lang.Object".to_string()),
            interfaces: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn interface(name: &str) -> Self {
        Self {
            access: ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT,
            ..Self::class(name)
        }
    }

    pub fn annotation(name: &str) -> Self {
        Self {
            access: ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT | ACC_ANNOTATION,
            interfaces: vec!["java.lang.annotation.Annotation".to_string()],
            ..Self::class(name)
        }
    }

    pub fn extends(mut self, superclass: &str) -> Self {
        self.superclass = Some(superclass.to_string());
        self
    }

    pub fn implements(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    pub fn annotated_with(mut self, annotation: &str) -> Self {
        self.annotations.push(annotation.to_string());
        self
    }

    /// Path of the class file relative to a class path root.
    pub fn file_name(&self) -> String {
        format!("{}.class", self.name.replace('.', "/"))
    }

    /// Serializes a Java 8 class file with no fields or methods.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut pool = ConstantPool::default();
        let this_class = pool.class(&self.name);
        let super_class = self.superclass.as_deref().map_or(0, |s| pool.class(s));
        let interfaces: Vec<u16> = self.interfaces.iter().map(|i| pool.class(i)).collect();
        let annotation_types: Vec<u16> = self
            .annotations
            .iter()
            .map(|a| pool.utf8(&format!("L{};", a.replace('.', "/"))))
            .collect();
        let attribute_name = if annotation_types.is_empty() {
            None
        } else {
            Some(pool.utf8("RuntimeVisibleAnnotations"))
        };

        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&52u16.to_be_bytes());
        out.extend_from_slice(&(pool.count + 1).to_be_bytes());
        out.extend_from_slice(&pool.bytes);
        out.extend_from_slice(&self.access.to_be_bytes());
        out.extend_from_slice(&this_class.to_be_bytes());
        out.extend_from_slice(&super_class.to_be_bytes());
        out.extend_from_slice(&(interfaces.len() as u16).to_be_bytes());
        for index in &interfaces {
            out.extend_from_slice(&index.to_be_bytes());
        }
        // fields, methods
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());

        match attribute_name {
            None => out.extend_from_slice(&0u16.to_be_bytes()),
            Some(name_index) => {
                out.extend_from_slice(&1u16.to_be_bytes());
                out.extend_from_slice(&name_index.to_be_bytes());
                let length = 2 + 4 * annotation_types.len() as u32;
                out.extend_from_slice(&length.to_be_bytes());
                out.extend_from_slice(&(annotation_types.len() as u16).to_be_bytes());
                for type_index in &annotation_types {
                    out.extend_from_slice(&type_index.to_be_bytes());
                    out.extend_from_slice(&0u16.to_be_bytes());
                }
            }
        }
        out
    }
}

#[derive(Default)]
struct ConstantPool {
    bytes: Vec<u8>,
    count: u16,
}

impl ConstantPool {
    fn utf8(&mut self, value: &str) -> u16 {
        self.bytes.push(1);
        self.bytes
            .extend_from_slice(&(value.len() as u16).to_be_bytes());
        self.bytes.extend_from_slice(value.as_bytes());
        self.count += 1;
        self.count
    }

    fn class(&mut self, binary_name: &str) -> u16 {
        let name_index = self.utf8(&binary_name.replace('.', "/"));
        self.bytes.push(7);
        self.bytes.extend_from_slice(&name_index.to_be_bytes());
        self.count += 1;
        self.count
    }
}

/// Writes every class under `root` as a loose class file.
#[allow(dead_code)]
pub fn write_class_dir(root: &Path, classes: &[ClassSpec]) {
    for class in classes {
        let path = root.join(class.file_name());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, class.to_bytes()).unwrap();
    }
}

/// Writes a jar holding `classes` in the given order, after a manifest.
#[allow(dead_code)]
pub fn write_jar(path: &Path, classes: &[ClassSpec]) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options =
        zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    zip.start_file("META-INF/MANIFEST.MF", options).unwrap();
    zip.write_all(b"Manifest-Version: 1.0\r\n").unwrap();
    for class in classes {
        zip.start_file(class.file_name(), options).unwrap();
        zip.write_all(&class.to_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

/// Writes a jar the way the `jar` tool does: deflated entries streamed to a
/// non-seekable sink, each followed by a data descriptor.
#[allow(dead_code)]
pub fn write_streamed_jar(path: &Path, classes: &[ClassSpec]) {
    let mut zip = zip::ZipWriter::new_stream(File::create(path).unwrap());
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    zip.start_file("META-INF/MANIFEST.MF", options).unwrap();
    zip.write_all(b"Manifest-Version: 1.0\r\nCreated-By: 17 (Eclipse Adoptium)\r\n")
        .unwrap();
    for class in classes {
        zip.start_file(class.file_name(), options).unwrap();
        zip.write_all(&class.to_bytes()).unwrap();
    }
    zip.finish().unwrap();
}
