use crate::{Condition, OutputFormat};
use jscan_core::{
    AnnotationMatcher, ClassPathLoader, ClassRef, ClassScanner, JavaClass, SubtypeMatcher,
};
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};
use tracing::info;

#[derive(Tabled)]
struct ClassRow {
    #[tabled(rename = "Class")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Extends")]
    superclass: String,
    #[tabled(rename = "Annotations")]
    annotations: String,
}

impl From<&ClassRef> for ClassRow {
    fn from(class: &ClassRef) -> Self {
        Self {
            name: class.name().to_string(),
            kind: class.kind().to_string(),
            superclass: class.superclass().unwrap_or("-").to_string(),
            annotations: class.annotations().collect::<Vec<_>>().join(", "),
        }
    }
}

#[derive(Serialize)]
struct ScanReport<'a> {
    root: &'a str,
    condition: &'a str,
    matcher: &'a str,
    classes: Vec<&'a JavaClass>,
}

pub fn run(
    root: &str,
    condition: &Condition,
    loader: &ClassPathLoader,
    limit: usize,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let scanner = ClassScanner::new(loader);

    let (matcher, condition_type, found) = match (&condition.annotated, &condition.subtype_of) {
        (Some(annotation), _) => (
            "annotated",
            annotation.as_str(),
            scanner.scan(root, annotation, &AnnotationMatcher, limit)?,
        ),
        (None, Some(parent)) => (
            "subtype-of",
            parent.as_str(),
            scanner.scan(root, parent, &SubtypeMatcher, limit)?,
        ),
        (None, None) => return Err("either --annotated or --subtype-of is required".into()),
    };
    info!("Found {} classes under {}", found.len(), root);

    match format {
        OutputFormat::Json => {
            let report = ScanReport {
                root,
                condition: condition_type,
                matcher,
                classes: found.iter().map(|c| &**c).collect(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Plain => {
            for class in &found {
                println!("{}", class.name());
            }
        }
        OutputFormat::Table => {
            if found.is_empty() {
                println!("No classes under {root} match {condition_type}.");
                return Ok(());
            }
            let rows: Vec<ClassRow> = found.iter().map(ClassRow::from).collect();
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{table}");
        }
    }
    Ok(())
}
