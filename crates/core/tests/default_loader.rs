//! The crate-level scan functions read `CLASSPATH`. Kept in its own test binary
//! because it mutates the process environment.

mod common;

use common::{ClassSpec, write_jar};
use jscan_core::{ScanError, SubtypeMatcher};
use tempfile::tempdir;

#[test]
fn test_free_functions_use_classpath_env() {
    let dir = tempdir().unwrap();
    let jar = dir.path().join("plugins.jar");
    write_jar(
        &jar,
        &[
            ClassSpec::annotation("com.example.plugins.Plugin"),
            ClassSpec::interface("com.example.plugins.Extension"),
            ClassSpec::class("com.example.plugins.Audit")
                .implements("com.example.plugins.Extension")
                .annotated_with("com.example.plugins.Plugin"),
            ClassSpec::class("com.example.plugins.Metrics")
                .implements("com.example.plugins.Extension"),
        ],
    );
    // SAFETY: this test binary runs a single test, so nothing reads the
    // environment concurrently.
    unsafe { std::env::set_var("CLASSPATH", &jar) };

    let annotated =
        jscan_core::scan_annotated("com.example.plugins", "com.example.plugins.Plugin").unwrap();
    assert_eq!(annotated.len(), 1);
    assert_eq!(annotated[0].name(), "com.example.plugins.Audit");

    let extensions =
        jscan_core::scan_instance_of("com.example.plugins", "com.example.plugins.Extension")
            .unwrap();
    assert_eq!(extensions.len(), 2);

    let first =
        jscan_core::scan_instance_of_max("com.example.plugins", "com.example.plugins.Extension", 1)
            .unwrap();
    assert_eq!(first[0].name(), "com.example.plugins.Audit");

    let none = jscan_core::scan_annotated_max(
        "com.example.plugins",
        "com.example.plugins.Plugin",
        0,
    )
    .unwrap();
    assert!(none.is_empty());

    let generic = jscan_core::scan(
        "com.example.plugins",
        "com.example.plugins.Extension",
        &SubtypeMatcher,
        usize::MAX,
    )
    .unwrap();
    assert_eq!(generic.len(), 2);

    let err = jscan_core::scan_annotated("com.example.absent", "com.example.plugins.Plugin")
        .unwrap_err();
    assert!(matches!(err, ScanError::PackageNotFound(_)));
}
