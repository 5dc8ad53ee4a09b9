use jscan_core::{ClassPathLoader, ClassScanner, RootPackage};
use tracing::debug;

/// Prints the class names under `root` in enumeration order without loading them.
/// The package resolves to the same location a scan would use.
pub fn run(
    root: &str,
    loader: &ClassPathLoader,
    limit: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = RootPackage::new(root)?;
    let location = ClassScanner::new(loader).locate(&root)?;
    debug!("Listing {:?}", location);
    for name in jscan_core::enumerate::enumerate(&location, &root, limit)? {
        println!("{name}");
    }
    Ok(())
}
