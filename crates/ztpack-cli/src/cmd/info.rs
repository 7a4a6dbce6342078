//! Info command: show the layout a package exports.

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use ztpack_schema::PackageLayout;

/// Print the exported layout of a package directory.
pub fn info(package_dir: &Path) -> Result<()> {
    let layout = PackageLayout::read(package_dir).with_context(|| {
        format!(
            "No package layout found in {} (was it packaged by ztpack?)",
            package_dir.display()
        )
    })?;

    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Name".to_string(), layout.name.clone()]);
    table.add_row(vec!["Version".to_string(), layout.version.to_string()]);
    table.add_row(vec!["Libraries".to_string(), layout.libs.join(", ")]);
    table.add_row(vec!["Include dirs".to_string(), layout.includedirs.join(", ")]);
    table.add_row(vec!["Lib dirs".to_string(), layout.libdirs.join(", ")]);
    table.add_row(vec!["Bin dirs".to_string(), layout.bindirs.join(", ")]);
    table.add_row(vec![
        "Defines".to_string(),
        if layout.defines.is_empty() {
            "(none)".to_string()
        } else {
            layout.defines.join(", ")
        },
    ]);
    println!("{table}");

    Ok(())
}
