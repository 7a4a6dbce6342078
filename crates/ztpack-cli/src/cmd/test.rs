//! Test command: validate an existing package directory.

use std::path::Path;

use anyhow::Result;
use ztpack_core::{TestOutcome, TestPackage};

use crate::SettingsArgs;
use crate::ui::Output;

/// Build the consumer test project against `package_dir` and run it when
/// the host can execute target binaries.
pub fn test(
    package_dir: &Path,
    test_project: Option<&Path>,
    settings: &SettingsArgs,
    verbose: bool,
) -> Result<()> {
    let output = Output::new();
    let project = test_project.unwrap_or(Path::new("test_package"));
    anyhow::ensure!(
        project.is_dir(),
        "Test project not found at {}",
        project.display()
    );

    let tester = TestPackage::new(project, package_dir, settings.resolve(), verbose);
    match tester.run()? {
        TestOutcome::Passed => output.success("Test package passed"),
        TestOutcome::Skipped { reason } => {
            output.info(&format!("Test execution skipped: {reason}"));
        }
    }
    Ok(())
}
