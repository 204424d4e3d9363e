pub(crate) mod estimate;
pub(crate) mod simulate;
pub(crate) mod sweep;

use miette::IntoDiagnostic;
use serde::Serialize;
use std::fs;
use std::path::Path;

pub(crate) fn write_json_artifact<T: Serialize>(path: &Path, value: &T) -> miette::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    fs::write(path, serde_json::to_string_pretty(value).into_diagnostic()?).into_diagnostic()?;
    Ok(())
}
