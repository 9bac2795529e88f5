use std::path::{Path, PathBuf};

pub const LOGIN: &str = "Run `cf login` first";
pub const TARGET: &str = "no space targeted. Run `cf target -o ORG -s SPACE`";

fn find_in_path(program: &Path) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;

    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join(program);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    None
}

/// Explains a `cf` binary that could not be started.
pub fn cf_not_found(binary: &Path) -> String {
    if binary.components().count() > 1 || find_in_path(binary).is_some() {
        format!(
            "could not run cf CLI at {}. Check --cf-binary or METRIC_REGISTRAR_CF_BINARY",
            binary.display()
        )
    } else {
        format!(
            "cf CLI '{}' not found on PATH. Install the cf CLI or pass --cf-binary",
            binary.display()
        )
    }
}
