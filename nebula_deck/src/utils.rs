use std::path::{Path, PathBuf};

/// Checks if a path exists
pub fn path_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists()
}

/// Where to write an export: `out` itself, or `file_name` inside it when
/// `out` is a directory. Defaults to the working directory.
pub fn output_path(out: Option<&Path>, file_name: &str) -> PathBuf {
    match out {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}

/// Current time for export timestamps
pub fn now() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc::now()
}
