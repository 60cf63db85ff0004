//! CLI command implementations.

pub mod indicators;
pub mod quotes;
pub mod replay;
pub mod validate;

use std::path::{Path, PathBuf};

/// Resolve a data file argument. A path that does not exist as given
/// and carries no directory component is searched in the configured
/// data directory instead.
pub fn resolve_data_path(path: &Path, data_dir: &str) -> PathBuf {
    if !path.exists() && path.parent().is_some_and(|p| p.as_os_str().is_empty()) {
        return Path::new(data_dir).join(path);
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_name_resolves_against_data_dir() {
        let resolved = resolve_data_path(Path::new("candles.csv"), "data");
        assert_eq!(resolved, Path::new("data").join("candles.csv"));
    }

    #[test]
    fn test_paths_with_directories_are_kept() {
        let resolved = resolve_data_path(Path::new("fixtures/candles.csv"), "data");
        assert_eq!(resolved, Path::new("fixtures/candles.csv"));

        let resolved = resolve_data_path(Path::new("/tmp/candles.csv"), "data");
        assert_eq!(resolved, Path::new("/tmp/candles.csv"));
    }
}
