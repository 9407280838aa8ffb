//! `.env` loading for the server binary.

use std::path::{Path, PathBuf};

/// Load a `.env` file, replacing variables already set in the process.
///
/// Without a path, `.env` is searched for from the working directory upward.
/// Returns the file that was loaded, if any.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => dotenvy::from_path_override(path)
            .ok()
            .map(|()| path.to_path_buf()),
        None => dotenvy::dotenv_override().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_file_overrides_inherited_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "WREN_ENV_FILE_CHECK=from-file\n").unwrap();
        std::env::set_var("WREN_ENV_FILE_CHECK", "inherited");

        assert_eq!(load_env_file(Some(&path)), Some(path.clone()));
        assert_eq!(std::env::var("WREN_ENV_FILE_CHECK").unwrap(), "from-file");
    }

    #[test]
    fn test_missing_env_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_env_file(Some(&dir.path().join("absent.env"))), None);
    }
}
