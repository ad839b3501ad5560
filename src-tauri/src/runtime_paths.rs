use std::{env, path::PathBuf};

use crate::{DEFAULT_ROOT_DIR_NAME, PROJECT_ROOT_ENV, ROOT_DIR_ENV};

/// Per-user directory holding the launcher's log and config.
pub fn default_root_dir() -> Option<PathBuf> {
    if let Some(root) = non_blank_env(ROOT_DIR_ENV) {
        return Some(PathBuf::from(root));
    }
    home::home_dir().map(|home| home.join(DEFAULT_ROOT_DIR_NAME))
}

/// Source checkout used by development runs.
pub fn project_root_dir() -> PathBuf {
    if let Some(root) = non_blank_env(PROJECT_ROOT_ENV) {
        return PathBuf::from(root);
    }

    let candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..");
    candidate.canonicalize().unwrap_or(candidate)
}

pub(crate) fn non_blank_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
