use std::{
    env,
    path::{Path, PathBuf},
};

/// Workspace root, resolved from this crate's manifest directory at compile
/// time.
pub fn workspace_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Directory holding `default.toml` and friends. `TOURBOOK_CONFIG_DIR` wins
/// over the workspace default so a deployed binary can live anywhere.
pub fn config_dir() -> PathBuf {
    env::var_os("TOURBOOK_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| workspace_dir().join("configs"))
}
