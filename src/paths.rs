//! Platform-appropriate locations for config, logs and documents.
//!
//! In development mode (cargo run), paths resolve to the working directory.
//! Installed builds use:
//! - Windows: `%APPDATA%\Canvasforge\`
//! - macOS: `~/Library/Application Support/Canvasforge/`
//! - Linux: `~/.config/canvasforge/` (config), `~/.local/share/canvasforge/` (data)

use std::path::PathBuf;

const APP_DIR: &str = "canvasforge";

/// Returns true when running in development mode (cargo run or a debug build)
pub fn is_dev_mode() -> bool {
    std::env::var("CARGO").is_ok() || cfg!(debug_assertions)
}

/// Directory holding `config.json`
pub fn config_dir() -> Option<PathBuf> {
    if is_dev_mode() {
        return Some(PathBuf::from("."));
    }

    #[cfg(target_os = "linux")]
    {
        dirs::config_dir().map(|p| p.join(APP_DIR))
    }

    #[cfg(not(target_os = "linux"))]
    {
        data_dir()
    }
}

/// Directory holding logs and the default documents folder
pub fn data_dir() -> Option<PathBuf> {
    if is_dev_mode() {
        return Some(PathBuf::from("."));
    }

    dirs::data_dir().map(|p| p.join(APP_DIR))
}

pub fn config_file() -> PathBuf {
    config_dir()
        .map(|p| p.join("config.json"))
        .unwrap_or_else(|| PathBuf::from("config.json"))
}

pub fn logs_dir() -> PathBuf {
    data_dir()
        .map(|p| p.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Default folder offered for saving documents
pub fn documents_dir() -> PathBuf {
    if is_dev_mode() {
        return PathBuf::from("documents");
    }

    dirs::document_dir()
        .map(|p| p.join("Canvasforge"))
        .or_else(|| data_dir().map(|p| p.join("documents")))
        .unwrap_or_else(|| PathBuf::from("documents"))
}

/// Create the config and data directories for installed builds
pub fn ensure_directories() -> std::io::Result<()> {
    if is_dev_mode() {
        return Ok(());
    }

    if let Some(config) = config_dir() {
        std::fs::create_dir_all(&config)?;
    }
    if let Some(data) = data_dir() {
        std::fs::create_dir_all(data.join("logs"))?;
    }
    std::fs::create_dir_all(documents_dir())?;
    Ok(())
}
