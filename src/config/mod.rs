use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_HISTORY_LIMIT, MAX_RECENT_DOCUMENTS};
use crate::persistence::UpdateLastDocumentPathRequest;

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

/// Application configuration persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfigData {
    /// Last opened document path (not auto-loaded, just remembered for quick access)
    #[serde(default)]
    pub last_document_path: Option<PathBuf>,

    /// Recently opened documents, most recent first
    #[serde(default)]
    pub recent_documents: Vec<PathBuf>,

    /// Undo depth applied to the document at startup (0 = unlimited)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for DocumentConfigData {
    fn default() -> Self {
        Self {
            last_document_path: None,
            recent_documents: Vec::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl DocumentConfigData {
    /// Move `path` to the front of the recent list
    pub fn remember_document(&mut self, path: &Path) {
        self.recent_documents.retain(|p| p != path);
        self.recent_documents.insert(0, path.to_path_buf());
        self.recent_documents.truncate(MAX_RECENT_DOCUMENTS);
        self.last_document_path = Some(path.to_path_buf());
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: DocumentConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DocumentConfigData::default(),
            config_path: crate::paths::config_file(),
            dirty: false,
        }
    }
}

/// Resource for the "document file missing" warning
#[derive(Resource, Default)]
pub struct MissingDocumentWarning {
    pub show: bool,
    pub path: Option<PathBuf>,
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Result of loading config from disk
struct LoadConfigResult {
    data: DocumentConfigData,
    /// Error message if config was reset to defaults due to an error
    reset_reason: Option<String>,
}

/// Load configuration from `config_path`
fn load_config(config_path: &Path) -> LoadConfigResult {
    let (data, reset_reason) = if config_path.exists() {
        match std::fs::read_to_string(config_path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(data) => {
                    tracing::info!("Loaded config from {:?}", config_path);
                    (data, None)
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config file: {}", e);
                    (
                        DocumentConfigData::default(),
                        Some(format!("Configuration file was corrupted: {}", e)),
                    )
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config file: {}", e);
                (
                    DocumentConfigData::default(),
                    Some(format!("Could not read configuration file: {}", e)),
                )
            }
        }
    } else {
        tracing::info!("No config file found, using defaults");
        (DocumentConfigData::default(), None)
    };

    LoadConfigResult { data, reset_reason }
}

/// Save configuration to disk
fn save_config(config: &AppConfig) {
    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                tracing::error!("Failed to save config: {}", e);
            } else {
                tracing::info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            tracing::error!("Failed to serialize config: {}", e);
        }
    }
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let result = load_config(&config.config_path);
    config.data = result.data;
    config.dirty = false;

    // Set notification if config was reset due to an error
    if let Some(reason) = result.reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// Startup system to check if the last document still exists
fn check_last_document_exists(
    config: Res<AppConfig>,
    mut warning: ResMut<MissingDocumentWarning>,
) {
    if let Some(ref path) = config.data.last_document_path
        && !path.exists()
    {
        warning.show = true;
        warning.path = Some(path.clone());
        tracing::info!("Last opened document no longer exists: {:?}", path);
    }
}

/// System to save config when requested
fn save_config_system(mut events: MessageReader<SaveConfigRequest>, mut config: ResMut<AppConfig>) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

/// System to update the last document path and the recent list
fn update_last_document_path_system(
    mut events: MessageReader<UpdateLastDocumentPathRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        config.data.remember_document(&event.path);
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<MissingDocumentWarning>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<UpdateLastDocumentPathRequest>()
            .add_systems(
                Startup,
                (load_config_system, check_last_document_exists)
                    .chain()
                    .in_set(ConfigLoaded),
            )
            .add_systems(
                Update,
                (
                    update_last_document_path_system
                        .run_if(on_message::<UpdateLastDocumentPathRequest>),
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                )
                    .chain(),
            );
    }
}
