use std::path::PathBuf;
use std::process::ExitCode;

use bevy::prelude::*;

use canvasforge::config::{ConfigPlugin, ConfigResetNotification, MissingDocumentWarning};
use canvasforge::document::{Document, DocumentPlugin};
use canvasforge::persistence::{
    DocumentLoadError, DocumentSaveError, LoadDocumentRequest, SaveDocumentRequest,
};
use canvasforge::{logging, paths};

fn print_usage() {
    eprintln!("usage: canvasforge [DOCUMENT] [OUTPUT]");
    eprintln!("  Loads DOCUMENT, prints a summary and optionally re-saves it to OUTPUT.");
}

/// Surface what the config plugin noticed at startup
fn report_config_state(world: &World) {
    let notification = world.resource::<ConfigResetNotification>();
    if notification.show
        && let Some(reason) = &notification.reason
    {
        eprintln!("{}; using default settings", reason);
    }

    let warning = world.resource::<MissingDocumentWarning>();
    if warning.show
        && let Some(path) = &warning.path
    {
        eprintln!("Last opened document no longer exists: {}", path.display());
    }
}

fn main() -> ExitCode {
    let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if args.len() > 2 || args.iter().any(|a| a.as_os_str() == "--help") {
        print_usage();
        return ExitCode::FAILURE;
    }

    // Keep the guard alive for the duration of the program
    let _log_guard = logging::setup_logging(&paths::logs_dir());
    if let Err(e) = paths::ensure_directories() {
        tracing::warn!("Failed to create data directories: {}", e);
    }

    let mut app = App::new();
    app.add_plugins((ConfigPlugin, DocumentPlugin));
    app.update();
    report_config_state(app.world());

    if let Some(input) = args.first() {
        app.world_mut().write_message(LoadDocumentRequest {
            path: input.clone(),
        });
        app.update();

        if let Some(message) = &app.world().resource::<DocumentLoadError>().message {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    }

    let document = app.world().resource::<Document>();
    tracing::info!(
        "Document: {} layers, zoom {}, center {}",
        document.layers().len(),
        document.zoom(),
        document.center_point()
    );
    for layer in document.layers() {
        tracing::info!(
            "  {} \"{}\": {} objects{}",
            layer.id(),
            layer.name,
            layer.len(),
            if layer.visible { "" } else { " (hidden)" }
        );
    }

    if let Some(output) = args.get(1) {
        app.world_mut().write_message(SaveDocumentRequest {
            path: output.clone(),
        });
        app.update();

        if let Some(message) = &app.world().resource::<DocumentSaveError>().message {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
