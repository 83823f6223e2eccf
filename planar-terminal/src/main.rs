/// Planar Terminal - interactive 2D transform pipeline
///
/// Controls (defaults, see planar.toml):
///   - Mouse: pan the camera
///   - = / -: Zoom in / out
///   - [ / ]: Rotate left / right
///   - o: Cycle projection mode
///   - t: Toggle test pattern / scene
///   - 0: Reset
///   - Q/ESC: Quit

use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use planar_terminal::{AppConfig, AppError, TerminalApp};
use tracing_subscriber::EnvFilter;

fn init_logging(path: &Path) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::Logging(format!("cannot create {}: {}", path.display(), e)))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}

fn main() -> Result<(), AppError> {
    let config_path = env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;

    init_logging(&config.frame.log_file)?;
    tracing::info!(?config_path, "configuration loaded");

    println!("Planar Terminal - Loading...");
    println!("Starting terminal renderer (press Q to quit)...");

    let mut app = TerminalApp::new(config)?;
    app.run()?;

    println!("Thank you for using Planar Terminal!");
    Ok(())
}
