use std::io::stdout;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use gy_core::config::SceneConfig;

pub mod app;
pub mod cli;
pub mod error;
pub mod headless;
pub mod hotreload;
pub mod session;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config + overrides CLI
    let overrides = cli.overrides();
    let mut config = resolve_config(&cli)?;
    overrides.apply(&mut config);
    let config = Arc::new(ArcSwap::from_pointee(config));

    // 4. Hot-reload (thread interne notify), seulement si le fichier existe
    let _watcher = if cli.config.exists() {
        Some(hotreload::spawn_config_watcher(&cli.config, &config, overrides)?)
    } else {
        None
    };

    if cli.headless {
        return headless::run_stdout(&config, cli.frames);
    }

    // 5. Initialiser le terminal ratatui + souris
    let terminal = ratatui::init();
    session::install_panic_hook();
    let result = crossterm::execute!(stdout(), EnableMouseCapture)
        .context("Capture souris indisponible")
        .and_then(|()| {
            let area = ratatui::layout::Rect::from(terminal.size()?);
            let stop = Arc::new(AtomicBool::new(false));
            app::App::new(Arc::clone(&config), area, stop)?.run(terminal)
        });

    // 6. Restaurer le terminal (TOUJOURS, même en cas d'erreur)
    let _ = crossterm::execute!(stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Config depuis `--config`, ou les défauts si le fichier n'existe pas.
fn resolve_config(cli: &cli::Cli) -> Result<SceneConfig> {
    if cli.config.exists() {
        gy_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(SceneConfig::default())
    }
}
