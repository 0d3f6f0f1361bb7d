use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use gy_core::config::{SceneConfig, load_config};
use notify::{Event, EventKind, RecursiveMode, Watcher};

use crate::cli::Overrides;

/// Lance un thread qui surveille le fichier config et met à jour l'ArcSwap.
///
/// Retourne le Watcher (doit rester vivant tant que l'app tourne).
///
/// # Errors
/// Returns an error if the watcher cannot be created or the path cannot be watched.
pub fn spawn_config_watcher(
    config_path: &Path,
    config: &Arc<ArcSwap<SceneConfig>>,
    overrides: Overrides,
) -> Result<impl Watcher + use<>> {
    let config = Arc::clone(config);
    let path = config_path.to_path_buf();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res
            && matches!(event.kind, EventKind::Modify(_))
        {
            reload(&path, &config, overrides);
        }
    })?;

    watcher.watch(config_path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

/// Recharge la config depuis `path` et la publie. En cas d'erreur l'ancienne
/// config reste en place.
pub fn reload(path: &Path, config: &ArcSwap<SceneConfig>, overrides: Overrides) -> bool {
    match load_config(path) {
        Ok(mut new_config) => {
            overrides.apply(&mut new_config);
            config.store(Arc::new(new_config));
            log::info!("Config rechargée depuis {}", path.display());
            true
        }
        Err(e) => {
            log::warn!("Erreur de rechargement config : {e:#}");
            false
        }
    }
}
