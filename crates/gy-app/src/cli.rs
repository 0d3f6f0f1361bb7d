use std::path::PathBuf;

use clap::Parser;
use gy_core::config::SceneConfig;

/// gyroscii — wireframe gyroscope rendered live as ASCII.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// FPS cible (15 à 120).
    #[arg(long)]
    pub fps: Option<u32>,

    /// Désactiver la couleur.
    #[arg(long, default_value_t = false)]
    pub no_color: bool,

    /// Sans terminal interactif : imprime chaque bloc de texte sur stdout.
    #[arg(long, default_value_t = false)]
    pub headless: bool,

    /// Nombre de ticks à exécuter en mode headless.
    #[arg(long, default_value_t = 120, requires = "headless")]
    pub frames: u64,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Overrides à réappliquer à chaque chargement de config.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            fps: self.fps,
            no_color: self.no_color,
        }
    }
}

/// Valeurs de la ligne de commande prioritaires sur le fichier de config.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Overrides {
    pub fps: Option<u32>,
    pub no_color: bool,
}

impl Overrides {
    /// Applique les overrides puis re-borne la config.
    pub fn apply(&self, config: &mut SceneConfig) {
        if let Some(fps) = self.fps {
            config.target_fps = fps;
        }
        if self.no_color {
            config.color_enabled = false;
        }
        config.clamp_all();
    }
}
