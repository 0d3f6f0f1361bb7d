use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::GlyphRamp;
use crate::error::CoreError;

/// Configuration complète de la scène et du rendu, hot-rechargeable.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use gy_core::config::SceneConfig;
/// let config = SceneConfig::default();
/// assert_eq!(config.ascii_interval_ms, 50);
/// assert!((config.aim_smoothing - 0.85).abs() < f32::EPSILON);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SceneConfig {
    // === Rendu ===
    /// FPS cible de la boucle de rendu.
    pub target_fps: u32,
    /// Intervalle minimal entre deux conversions pixel→texte, en ms.
    pub ascii_interval_ms: u64,
    /// Rampe de glyphes, du plus clair au plus dense.
    pub ramp: String,
    /// Colorer chaque glyphe avec la couleur du pixel source.
    pub color_enabled: bool,
    /// Ratio hauteur/largeur d'une cellule terminal (typiquement 2.0).
    pub cell_aspect: f32,
    /// Afficher le panneau de debug.
    pub show_debug: bool,

    // === Mouvement ===
    /// Facteur de slerp de la visée du tétraèdre [0.35, 0.85].
    pub aim_smoothing: f32,
    /// Facteur de lerp du cube vers le milieu dodécaèdre/tétraèdre [0.0, 1.0].
    /// 0.0 = cube figé.
    pub follow_factor: f32,
    /// Part de l'orientation désirée mélangée à l'orientation de référence [0.0, 1.0].
    pub body_blend: f32,
    /// Facteur de slerp de base de l'orientation du corps [0.1, 0.2].
    pub body_base_slerp: f32,

    // === Caméra ===
    /// Champ de vision vertical, en degrés.
    pub fov_degrees: f32,
    /// Distance de la caméra à l'origine le long de +Z.
    pub camera_distance: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            ascii_interval_ms: 50,
            ramp: crate::charset::GLYPH_RAMP.to_string(),
            color_enabled: true,
            cell_aspect: 2.0,
            show_debug: true,
            aim_smoothing: 0.85,
            follow_factor: 0.1,
            body_blend: 0.6,
            body_base_slerp: 0.1,
            fov_degrees: 45.0,
            camera_distance: 20.0,
        }
    }
}

impl SceneConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.target_fps = self.target_fps.clamp(15, 120);
        self.ascii_interval_ms = self.ascii_interval_ms.clamp(10, 1000);
        self.cell_aspect = clamp_finite(self.cell_aspect, 1.0, 4.0, 2.0);
        self.aim_smoothing = clamp_finite(self.aim_smoothing, 0.35, 0.85, 0.85);
        self.follow_factor = clamp_finite(self.follow_factor, 0.0, 1.0, 0.1);
        self.body_blend = clamp_finite(self.body_blend, 0.0, 1.0, 0.6);
        self.body_base_slerp = clamp_finite(self.body_base_slerp, 0.1, 0.2, 0.1);
        self.fov_degrees = clamp_finite(self.fov_degrees, 10.0, 120.0, 45.0);
        self.camera_distance = clamp_finite(self.camera_distance, 5.0, 100.0, 20.0);
    }

    /// Build the glyph ramp described by this config.
    ///
    /// # Errors
    /// Returns [`CoreError::RampTooShort`] if `ramp` has fewer than 2 characters.
    pub fn glyph_ramp(&self) -> Result<GlyphRamp, CoreError> {
        GlyphRamp::new(&self.ramp)
    }
}

/// NaN → `fallback`, sinon clamp classique.
fn clamp_finite(v: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if v.is_nan() {
        fallback
    } else {
        v.clamp(min, max)
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    render: Option<RenderSection>,
    motion: Option<MotionSection>,
    camera: Option<CameraSection>,
}

/// Render section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct RenderSection {
    target_fps: Option<u32>,
    ascii_interval_ms: Option<u64>,
    ramp: Option<String>,
    color_enabled: Option<bool>,
    cell_aspect: Option<f32>,
    show_debug: Option<bool>,
}

/// Motion section, all fields optional.
#[derive(Deserialize)]
struct MotionSection {
    aim_smoothing: Option<f32>,
    follow_factor: Option<f32>,
    body_blend: Option<f32>,
    body_base_slerp: Option<f32>,
}

/// Camera section, all fields optional.
#[derive(Deserialize)]
struct CameraSection {
    fov_degrees: Option<f32>,
    distance: Option<f32>,
}

/// Parse une config TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the TOML is malformed or the ramp is too short.
///
/// # Example
/// ```
/// use gy_core::config::parse_config;
/// let config = parse_config("[motion]\naim_smoothing = 0.35\n").unwrap();
/// assert!((config.aim_smoothing - 0.35).abs() < f32::EPSILON);
/// assert_eq!(config.target_fps, 60);
/// ```
pub fn parse_config(content: &str) -> Result<SceneConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = SceneConfig::default();

    if let Some(r) = file.render {
        if let Some(v) = r.target_fps {
            config.target_fps = v;
        }
        if let Some(v) = r.ascii_interval_ms {
            config.ascii_interval_ms = v;
        }
        if let Some(v) = r.ramp {
            config.ramp = v;
        }
        if let Some(v) = r.color_enabled {
            config.color_enabled = v;
        }
        if let Some(v) = r.cell_aspect {
            config.cell_aspect = v;
        }
        if let Some(v) = r.show_debug {
            config.show_debug = v;
        }
    }

    if let Some(m) = file.motion {
        if let Some(v) = m.aim_smoothing {
            config.aim_smoothing = v;
        }
        if let Some(v) = m.follow_factor {
            config.follow_factor = v;
        }
        if let Some(v) = m.body_blend {
            config.body_blend = v;
        }
        if let Some(v) = m.body_base_slerp {
            config.body_base_slerp = v;
        }
    }

    if let Some(c) = file.camera {
        if let Some(v) = c.fov_degrees {
            config.fov_degrees = v;
        }
        if let Some(v) = c.distance {
            config.camera_distance = v;
        }
    }

    let raw = config.clone();
    config.clamp_all();
    if config != raw {
        log::warn!("Valeurs de config hors bornes ramenées dans leur intervalle");
    }
    config
        .glyph_ramp()
        .map_err(|e| CoreError::Config(e.to_string()))?;
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use gy_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<SceneConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Config invalide dans {}", path.display()))?;
    log::info!("Config chargée depuis {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = parse_config(
            "[render]\ntarget_fps = 1000\nascii_interval_ms = 0\n\n[motion]\naim_smoothing = 2.0\nbody_base_slerp = 0.0\n",
        )
        .unwrap();
        assert_eq!(config.target_fps, 120);
        assert_eq!(config.ascii_interval_ms, 10);
        assert!((config.aim_smoothing - 0.85).abs() < f32::EPSILON);
        assert!((config.body_base_slerp - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn nan_falls_back_to_default() {
        let mut config = SceneConfig {
            cell_aspect: f32::NAN,
            ..SceneConfig::default()
        };
        config.clamp_all();
        assert!((config.cell_aspect - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn short_ramp_is_rejected() {
        assert!(parse_config("[render]\nramp = \"#\"\n").is_err());
    }

    #[test]
    fn malformed_toml_is_rejected() {
        assert!(parse_config("[render\n").is_err());
    }

    #[test]
    fn load_config_reads_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[camera]\nfov_degrees = 60.0\n\n[render]\ncolor_enabled = false").unwrap();
        let config = load_config(file.path()).unwrap();
        assert!((config.fov_degrees - 60.0).abs() < f32::EPSILON);
        assert!(!config.color_enabled);
        assert!((config.camera_distance - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn shipped_default_file_matches_defaults() {
        let config = parse_config(include_str!("../../../config/default.toml")).unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/gyroscii.toml")).is_err());
    }
}
