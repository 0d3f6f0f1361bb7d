use gy_core::error::CoreError;
use gy_scene::error::SceneError;
use thiserror::Error;

/// Échec d'un tick de la boucle de rendu. La boucle ne reprend pas.
#[derive(Error, Debug)]
pub enum TickError {
    /// Mise à jour ou rasterisation de la scène.
    #[error("{0}")]
    Scene(#[from] SceneError),

    /// Conversion pixels → texte.
    #[error("{0}")]
    Convert(#[from] CoreError),

    /// Panic rattrapée à la frontière du tick.
    #[error("panic : {0}")]
    Panic(String),
}
