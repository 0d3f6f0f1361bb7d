/// Configuration, types, and shared structures for gyroscii.
///
/// This crate contains the pixel buffer, the glyph grid, the glyph ramp,
/// frame timing and configuration shared across the gyroscii workspace.

pub mod charset;
pub mod clock;
pub mod config;
pub mod error;
pub mod frame;

pub use charset::GlyphRamp;
pub use config::SceneConfig;
pub use error::CoreError;
pub use frame::{AsciiCell, AsciiGrid, FrameBuffer};

/// Largeur fixe de la cible off-screen (colonnes de texte).
pub const ASCII_COLS: u32 = 120;

/// Hauteur fixe de la cible off-screen (lignes de texte).
pub const ASCII_ROWS: u32 = 48;
