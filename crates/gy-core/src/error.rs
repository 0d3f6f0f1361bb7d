use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Glyph ramp too short to bucket luminance.
    #[error("Rampe de glyphes trop courte : {len} caractère(s), minimum 2")]
    RampTooShort {
        /// Number of characters supplied.
        len: usize,
    },

    /// Buffer length does not match its declared dimensions.
    #[error("Buffer de {actual} octets, attendu {expected} ({width}×{height} RGBA)")]
    BufferSize {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Expected byte length.
        expected: usize,
        /// Actual byte length.
        actual: usize,
    },
}
