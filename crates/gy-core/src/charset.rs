use crate::error::CoreError;

/// 70 caractères (Paul Bourke), du plus clair au plus dense.
pub const GLYPH_RAMP: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Rampe de glyphes ordonnée du plus clair au plus dense.
///
/// Immuable une fois construite. L'indexation est exacte en entiers :
/// `index = lum·(len−1) / (255·10⁴)` avec `lum` à l'échelle 10⁴.
///
/// # Example
/// ```
/// use gy_core::charset::GlyphRamp;
/// let ramp = GlyphRamp::standard();
/// assert_eq!(ramp.len(), 70);
/// assert_eq!(ramp.glyph(0), ' ');
/// assert_eq!(ramp.glyph(69), '$');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphRamp {
    glyphs: Vec<char>,
}

impl GlyphRamp {
    /// Build a ramp from characters ordered lightest→densest.
    ///
    /// # Errors
    /// Returns [`CoreError::RampTooShort`] if fewer than 2 characters are given.
    ///
    /// # Example
    /// ```
    /// use gy_core::charset::GlyphRamp;
    /// assert!(GlyphRamp::new(" .:#@").is_ok());
    /// assert!(GlyphRamp::new("@").is_err());
    /// ```
    pub fn new(glyphs: &str) -> Result<Self, CoreError> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        if glyphs.len() < 2 {
            return Err(CoreError::RampTooShort { len: glyphs.len() });
        }
        Ok(Self { glyphs })
    }

    /// The built-in 70-character ramp.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            glyphs: GLYPH_RAMP.chars().collect(),
        }
    }

    /// Nombre de glyphes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Toujours faux : une rampe a au moins deux glyphes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyphe à l'index donné, saturé au dernier.
    #[inline]
    #[must_use]
    pub fn glyph(&self, index: usize) -> char {
        self.glyphs[index.min(self.glyphs.len() - 1)]
    }

    /// Index in the ramp for a luminance expressed at scale 10⁴.
    ///
    /// # Example
    /// ```
    /// use gy_core::charset::GlyphRamp;
    /// let ramp = GlyphRamp::standard();
    /// assert_eq!(ramp.index_for(128 * 10_000), 34);
    /// assert_eq!(ramp.index_for(255 * 10_000), 69);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn index_for(&self, luminance_scaled: u32) -> usize {
        let steps = (self.glyphs.len() - 1) as u64;
        let idx = u64::from(luminance_scaled) * steps / 2_550_000;
        (idx as usize).min(self.glyphs.len() - 1)
    }

    /// Glyph for a luminance expressed at scale 10⁴.
    #[inline(always)]
    #[must_use]
    pub fn map(&self, luminance_scaled: u32) -> char {
        self.glyphs[self.index_for(luminance_scaled)]
    }
}

impl Default for GlyphRamp {
    fn default() -> Self {
        Self::standard()
    }
}
