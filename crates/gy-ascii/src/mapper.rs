use gy_core::charset::GlyphRamp;
use gy_core::error::CoreError;
use gy_core::frame::{AsciiCell, AsciiGrid, FrameBuffer, luminance_scaled};
use rayon::prelude::*;

/// Convertit une cible off-screen en glyphes par seau de luminance.
///
/// Pur et déterministe : même buffer → même texte. La ligne de sortie `y`
/// lit la ligne source `H−1−y` (la cible est rangée de bas en haut).
///
/// # Example
/// ```
/// use gy_ascii::mapper::GlyphMapper;
/// use gy_core::charset::GlyphRamp;
/// use gy_core::frame::FrameBuffer;
///
/// let mapper = GlyphMapper::new(GlyphRamp::standard());
/// let mut fb = FrameBuffer::new(3, 2);
/// fb.fill((255, 255, 255, 255));
/// assert_eq!(mapper.to_text(&fb).unwrap(), "$$$\n$$$\n");
/// ```
#[derive(Clone, Debug, Default)]
pub struct GlyphMapper {
    ramp: GlyphRamp,
}

impl GlyphMapper {
    #[must_use]
    pub fn new(ramp: GlyphRamp) -> Self {
        Self { ramp }
    }

    #[must_use]
    pub fn ramp(&self) -> &GlyphRamp {
        &self.ramp
    }

    /// Remplace la rampe (config rechargée).
    pub fn set_ramp(&mut self, ramp: GlyphRamp) {
        if ramp != self.ramp {
            log::debug!("Rampe de glyphes remplacée ({} caractères)", ramp.len());
            self.ramp = ramp;
        }
    }

    /// Écrit le bloc de texte dans `out` (vidé d'abord, capacité conservée).
    ///
    /// `H` lignes de `W` glyphes, chacune terminée par `\n`.
    ///
    /// # Errors
    /// Returns [`CoreError::BufferSize`] if the pixel data does not match the
    /// declared dimensions.
    pub fn write_text(&self, frame: &FrameBuffer, out: &mut String) -> Result<(), CoreError> {
        check_frame(frame)?;
        out.clear();
        let w = frame.width as usize;
        let h = frame.height as usize;
        out.reserve(h * (w + 1));
        let stride = w * 4;
        for y in (0..h).rev() {
            for px in frame.data[y * stride..(y + 1) * stride].chunks_exact(4) {
                out.push(self.ramp.map(luminance_scaled(px[0], px[1], px[2])));
            }
            out.push('\n');
        }
        Ok(())
    }

    /// Comme [`write_text`](Self::write_text), dans une nouvelle `String`.
    ///
    /// # Errors
    /// Same as [`write_text`](Self::write_text).
    pub fn to_text(&self, frame: &FrameBuffer) -> Result<String, CoreError> {
        let mut out = String::new();
        self.write_text(frame, &mut out)?;
        Ok(out)
    }

    /// Remplit `grid` (ligne 0 en haut) : glyphe + couleur du pixel source.
    ///
    /// La grille peut avoir une autre taille que le buffer : échantillonnage
    /// au plus proche. Lignes traitées en parallèle.
    ///
    /// # Errors
    /// Returns [`CoreError::BufferSize`] if the pixel data does not match the
    /// declared dimensions.
    ///
    /// # Example
    /// ```
    /// use gy_ascii::mapper::GlyphMapper;
    /// use gy_core::frame::{AsciiGrid, FrameBuffer};
    ///
    /// let mapper = GlyphMapper::default();
    /// let mut fb = FrameBuffer::new(4, 2);
    /// fb.set_pixel(0, 1, (255, 255, 255));
    /// let mut grid = AsciiGrid::new(4, 2);
    /// mapper.map_grid(&fb, &mut grid).unwrap();
    /// assert_eq!(grid.get(0, 0).ch, '$');
    /// assert_eq!(grid.get(0, 1).ch, ' ');
    /// ```
    pub fn map_grid(&self, frame: &FrameBuffer, grid: &mut AsciiGrid) -> Result<(), CoreError> {
        check_frame(frame)?;
        if frame.width == 0 || frame.height == 0 || grid.width == 0 {
            grid.clear();
            return Ok(());
        }
        let gw = u32::from(grid.width);
        let gh = u32::from(grid.height).max(1);
        let ramp = &self.ramp;

        grid.cells
            .par_chunks_mut(grid.width as usize)
            .enumerate()
            .for_each(|(cy, row)| {
                let sy = (cy as u32 * frame.height / gh).min(frame.height - 1);
                let py = frame.height - 1 - sy;
                for (cx, cell) in row.iter_mut().enumerate() {
                    let px = (cx as u32 * frame.width / gw).min(frame.width - 1);
                    let (r, g, b, _) = frame.pixel(px, py);
                    *cell = AsciiCell {
                        ch: ramp.map(luminance_scaled(r, g, b)),
                        fg: (r, g, b),
                        bg: (0, 0, 0),
                    };
                }
            });
        Ok(())
    }
}

/// Vrai si le texte ne contient que des blancs (espaces, retours ligne).
///
/// # Example
/// ```
/// use gy_ascii::mapper::is_blank;
/// assert!(is_blank("   \n  \n"));
/// assert!(!is_blank("  .\n"));
/// ```
#[must_use]
pub fn is_blank(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

fn check_frame(frame: &FrameBuffer) -> Result<(), CoreError> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() == expected {
        Ok(())
    } else {
        Err(CoreError::BufferSize {
            width: frame.width,
            height: frame.height,
            expected,
            actual: frame.data.len(),
        })
    }
}
