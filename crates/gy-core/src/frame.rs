/// Cible off-screen RGBA8 du rasteriseur, relue par le mapper.
///
/// Lignes rangées de bas en haut (ligne 0 = bas de l'image), comme une
/// cible GL relue après rendu. Allouée une fois par session.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    /// RGBA, `width * height * 4` octets.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer pré-alloué aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use gy_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(120, 48);
    /// assert_eq!(fb.width, 120);
    /// assert_eq!(fb.height, 48);
    /// assert_eq!(fb.data.len(), 120 * 48 * 4);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Remplit tout le buffer avec une couleur unie.
    ///
    /// # Example
    /// ```
    /// use gy_core::frame::FrameBuffer;
    /// let mut fb = FrameBuffer::new(2, 2);
    /// fb.fill((128, 128, 128, 255));
    /// assert_eq!(fb.pixel(1, 1), (128, 128, 128, 255));
    /// ```
    pub fn fill(&mut self, rgba: (u8, u8, u8, u8)) {
        for px in self.data.chunks_exact_mut(4) {
            px[0] = rgba.0;
            px[1] = rgba.1;
            px[2] = rgba.2;
            px[3] = rgba.3;
        }
    }

    /// Pixel `(x, y)` en RGBA, `y` compté depuis le bas. Hors buffer → transparent.
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        if idx + 3 >= self.data.len() {
            return (0, 0, 0, 0);
        }
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Écrit un pixel opaque. Hors limites = no-op.
    #[inline(always)]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: (u8, u8, u8)) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.data[idx] = rgb.0;
        self.data[idx + 1] = rgb.1;
        self.data[idx + 2] = rgb.2;
        self.data[idx + 3] = 255;
    }
}

/// Luminance BT.709 à l'échelle 10⁴ : `R·2126 + G·7152 + B·722`.
///
/// Les poids somment à 10 000 : le blanc pur vaut exactement 255·10⁴.
///
/// # Example
/// ```
/// use gy_core::frame::luminance_scaled;
/// assert_eq!(luminance_scaled(255, 255, 255), 2_550_000);
/// ```
#[inline(always)]
#[must_use]
pub fn luminance_scaled(r: u8, g: u8, b: u8) -> u32 {
    u32::from(r) * 2126 + u32::from(g) * 7152 + u32::from(b) * 722
}

/// Glyphes prêts pour le terminal, ligne 0 en haut (inverse du [`FrameBuffer`]).
///
/// # Example
/// ```
/// use gy_core::frame::{AsciiCell, AsciiGrid};
/// let mut grid = AsciiGrid::new(120, 48);
/// grid.set(119, 47, AsciiCell { ch: 'x', fg: (0xd7, 0xff, 0xb3), bg: (0, 0, 0) });
/// assert_eq!(grid.get(119, 47).fg, (0xd7, 0xff, 0xb3));
/// ```
#[derive(Clone, Debug)]
pub struct AsciiGrid {
    /// Cellules ligne par ligne.
    pub cells: Vec<AsciiCell>,
    pub width: u16,
    pub height: u16,
}

/// Un glyphe et ses couleurs ; fond noir = fond du terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AsciiCell {
    pub ch: char,
    pub fg: (u8, u8, u8),
    pub bg: (u8, u8, u8),
}

impl Default for AsciiCell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: (0, 0, 0),
            bg: (0, 0, 0),
        }
    }
}

impl AsciiGrid {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            cells: vec![AsciiCell::default(); width as usize * height as usize],
            width,
            height,
        }
    }

    #[inline(always)]
    pub fn set(&mut self, x: u16, y: u16, cell: AsciiCell) {
        self.cells[y as usize * self.width as usize + x as usize] = cell;
    }

    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> &AsciiCell {
        &self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Remet toutes les cellules à blanc (espace sur noir).
    pub fn clear(&mut self) {
        self.cells.fill(AsciiCell::default());
    }
}
