use gy_core::frame::AsciiGrid;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

/// Écrit directement une `AsciiGrid` dans un `ratatui::Buffer`.
///
/// Pas de widget Canvas ratatui, écriture directe. La grille est tronquée à
/// `area`. Sans couleur, seul le glyphe est écrit (couleurs du terminal).
///
/// # Example
/// ```
/// use gy_core::frame::{AsciiCell, AsciiGrid};
/// use gy_render::canvas::render_grid;
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
///
/// let mut grid = AsciiGrid::new(2, 1);
/// grid.set(1, 0, AsciiCell { ch: '#', fg: (255, 0, 0), bg: (0, 0, 0) });
/// let mut buf = Buffer::empty(Rect::new(0, 0, 4, 2));
/// render_grid(&mut buf, Rect::new(1, 1, 3, 1), &grid, true);
/// assert_eq!(buf[(2, 1)].symbol(), "#");
/// ```
pub fn render_grid(buf: &mut Buffer, area: Rect, grid: &AsciiGrid, color: bool) {
    for cy in 0..grid.height.min(area.height) {
        for cx in 0..grid.width.min(area.width) {
            let cell = grid.get(cx, cy);
            let Some(buf_cell) = buf.cell_mut((area.x + cx, area.y + cy)) else {
                continue;
            };
            buf_cell.set_char(cell.ch);
            if !color {
                continue;
            }
            buf_cell.set_fg(Color::Rgb(cell.fg.0, cell.fg.1, cell.fg.2));
            if cell.bg != (0, 0, 0) {
                buf_cell.set_bg(Color::Rgb(cell.bg.0, cell.bg.1, cell.bg.2));
            }
        }
    }
}
