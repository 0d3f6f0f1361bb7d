use gy_core::frame::{AsciiCell, AsciiGrid, FrameBuffer};

/// Rendu demi-bloc (▄) de la cible brute, utilisé quand le texte est vide.
///
/// Chaque cellule couvre 2 pixels verticaux : le pixel du haut en bg, celui
/// du bas en fg. La cible étant rangée de bas en haut, la grille est
/// retournée verticalement.
///
/// # Example
/// ```
/// use gy_core::frame::{AsciiGrid, FrameBuffer};
/// use gy_ascii::halfblock::process_halfblock;
///
/// let mut frame = FrameBuffer::new(4, 4);
/// frame.set_pixel(0, 3, (200, 10, 10));
/// let mut grid = AsciiGrid::new(4, 2);
/// process_halfblock(&frame, &mut grid);
/// assert_eq!(grid.get(0, 0).ch, '▄');
/// assert_eq!(grid.get(0, 0).bg, (200, 10, 10));
/// ```
pub fn process_halfblock(frame: &FrameBuffer, grid: &mut AsciiGrid) {
    if frame.width == 0 || frame.height == 0 {
        grid.clear();
        return;
    }
    let pixel_h = u32::from(grid.height) * 2;
    let pixel_w = u32::from(grid.width);
    let last_row = frame.height - 1;

    for cy in 0..grid.height {
        for cx in 0..grid.width {
            let px = (u32::from(cx) * frame.width / pixel_w.max(1)).min(frame.width - 1);
            let top = (u32::from(cy) * 2 * frame.height / pixel_h.max(1)).min(last_row);
            let bot = ((u32::from(cy) * 2 + 1) * frame.height / pixel_h.max(1)).min(last_row);

            let (tr, tg, tb, _) = frame.pixel(px, last_row - top);
            let (br, bg, bb, _) = frame.pixel(px, last_row - bot);

            grid.set(
                cx,
                cy,
                AsciiCell {
                    ch: '▄',
                    fg: (br, bg, bb),
                    bg: (tr, tg, tb),
                },
            );
        }
    }
}
