use gy_core::frame::AsciiGrid;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::canvas;

/// Largeur du panneau de debug, bordure comprise.
pub const DEBUG_PANEL_WIDTH: u16 = 26;

/// État de la session vu par le rendu.
///
/// # Example
/// ```
/// use gy_render::ui::RenderState;
/// let state = RenderState::Running;
/// assert_ne!(state, RenderState::Faulted);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderState {
    /// Boucle active.
    Running,
    /// Aide affichée, la scène continue.
    Help,
    /// Un tick a échoué : plus aucun tick, bannière affichée.
    Faulted,
}

/// Valeurs affichées dans le panneau de debug.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DebugInfo {
    /// Taille de la cible off-screen.
    pub target: (u32, u32),
    pub scale_factor: f32,
    /// Longueur de l'axe cube → tétraèdre.
    pub axis_length: f32,
    /// Pointeur en NDC.
    pub pointer: [f32; 2],
    pub fps: f64,
    pub frame_time_ms: f64,
}

/// Tout ce qu'il faut pour dessiner une frame.
pub struct View<'a> {
    pub grid: &'a AsciiGrid,
    pub color: bool,
    /// La grille montre la cible brute (texte vide).
    pub raw_fallback: bool,
    pub debug: Option<&'a DebugInfo>,
    /// Texte complet de la bannière d'erreur.
    pub error: Option<&'a str>,
    pub state: RenderState,
}

/// Zone occupée par le canvas de glyphes dans `area`.
///
/// # Example
/// ```
/// use gy_render::ui::{canvas_area, DEBUG_PANEL_WIDTH};
/// use ratatui::layout::Rect;
/// let full = Rect::new(0, 0, 100, 40);
/// assert_eq!(canvas_area(full, false), full);
/// assert_eq!(canvas_area(full, true).width, 100 - DEBUG_PANEL_WIDTH);
/// ```
#[must_use]
pub fn canvas_area(area: Rect, show_debug: bool) -> Rect {
    if !show_debug {
        return area;
    }
    let chunks = Layout::horizontal([
        Constraint::Min(10),
        Constraint::Length(DEBUG_PANEL_WIDTH),
    ])
    .split(area);
    chunks[0]
}

/// Texte de la bannière affichée quand la boucle s'arrête sur une erreur.
///
/// # Example
/// ```
/// use gy_render::ui::error_banner;
/// assert_eq!(
///     error_banner("boom"),
///     "ERROR:\n\nRuntime error in render loop:\nboom"
/// );
/// ```
#[must_use]
pub fn error_banner(detail: &str) -> String {
    format!("ERROR:\n\nRuntime error in render loop:\n{detail}")
}

/// Draw the full UI: canvas, debug panel, overlays.
pub fn draw(frame: &mut Frame, view: &View<'_>) {
    let area = frame.area();
    let canvas_rect = canvas_area(area, view.debug.is_some());

    canvas::render_grid(frame.buffer_mut(), canvas_rect, view.grid, view.color);

    if view.raw_fallback {
        draw_blank_notice(frame, canvas_rect);
    }

    if let Some(debug) = view.debug {
        let panel = Rect {
            x: canvas_rect.right(),
            width: area.right().saturating_sub(canvas_rect.right()),
            ..area
        };
        draw_debug_panel(frame, panel, debug, view.state);
    }

    if let Some(message) = view.error {
        draw_error_banner(frame, canvas_rect, message);
    } else if view.state == RenderState::Help {
        draw_help_overlay(frame, area);
    }
}

fn draw_blank_notice(frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    let line = Rect {
        y: area.bottom() - 1,
        height: 1,
        ..area
    };
    let notice = Paragraph::new(Span::styled(
        " ASCII output blank, showing raw frame ",
        Style::default().fg(Color::Black).bg(Color::Yellow),
    ));
    frame.render_widget(notice, line);
}

fn draw_debug_panel(frame: &mut Frame, area: Rect, debug: &DebugInfo, state: RenderState) {
    let state_str = match state {
        RenderState::Running => "▶ RUN",
        RenderState::Help => "? HELP",
        RenderState::Faulted => "✖ HALTED",
    };
    let state_color = if state == RenderState::Faulted {
        Color::Red
    } else {
        Color::Green
    };

    let lines = vec![
        Line::from(Span::styled(state_str, Style::default().fg(state_color))),
        Line::from(""),
        Line::from(Span::styled("─ Target ──", Style::default().fg(Color::Yellow))),
        Line::from(format!(" Size: {}×{}", debug.target.0, debug.target.1)),
        Line::from(""),
        Line::from(Span::styled("─ Scene ───", Style::default().fg(Color::Yellow))),
        Line::from(format!(" Scale: {:.3}", debug.scale_factor)),
        Line::from(format!(" Axis: {:.3}", debug.axis_length)),
        Line::from(format!(" Ptr: {:+.2} {:+.2}", debug.pointer[0], debug.pointer[1])),
        Line::from(""),
        Line::from(Span::styled("─ Info ────", Style::default().fg(Color::Yellow))),
        Line::from(format!(" {:.0} FPS", debug.fps)),
        Line::from(format!(" {:.1}ms", debug.frame_time_ms)),
        Line::from(""),
        Line::from(Span::styled(" ? = help", Style::default().fg(Color::DarkGray))),
    ];

    let panel = Paragraph::new(lines).block(Block::default().borders(Borders::LEFT).title(" Debug "));
    frame.render_widget(panel, area);
}

fn draw_error_banner(frame: &mut Frame, area: Rect, message: &str) {
    let lines: Vec<Line> = message.lines().map(Line::from).collect();
    let width = area.width.min(60);
    let height = (lines.len() as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let banner_area = Rect::new(x, y, width, height);

    let banner = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" q to quit ")
                .style(Style::default().bg(Color::Black).fg(Color::Red)),
        );
    frame.render_widget(Clear, banner_area);
    frame.render_widget(banner, banner_area);
}

/// Draw the help overlay with all keybindings.
fn draw_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            " gyroscii — Controls ",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(" mouse    Aim the tetrahedron"),
        Line::from(" c        Toggle color"),
        Line::from(" d        Toggle debug panel"),
        Line::from(" q/Esc    Quit"),
        Line::from(" ?        Toggle help"),
        Line::from(""),
        Line::from(Span::styled(
            " Press ? or Esc to close ",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help_width = 34u16;
    let help_height = help_text.len() as u16 + 2;
    let x = area.x + area.width.saturating_sub(help_width) / 2;
    let y = area.y + area.height.saturating_sub(help_height) / 2;
    let help_area = Rect::new(x, y, help_width.min(area.width), help_height.min(area.height));

    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(Style::default().bg(Color::Black).fg(Color::White)),
    );

    frame.render_widget(Clear, help_area);
    frame.render_widget(help, help_area);
}

#[cfg(test)]
mod tests {
    use gy_core::frame::AsciiCell;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    fn render(view: &View<'_>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
        terminal.draw(|f| draw(f, view)).unwrap();
        screen_text(&terminal)
    }

    #[test]
    fn debug_panel_shows_scene_values() {
        let grid = AsciiGrid::new(120, 48);
        let debug = DebugInfo {
            target: (120, 48),
            scale_factor: 2.209,
            axis_length: 4.5,
            pointer: [0.5, -0.25],
            fps: 60.0,
            frame_time_ms: 16.6,
        };
        let text = render(&View {
            grid: &grid,
            color: true,
            raw_fallback: false,
            debug: Some(&debug),
            error: None,
            state: RenderState::Running,
        });
        assert!(text.contains("Size: 120×48"));
        assert!(text.contains("Scale: 2.209"));
        assert!(text.contains("Axis: 4.500"));
        assert!(text.contains("Ptr: +0.50 -0.25"));
        assert!(text.contains("60 FPS"));
    }

    #[test]
    fn error_banner_is_drawn_over_canvas() {
        let mut grid = AsciiGrid::new(120, 48);
        for cell in &mut grid.cells {
            *cell = AsciiCell { ch: '#', fg: (255, 255, 255), bg: (0, 0, 0) };
        }
        let message = error_banner("non-finite transform");
        let text = render(&View {
            grid: &grid,
            color: false,
            raw_fallback: false,
            debug: None,
            error: Some(&message),
            state: RenderState::Faulted,
        });
        assert!(text.contains("ERROR:"));
        assert!(text.contains("Runtime error in render loop:"));
        assert!(text.contains("non-finite transform"));
    }

    #[test]
    fn blank_notice_only_in_fallback() {
        let grid = AsciiGrid::new(120, 48);
        let mut view = View {
            grid: &grid,
            color: true,
            raw_fallback: true,
            debug: None,
            error: None,
            state: RenderState::Running,
        };
        assert!(render(&view).contains("showing raw frame"));
        view.raw_fallback = false;
        assert!(!render(&view).contains("showing raw frame"));
    }

    #[test]
    fn help_overlay_lists_controls() {
        let grid = AsciiGrid::new(10, 10);
        let text = render(&View {
            grid: &grid,
            color: true,
            raw_fallback: false,
            debug: None,
            error: None,
            state: RenderState::Help,
        });
        assert!(text.contains("Toggle debug panel"));
    }
}
