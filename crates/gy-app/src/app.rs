use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::Result;
use arc_swap::ArcSwap;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use gy_core::clock::{FrameClock, SystemClock};
use gy_core::config::SceneConfig;
use gy_render::fps::FpsCounter;
use gy_render::ui::{self, RenderState, View};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;

use crate::session::{self, Session};

/// Application state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppState {
    /// L'application est en cours d'exécution normale.
    Running,
    /// Overlay d'aide affiché (touche ?).
    Help,
    /// Fermeture de l'application. Doit se terminer au prochain tour de boucle.
    Quitting,
}

/// Boucle TUI : événements, tick de la session, dessin.
pub struct App {
    pub state: AppState,
    /// Config courante (lecture via arc-swap, écrite aussi par le watcher).
    pub config: Arc<ArcSwap<SceneConfig>>,
    session: Session,
    clock: SystemClock,
    fps_counter: FpsCounter,
    /// Zone du canvas dans le terminal, pour convertir la souris.
    canvas: Rect,
    terminal_area: Rect,
}

impl App {
    /// Construit l'app pour un terminal de taille `area`.
    ///
    /// # Errors
    /// Returns an error if the session cannot be built.
    pub fn new(config: Arc<ArcSwap<SceneConfig>>, area: Rect, stop: Arc<AtomicBool>) -> Result<Self> {
        let snapshot = config.load_full();
        let canvas = ui::canvas_area(area, snapshot.show_debug);
        let session = Session::new(
            Arc::clone(&config),
            viewport_of(canvas, snapshot.cell_aspect),
            stop,
        )?;
        Ok(Self {
            state: AppState::Running,
            config,
            session,
            clock: SystemClock::new(),
            fps_counter: FpsCounter::new(60),
            canvas,
            terminal_area: area,
        })
    }

    /// Main event loop.
    ///
    /// # Errors
    /// Returns an error if terminal operations fail.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let mut last_frame = self.clock.now();

        loop {
            if self.session.should_stop() {
                self.state = AppState::Quitting;
            }
            if self.state == AppState::Quitting {
                break;
            }

            // === Calcul du frame timing ===
            let frame_duration =
                Duration::from_secs_f64(1.0 / f64::from(self.config.load().target_fps.max(1)));

            let now = self.clock.now();
            let elapsed = now.saturating_sub(last_frame);
            if elapsed < frame_duration {
                // Dormir le temps restant, mais rester réactif aux événements
                if event::poll(frame_duration - elapsed)? {
                    self.handle_event(&event::read()?);
                }
                continue;
            }
            last_frame = now;

            // === Polling événements non-bloquant ===
            while event::poll(Duration::ZERO)? {
                self.handle_event(&event::read()?);
            }

            self.check_layout(terminal.size()?.into());

            // === Tick ===
            self.session.step(now);
            self.fps_counter.tick(now);

            // === Dessin ===
            let config = self.config.load();
            let debug = config.show_debug.then(|| {
                self.session
                    .debug_info(self.fps_counter.fps(), self.fps_counter.frame_time_ms)
            });
            let view = View {
                grid: self.session.display_grid(),
                color: config.color_enabled,
                raw_fallback: self.session.raw_fallback(),
                debug: debug.as_ref(),
                error: self.session.fault(),
                state: self.render_state(),
            };
            terminal.draw(|frame| ui::draw(frame, &view))?;
        }
        Ok(())
    }

    /// Convert `AppState` to `RenderState` for the UI.
    fn render_state(&self) -> RenderState {
        if self.session.fault().is_some() {
            RenderState::Faulted
        } else if self.state == AppState::Help {
            RenderState::Help
        } else {
            RenderState::Running
        }
    }

    fn handle_event(&mut self, event: &Event) {
        match *event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code, modifiers),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Moved | MouseEventKind::Drag(_),
                column,
                row,
                ..
            }) => {
                let ndc = session::pointer_ndc(
                    column,
                    row,
                    (self.canvas.x, self.canvas.y),
                    (self.canvas.width, self.canvas.height),
                );
                self.session.set_pointer_ndc(ndc);
            }
            Event::Resize(width, height) => {
                self.check_layout(Rect::new(0, 0, width, height));
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if code == KeyCode::Char('c') {
                self.session.request_stop();
            }
            return;
        }
        match code {
            KeyCode::Char('q') => self.session.request_stop(),
            KeyCode::Esc => {
                if self.state == AppState::Help {
                    self.state = AppState::Running;
                } else {
                    self.session.request_stop();
                }
            }
            KeyCode::Char('?') => {
                self.state = if self.state == AppState::Help {
                    AppState::Running
                } else {
                    AppState::Help
                };
            }
            KeyCode::Char('c') => self.toggle_config(|c| c.color_enabled = !c.color_enabled),
            KeyCode::Char('d') => self.toggle_config(|c| c.show_debug = !c.show_debug),
            _ => {}
        }
    }

    /// Helper to atomically update config.
    fn toggle_config(&mut self, mutate: impl FnOnce(&mut SceneConfig)) {
        let config = self.config.load();
        let mut new = (**config).clone();
        mutate(&mut new);
        self.config.store(Arc::new(new));
    }

    /// Recalcule la zone du canvas et le viewport de la scène si le terminal
    /// ou le panneau de debug ont changé.
    fn check_layout(&mut self, area: Rect) {
        let config = self.config.load();
        let canvas = ui::canvas_area(area, config.show_debug);
        if area == self.terminal_area && canvas == self.canvas {
            return;
        }
        self.terminal_area = area;
        self.canvas = canvas;
        let (w, h) = viewport_of(canvas, config.cell_aspect);
        self.session.resize(w, h);
        log::debug!("Canvas {}×{}", canvas.width, canvas.height);
    }
}

/// Viewport en unités d'affichage : colonnes × (lignes × ratio de cellule).
fn viewport_of(canvas: Rect, cell_aspect: f32) -> (f32, f32) {
    (
        f32::from(canvas.width),
        f32::from(canvas.height) * cell_aspect,
    )
}
