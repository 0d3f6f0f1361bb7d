use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use glam::Vec2;
use gy_ascii::halfblock::process_halfblock;
use gy_ascii::mapper::{GlyphMapper, is_blank};
use gy_core::clock::Throttle;
use gy_core::config::SceneConfig;
use gy_core::frame::AsciiGrid;
use gy_core::{ASCII_COLS, ASCII_ROWS};
use gy_render::ui::{DebugInfo, error_banner};
use gy_scene::rasterizer::FrameRasterizer;

use crate::error::TickError;

thread_local! {
    /// Vrai pendant l'exécution d'un tick (voir [`install_panic_hook`]).
    static IN_TICK: Cell<bool> = const { Cell::new(false) };
}

/// Ce qu'a fait un appel à [`Session::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Scène avancée, conversion texte sautée (throttle).
    Ticked,
    /// Scène avancée et texte régénéré.
    Converted,
    /// Le tick a échoué ; la session est arrêtée.
    Faulted,
    /// Session déjà arrêtée, rien fait.
    Halted,
}

/// Toute la scène et la conversion texte, sans terminal.
///
/// Possède la scène, la cible off-screen, le texte et les grilles d'affichage.
/// Ticks pilotés par l'hôte (boucle TUI ou headless).
pub struct Session {
    config: Arc<ArcSwap<SceneConfig>>,
    rasterizer: FrameRasterizer,
    mapper: GlyphMapper,
    /// Rampe source du mapper, pour détecter un rechargement.
    ramp_source: String,
    throttle: Throttle,
    text: String,
    grid: AsciiGrid,
    raw_grid: AsciiGrid,
    raw_fallback: bool,
    pointer_ndc: Vec2,
    viewport: (f32, f32),
    last_tick: Option<Duration>,
    fault: Option<String>,
    stop: Arc<AtomicBool>,
}

impl Session {
    /// Construit la scène pour un viewport `(largeur, hauteur)`.
    ///
    /// # Errors
    /// Returns an error if the configured glyph ramp is invalid.
    pub fn new(
        config: Arc<ArcSwap<SceneConfig>>,
        viewport: (f32, f32),
        stop: Arc<AtomicBool>,
    ) -> Result<Self> {
        let snapshot = config.load_full();
        let ramp = snapshot
            .glyph_ramp()
            .context("Rampe de glyphes invalide")?;
        let rasterizer = FrameRasterizer::new(ASCII_COLS, ASCII_ROWS, viewport, &snapshot);
        log::info!(
            "Session {}×{}, viewport {:.0}×{:.0}, scale {:.3}",
            ASCII_COLS,
            ASCII_ROWS,
            viewport.0,
            viewport.1,
            rasterizer.layout().scale_factor
        );
        Ok(Self {
            rasterizer,
            mapper: GlyphMapper::new(ramp),
            ramp_source: snapshot.ramp.clone(),
            throttle: Throttle::new(Duration::from_millis(snapshot.ascii_interval_ms)),
            text: String::with_capacity((ASCII_COLS as usize + 1) * ASCII_ROWS as usize),
            grid: AsciiGrid::new(ASCII_COLS as u16, ASCII_ROWS as u16),
            raw_grid: AsciiGrid::new(ASCII_COLS as u16, (ASCII_ROWS / 2) as u16),
            raw_fallback: false,
            pointer_ndc: Vec2::ZERO,
            viewport,
            last_tick: None,
            fault: None,
            stop,
            config,
        })
    }

    /// Un tour de boucle à l'instant `now`.
    ///
    /// Une erreur ou une panic pendant le tick arrête définitivement la
    /// session, vide la surface de glyphes et prépare la bannière d'erreur.
    pub fn step(&mut self, now: Duration) -> StepOutcome {
        if self.fault.is_some() {
            return StepOutcome::Halted;
        }
        match guarded(|| self.tick(now)) {
            Ok(true) => StepOutcome::Converted,
            Ok(false) => StepOutcome::Ticked,
            Err(e) => {
                log::error!("Boucle de rendu arrêtée : {e}");
                self.fault = Some(error_banner(&e.to_string()));
                self.text.clear();
                self.grid.clear();
                self.raw_grid.clear();
                StepOutcome::Faulted
            }
        }
    }

    /// Avance la scène ; renvoie `true` si le texte a été régénéré.
    fn tick(&mut self, now: Duration) -> Result<bool, TickError> {
        let config = self.config.load();
        let dt = self
            .last_tick
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last_tick = Some(now);

        self.rasterizer.tick(dt, self.pointer_ndc, &config)?;

        self.throttle
            .set_interval(Duration::from_millis(config.ascii_interval_ms));
        if !self.throttle.ready(now) {
            return Ok(false);
        }

        if config.ramp != self.ramp_source {
            self.mapper.set_ramp(config.glyph_ramp()?);
            self.ramp_source.clone_from(&config.ramp);
        }

        let frame = self.rasterizer.frame();
        self.mapper.write_text(frame, &mut self.text)?;
        self.raw_fallback = is_blank(&self.text);
        if self.raw_fallback {
            process_halfblock(frame, &mut self.raw_grid);
        } else {
            self.mapper.map_grid(frame, &mut self.grid)?;
        }
        Ok(true)
    }

    /// Position du pointeur en NDC ([-1, 1], y vers le haut).
    pub fn set_pointer_ndc(&mut self, ndc: Vec2) {
        if ndc.is_finite() {
            self.pointer_ndc = ndc;
        }
    }

    /// Nouveau viewport en unités d'affichage.
    pub fn resize(&mut self, width: f32, height: f32) {
        if (width, height) == self.viewport {
            return;
        }
        self.viewport = (width, height);
        let config = self.config.load();
        self.rasterizer.resize(width, height, &config);
    }

    /// Dernier bloc de texte converti.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Grille à afficher : glyphes, ou demi-blocs si le texte est vide.
    #[must_use]
    pub fn display_grid(&self) -> &AsciiGrid {
        if self.raw_fallback {
            &self.raw_grid
        } else {
            &self.grid
        }
    }

    #[must_use]
    pub fn raw_fallback(&self) -> bool {
        self.raw_fallback
    }

    /// Bannière d'erreur, si la boucle s'est arrêtée.
    #[must_use]
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// Demande l'arrêt de la boucle.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Valeurs du panneau de debug.
    #[must_use]
    pub fn debug_info(&self, fps: f64, frame_time_ms: f64) -> DebugInfo {
        let frame = self.rasterizer.frame();
        DebugInfo {
            target: (frame.width, frame.height),
            scale_factor: self.rasterizer.layout().scale_factor,
            axis_length: self.rasterizer.axis_length(),
            pointer: self.pointer_ndc.to_array(),
            fps,
            frame_time_ms,
        }
    }

    #[cfg(test)]
    pub(crate) fn rasterizer_mut(&mut self) -> &mut FrameRasterizer {
        &mut self.rasterizer
    }
}

/// Exécute un tick en convertissant une panic en [`TickError::Panic`].
pub(crate) fn guarded<T>(f: impl FnOnce() -> Result<T, TickError>) -> Result<T, TickError> {
    IN_TICK.with(|flag| flag.set(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    IN_TICK.with(|flag| flag.set(false));
    match result {
        Ok(inner) => inner,
        Err(payload) => Err(TickError::Panic(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Chaîne le hook de panic : pendant un tick la panic est seulement loguée
/// (elle sera affichée dans la bannière), ailleurs le hook précédent
/// s'applique (restauration du terminal).
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if IN_TICK.with(Cell::get) {
            log::error!("Panic dans le tick : {info}");
        } else {
            previous(info);
        }
    }));
}

/// Convertit une cellule terminal en NDC relatifs au canvas.
///
/// `x = col/w·2 − 1`, `y = −(row/h·2 − 1)`. Hors canvas → bornes.
#[must_use]
pub fn pointer_ndc(column: u16, row: u16, origin: (u16, u16), size: (u16, u16)) -> Vec2 {
    let w = f32::from(size.0.max(1));
    let h = f32::from(size.1.max(1));
    let col = f32::from(column.saturating_sub(origin.0));
    let row = f32::from(row.saturating_sub(origin.1));
    let x = (col / w * 2.0 - 1.0).clamp(-1.0, 1.0);
    let y = -(row / h * 2.0 - 1.0).clamp(-1.0, 1.0);
    Vec2::new(x, y)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use gy_core::clock::{FrameClock, ManualClock};

    use super::*;

    fn session_with(config: SceneConfig) -> Session {
        Session::new(
            Arc::new(ArcSwap::from_pointee(config)),
            (120.0, 96.0),
            Arc::new(AtomicBool::new(false)),
        )
        .unwrap()
    }

    #[test]
    fn conversion_is_throttled_to_interval() {
        let mut session = session_with(SceneConfig::default());
        let mut clock = ManualClock::new(Duration::from_millis(16));
        let mut converted = Vec::new();
        for i in 0..10 {
            if session.step(clock.now()) == StepOutcome::Converted {
                converted.push(i);
            }
            clock.advance();
        }
        assert_eq!(converted, [0, 4, 8]);
    }

    #[test]
    fn text_has_fixed_shape() {
        let mut session = session_with(SceneConfig::default());
        assert_eq!(session.step(Duration::ZERO), StepOutcome::Converted);
        let lines: Vec<&str> = session.text().lines().collect();
        assert_eq!(lines.len(), ASCII_ROWS as usize);
        assert!(lines.iter().all(|l| l.chars().count() == ASCII_COLS as usize));
        assert!(!session.raw_fallback());
    }

    #[test]
    fn fault_halts_further_ticks() {
        let mut session = session_with(SceneConfig::default());
        assert_eq!(session.step(Duration::ZERO), StepOutcome::Converted);
        assert!(session.display_grid().cells.iter().any(|c| c.ch != ' '));
        let cube = session.rasterizer_mut().chain().cube_pivot;
        session
            .rasterizer_mut()
            .graph_mut()
            .node_mut(cube)
            .position = Vec3::splat(f32::NAN);
        assert_eq!(session.step(Duration::from_millis(100)), StepOutcome::Faulted);
        let banner = session.fault().unwrap();
        assert!(banner.starts_with("ERROR:\n\nRuntime error in render loop:\n"));
        assert_eq!(session.step(Duration::from_millis(200)), StepOutcome::Halted);
        // surface vidée : seule la bannière reste visible
        assert!(session.text().is_empty());
        assert!(session.display_grid().cells.iter().all(|c| c.ch == ' '));
    }

    #[test]
    fn panic_becomes_tick_error() {
        let result: Result<(), TickError> = guarded(|| panic!("rasterizer exploded"));
        match result {
            Err(TickError::Panic(msg)) => assert_eq!(msg, "rasterizer exploded"),
            other => panic!("unexpected {other:?}"),
        }
        let formatted: Result<(), TickError> = guarded(|| panic!("index {}", 7));
        assert!(matches!(formatted, Err(TickError::Panic(m)) if m == "index 7"));
    }

    #[test]
    fn reloaded_ramp_is_picked_up() {
        let config = Arc::new(ArcSwap::from_pointee(SceneConfig::default()));
        let mut session = Session::new(
            Arc::clone(&config),
            (120.0, 96.0),
            Arc::new(AtomicBool::new(false)),
        )
        .unwrap();
        session.step(Duration::ZERO);
        config.store(Arc::new(SceneConfig {
            ramp: "-#".to_string(),
            ..SceneConfig::default()
        }));
        assert_eq!(session.step(Duration::from_secs(1)), StepOutcome::Converted);
        // Seul le blanc pur atteint '#' : tout le reste tombe sur '-'.
        assert!(session.text().chars().all(|c| matches!(c, '-' | '#' | '\n')));
        assert!(session.text().contains('-'));
    }

    #[test]
    fn stop_flag_is_shared() {
        let stop = Arc::new(AtomicBool::new(false));
        let session = Session::new(
            Arc::new(ArcSwap::from_pointee(SceneConfig::default())),
            (120.0, 96.0),
            Arc::clone(&stop),
        )
        .unwrap();
        assert!(!session.should_stop());
        stop.store(true, Ordering::Relaxed);
        assert!(session.should_stop());
    }

    #[test]
    fn pointer_maps_canvas_corners() {
        let size = (100, 40);
        assert_eq!(pointer_ndc(0, 0, (0, 0), size), Vec2::new(-1.0, 1.0));
        assert_eq!(pointer_ndc(50, 20, (0, 0), size), Vec2::ZERO);
        assert_eq!(pointer_ndc(10, 5, (10, 5), size), Vec2::new(-1.0, 1.0));
        let outside = pointer_ndc(500, 500, (0, 0), size);
        assert_eq!(outside, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn debug_info_reports_target() {
        let session = session_with(SceneConfig::default());
        let info = session.debug_info(60.0, 16.0);
        assert_eq!(info.target, (ASCII_COLS, ASCII_ROWS));
        assert!(info.axis_length > 0.0);
        assert!((0.5..=4.0).contains(&info.scale_factor));
    }
}
