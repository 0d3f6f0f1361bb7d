use std::collections::VecDeque;
use std::time::Duration;

/// Compteur FPS par fenêtre glissante. Zéro allocation après init.
///
/// Alimenté par les instants d'une `FrameClock`, ce qui le rend
/// déterministe en mode headless.
///
/// # Example
/// ```
/// use gy_render::fps::FpsCounter;
/// use std::time::Duration;
///
/// let mut counter = FpsCounter::new(60);
/// for i in 0..=10 {
///     counter.tick(Duration::from_millis(i * 20));
/// }
/// assert!((counter.fps() - 50.0).abs() < 1e-6);
/// ```
pub struct FpsCounter {
    /// Instants des dernières N frames.
    timestamps: VecDeque<Duration>,
    window: usize,
    fps: f64,
    /// Temps de la dernière frame en ms (pour debug).
    pub frame_time_ms: f64,
}

impl FpsCounter {
    /// Create a new FPS counter with the given averaging window size.
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(2);
        Self {
            timestamps: VecDeque::with_capacity(window + 1),
            window,
            fps: 0.0,
            frame_time_ms: 0.0,
        }
    }

    /// Appeler une fois par frame, APRÈS le rendu.
    pub fn tick(&mut self, now: Duration) {
        if let Some(&last) = self.timestamps.back() {
            self.frame_time_ms = now.saturating_sub(last).as_secs_f64() * 1000.0;
        }
        self.timestamps.push_back(now);
        if self.timestamps.len() > self.window {
            self.timestamps.pop_front();
        }
        if let Some(&first) = self.timestamps.front()
            && self.timestamps.len() >= 2
        {
            let secs = now.saturating_sub(first).as_secs_f64();
            if secs > 0.0 {
                self.fps = (self.timestamps.len() - 1) as f64 / secs;
            }
        }
    }

    /// FPS moyen sur la fenêtre.
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }
}
