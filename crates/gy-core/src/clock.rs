use std::time::{Duration, Instant};

/// Source de temps fournie par l'hôte pour cadencer la boucle de rendu.
///
/// Renvoie le temps écoulé depuis la création de l'horloge.
///
/// # Example
/// ```
/// use gy_core::clock::{FrameClock, ManualClock};
/// use std::time::Duration;
///
/// let mut clock = ManualClock::new(Duration::from_millis(16));
/// assert_eq!(clock.now(), Duration::ZERO);
/// clock.advance();
/// assert_eq!(clock.now(), Duration::from_millis(16));
/// ```
pub trait FrameClock {
    /// Temps écoulé depuis le démarrage.
    fn now(&mut self) -> Duration;
}

/// Horloge murale monotone.
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn now(&mut self) -> Duration {
        self.start.elapsed()
    }
}

/// Horloge à pas fixe, avancée explicitement (mode headless, tests).
pub struct ManualClock {
    now: Duration,
    step: Duration,
}

impl ManualClock {
    #[must_use]
    pub fn new(step: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            step,
        }
    }

    /// Avance d'un pas.
    pub fn advance(&mut self) {
        self.now += self.step;
    }
}

impl FrameClock for ManualClock {
    fn now(&mut self) -> Duration {
        self.now
    }
}

/// Limite une opération coûteuse à au plus une exécution par intervalle.
///
/// Le premier appel passe toujours ; ensuite il faut que strictement plus que
/// `interval` se soit écoulé depuis la dernière exécution acceptée.
///
/// # Example
/// ```
/// use gy_core::clock::Throttle;
/// use std::time::Duration;
///
/// let mut t = Throttle::new(Duration::from_millis(50));
/// assert!(t.ready(Duration::from_millis(0)));
/// assert!(!t.ready(Duration::from_millis(50)));
/// assert!(t.ready(Duration::from_millis(51)));
/// ```
#[derive(Clone, Debug)]
pub struct Throttle {
    interval: Duration,
    last: Option<Duration>,
}

impl Throttle {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Met à jour l'intervalle (config rechargée) sans perdre la dernière échéance.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Returns `true` and records `now` if the interval has elapsed.
    pub fn ready(&mut self, now: Duration) -> bool {
        let due = match self.last {
            None => true,
            Some(last) => now.saturating_sub(last) > self.interval,
        };
        if due {
            self.last = Some(now);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_fires_every_fourth_tick_at_16ms() {
        let mut clock = ManualClock::new(Duration::from_millis(16));
        let mut throttle = Throttle::new(Duration::from_millis(50));
        let mut fired = Vec::new();
        for i in 0..10 {
            if throttle.ready(clock.now()) {
                fired.push(i);
            }
            clock.advance();
        }
        // 0ms, 64ms, 128ms
        assert_eq!(fired, vec![0, 4, 8]);
    }

    #[test]
    fn throttle_never_fires_twice_for_same_instant() {
        let mut throttle = Throttle::new(Duration::ZERO);
        assert!(throttle.ready(Duration::from_millis(5)));
        assert!(!throttle.ready(Duration::from_millis(5)));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let mut clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
