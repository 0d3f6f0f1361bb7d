use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use gy_core::clock::{FrameClock, ManualClock};
use gy_core::config::SceneConfig;
use gy_core::{ASCII_COLS, ASCII_ROWS};

use crate::session::{Session, StepOutcome};

/// Exécute `frames` ticks à pas fixe et écrit chaque bloc converti dans `out`.
///
/// Les blocs sont séparés par une ligne vide. Un tick en faute écrit la
/// bannière d'erreur et termine en erreur.
///
/// # Errors
/// Returns an error if the session cannot be built, if writing fails, or if
/// a tick faults.
pub fn run_headless(
    config: &Arc<ArcSwap<SceneConfig>>,
    frames: u64,
    stop: &Arc<AtomicBool>,
    out: &mut impl Write,
) -> Result<u64> {
    let snapshot = config.load();
    let step = fixed_step(snapshot.target_fps);
    let viewport = (
        ASCII_COLS as f32,
        ASCII_ROWS as f32 * snapshot.cell_aspect,
    );
    drop(snapshot);

    let mut session = Session::new(Arc::clone(config), viewport, Arc::clone(stop))?;
    let mut clock = ManualClock::new(step);
    let mut blocks = 0u64;

    for _ in 0..frames {
        if session.should_stop() {
            log::info!("Arrêt demandé après {blocks} blocs");
            break;
        }
        match session.step(clock.now()) {
            StepOutcome::Converted => {
                if blocks > 0 {
                    writeln!(out)?;
                }
                out.write_all(session.text().as_bytes())?;
                blocks += 1;
            }
            StepOutcome::Ticked => {}
            StepOutcome::Faulted | StepOutcome::Halted => {
                let banner = session.fault().unwrap_or_default();
                writeln!(out, "{banner}")?;
                out.flush()?;
                anyhow::bail!("Boucle de rendu arrêtée");
            }
        }
        clock.advance();
    }
    out.flush()?;
    Ok(blocks)
}

/// Mode headless sur stdout, Ctrl-C lève le drapeau d'arrêt.
///
/// # Errors
/// See [`run_headless`].
pub fn run_stdout(config: &Arc<ArcSwap<SceneConfig>>, frames: u64) -> Result<()> {
    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || handler_stop.store(true, Ordering::Relaxed))
        .context("Impossible d'installer le handler Ctrl-C")?;

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    match run_headless(config, frames, &stop, &mut out) {
        Ok(blocks) => {
            log::info!("{blocks} blocs écrits");
            Ok(())
        }
        Err(e) if is_broken_pipe(&e) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Pas d'horloge headless en nanosecondes entières, tronqué.
fn fixed_step(fps: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(fps.max(1)))
}

fn is_broken_pipe(e: &anyhow::Error) -> bool {
    e.downcast_ref::<io::Error>()
        .is_some_and(|io| io.kind() == io::ErrorKind::BrokenPipe)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared(config: SceneConfig) -> Arc<ArcSwap<SceneConfig>> {
        Arc::new(ArcSwap::from_pointee(config))
    }

    #[test]
    fn prints_throttled_blocks() {
        // 60 FPS → pas de 16 666 666 ns, 3 pas = 49.999998 ms : ticks 0, 4, 8.
        let config = shared(SceneConfig::default());
        let stop = Arc::new(AtomicBool::new(false));
        let mut out = Vec::new();
        let blocks = run_headless(&config, 10, &stop, &mut out).unwrap();
        assert_eq!(blocks, 3);
        let text = String::from_utf8(out).unwrap();
        let block_len = ASCII_ROWS as usize;
        assert_eq!(text.lines().count(), blocks as usize * block_len + 2);
    }

    #[test]
    fn fixed_step_never_rounds_up() {
        assert_eq!(fixed_step(60), Duration::from_nanos(16_666_666));
        assert!(fixed_step(60) * 3 <= Duration::from_millis(50));
        assert_eq!(fixed_step(0), Duration::from_secs(1));
    }

    #[test]
    fn stop_flag_ends_early() {
        let config = shared(SceneConfig::default());
        let stop = Arc::new(AtomicBool::new(true));
        let mut out = Vec::new();
        assert_eq!(run_headless(&config, 10, &stop, &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn every_block_has_fixed_shape() {
        let config = shared(SceneConfig::default());
        let stop = Arc::new(AtomicBool::new(false));
        let mut out = Vec::new();
        run_headless(&config, 1, &stop, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), ASCII_ROWS as usize);
        assert!(text.lines().all(|l| l.chars().count() == ASCII_COLS as usize));
    }
}
