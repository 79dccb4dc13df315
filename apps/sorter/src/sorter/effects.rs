//! Effects the sorter depends on — randomness, time, sleeping and narration.
//!
//! Each effect is a trait so hosts can swap the production backend for a
//! deterministic one without touching the sort loop. `Procrastinator` carries
//! them as trait objects.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ────────────────────────────────────────────────────────────────────────────
// Randomness
// ────────────────────────────────────────────────────────────────────────────

/// Uniform random numbers in `[0, 1)`.
pub trait RandomSource: Send {
    fn next_f64(&mut self) -> f64;
}

/// Adapts any `rand` generator.
pub struct RngSource<R>(pub R);

impl RngSource<StdRng> {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send> RandomSource for RngSource<R> {
    fn next_f64(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Replays a fixed script of values, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    /// Values outside `[0, 1)` are clamped into range. An empty script always yields 0.0.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let values = values
            .into_iter()
            .map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, MAX_UNIT) })
            .collect();
        Self { values, cursor: 0 }
    }
}

/// Largest f64 strictly below 1.0.
const MAX_UNIT: f64 = 1.0 - f64::EPSILON / 2.0;

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Time
// ────────────────────────────────────────────────────────────────────────────

/// Monotonically non-decreasing time reading, relative to an arbitrary origin.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
}

/// Suspends the current task. Cooperative hosts yield, blocking hosts park the thread.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Monotonic clock backed by `tokio::time::Instant` (honors paused test time).
#[derive(Debug, Clone)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Clock and sleeper in one: sleeping advances the reading instantly.
///
/// Clones share the same timeline, so hand one clone to `with_clock` and another
/// to `with_sleeper`.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    inner: Arc<Mutex<VirtualTimeline>>,
}

#[derive(Debug, Default)]
struct VirtualTimeline {
    now: Duration,
    sleeps: Vec<Duration>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every duration passed to `sleep`, in call order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.timeline().sleeps.clone()
    }

    pub fn advance(&self, by: Duration) {
        self.timeline().now += by;
    }

    fn timeline(&self) -> MutexGuard<'_, VirtualTimeline> {
        // A poisoned timeline is still a valid timeline.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        self.timeline().now
    }
}

#[async_trait]
impl Sleeper for VirtualClock {
    async fn sleep(&self, duration: Duration) {
        let mut timeline = self.timeline();
        timeline.now += duration;
        timeline.sleeps.push(duration);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Narration
// ────────────────────────────────────────────────────────────────────────────

/// Line-oriented sink for verbose narration. Fire-and-forget.
pub trait Narrator: Send + Sync {
    fn line(&self, line: &str);
}

/// Emits each narration line as a `tracing` info event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNarrator;

impl Narrator for TracingNarrator {
    fn line(&self, line: &str) {
        tracing::info!(target: "procrastination_sort::narration", "{line}");
    }
}

/// Buffers narration in memory.
#[derive(Debug, Clone, Default)]
pub struct CollectingNarrator {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CollectingNarrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Narrator for CollectingNarrator {
    fn line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_random_cycles_and_clamps() {
        let mut random = ScriptedRandom::new([0.25, 1.0, -3.0]);
        assert_eq!(random.next_f64(), 0.25);
        let high = random.next_f64();
        assert!(high < 1.0 && high > 0.99);
        assert_eq!(random.next_f64(), 0.0);
        assert_eq!(random.next_f64(), 0.25);
    }

    #[test]
    fn test_empty_script_yields_zero() {
        let mut random = ScriptedRandom::new([]);
        assert_eq!(random.next_f64(), 0.0);
    }

    #[test]
    fn test_seeded_rng_is_reproducible_and_in_range() {
        let mut a = RngSource::seeded(42);
        let mut b = RngSource::seeded(42);
        for _ in 0..100 {
            let v = a.next_f64();
            assert!((0.0..1.0).contains(&v));
            assert_eq!(v, b.next_f64());
        }
    }

    #[tokio::test]
    async fn test_virtual_clock_advances_on_sleep() {
        let clock = VirtualClock::new();
        let sleeper = clock.clone();
        sleeper.sleep(Duration::from_millis(700)).await;
        sleeper.sleep(Duration::from_millis(300)).await;
        assert_eq!(clock.now(), Duration::from_secs(1));
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_millis(700), Duration::from_millis(300)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_sleeper_moves_tokio_clock() {
        let clock = TokioClock::new();
        TokioSleeper.sleep(Duration::from_millis(1500)).await;
        assert!(clock.now() >= Duration::from_millis(1500));
    }

    #[test]
    fn test_collecting_narrator_keeps_order() {
        let narrator = CollectingNarrator::new();
        narrator.line("first");
        narrator.line("second");
        assert_eq!(narrator.lines(), vec!["first", "second"]);
    }
}
