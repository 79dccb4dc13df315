//! Procrastinating Sorter — bubble-sorts one swap at a time, with breaks.
//!
//! # Loop
//! Each iteration first rolls against `procrastination_probability`:
//! - hit: pick an excuse, take a coffee, sleep a uniform delay in `[min, max)`;
//! - miss: swap the first out-of-order adjacent pair, re-check the whole sequence,
//!   and take a coffee break if work was done but the job isn't finished.
//!
//! Random draws are consumed in the order decision, excuse index, delay. With a
//! scripted `RandomSource` and a `VirtualClock` a run is fully reproducible.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::errors::SortError;
use crate::sorter::effects::{
    Clock, Narrator, RandomSource, RngSource, Sleeper, TokioClock, TokioSleeper, TracingNarrator,
};
use crate::sorter::options::SortOptions;

/// Outcome of a completed run. Returned exactly once; there are no partial results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcrastinationResult<T> {
    /// The input vector, reordered in place.
    pub sorted_array: Vec<T>,
    /// Whole-run duration, procrastination included.
    #[serde(rename = "time_elapsed_ms", serialize_with = "serialize_millis")]
    pub time_elapsed: Duration,
    pub swaps_made: u64,
    /// Procrastination events plus post-swap breaks.
    pub coffee_cups: u64,
    /// One entry per procrastination event, in order.
    pub excuses_used: Vec<String>,
}

fn serialize_millis<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64() * 1000.0)
}

/// Runs procrastinating sorts against a set of injected effects.
pub struct Procrastinator {
    random: Box<dyn RandomSource>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn Sleeper>,
    narrator: Arc<dyn Narrator>,
}

impl Procrastinator {
    /// Production wiring: entropy-seeded RNG, tokio time, `tracing` narration.
    pub fn system() -> Self {
        Self {
            random: Box::new(RngSource::from_entropy()),
            clock: Arc::new(TokioClock::new()),
            sleeper: Arc::new(TokioSleeper),
            narrator: Arc::new(TracingNarrator),
        }
    }

    pub fn with_random(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Box::new(random);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    pub fn with_narrator(mut self, narrator: Arc<dyn Narrator>) -> Self {
        self.narrator = narrator;
        self
    }

    /// Sorts by the type's natural order.
    pub async fn sort<T>(
        &mut self,
        items: Vec<T>,
        options: &SortOptions,
    ) -> Result<ProcrastinationResult<T>, SortError>
    where
        T: Ord + Send,
    {
        self.sort_by(items, options, T::cmp).await
    }

    /// Sorts with a three-way comparator (`Less` means `a` belongs before `b`).
    pub async fn sort_by<T, F>(
        &mut self,
        items: Vec<T>,
        options: &SortOptions,
        mut compare: F,
    ) -> Result<ProcrastinationResult<T>, SortError>
    where
        T: Send,
        F: FnMut(&T, &T) -> Ordering + Send,
    {
        self.try_sort_by(items, options, |a, b| Ok(compare(a, b)))
            .await
    }

    /// Sorts with a fallible comparator. The first comparator error aborts the run.
    pub async fn try_sort_by<T, F>(
        &mut self,
        mut items: Vec<T>,
        options: &SortOptions,
        mut compare: F,
    ) -> Result<ProcrastinationResult<T>, SortError>
    where
        T: Send,
        F: FnMut(&T, &T) -> Result<Ordering, SortError> + Send,
    {
        options.validate()?;

        let started = self.clock.now();
        let mut sorted = false;
        let mut swaps_made = 0u64;
        let mut coffee_cups = 0u64;
        let mut excuses_used = Vec::new();

        while !sorted {
            self.narrate(options, || "Trying to sort...".to_string());

            if self.random.next_f64() < options.procrastination_probability {
                let excuse = self.pick_excuse(&options.procrastination_activities);
                self.narrate(options, || excuse.clone());
                excuses_used.push(excuse);
                coffee_cups += 1;

                let delay = self.pick_delay(options.min_delay, options.max_delay);
                self.sleeper.sleep(delay).await;
                continue;
            }

            self.narrate(options, || "Decided to actually sort!".to_string());

            let swapped_at = swap_first_inversion(&mut items, &mut compare)?;
            if let Some(i) = swapped_at {
                swaps_made += 1;
                debug!(index = i, swaps_made, "swapped adjacent pair");
                self.narrate(options, || {
                    format!("Swapped elements at index {i} and {}...", i + 1)
                });
            }

            sorted = is_sorted_by(&items, &mut compare)?;

            if !sorted && swapped_at.is_some() {
                coffee_cups += 1;
                self.narrate(options, || format!("Taking coffee break #{coffee_cups}..."));
            }
        }

        let time_elapsed = self.clock.now().saturating_sub(started);

        info!(
            len = items.len(),
            swaps_made,
            coffee_cups,
            excuses = excuses_used.len(),
            elapsed_ms = time_elapsed.as_millis() as u64,
            "procrastination sort finished"
        );

        if options.verbose {
            self.narrate_summary(time_elapsed, swaps_made, coffee_cups, &excuses_used);
        }

        Ok(ProcrastinationResult {
            sorted_array: items,
            time_elapsed,
            swaps_made,
            coffee_cups,
            excuses_used,
        })
    }

    fn pick_excuse(&mut self, activities: &[String]) -> String {
        let idx = (self.random.next_f64() * activities.len() as f64) as usize;
        activities[idx.min(activities.len() - 1)].clone()
    }

    fn pick_delay(&mut self, min: Duration, max: Duration) -> Duration {
        let span = max.saturating_sub(min);
        min + span.mul_f64(self.random.next_f64())
    }

    fn narrate(&self, options: &SortOptions, line: impl FnOnce() -> String) {
        if options.verbose {
            self.narrator.line(&line());
        }
    }

    fn narrate_summary(
        &self,
        time_elapsed: Duration,
        swaps_made: u64,
        coffee_cups: u64,
        excuses_used: &[String],
    ) {
        self.narrator.line("");
        self.narrator.line("--- Sorting Complete! ---");
        self.narrator.line(&format!(
            "Time taken: {:.3} seconds",
            time_elapsed.as_secs_f64()
        ));
        self.narrator
            .line(&format!("Coffee breaks taken: {coffee_cups}"));
        self.narrator.line(&format!("Swaps made: {swaps_made}"));
        self.narrator.line("Excuses used:");
        for (n, excuse) in excuses_used.iter().enumerate() {
            self.narrator.line(&format!("   {}. {excuse}", n + 1));
        }
    }
}

/// Swaps the first adjacent pair that compares `Greater`. Returns its left index.
fn swap_first_inversion<T, F>(items: &mut [T], compare: &mut F) -> Result<Option<usize>, SortError>
where
    F: FnMut(&T, &T) -> Result<Ordering, SortError>,
{
    for i in 0..items.len().saturating_sub(1) {
        if compare(&items[i], &items[i + 1])? == Ordering::Greater {
            items.swap(i, i + 1);
            return Ok(Some(i));
        }
    }
    Ok(None)
}

fn is_sorted_by<T, F>(items: &[T], compare: &mut F) -> Result<bool, SortError>
where
    F: FnMut(&T, &T) -> Result<Ordering, SortError>,
{
    for pair in items.windows(2) {
        if compare(&pair[0], &pair[1])? == Ordering::Greater {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Blocking variant of `Procrastinator::sort` for callers without an async runtime.
///
/// Drives the run on a private current-thread runtime, so every delay blocks the
/// calling thread. Must not be called from inside another tokio runtime.
pub fn sort_blocking<T>(
    items: Vec<T>,
    options: &SortOptions,
) -> Result<ProcrastinationResult<T>, SortError>
where
    T: Ord + Send,
{
    sort_by_blocking(items, options, T::cmp)
}

/// Blocking variant of `Procrastinator::sort_by`.
pub fn sort_by_blocking<T, F>(
    items: Vec<T>,
    options: &SortOptions,
    compare: F,
) -> Result<ProcrastinationResult<T>, SortError>
where
    T: Send,
    F: FnMut(&T, &T) -> Ordering + Send,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(async {
        Procrastinator::system()
            .sort_by(items, options, compare)
            .await
    })
}
