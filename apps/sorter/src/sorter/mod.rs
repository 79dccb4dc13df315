// Procrastinating Sorter: options, injectable effects, and the sort loop.
// The loop only talks to effects through traits; no global RNG or clock.

pub mod effects;
pub mod engine;
pub mod options;

// Re-export the public API consumed by routes and library callers.
pub use effects::{
    Clock, CollectingNarrator, Narrator, RandomSource, RngSource, ScriptedRandom, Sleeper,
    TokioClock, TokioSleeper, TracingNarrator, VirtualClock,
};
pub use engine::{sort_blocking, sort_by_blocking, ProcrastinationResult, Procrastinator};
pub use options::{SortOptions, SortOverrides};
