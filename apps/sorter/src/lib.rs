//! A sorting utility that would rather be doing anything else.
//!
//! `Procrastinator` bubble-sorts one swap per attempt and spends most of its
//! iterations on excuses and coffee. The HTTP binary wraps it for numeric input.

pub mod config;
pub mod errors;
pub mod routes;
pub mod sorter;
pub mod state;

pub use errors::SortError;
pub use sorter::{
    sort_blocking, sort_by_blocking, Clock, CollectingNarrator, Narrator, ProcrastinationResult,
    Procrastinator, RandomSource, RngSource, ScriptedRandom, Sleeper, SortOptions, SortOverrides,
    TokioClock, TokioSleeper, TracingNarrator, VirtualClock,
};
