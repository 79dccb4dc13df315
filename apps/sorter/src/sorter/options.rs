//! Sort options — the immutable record a run is driven by.
//!
//! Resolution: `SortOptions::default()` supplies every field, and each layer of
//! `SortOverrides` (server config, then request body) replaces only the fields it sets.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::SortError;

pub const DEFAULT_PROCRASTINATION_PROBABILITY: f64 = 0.85;
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(5000);

pub const DEFAULT_ACTIVITIES: &[&str] = &[
    "Googling 'how to sort arrays'",
    "Watching another cat videos on YouTube",
    "Checking drama on Twitter/X",
    "Scrolling through Instagram",
    "Binge-watching Netflix",
    "Reading random articles on Medium",
    "Refactoring unnecessary code",
    "Learning a new technology",
];

/// Fully resolved options for one sort run.
#[derive(Debug, Clone, PartialEq)]
pub struct SortOptions {
    /// Narrate every decision to the run's `Narrator`.
    pub verbose: bool,
    /// Chance (0.0 – 1.0) that an iteration is spent procrastinating.
    pub procrastination_probability: f64,
    /// Pool of excuses, drawn uniformly.
    pub procrastination_activities: Vec<String>,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            procrastination_probability: DEFAULT_PROCRASTINATION_PROBABILITY,
            procrastination_activities: DEFAULT_ACTIVITIES.iter().map(|s| s.to_string()).collect(),
            min_delay: DEFAULT_MIN_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

/// Caller-supplied partial options. `None` keeps whatever the lower layer had.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SortOverrides {
    #[serde(default)]
    pub verbose: Option<bool>,
    #[serde(default)]
    pub procrastination_probability: Option<f64>,
    #[serde(default)]
    pub procrastination_activities: Option<Vec<String>>,
    #[serde(default)]
    pub min_delay_ms: Option<u64>,
    #[serde(default)]
    pub max_delay_ms: Option<u64>,
}

impl SortOptions {
    /// Returns a copy with every field present in `overrides` replaced.
    pub fn merged(&self, overrides: &SortOverrides) -> Self {
        let mut next = self.clone();
        if let Some(verbose) = overrides.verbose {
            next.verbose = verbose;
        }
        if let Some(p) = overrides.procrastination_probability {
            next.procrastination_probability = p;
        }
        if let Some(activities) = &overrides.procrastination_activities {
            next.procrastination_activities = activities.clone();
        }
        if let Some(ms) = overrides.min_delay_ms {
            next.min_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = overrides.max_delay_ms {
            next.max_delay = Duration::from_millis(ms);
        }
        next
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn procrastination_probability(mut self, p: f64) -> Self {
        self.procrastination_probability = p;
        self
    }

    pub fn procrastination_activities<I, S>(mut self, activities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.procrastination_activities = activities.into_iter().map(Into::into).collect();
        self
    }

    pub fn delays(mut self, min: Duration, max: Duration) -> Self {
        self.min_delay = min;
        self.max_delay = max;
        self
    }

    /// Rejects degenerate options before a run starts.
    ///
    /// Probability 1.0 is accepted: the run never finishes, and callers that want a
    /// bound wrap the future in a timeout.
    pub fn validate(&self) -> Result<(), SortError> {
        let p = self.procrastination_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(SortError::InvalidOptions(format!(
                "procrastination_probability must be within [0, 1], got {p}"
            )));
        }
        if self.min_delay > self.max_delay {
            return Err(SortError::InvalidOptions(format!(
                "min_delay ({}ms) exceeds max_delay ({}ms)",
                self.min_delay.as_millis(),
                self.max_delay.as_millis()
            )));
        }
        if p > 0.0 && self.procrastination_activities.is_empty() {
            return Err(SortError::InvalidOptions(
                "procrastination_activities cannot be empty when procrastination is possible"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let opts = SortOptions::default();
        assert!(!opts.verbose);
        assert_eq!(opts.procrastination_probability, 0.85);
        assert_eq!(opts.procrastination_activities.len(), 8);
        assert_eq!(opts.procrastination_activities[0], "Googling 'how to sort arrays'");
        assert_eq!(opts.min_delay, Duration::from_millis(500));
        assert_eq!(opts.max_delay, Duration::from_millis(5000));
    }

    #[test]
    fn test_merge_keeps_defaults_for_absent_fields() {
        let overrides = SortOverrides {
            verbose: Some(true),
            max_delay_ms: Some(900),
            ..Default::default()
        };
        let opts = SortOptions::default().merged(&overrides);
        assert!(opts.verbose);
        assert_eq!(opts.max_delay, Duration::from_millis(900));
        assert_eq!(opts.min_delay, DEFAULT_MIN_DELAY);
        assert_eq!(opts.procrastination_probability, DEFAULT_PROCRASTINATION_PROBABILITY);
        assert_eq!(opts.procrastination_activities.len(), DEFAULT_ACTIVITIES.len());
    }

    #[test]
    fn test_merge_layers_apply_in_order() {
        let server = SortOverrides {
            procrastination_probability: Some(0.5),
            min_delay_ms: Some(10),
            ..Default::default()
        };
        let request = SortOverrides {
            procrastination_probability: Some(0.0),
            ..Default::default()
        };
        let opts = SortOptions::default().merged(&server).merged(&request);
        assert_eq!(opts.procrastination_probability, 0.0);
        assert_eq!(opts.min_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_overrides_deserialize_from_partial_json() {
        let overrides: SortOverrides =
            serde_json::from_str(r#"{"procrastination_activities": ["Napping"]}"#).unwrap();
        assert_eq!(overrides.procrastination_activities, Some(vec!["Napping".to_string()]));
        assert_eq!(overrides.verbose, None);
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(SortOptions::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_probability() {
        for p in [-0.1, 1.5, f64::NAN] {
            let opts = SortOptions::default().procrastination_probability(p);
            assert!(
                matches!(opts.validate(), Err(SortError::InvalidOptions(_))),
                "probability {p} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_rejects_inverted_delays() {
        let opts = SortOptions::default().delays(Duration::from_secs(2), Duration::from_secs(1));
        assert!(matches!(opts.validate(), Err(SortError::InvalidOptions(_))));
    }

    #[test]
    fn test_empty_activities_only_allowed_without_procrastination() {
        let empty: Vec<String> = vec![];
        let opts = SortOptions::default().procrastination_activities(empty);
        assert!(opts.validate().is_err());
        assert!(opts.procrastination_probability(0.0).validate().is_ok());
    }
}
