//! Release conditions.
//!
//! A condition is a predicate gating a release's trigger. Conditions
//! compose with AND semantics: the release may trigger only when every
//! condition in its ordered list is met.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single trigger predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReleaseCondition {
    /// Always met; used for immediate transfers.
    Always,
    /// Met once the current time reaches the release instant.
    Time {
        /// Earliest instant the release may trigger.
        release_at: DateTime<Utc>,
    },
    /// Met when the caller supplies a matching location guess
    /// ("hide and seek").
    Geographic {
        /// The location the guess is checked against.
        location: String,
    },
}

impl ReleaseCondition {
    /// Evaluates the condition at `now` with an optional caller-supplied
    /// location guess.
    ///
    /// Location matching is trimmed and ASCII-case-insensitive; a missing
    /// guess never matches.
    #[must_use]
    pub fn is_met(&self, now: DateTime<Utc>, location_guess: Option<&str>) -> bool {
        match self {
            Self::Always => true,
            Self::Time { release_at } => now >= *release_at,
            Self::Geographic { location } => {
                location_guess.is_some_and(|guess| location_matches(guess, location))
            }
        }
    }
}

fn location_matches(guess: &str, location: &str) -> bool {
    guess.trim().eq_ignore_ascii_case(location.trim())
}
