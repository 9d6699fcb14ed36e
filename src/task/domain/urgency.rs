//! Deadline urgency classification.
//!
//! The tier is advisory and only drives presentation; lifecycle guards never
//! consult it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Proximity of a deadline relative to the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyTier {
    /// The deadline has passed.
    Overdue,
    /// The deadline falls within the next day.
    DueSoon,
    /// More than a day remains.
    OnTime,
}

impl UrgencyTier {
    /// Returns the stable machine name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::DueSoon => "due_soon",
            Self::OnTime => "on_time",
        }
    }

    /// Returns the badge text shown next to a deadline.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overdue => "OVERDUE",
            Self::DueSoon => "DUE SOON",
            Self::OnTime => "ON TIME",
        }
    }
}

impl fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returns the number of whole days until `deadline`, rounded up.
#[must_use]
pub fn days_until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (deadline - now).num_milliseconds();
    let whole_days = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) == 0 {
        whole_days
    } else {
        whole_days.saturating_add(1)
    }
}

/// Classifies `deadline` against `now`.
///
/// A deadline that has already passed is [`UrgencyTier::Overdue`], even when
/// it passed less than a day ago and the rounded day count is zero.
#[must_use]
pub fn classify(deadline: DateTime<Utc>, now: DateTime<Utc>) -> UrgencyTier {
    if deadline < now {
        return UrgencyTier::Overdue;
    }
    if days_until(deadline, now) <= 1 {
        UrgencyTier::DueSoon
    } else {
        UrgencyTier::OnTime
    }
}
