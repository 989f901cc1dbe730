//! Display rounding for completed task durations.
//!
//! Sub-minute completions are shown in 5-second buckets, always rounding up
//! to the next bucket (an immediate completion reads "5s"). Anything from one
//! minute on rounds half-up to whole minutes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bucket width for sub-minute completions.
pub const SECONDS_BUCKET: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum TaskDuration {
    Seconds(u64),
    Minutes(u64),
}

impl TaskDuration {
    pub fn from_elapsed_seconds(secs: u64) -> Self {
        if secs < 60 {
            let bucket = (secs / SECONDS_BUCKET + 1) * SECONDS_BUCKET;
            if bucket >= 60 {
                TaskDuration::Minutes(1)
            } else {
                TaskDuration::Seconds(bucket)
            }
        } else {
            TaskDuration::Minutes((secs + 30) / 60)
        }
    }

    /// Whole minutes; sub-minute buckets count as 0.
    pub fn minutes(&self) -> u64 {
        match self {
            TaskDuration::Seconds(_) => 0,
            TaskDuration::Minutes(m) => *m,
        }
    }
}

impl fmt::Display for TaskDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskDuration::Seconds(s) => write!(f, "{s}s"),
            TaskDuration::Minutes(m) => write!(f, "{m}m"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_completion_reads_five_seconds() {
        assert_eq!(TaskDuration::from_elapsed_seconds(0).to_string(), "5s");
    }

    #[test]
    fn sub_minute_rounds_to_next_bucket() {
        assert_eq!(TaskDuration::from_elapsed_seconds(15).to_string(), "20s");
        assert_eq!(TaskDuration::from_elapsed_seconds(36).to_string(), "40s");
        assert_eq!(TaskDuration::from_elapsed_seconds(4).to_string(), "5s");
    }

    #[test]
    fn last_bucket_becomes_one_minute() {
        assert_eq!(
            TaskDuration::from_elapsed_seconds(57),
            TaskDuration::Minutes(1)
        );
    }

    #[test]
    fn minutes_round_half_up() {
        assert_eq!(TaskDuration::from_elapsed_seconds(60).to_string(), "1m");
        assert_eq!(TaskDuration::from_elapsed_seconds(89).to_string(), "1m");
        assert_eq!(TaskDuration::from_elapsed_seconds(90).to_string(), "2m");
        assert_eq!(TaskDuration::from_elapsed_seconds(18 * 60 + 30).to_string(), "19m");
        assert_eq!(TaskDuration::from_elapsed_seconds(18 * 60 + 29).to_string(), "18m");
    }

    #[test]
    fn serializes_with_unit_tag() {
        let json = serde_json::to_string(&TaskDuration::Seconds(40)).unwrap();
        assert_eq!(json, r#"{"unit":"seconds","value":40}"#);
    }
}
