use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionLogError {
    #[error("ended_at is before started_at")]
    InvalidTimeRange,
}

/// One row of the session log written when a live annotation session ends.
///
/// Field names map onto the log's human-readable header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionLogEntry {
    #[serde(rename = "Number of images annotated")]
    images_annotated: i64,
    #[serde(rename = "Seconds spent")]
    seconds_spent: f64,
    #[serde(rename = "Date")]
    date: NaiveDate,
}

impl SessionLogEntry {
    /// Build an entry from the resume bookkeeping of a finished session.
    ///
    /// `start_index` is the first image shown when the session opened and
    /// `last_completed` the resume point read back at exit (`None` when no
    /// image is done yet).
    ///
    /// # Errors
    ///
    /// Returns `SessionLogError::InvalidTimeRange` if `ended_at` is before `started_at`.
    pub fn from_progress(
        start_index: usize,
        last_completed: Option<usize>,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    ) -> Result<Self, SessionLogError> {
        if ended_at < started_at {
            return Err(SessionLogError::InvalidTimeRange);
        }
        let last = last_completed.map_or(-1, |i| i64::try_from(i).unwrap_or(i64::MAX));
        let start = i64::try_from(start_index).unwrap_or(i64::MAX);
        let elapsed = ended_at - started_at;
        #[allow(clippy::cast_precision_loss)]
        let seconds_spent = elapsed.num_milliseconds() as f64 / 1000.0;

        Ok(Self {
            images_annotated: last - (start - 1),
            seconds_spent,
            date: ended_at.date_naive(),
        })
    }

    #[must_use]
    pub fn images_annotated(&self) -> i64 {
        self.images_annotated
    }

    #[must_use]
    pub fn seconds_spent(&self) -> f64 {
        self.seconds_spent
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn counts_images_completed_since_start() {
        let start = fixed_now();
        let entry =
            SessionLogEntry::from_progress(3, Some(6), start, start + Duration::seconds(90))
                .unwrap();
        assert_eq!(entry.images_annotated(), 4);
        assert!((entry.seconds_spent() - 90.0).abs() < f64::EPSILON);
        assert_eq!(entry.date().to_string(), "2023-11-14");
    }

    #[test]
    fn nothing_done_on_fresh_file() {
        let start = fixed_now();
        let entry = SessionLogEntry::from_progress(0, None, start, start).unwrap();
        assert_eq!(entry.images_annotated(), 0);
    }

    #[test]
    fn rejects_reversed_time_range() {
        let start = fixed_now();
        let err = SessionLogEntry::from_progress(0, None, start, start - Duration::seconds(1))
            .unwrap_err();
        assert_eq!(err, SessionLogError::InvalidTimeRange);
    }
}
