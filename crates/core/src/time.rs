use chrono::{DateTime, Duration, Local, Utc};

/// Time source for backup names and session timing.
///
/// `Fixed` keeps tests deterministic; it only moves when advanced explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Timestamp prefix used for backup filenames, e.g. `20231114-221320`.
    ///
    /// The system clock uses local time so names match the operator's wall clock.
    #[must_use]
    pub fn file_stamp(&self) -> String {
        const FORMAT: &str = "%Y%m%d-%H%M%S";
        match self {
            Clock::System => Local::now().format(FORMAT).to_string(),
            Clock::Fixed(t) => t.format(FORMAT).to_string(),
        }
    }

    /// Move a fixed clock forward. No effect on the system clock.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
