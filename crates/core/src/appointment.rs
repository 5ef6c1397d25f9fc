//! Appointment slot allocation (bounded, race-safe).
//!
//! Capacity is tracked per `(officer, date, period)` bucket. A reservation
//! walks forward from the next working day, trying Morning then Afternoon,
//! and asks the [`SlotLedger`] to atomically increment the bucket if it is
//! below capacity. The ledger is the only synchronisation point; the
//! allocator holds no locks of its own.

use std::fmt;

use async_trait::async_trait;
use chrono::{Datelike, Days, FixedOffset, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum reservations per bucket.
pub const SLOT_CAPACITY: i32 = 20;

/// How many working days ahead the allocator searches before giving up.
pub const SEARCH_HORIZON_WORKING_DAYS: u32 = 30;

// ---------------------------------------------------------------------------
// Periods
// ---------------------------------------------------------------------------

/// Half-day appointment window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Morning,
    Afternoon,
}

impl Period {
    /// Fill order within a day. Earlier periods fill first.
    pub const ORDERED: [Period; 2] = [Period::Morning, Period::Afternoon];

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Morning => "morning",
            Period::Afternoon => "afternoon",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "morning" => Ok(Period::Morning),
            "afternoon" => Ok(Period::Afternoon),
            other => Err(CoreError::Validation(format!("Unknown period '{other}'"))),
        }
    }

    /// Office hours covered by the period.
    pub fn time_range(self) -> &'static str {
        match self {
            Period::Morning => "09:00-12:00",
            Period::Afternoon => "14:00-17:00",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reserved in-person appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub date: NaiveDate,
    pub period: Period,
    pub time_range: String,
}

impl Appointment {
    pub fn new(date: NaiveDate, period: Period) -> Self {
        Self {
            date,
            period,
            time_range: period.time_range().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Working days
// ---------------------------------------------------------------------------

/// Calendar date at the office for the instant `now`.
///
/// Appointment searches start from this date, not the UTC date.
pub fn office_date(now: Timestamp, utc_offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&utc_offset).date_naive()
}

/// Monday to Friday. There is no holiday calendar.
pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// First working day strictly after `date`.
pub fn next_working_day(date: NaiveDate) -> NaiveDate {
    let mut candidate = date;
    loop {
        candidate = match candidate.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => return candidate,
        };
        if is_working_day(candidate) {
            return candidate;
        }
    }
}

/// The `count` working days following `today`, in order.
pub fn working_days_after(today: NaiveDate, count: u32) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(Some(next_working_day(today)), |d| Some(next_working_day(*d)))
        .take(count as usize)
}

// ---------------------------------------------------------------------------
// Ledger seam
// ---------------------------------------------------------------------------

/// Composite key of a capacity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub officer_id: DbId,
    pub date: NaiveDate,
    pub period: Period,
}

/// Outcome of one conditional increment against the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAttempt {
    /// The bucket was created or incremented; `reserved_count` is the new value.
    Reserved { reserved_count: i32 },
    /// The bucket is at capacity.
    Full,
    /// Bucket creation collided with a concurrent creator.
    Conflict,
}

/// Storage primitive behind the allocator.
///
/// `try_reserve` must be a single indivisible read-modify-write: create the
/// bucket with a count of one, or increment it only while it is strictly
/// below `capacity`.
#[async_trait]
pub trait SlotLedger: Send {
    type Error: Send;

    async fn try_reserve(
        &mut self,
        key: &SlotKey,
        capacity: i32,
    ) -> Result<SlotAttempt, Self::Error>;
}

// ---------------------------------------------------------------------------
// Allocator
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ReserveError<E> {
    #[error("No appointment slots available for officer {officer_id} within {horizon_days} working days")]
    SlotsExhausted { officer_id: DbId, horizon_days: u32 },

    #[error("Repeated bucket creation conflict for officer {officer_id} on {date} ({period})")]
    Contention {
        officer_id: DbId,
        date: NaiveDate,
        period: Period,
    },

    #[error("Slot ledger error")]
    Storage(#[source] E),
}

impl<E> ReserveError<E> {
    /// Convert the capacity failures into [`CoreError::Unavailable`], handing
    /// storage errors to `storage`.
    pub fn into_core(self, storage: impl FnOnce(E) -> CoreError) -> CoreError {
        match self {
            ReserveError::SlotsExhausted { .. } => CoreError::Unavailable(
                "No appointment slots are available. Please contact the office.".to_string(),
            ),
            ReserveError::Contention { .. } => CoreError::Unavailable(
                "Appointment scheduling is busy. Please retry.".to_string(),
            ),
            ReserveError::Storage(e) => storage(e),
        }
    }
}

/// Capacity and search horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorConfig {
    pub capacity: i32,
    pub horizon_days: u32,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            capacity: SLOT_CAPACITY,
            horizon_days: SEARCH_HORIZON_WORKING_DAYS,
        }
    }
}

/// Finds the earliest bucket with room for one more reservation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotAllocator {
    config: AllocatorConfig,
}

impl SlotAllocator {
    pub fn new(config: AllocatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> AllocatorConfig {
        self.config
    }

    /// Reserve the earliest available `(date, period)` for `officer_id`,
    /// starting at the working day after `today`.
    pub async fn reserve<L>(
        &self,
        ledger: &mut L,
        officer_id: DbId,
        today: NaiveDate,
    ) -> Result<Appointment, ReserveError<L::Error>>
    where
        L: SlotLedger + ?Sized,
    {
        for date in working_days_after(today, self.config.horizon_days) {
            for period in Period::ORDERED {
                let key = SlotKey {
                    officer_id,
                    date,
                    period,
                };
                if self.reserve_bucket(ledger, &key).await? {
                    return Ok(Appointment::new(date, period));
                }
            }
        }

        Err(ReserveError::SlotsExhausted {
            officer_id,
            horizon_days: self.config.horizon_days,
        })
    }

    /// `Ok(true)` if the bucket took the reservation, `Ok(false)` if it is
    /// full. A creation conflict is retried once on the same bucket.
    async fn reserve_bucket<L>(
        &self,
        ledger: &mut L,
        key: &SlotKey,
    ) -> Result<bool, ReserveError<L::Error>>
    where
        L: SlotLedger + ?Sized,
    {
        let mut retried = false;
        loop {
            let attempt = ledger
                .try_reserve(key, self.config.capacity)
                .await
                .map_err(ReserveError::Storage)?;

            match attempt {
                SlotAttempt::Reserved { .. } => return Ok(true),
                SlotAttempt::Full => return Ok(false),
                SlotAttempt::Conflict if !retried => retried = true,
                SlotAttempt::Conflict => {
                    return Err(ReserveError::Contention {
                        officer_id: key.officer_id,
                        date: key.date,
                        period: key.period,
                    })
                }
            }
        }
    }
}
