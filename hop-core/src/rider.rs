//! Riders available to carry shipments.

use crate::{ClockTime, ClockTimeError};

/// Opaque identifier of a rider record.
pub type RiderId = String;

/// A rider as held by the record store.
///
/// Shift bounds are kept as the raw `HH:MM` text of the record so that a
/// malformed value can be reported against the rider that carries it.
///
/// # Examples
///
/// ```
/// use hop_core::Rider;
///
/// # fn main() -> Result<(), hop_core::ClockTimeError> {
/// let rider = Rider {
///     id: "r-1".into(),
///     name: "Ada".into(),
///     vehicle_type_id: "cargo-bike".into(),
///     start_address: "Via Zamboni 33, Bologna".into(),
///     earliest_start: "08:30".into(),
///     latest_end: "17:00".into(),
/// };
/// let (start, end) = rider.shift()?;
/// assert_eq!(start.seconds(), 30_600);
/// assert_eq!(end.seconds(), 61_200);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rider {
    /// Record identifier.
    pub id: RiderId,
    /// Display name.
    pub name: String,
    /// Vehicle type declared on the record.
    pub vehicle_type_id: String,
    /// Address the rider starts from.
    pub start_address: String,
    /// Earliest start of the shift, `HH:MM`.
    pub earliest_start: String,
    /// Latest end of the shift, `HH:MM`.
    pub latest_end: String,
}

impl Rider {
    /// Parse the shift bounds into clock times.
    pub fn shift(&self) -> Result<(ClockTime, ClockTime), ClockTimeError> {
        let start = ClockTime::parse(&self.earliest_start)?;
        let end = ClockTime::parse(&self.latest_end)?;
        Ok((start, end))
    }
}
