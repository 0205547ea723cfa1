//! The fixed daily time-slot catalog.
//!
//! The court is booked in one-hour slots. The catalog is static: seventeen
//! slots starting at 06:15 and ending with the 22:15 slot. Slots are stored
//! and serialized by their start label (`"10:15"`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Number of bookable slots per day.
pub const SLOT_COUNT: usize = 17;

/// Start labels of every slot, in catalog order.
pub const SLOT_LABELS: [&str; SLOT_COUNT] = [
    "06:15", "07:15", "08:15", "09:15", "10:15", "11:15", "12:15", "13:15", "14:15", "15:15",
    "16:15", "17:15", "18:15", "19:15", "20:15", "21:15", "22:15",
];

/// Minute past the hour at which every slot starts.
pub const SLOT_MINUTE: u32 = 15;

/// Hour of the first slot of the day.
const FIRST_SLOT_HOUR: u32 = 6;

// ---------------------------------------------------------------------------
// TimeSlot
// ---------------------------------------------------------------------------

/// One entry of the catalog, identified by its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot(u8);

/// Returned when a label is not part of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid time slot '{0}'. Must be one of: {list}", list = SLOT_LABELS.join(", "))]
pub struct UnknownSlot(pub String);

impl TimeSlot {
    /// Every slot in catalog order.
    pub fn all() -> impl Iterator<Item = TimeSlot> {
        (0..SLOT_COUNT as u8).map(TimeSlot)
    }

    /// Slot at catalog position `index`, if any.
    pub fn from_index(index: usize) -> Option<TimeSlot> {
        (index < SLOT_COUNT).then(|| TimeSlot(index as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Start label, e.g. `"06:15"`.
    pub fn label(self) -> &'static str {
        SLOT_LABELS[self.index()]
    }

    /// Start hour on a 24-hour clock.
    pub fn start_hour(self) -> u32 {
        FIRST_SLOT_HOUR + self.0 as u32
    }

    /// Human-readable one-hour range, e.g. `"6:15 AM - 7:15 AM"`.
    pub fn display_range(self) -> String {
        let start = self.start_hour();
        let end = start + 1;
        format!(
            "{}:{SLOT_MINUTE:02} {} - {}:{SLOT_MINUTE:02} {}",
            twelve_hour(start),
            meridiem(start),
            twelve_hour(end),
            meridiem(end),
        )
    }
}

fn twelve_hour(hour: u32) -> u32 {
    match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    }
}

fn meridiem(hour: u32) -> &'static str {
    if hour >= 12 {
        "PM"
    } else {
        "AM"
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeSlot {
    type Err = UnknownSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SLOT_LABELS
            .iter()
            .position(|label| *label == s.trim())
            .and_then(TimeSlot::from_index)
            .ok_or_else(|| UnknownSlot(s.to_string()))
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = UnknownSlot;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.label().to_string()
    }
}

impl From<UnknownSlot> for CoreError {
    fn from(err: UnknownSlot) -> Self {
        CoreError::Validation(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
