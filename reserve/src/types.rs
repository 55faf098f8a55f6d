//! Domain types for seat booking.
//!
//! Identifiers are string newtypes so a seat id can never be passed where an
//! employee id is expected. A [`Seat`] stores only its owner; its status is
//! derived, so "booked iff owned" holds by construction and is re-checked
//! when records arrive over the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from any string-like value
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

string_id!(
    /// Seat identifier: row label followed by seat number (e.g. `B1`)
    SeatId
);

string_id!(
    /// Employee identifier (e.g. `EMP101`)
    EmployeeId
);

string_id!(
    /// Manager identifier (e.g. `MGR001`)
    ManagerId
);

/// Seat availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    /// Free to book
    Available,
    /// Booked by an employee
    Booked,
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Booked => write!(f, "booked"),
        }
    }
}

/// A bookable seat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SeatRecord", into = "SeatRecord")]
pub struct Seat {
    id: SeatId,
    row: String,
    number: u32,
    owner: Option<EmployeeId>,
}

impl Seat {
    /// Creates an available seat; the id is the row label followed by the number
    #[must_use]
    pub fn new(row: impl Into<String>, number: u32) -> Self {
        let row = row.into();
        Self {
            id: SeatId::new(format!("{row}{number}")),
            row,
            number,
            owner: None,
        }
    }

    /// Same seat, already booked by `employee`
    #[must_use]
    pub fn booked_by(mut self, employee: EmployeeId) -> Self {
        self.owner = Some(employee);
        self
    }

    /// Seat identifier
    #[must_use]
    pub const fn id(&self) -> &SeatId {
        &self.id
    }

    /// Row label
    #[must_use]
    pub fn row(&self) -> &str {
        &self.row
    }

    /// Seat number within the row
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Employee holding the seat, if booked
    #[must_use]
    pub const fn owner(&self) -> Option<&EmployeeId> {
        self.owner.as_ref()
    }

    /// Availability derived from ownership
    #[must_use]
    pub const fn status(&self) -> SeatStatus {
        if self.owner.is_some() {
            SeatStatus::Booked
        } else {
            SeatStatus::Available
        }
    }

    /// Whether anyone holds the seat
    #[must_use]
    pub const fn is_booked(&self) -> bool {
        self.owner.is_some()
    }

    /// Whether `employee` holds the seat
    #[must_use]
    pub fn is_owned_by(&self, employee: &EmployeeId) -> bool {
        self.owner.as_ref() == Some(employee)
    }

    /// Books the seat for `employee`
    ///
    /// Returns `false` and leaves the seat untouched if it is already booked.
    pub fn book(&mut self, employee: EmployeeId) -> bool {
        if self.is_booked() {
            return false;
        }
        self.owner = Some(employee);
        true
    }
}

/// Wire form of a seat: `{ id, row, number, status, booked_by }`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SeatRecord {
    id: SeatId,
    row: String,
    number: u32,
    status: SeatStatus,
    booked_by: Option<EmployeeId>,
}

impl TryFrom<SeatRecord> for Seat {
    type Error = String;

    fn try_from(record: SeatRecord) -> Result<Self, Self::Error> {
        match (record.status, &record.booked_by) {
            (SeatStatus::Booked, None) => {
                Err(format!("seat {} is booked but has no owner", record.id))
            },
            (SeatStatus::Available, Some(owner)) => Err(format!(
                "seat {} is available but lists owner {owner}",
                record.id
            )),
            _ => Ok(Self {
                id: record.id,
                row: record.row,
                number: record.number,
                owner: record.booked_by,
            }),
        }
    }
}

impl From<Seat> for SeatRecord {
    fn from(seat: Seat) -> Self {
        Self {
            status: seat.status(),
            id: seat.id,
            row: seat.row,
            number: seat.number,
            booked_by: seat.owner,
        }
    }
}

/// Manager an employee reports to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerInfo {
    /// Manager identifier
    pub id: ManagerId,
    /// Display name
    pub name: String,
}

impl ManagerInfo {
    /// Creates manager info
    #[must_use]
    pub fn new(id: impl Into<ManagerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Token balance of one manager, as returned by `GET manager-tokens/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
    /// Manager identifier
    pub manager_id: ManagerId,
    /// Manager display name
    pub manager_name: String,
    /// Remaining booking tokens
    pub tokens: u32,
}

/// Body of `POST book-seat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Seat to book
    pub seat_id: SeatId,
    /// Employee the seat is booked for
    pub employee_id: EmployeeId,
}

/// Successful booking as confirmed by the data provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingReceipt {
    /// Provider's message
    pub message: String,
    /// Seat as it now stands
    pub seat: Seat,
}

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Operation failed
    Error,
    /// Operation refused, user action required
    Warning,
    /// Informational
    Info,
    /// Operation succeeded
    Success,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
        }
    }
}

/// User-facing notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Monotonic sequence number within a session, starting at 1
    pub seq: u64,
    /// Severity
    pub severity: Severity,
    /// Message text
    pub message: String,
    /// When it was raised
    pub raised_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn seat_id_is_row_and_number() {
        let seat = Seat::new("C", 4);
        assert_eq!(seat.id().as_str(), "C4");
        assert_eq!(seat.row(), "C");
        assert_eq!(seat.number(), 4);
        assert_eq!(seat.status(), SeatStatus::Available);
    }

    #[test]
    fn booking_sets_owner_once() {
        let mut seat = Seat::new("A", 1);
        assert!(seat.book(EmployeeId::new("EMP101")));
        assert!(!seat.book(EmployeeId::new("EMP102")));
        assert!(seat.is_owned_by(&EmployeeId::new("EMP101")));
        assert_eq!(seat.status(), SeatStatus::Booked);
    }

    #[test]
    fn seat_wire_format() {
        let seat = Seat::new("A", 2).booked_by(EmployeeId::new("EMP102"));
        let value = serde_json::to_value(&seat).unwrap();
        assert_eq!(
            value,
            json!({ "id": "A2", "row": "A", "number": 2, "status": "booked", "booked_by": "EMP102" })
        );

        let available: Seat = serde_json::from_value(
            json!({ "id": "A1", "row": "A", "number": 1, "status": "available", "booked_by": null }),
        )
        .unwrap();
        assert_eq!(available, Seat::new("A", 1));
    }

    #[test]
    fn inconsistent_seat_records_are_rejected() {
        let booked_without_owner = serde_json::from_value::<Seat>(
            json!({ "id": "A1", "row": "A", "number": 1, "status": "booked", "booked_by": null }),
        );
        assert!(booked_without_owner.is_err());

        let available_with_owner = serde_json::from_value::<Seat>(
            json!({ "id": "A1", "row": "A", "number": 1, "status": "available", "booked_by": "EMP101" }),
        );
        assert!(available_with_owner.is_err());
    }

    #[test]
    fn token_balance_wire_format() {
        let balance: TokenBalance = serde_json::from_value(
            json!({ "manager_id": "MGR001", "manager_name": "Manager A", "tokens": 5 }),
        )
        .unwrap();
        assert_eq!(balance.manager_id, ManagerId::new("MGR001"));
        assert_eq!(balance.tokens, 5);
    }
}
