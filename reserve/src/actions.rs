//! Inputs to the booking reconciler.

use crate::error::BookingError;
use crate::types::{BookingReceipt, EmployeeId, Seat, SeatId, TokenBalance};

/// Every input the reconciler handles
///
/// The first group comes from the user, the second from effects feeding
/// I/O results back into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingAction {
    // User intents
    /// Switch identity; `None` ends the session
    SelectEmployee {
        /// Employee to act as
        employee_id: Option<EmployeeId>,
    },
    /// Pick a seat to book
    SelectSeat {
        /// Seat clicked
        seat_id: SeatId,
    },
    /// Drop the current selection
    ClearSelection,
    /// Book the selected seat (asks for confirmation first)
    ConfirmBooking,

    // Effect results
    /// Manager balance arrived
    TokensLoaded {
        /// Balance as reported by the provider
        balance: TokenBalance,
    },
    /// Manager balance could not be loaded
    TokenLoadFailed {
        /// Provider failure, for logs
        reason: String,
    },
    /// Seat list arrived
    SeatsLoaded {
        /// Seats in display order
        seats: Vec<Seat>,
    },
    /// Seat list could not be loaded
    SeatLoadFailed {
        /// Provider failure, for logs
        reason: String,
    },
    /// User answered the confirmation prompt
    ConfirmationAnswered {
        /// Seat the prompt was about
        seat_id: SeatId,
        /// Whether the user said yes
        accepted: bool,
    },
    /// Provider booked the seat
    BookingSucceeded {
        /// Provider's confirmation
        receipt: BookingReceipt,
    },
    /// Provider refused or could not be reached
    BookingFailed {
        /// Why
        error: BookingError,
    },
}

impl BookingAction {
    /// Shorthand for [`BookingAction::SelectEmployee`] with an identity
    #[must_use]
    pub fn select_employee(employee_id: impl Into<EmployeeId>) -> Self {
        Self::SelectEmployee {
            employee_id: Some(employee_id.into()),
        }
    }

    /// Shorthand for [`BookingAction::SelectSeat`]
    #[must_use]
    pub fn select_seat(seat_id: impl Into<SeatId>) -> Self {
        Self::SelectSeat {
            seat_id: seat_id.into(),
        }
    }

    /// Whether this action is the outcome of a booking submission
    #[must_use]
    pub const fn is_booking_outcome(&self) -> bool {
        matches!(self, Self::BookingSucceeded { .. } | Self::BookingFailed { .. })
    }
}
