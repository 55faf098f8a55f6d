//! Error types for booking operations and data providers.

use crate::types::{EmployeeId, SeatId, Severity};
use thiserror::Error;

/// Why a booking-related operation was refused
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    /// No employee identity is active
    #[error("Please select an employee first.")]
    NoActiveIdentity,

    /// Confirmation requested with nothing selected
    #[error("Please select a seat first.")]
    NoSeatSelected,

    /// Seat is held by a different employee
    #[error("Seat {0} is already booked.")]
    SeatUnavailable(SeatId),

    /// Seat is already held by the active employee
    #[error("You have already booked seat {0}.")]
    SeatAlreadyOwnedBySelf(SeatId),

    /// Seat id is not in the seat list
    #[error("Seat {0} not found.")]
    SeatNotFound(SeatId),

    /// Manager has no tokens left
    #[error("Insufficient tokens. Your manager has no tokens available.")]
    InsufficientTokens,

    /// Employee id is not in the directory
    #[error("Unknown employee {0}.")]
    UnknownEmployee(EmployeeId),

    /// A load or submission is still in flight
    #[error("Please wait for the current operation to finish.")]
    Busy,

    /// Provider refused the booking for a reason we do not classify
    #[error("{0}")]
    Rejected(String),

    /// Provider could not be reached or answered garbage
    #[error("Booking failed. Please try again.")]
    Transport {
        /// Underlying failure, for logs only
        detail: String,
    },
}

impl BookingError {
    /// Severity of the notification raised for this error
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::NoActiveIdentity | Self::NoSeatSelected | Self::Busy => Severity::Warning,
            Self::SeatAlreadyOwnedBySelf(_) => Severity::Info,
            Self::SeatUnavailable(_)
            | Self::SeatNotFound(_)
            | Self::InsufficientTokens
            | Self::UnknownEmployee(_)
            | Self::Rejected(_)
            | Self::Transport { .. } => Severity::Error,
        }
    }

    /// Classifies a human-readable rejection reason returned by a remote API
    #[must_use]
    pub fn from_server_message(message: &str, seat_id: &SeatId) -> Self {
        let lowered = message.to_lowercase();
        if lowered.contains("insufficient") {
            Self::InsufficientTokens
        } else if lowered.contains("not found") {
            Self::SeatNotFound(seat_id.clone())
        } else if lowered.contains("already booked") {
            Self::SeatUnavailable(seat_id.clone())
        } else {
            Self::Rejected(message.to_string())
        }
    }
}

/// Errors returned by a [`SeatBookingApi`](crate::provider::SeatBookingApi)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The provider understood the request and refused it
    #[error(transparent)]
    Rejected(#[from] BookingError),

    /// HTTP request failed
    #[error("Request failed: {0}")]
    Transport(String),

    /// Response parsing failed
    #[error("Response parsing failed: {0}")]
    Decode(String),

    /// API returned an unexpected status
    #[error("API error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
}

impl ApiError {
    /// Collapses provider failures into the booking error shown to the user
    #[must_use]
    pub fn into_booking_error(self) -> BookingError {
        match self {
            Self::Rejected(error) => error,
            other => BookingError::Transport {
                detail: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities() {
        assert_eq!(BookingError::NoActiveIdentity.severity(), Severity::Warning);
        assert_eq!(
            BookingError::SeatAlreadyOwnedBySelf(SeatId::new("A2")).severity(),
            Severity::Info
        );
        assert_eq!(BookingError::InsufficientTokens.severity(), Severity::Error);
    }

    #[test]
    fn server_messages_are_classified() {
        let seat = SeatId::new("B2");
        assert_eq!(
            BookingError::from_server_message("Insufficient tokens", &seat),
            BookingError::InsufficientTokens
        );
        assert_eq!(
            BookingError::from_server_message("Seat not found.", &seat),
            BookingError::SeatNotFound(seat.clone())
        );
        assert_eq!(
            BookingError::from_server_message("Seat is already booked.", &seat),
            BookingError::SeatUnavailable(seat.clone())
        );
        assert_eq!(
            BookingError::from_server_message("Office closed", &seat),
            BookingError::Rejected("Office closed".to_string())
        );
    }

    #[test]
    fn transport_failures_use_generic_message() {
        let error = ApiError::Transport("connection refused".to_string()).into_booking_error();
        assert_eq!(error.to_string(), "Booking failed. Please try again.");
        assert!(matches!(error, BookingError::Transport { ref detail } if detail.contains("refused")));
    }
}
