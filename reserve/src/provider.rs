//! Data provider abstraction.
//!
//! The reconciler never talks to a backend directly: its effects call a
//! [`SeatBookingApi`] injected through the environment. Two implementations
//! ship with the crate, [`InMemoryBookingApi`](crate::memory::InMemoryBookingApi)
//! and [`HttpBookingApi`](crate::http::HttpBookingApi).

use crate::error::ApiError;
use crate::types::{BookingReceipt, BookingRequest, ManagerId, Seat, TokenBalance};
use std::future::Future;
use std::pin::Pin;

/// Provider result
pub type ApiResult<T> = Result<T, ApiError>;

/// Boxed future returned by provider calls
pub type ApiFuture<T> = Pin<Box<dyn Future<Output = ApiResult<T>> + Send>>;

/// Seat booking backend
pub trait SeatBookingApi: Send + Sync {
    /// Fetch every seat, in display order
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the provider cannot be reached or answers garbage.
    fn load_seats(&self) -> ApiFuture<Vec<Seat>>;

    /// Fetch a manager's remaining tokens
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the provider cannot be reached or answers garbage.
    fn load_token_balance(&self, manager_id: ManagerId) -> ApiFuture<TokenBalance>;

    /// Book a seat, spending one of the employee's manager's tokens
    ///
    /// Validation order: tokens available, seat exists, seat free.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when a check fails, other variants on
    /// transport problems.
    fn submit_booking(&self, request: BookingRequest) -> ApiFuture<BookingReceipt>;
}
