//! Dependencies injected into the booking reconciler.

use crate::directory::EmployeeDirectory;
use crate::presentation::ConfirmationGate;
use crate::provider::SeatBookingApi;
use blu_reserve_core::environment::{Clock, SystemClock};
use std::sync::Arc;

/// Everything the reconciler's effects need from the outside world
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Seat and token backend
    pub api: Arc<dyn SeatBookingApi>,
    /// Employee → manager mapping
    pub directory: Arc<EmployeeDirectory>,
    /// Asks the user to confirm a booking
    pub gate: Arc<dyn ConfirmationGate>,
    /// Timestamps notifications
    pub clock: Arc<dyn Clock>,
}

impl BookingEnvironment {
    /// Creates an environment using the system clock
    #[must_use]
    pub fn new(
        api: Arc<dyn SeatBookingApi>,
        directory: Arc<EmployeeDirectory>,
        gate: Arc<dyn ConfirmationGate>,
    ) -> Self {
        Self {
            api,
            directory,
            gate,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl std::fmt::Debug for BookingEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingEnvironment")
            .field("directory", &self.directory)
            .finish_non_exhaustive()
    }
}
