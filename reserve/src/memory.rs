//! In-memory data provider.
//!
//! Holds the office floor and the manager balances behind one mutex, so a
//! booking's checks and its writes happen in a single critical section.
//! Optional latency makes it behave like a slow backend.

use crate::directory::EmployeeDirectory;
use crate::error::{ApiError, BookingError};
use crate::provider::{ApiFuture, ApiResult, SeatBookingApi};
use crate::types::{BookingReceipt, BookingRequest, EmployeeId, ManagerId, Seat, TokenBalance};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Row labels of the office floor
pub const OFFICE_ROWS: [&str; 4] = ["A", "B", "C", "D"];

/// Seats per row on the office floor
pub const SEATS_PER_ROW: u32 = 5;

/// The office floor: rows A-D, seats 1-5, five of them already taken
#[must_use]
pub fn office_floor() -> Vec<Seat> {
    let taken = [
        ("A2", "EMP102"),
        ("A5", "EMP103"),
        ("B3", "EMP104"),
        ("C2", "EMP105"),
        ("D4", "EMP101"),
    ];

    OFFICE_ROWS
        .iter()
        .flat_map(|row| (1..=SEATS_PER_ROW).map(move |number| Seat::new(*row, number)))
        .map(|seat| {
            match taken.iter().find(|(id, _)| seat.id().as_str() == *id) {
                Some((_, owner)) => seat.booked_by(EmployeeId::new(*owner)),
                None => seat,
            }
        })
        .collect()
}

/// Starting token balances per manager
#[must_use]
pub fn office_balances() -> HashMap<ManagerId, u32> {
    HashMap::from([
        (ManagerId::new("MGR001"), 5),
        (ManagerId::new("MGR002"), 3),
        (ManagerId::new("MGR003"), 0),
    ])
}

/// Artificial delays per call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulatedLatency {
    /// `load_seats`
    pub seats: Duration,
    /// `load_token_balance`
    pub tokens: Duration,
    /// `submit_booking`
    pub booking: Duration,
}

impl SimulatedLatency {
    /// No delay at all
    #[must_use]
    pub const fn none() -> Self {
        Self {
            seats: Duration::ZERO,
            tokens: Duration::ZERO,
            booking: Duration::ZERO,
        }
    }

    /// Delays of a typical remote backend (500 / 300 / 800 ms)
    #[must_use]
    pub const fn realistic() -> Self {
        Self {
            seats: Duration::from_millis(500),
            tokens: Duration::from_millis(300),
            booking: Duration::from_millis(800),
        }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[derive(Debug)]
struct Ledger {
    seats: Vec<Seat>,
    balances: HashMap<ManagerId, u32>,
}

impl Ledger {
    /// Validates and applies one booking
    fn book(
        &mut self,
        request: &BookingRequest,
        directory: &EmployeeDirectory,
    ) -> Result<Seat, BookingError> {
        let Some(manager) = directory.manager_of(&request.employee_id) else {
            return Err(BookingError::UnknownEmployee(request.employee_id.clone()));
        };

        let balance = self.balances.get(&manager.id).copied().unwrap_or(0);
        if balance == 0 {
            return Err(BookingError::InsufficientTokens);
        }

        let Some(seat) = self.seats.iter_mut().find(|s| s.id() == &request.seat_id) else {
            return Err(BookingError::SeatNotFound(request.seat_id.clone()));
        };
        if !seat.book(request.employee_id.clone()) {
            return Err(BookingError::SeatUnavailable(request.seat_id.clone()));
        }
        let booked = seat.clone();

        self.balances.insert(manager.id.clone(), balance - 1);
        Ok(booked)
    }
}

/// Seat booking backend kept in process memory
///
/// Clones share the same ledger.
#[derive(Debug, Clone)]
pub struct InMemoryBookingApi {
    ledger: Arc<Mutex<Ledger>>,
    directory: Arc<EmployeeDirectory>,
    latency: SimulatedLatency,
}

impl InMemoryBookingApi {
    /// Office floor, office balances and office roster, with no latency
    #[must_use]
    pub fn new() -> Self {
        Self::with_data(
            office_floor(),
            office_balances(),
            EmployeeDirectory::office_roster(),
        )
    }

    /// Custom seats, balances and directory, with no latency
    #[must_use]
    pub fn with_data(
        seats: Vec<Seat>,
        balances: HashMap<ManagerId, u32>,
        directory: EmployeeDirectory,
    ) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(Ledger { seats, balances })),
            directory: Arc::new(directory),
            latency: SimulatedLatency::none(),
        }
    }

    /// Sets the simulated latency
    #[must_use]
    pub const fn with_latency(mut self, latency: SimulatedLatency) -> Self {
        self.latency = latency;
        self
    }

    /// Directory used to resolve managers
    #[must_use]
    pub fn directory(&self) -> Arc<EmployeeDirectory> {
        Arc::clone(&self.directory)
    }

    fn with_ledger<T>(&self, f: impl FnOnce(&mut Ledger) -> T) -> ApiResult<T> {
        let mut ledger = self
            .ledger
            .lock()
            .map_err(|_| ApiError::Transport("seat ledger lock poisoned".to_string()))?;
        Ok(f(&mut ledger))
    }

    /// Current seats
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the ledger lock is poisoned.
    pub fn seats(&self) -> ApiResult<Vec<Seat>> {
        self.with_ledger(|ledger| ledger.seats.clone())
    }

    /// Current balance of `manager_id` (0 if unknown)
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the ledger lock is poisoned.
    pub fn balance(&self, manager_id: &ManagerId) -> ApiResult<u32> {
        self.with_ledger(|ledger| ledger.balances.get(manager_id).copied().unwrap_or(0))
    }
}

impl Default for InMemoryBookingApi {
    fn default() -> Self {
        Self::new()
    }
}

impl SeatBookingApi for InMemoryBookingApi {
    fn load_seats(&self) -> ApiFuture<Vec<Seat>> {
        let api = self.clone();
        Box::pin(async move {
            pause(api.latency.seats).await;
            api.seats()
        })
    }

    fn load_token_balance(&self, manager_id: ManagerId) -> ApiFuture<TokenBalance> {
        let api = self.clone();
        Box::pin(async move {
            pause(api.latency.tokens).await;
            let tokens = api.balance(&manager_id)?;
            let manager_name = api
                .directory
                .manager_name(&manager_id)
                .unwrap_or("Unknown Manager")
                .to_string();
            Ok(TokenBalance {
                manager_id,
                manager_name,
                tokens,
            })
        })
    }

    fn submit_booking(&self, request: BookingRequest) -> ApiFuture<BookingReceipt> {
        let api = self.clone();
        Box::pin(async move {
            pause(api.latency.booking).await;
            let seat = api.with_ledger(|ledger| ledger.book(&request, &api.directory))??;
            tracing::debug!(seat = %seat.id(), employee = %request.employee_id, "Booking recorded");
            Ok(BookingReceipt {
                message: format!("Seat {} booked successfully", seat.id()),
                seat,
            })
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::SeatId;

    fn request(seat: &str, employee: &str) -> BookingRequest {
        BookingRequest {
            seat_id: SeatId::new(seat),
            employee_id: EmployeeId::new(employee),
        }
    }

    #[test]
    fn office_floor_layout() {
        let seats = office_floor();
        assert_eq!(seats.len(), 20);
        assert_eq!(seats.first().map(|s| s.id().as_str()), Some("A1"));
        assert_eq!(seats.last().map(|s| s.id().as_str()), Some("D5"));

        let booked: Vec<_> = seats
            .iter()
            .filter(|s| s.is_booked())
            .map(|s| (s.id().as_str(), s.owner().map(EmployeeId::as_str)))
            .collect();
        assert_eq!(
            booked,
            [
                ("A2", Some("EMP102")),
                ("A5", Some("EMP103")),
                ("B3", Some("EMP104")),
                ("C2", Some("EMP105")),
                ("D4", Some("EMP101")),
            ]
        );
    }

    #[tokio::test]
    async fn loads_balance_with_manager_name() {
        let api = InMemoryBookingApi::new();
        let balance = api.load_token_balance(ManagerId::new("MGR002")).await.unwrap();
        assert_eq!(balance.tokens, 3);
        assert_eq!(balance.manager_name, "Manager B");

        let unknown = api.load_token_balance(ManagerId::new("MGR404")).await.unwrap();
        assert_eq!(unknown.tokens, 0);
    }

    #[tokio::test]
    async fn booking_spends_one_token() {
        let api = InMemoryBookingApi::new();
        let receipt = api.submit_booking(request("B1", "EMP101")).await.unwrap();

        assert!(receipt.seat.is_owned_by(&EmployeeId::new("EMP101")));
        assert_eq!(api.balance(&ManagerId::new("MGR001")).unwrap(), 4);

        let stored = api.seats().unwrap();
        let b1 = stored.iter().find(|s| s.id().as_str() == "B1").unwrap();
        assert!(b1.is_owned_by(&EmployeeId::new("EMP101")));
    }

    #[tokio::test]
    async fn rejections_follow_validation_order() {
        let api = InMemoryBookingApi::new();

        // Zero balance wins over a missing seat
        let result = api.submit_booking(request("Z9", "EMP105")).await;
        assert!(matches!(result, Err(ApiError::Rejected(BookingError::InsufficientTokens))));

        let result = api.submit_booking(request("Z9", "EMP101")).await;
        assert!(matches!(result, Err(ApiError::Rejected(BookingError::SeatNotFound(_)))));

        let result = api.submit_booking(request("A2", "EMP101")).await;
        assert!(matches!(result, Err(ApiError::Rejected(BookingError::SeatUnavailable(_)))));

        assert_eq!(api.balance(&ManagerId::new("MGR001")).unwrap(), 5);
    }

    #[tokio::test]
    async fn concurrent_bookings_for_one_seat() {
        let api = InMemoryBookingApi::new();
        let first = api.submit_booking(request("C3", "EMP101"));
        let second = api.submit_booking(request("C3", "EMP103"));
        let (first, second) = tokio::join!(first, second);

        assert_eq!(usize::from(first.is_ok()) + usize::from(second.is_ok()), 1);
        let spent = (5 - api.balance(&ManagerId::new("MGR001")).unwrap())
            + (3 - api.balance(&ManagerId::new("MGR002")).unwrap());
        assert_eq!(spent, 1);
    }

    #[tokio::test]
    async fn latency_is_simulated() {
        let latency = SimulatedLatency {
            seats: Duration::from_millis(30),
            ..SimulatedLatency::none()
        };
        let api = InMemoryBookingApi::new().with_latency(latency);
        let started = std::time::Instant::now();
        api.load_seats().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
        assert_eq!(SimulatedLatency::realistic().booking, Duration::from_millis(800));
    }
}
