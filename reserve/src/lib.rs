//! # Blu Reserve
//!
//! Seat booking client. An employee picks a seat on the office floor and
//! books it with a token from their manager's balance.
//!
//! The [`reconciler`] is a pure reducer over [`BookingState`]; the runtime
//! `Store` executes its effects against a [`SeatBookingApi`] and the
//! presentation traits. [`BookingSession`] ties it together for a front-end.
//!
//! ## Example
//!
//! ```ignore
//! use blu_reserve::{BookingEnvironment, BookingSession, EmployeeDirectory, FixedAnswer};
//! use blu_reserve::memory::InMemoryBookingApi;
//! use std::sync::Arc;
//!
//! let env = BookingEnvironment::new(
//!     Arc::new(InMemoryBookingApi::new()),
//!     Arc::new(EmployeeDirectory::office_roster()),
//!     Arc::new(FixedAnswer(true)),
//! );
//! let session = BookingSession::new(env, sink, renderer);
//!
//! session.select_employee(Some("EMP101".into())).await?;
//! session.select_seat("B1".into()).await?;
//! let view = session.confirm_booking().await?;
//! assert_eq!(view.tokens, 4);
//! ```

pub mod actions;
pub mod cli;
pub mod config;
pub mod directory;
pub mod environment;
pub mod error;
pub mod http;
pub mod memory;
pub mod presentation;
pub mod provider;
pub mod reconciler;
pub mod session;
pub mod state;
pub mod types;

pub use actions::BookingAction;
pub use config::{Config, ProviderKind};
pub use directory::EmployeeDirectory;
pub use environment::BookingEnvironment;
pub use error::{ApiError, BookingError};
pub use presentation::{ConfirmationGate, FixedAnswer, NotificationSink, Renderer, SeatMapView};
pub use provider::{ApiResult, SeatBookingApi};
pub use reconciler::BookingReducer;
pub use session::{BookingSession, BookingStore};
pub use state::BookingState;
pub use types::{
    BookingReceipt, BookingRequest, EmployeeId, ManagerId, ManagerInfo, Notification, Seat,
    SeatId, SeatStatus, Severity, TokenBalance,
};
