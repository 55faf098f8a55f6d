//! Booking state reconciler.
//!
//! The reducer owns every change to [`BookingState`]: it validates user
//! intents, records the outcome as a notification, and describes the I/O to
//! perform next as effects. Provider results come back as actions and are
//! applied only if the session is still waiting for them.
//!
//! Rules:
//! - Switching to another employee, seat selection and confirmation are
//!   refused while a load or submission is in flight. Signing out and
//!   clearing the selection never are; a request abandoned by signing out
//!   still blocks the next sign-in until its result comes back and is
//!   dropped.
//! - A receipt only counts if it is for the submitted seat and that seat can
//!   be booked locally. Anything else is a failed booking.
//! - A booking is only submitted after the user accepts the confirmation
//!   prompt and the local checks pass (tokens, seat exists, seat free). The
//!   provider re-checks atomically.
//! - Failures leave seats, balance and selection untouched and raise exactly
//!   one notification.

use crate::actions::BookingAction;
use crate::environment::BookingEnvironment;
use crate::error::BookingError;
use crate::state::BookingState;
use crate::types::{BookingReceipt, BookingRequest, EmployeeId, ManagerId, SeatId, Severity};
use blu_reserve_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Reducer for a booking session
#[derive(Clone, Debug, Default)]
pub struct BookingReducer;

impl BookingReducer {
    /// Creates a new `BookingReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn notify(
        state: &mut BookingState,
        env: &BookingEnvironment,
        severity: Severity,
        message: impl Into<String>,
    ) {
        state.push_notice(severity, message, env.clock.now());
    }

    fn refuse(state: &mut BookingState, env: &BookingEnvironment, error: &BookingError) {
        tracing::debug!(%error, "Action refused");
        Self::notify(state, env, error.severity(), error.to_string());
    }

    /// Text of the yes/no prompt shown before a booking
    pub(crate) fn confirmation_prompt(seat_id: &SeatId, manager_name: &str) -> String {
        format!("Confirm booking seat {seat_id}?\n\nThis will deduct 1 token from {manager_name}.")
    }

    /// Whether a load result still belongs to the current session
    const fn expecting_load(state: &BookingState) -> bool {
        state.loading && state.employee.is_some()
    }

    fn validate_selection(state: &BookingState, seat_id: &SeatId) -> Result<(), BookingError> {
        let Some(employee) = state.employee.as_ref() else {
            return Err(BookingError::NoActiveIdentity);
        };
        if state.loading || state.awaiting_confirmation.is_some() {
            return Err(BookingError::Busy);
        }

        let Some(seat) = state.seat(seat_id) else {
            return Err(BookingError::SeatNotFound(seat_id.clone()));
        };
        if seat.is_owned_by(employee) {
            return Err(BookingError::SeatAlreadyOwnedBySelf(seat_id.clone()));
        }
        if seat.is_booked() {
            return Err(BookingError::SeatUnavailable(seat_id.clone()));
        }

        Ok(())
    }

    fn validate_confirm(state: &BookingState) -> Result<SeatId, BookingError> {
        let Some(seat_id) = state.selected.clone() else {
            return Err(BookingError::NoSeatSelected);
        };
        if state.employee.is_none() {
            return Err(BookingError::NoActiveIdentity);
        }
        if state.loading || state.awaiting_confirmation.is_some() {
            return Err(BookingError::Busy);
        }
        Ok(seat_id)
    }

    /// Checks run after the user accepts, in the same order the provider uses
    fn validate_submission(
        state: &BookingState,
        seat_id: &SeatId,
    ) -> Result<BookingRequest, BookingError> {
        let Some(employee) = state.employee.clone() else {
            return Err(BookingError::NoActiveIdentity);
        };
        if state.tokens == 0 {
            return Err(BookingError::InsufficientTokens);
        }

        let Some(seat) = state.seat(seat_id) else {
            return Err(BookingError::SeatNotFound(seat_id.clone()));
        };
        if seat.is_booked() {
            return Err(BookingError::SeatUnavailable(seat_id.clone()));
        }

        Ok(BookingRequest {
            seat_id: seat_id.clone(),
            employee_id: employee,
        })
    }

    fn load_session(env: &BookingEnvironment, manager_id: ManagerId) -> Effect<BookingAction> {
        let tokens_api = env.api.clone();
        let seats_api = env.api.clone();

        Effect::chain(vec![
            Effect::future(async move {
                match tokens_api.load_token_balance(manager_id).await {
                    Ok(balance) => Some(BookingAction::TokensLoaded { balance }),
                    Err(error) => Some(BookingAction::TokenLoadFailed {
                        reason: error.to_string(),
                    }),
                }
            }),
            Effect::future(async move {
                match seats_api.load_seats().await {
                    Ok(seats) => Some(BookingAction::SeatsLoaded { seats }),
                    Err(error) => Some(BookingAction::SeatLoadFailed {
                        reason: error.to_string(),
                    }),
                }
            }),
        ])
    }

    fn ask(env: &BookingEnvironment, seat_id: SeatId, prompt: String) -> Effect<BookingAction> {
        let gate = env.gate.clone();
        Effect::future(async move {
            let accepted = gate.confirm(prompt).await;
            Some(BookingAction::ConfirmationAnswered { seat_id, accepted })
        })
    }

    fn submit(env: &BookingEnvironment, request: BookingRequest) -> Effect<BookingAction> {
        let api = env.api.clone();
        Effect::future(async move {
            match api.submit_booking(request).await {
                Ok(receipt) => Some(BookingAction::BookingSucceeded { receipt }),
                Err(error) => {
                    tracing::warn!(%error, "Booking submission failed");
                    Some(BookingAction::BookingFailed {
                        error: error.into_booking_error(),
                    })
                },
            }
        })
    }

    fn select_employee(
        state: &mut BookingState,
        employee_id: Option<EmployeeId>,
        env: &BookingEnvironment,
    ) -> SmallVec<[Effect<BookingAction>; 4]> {
        if employee_id.is_some() && (state.loading || state.draining) {
            Self::refuse(state, env, &BookingError::Busy);
            return smallvec![Effect::None];
        }

        state.clear_session();

        let Some(employee_id) = employee_id else {
            tracing::info!("Session cleared");
            return smallvec![Effect::None];
        };

        let Some(manager) = env.directory.manager_of(&employee_id).cloned() else {
            Self::refuse(state, env, &BookingError::UnknownEmployee(employee_id));
            return smallvec![Effect::None];
        };

        tracing::info!(employee = %employee_id, manager = %manager.id, "Employee selected");
        let manager_id = manager.id.clone();
        state.employee = Some(employee_id);
        state.manager = Some(manager);
        state.loading = true;

        smallvec![Self::load_session(env, manager_id)]
    }

    /// Books the submitted seat from a receipt
    ///
    /// Nothing changes unless the receipt names `submitted` and the seat is
    /// still free locally.
    fn apply_receipt(
        state: &mut BookingState,
        submitted: &SeatId,
        receipt: &BookingReceipt,
        env: &BookingEnvironment,
    ) -> Result<(), BookingError> {
        if receipt.seat.id() != submitted {
            return Err(BookingError::Transport {
                detail: format!(
                    "receipt for seat {} does not match submitted seat {submitted}",
                    receipt.seat.id()
                ),
            });
        }

        let booked = match (state.employee.clone(), state.seat_mut(submitted)) {
            (Some(employee), Some(seat)) => seat.book(employee),
            _ => false,
        };
        if !booked {
            return Err(BookingError::Transport {
                detail: format!("seat {submitted} cannot be booked in this session"),
            });
        }

        state.tokens = state.tokens.saturating_sub(1);
        state.selected = None;

        tracing::info!(seat = %submitted, tokens = state.tokens, message = %receipt.message, "Seat booked");
        metrics::counter!("booking.succeeded").increment(1);
        Self::notify(
            state,
            env,
            Severity::Success,
            format!("Seat {submitted} booked successfully!"),
        );
        Ok(())
    }

    fn booking_failed(state: &mut BookingState, env: &BookingEnvironment, error: &BookingError) {
        metrics::counter!("booking.rejected").increment(1);
        Self::refuse(state, env, error);
    }
}

impl Reducer for BookingReducer {
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== User intents ==========
            BookingAction::SelectEmployee { employee_id } => {
                Self::select_employee(state, employee_id, env)
            },

            BookingAction::SelectSeat { seat_id } => {
                if let Err(error) = Self::validate_selection(state, &seat_id) {
                    Self::refuse(state, env, &error);
                    return smallvec![Effect::None];
                }

                Self::notify(state, env, Severity::Info, format!("Seat {seat_id} selected."));
                state.selected = Some(seat_id);
                smallvec![Effect::None]
            },

            BookingAction::ClearSelection => {
                state.selected = None;
                state.awaiting_confirmation = None;
                Self::notify(state, env, Severity::Info, "Selection cleared.");
                smallvec![Effect::None]
            },

            BookingAction::ConfirmBooking => {
                let seat_id = match Self::validate_confirm(state) {
                    Ok(seat_id) => seat_id,
                    Err(error) => {
                        Self::refuse(state, env, &error);
                        return smallvec![Effect::None];
                    },
                };

                let manager_name = state
                    .manager
                    .as_ref()
                    .map_or("your manager", |manager| manager.name.as_str());
                let prompt = Self::confirmation_prompt(&seat_id, manager_name);
                state.awaiting_confirmation = Some(seat_id.clone());

                smallvec![Self::ask(env, seat_id, prompt)]
            },

            // ========== Effect results ==========
            BookingAction::TokensLoaded { balance } => {
                let current = state.manager.as_ref().map(|manager| &manager.id);
                if !Self::expecting_load(state) || current != Some(&balance.manager_id) {
                    tracing::debug!(manager = %balance.manager_id, "Ignoring stale token balance");
                    return smallvec![Effect::None];
                }

                state.tokens = balance.tokens;
                smallvec![Effect::None]
            },

            BookingAction::TokenLoadFailed { reason } => {
                if !Self::expecting_load(state) {
                    tracing::debug!("Ignoring stale token load failure");
                    return smallvec![Effect::None];
                }

                tracing::warn!(%reason, "Failed to load manager tokens");
                state.tokens = 0;
                Self::notify(state, env, Severity::Error, "Failed to load manager tokens.");
                smallvec![Effect::None]
            },

            BookingAction::SeatsLoaded { seats } => {
                if !Self::expecting_load(state) {
                    tracing::debug!("Ignoring stale seat list");
                    state.draining = false;
                    return smallvec![Effect::None];
                }

                tracing::debug!(count = seats.len(), "Seats loaded");
                state.seats = seats;
                state.loading = false;
                smallvec![Effect::None]
            },

            BookingAction::SeatLoadFailed { reason } => {
                if !Self::expecting_load(state) {
                    tracing::debug!("Ignoring stale seat load failure");
                    state.draining = false;
                    return smallvec![Effect::None];
                }

                tracing::warn!(%reason, "Failed to load seats");
                state.loading = false;
                Self::notify(
                    state,
                    env,
                    Severity::Error,
                    "Failed to load seats. Please try again.",
                );
                smallvec![Effect::None]
            },

            BookingAction::ConfirmationAnswered { seat_id, accepted } => {
                if state.awaiting_confirmation.as_ref() != Some(&seat_id) {
                    tracing::debug!(seat = %seat_id, "Ignoring answer to a withdrawn prompt");
                    return smallvec![Effect::None];
                }
                state.awaiting_confirmation = None;

                if !accepted {
                    tracing::debug!(seat = %seat_id, "Booking declined");
                    return smallvec![Effect::None];
                }

                match Self::validate_submission(state, &seat_id) {
                    Ok(request) => {
                        tracing::info!(seat = %request.seat_id, employee = %request.employee_id, "Submitting booking");
                        state.loading = true;
                        state.submitting = Some(request.seat_id.clone());
                        smallvec![Self::submit(env, request)]
                    },
                    Err(error) => {
                        Self::booking_failed(state, env, &error);
                        smallvec![Effect::None]
                    },
                }
            },

            BookingAction::BookingSucceeded { receipt } => {
                let Some(submitted) = state.submitting.take() else {
                    tracing::debug!(seat = %receipt.seat.id(), "Ignoring unexpected booking receipt");
                    state.draining = false;
                    return smallvec![Effect::None];
                };

                state.loading = false;
                if let Err(error) = Self::apply_receipt(state, &submitted, &receipt, env) {
                    tracing::warn!(?error, "Booking receipt rejected");
                    Self::booking_failed(state, env, &error);
                }
                smallvec![Effect::None]
            },

            BookingAction::BookingFailed { error } => {
                if state.submitting.take().is_none() {
                    tracing::debug!(%error, "Ignoring unexpected booking failure");
                    state.draining = false;
                    return smallvec![Effect::None];
                }

                state.loading = false;
                Self::booking_failed(state, env, &error);
                smallvec![Effect::None]
            },
        }
    }
}
