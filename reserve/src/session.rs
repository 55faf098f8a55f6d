//! Session shell: drives the store and feeds the front-end.
//!
//! Each dispatch runs to quiescence before anything is shown: the action,
//! every effect it starts and every action those effects feed back. Only
//! then are new notifications delivered (in order) and the view rendered.

use crate::actions::BookingAction;
use crate::environment::BookingEnvironment;
use crate::presentation::{NotificationSink, Renderer, SeatMapView};
use crate::reconciler::BookingReducer;
use crate::state::BookingState;
use crate::types::{EmployeeId, SeatId};
use blu_reserve_runtime::{Store, StoreError};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Store running the booking reconciler
pub type BookingStore = Store<BookingState, BookingAction, BookingEnvironment, BookingReducer>;

/// One user's booking session
pub struct BookingSession {
    store: BookingStore,
    sink: Arc<dyn NotificationSink>,
    renderer: Arc<dyn Renderer>,
    delivered: AtomicU64,
}

impl BookingSession {
    /// Starts an empty session
    #[must_use]
    pub fn new(
        environment: BookingEnvironment,
        sink: Arc<dyn NotificationSink>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            store: Store::new(BookingState::new(), BookingReducer::new(), environment),
            sink,
            renderer,
            delivered: AtomicU64::new(0),
        }
    }

    /// Underlying store
    #[must_use]
    pub const fn store(&self) -> &BookingStore {
        &self.store
    }

    /// Sends an action, waits for its whole cascade, then notifies and renders
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`BookingSession::shutdown`].
    #[tracing::instrument(skip(self), name = "session_dispatch")]
    pub async fn dispatch(&self, action: BookingAction) -> Result<SeatMapView, StoreError> {
        self.store.send(action).await?;
        self.store.wait_until_idle().await;

        let since = self.delivered.load(Ordering::SeqCst);
        let (notices, view) = self
            .store
            .state(|state| {
                let notices: Vec<_> = state.notices_since(since).cloned().collect();
                (notices, SeatMapView::from_state(state))
            })
            .await;

        for notice in &notices {
            self.sink.notify(notice);
            self.delivered.fetch_max(notice.seq, Ordering::SeqCst);
        }

        self.renderer.render(&view);
        Ok(view)
    }

    /// Switch identity
    ///
    /// # Errors
    ///
    /// See [`BookingSession::dispatch`].
    pub async fn select_employee(
        &self,
        employee_id: Option<EmployeeId>,
    ) -> Result<SeatMapView, StoreError> {
        self.dispatch(BookingAction::SelectEmployee { employee_id })
            .await
    }

    /// Pick a seat
    ///
    /// # Errors
    ///
    /// See [`BookingSession::dispatch`].
    pub async fn select_seat(&self, seat_id: SeatId) -> Result<SeatMapView, StoreError> {
        self.dispatch(BookingAction::SelectSeat { seat_id }).await
    }

    /// Drop the selection
    ///
    /// # Errors
    ///
    /// See [`BookingSession::dispatch`].
    pub async fn clear_selection(&self) -> Result<SeatMapView, StoreError> {
        self.dispatch(BookingAction::ClearSelection).await
    }

    /// Book the selected seat (the confirmation gate is asked first)
    ///
    /// # Errors
    ///
    /// See [`BookingSession::dispatch`].
    pub async fn confirm_booking(&self) -> Result<SeatMapView, StoreError> {
        self.dispatch(BookingAction::ConfirmBooking).await
    }

    /// Current view, without rendering
    pub async fn view(&self) -> SeatMapView {
        self.store.state(SeatMapView::from_state).await
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> BookingState {
        self.store.state(Clone::clone).await
    }

    /// Stop accepting actions and let in-flight effects finish
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running after `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.store.shutdown(timeout).await
    }
}

impl std::fmt::Debug for BookingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingSession")
            .field("delivered", &self.delivered.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
