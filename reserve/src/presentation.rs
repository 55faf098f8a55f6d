//! Presentation contract and the seat-map projection.
//!
//! A front-end plugs in three things: a [`ConfirmationGate`] that answers
//! yes/no prompts, a [`NotificationSink`] that shows messages, and a
//! [`Renderer`] that draws a [`SeatMapView`]. The view is computed from
//! [`BookingState`] alone, so any front-end draws the same grid.

use crate::state::BookingState;
use crate::types::{EmployeeId, Notification, Seat, SeatId};
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Text shown instead of the grid when nobody is signed in
pub const NO_EMPLOYEE_PLACEHOLDER: &str = "Please select an employee to view seats.";

/// Asks the user to confirm an operation
pub trait ConfirmationGate: Send + Sync {
    /// Resolves to `true` if the user accepts `prompt`
    fn confirm(&self, prompt: String) -> Pin<Box<dyn Future<Output = bool> + Send>>;
}

/// Shows notifications to the user
pub trait NotificationSink: Send + Sync {
    /// Display one notification
    fn notify(&self, notification: &Notification);
}

/// Draws the seat map
pub trait Renderer: Send + Sync {
    /// Draw the current view
    fn render(&self, view: &SeatMapView);
}

/// Gate that always gives the same answer
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl ConfirmationGate for FixedAnswer {
    fn confirm(&self, prompt: String) -> Pin<Box<dyn Future<Output = bool> + Send>> {
        let answer = self.0;
        tracing::debug!(%prompt, answer, "Confirmation answered automatically");
        Box::pin(async move { answer })
    }
}

/// How a seat is drawn, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeatDisplay {
    /// Held by the active employee
    MyBooking,
    /// Held by someone else
    Booked,
    /// Currently selected
    Selected,
    /// Free
    Available,
}

impl SeatDisplay {
    fn of(seat: &Seat, employee: Option<&EmployeeId>, selected: Option<&SeatId>) -> Self {
        if employee.is_some_and(|employee| seat.is_owned_by(employee)) {
            Self::MyBooking
        } else if seat.is_booked() {
            Self::Booked
        } else if selected == Some(seat.id()) {
            Self::Selected
        } else {
            Self::Available
        }
    }

    /// CSS-style class name
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::MyBooking => "my-booking",
            Self::Booked => "booked",
            Self::Selected => "selected",
            Self::Available => "available",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::MyBooking => "Your Booking",
            Self::Booked => "Booked",
            Self::Selected => "Selected",
            Self::Available => "Available",
        }
    }

    const fn marker(self) -> char {
        match self {
            Self::MyBooking => '@',
            Self::Booked => 'x',
            Self::Selected => '*',
            Self::Available => ' ',
        }
    }
}

/// One seat in the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatCell {
    /// Seat identifier
    pub id: SeatId,
    /// How to draw it
    pub display: SeatDisplay,
    /// Hover text, e.g. `A1 - Available`
    pub tooltip: String,
}

/// One row of the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatRow {
    /// Row label
    pub label: String,
    /// Seats in order
    pub cells: Vec<SeatCell>,
}

/// Everything a front-end needs to draw the booking screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatMapView {
    /// Active employee
    pub employee: Option<EmployeeId>,
    /// Manager display name
    pub manager_name: Option<String>,
    /// Manager's remaining tokens
    pub tokens: u32,
    /// Seat rows; empty when nobody is signed in
    pub rows: Vec<SeatRow>,
    /// Shown instead of the grid when set
    pub placeholder: Option<&'static str>,
    /// An operation is in flight
    pub loading: bool,
    /// Confirm button enabled
    pub confirm_enabled: bool,
    /// Reset button enabled
    pub reset_enabled: bool,
}

impl SeatMapView {
    /// Projects the session state
    #[must_use]
    pub fn from_state(state: &BookingState) -> Self {
        let actionable = state.selected.is_some() && !state.loading;
        let mut view = Self {
            employee: state.employee.clone(),
            manager_name: state.manager.as_ref().map(|manager| manager.name.clone()),
            tokens: state.tokens,
            rows: Vec::new(),
            placeholder: None,
            loading: state.loading,
            confirm_enabled: actionable,
            reset_enabled: actionable,
        };

        let Some(employee) = state.employee.as_ref() else {
            view.placeholder = Some(NO_EMPLOYEE_PLACEHOLDER);
            return view;
        };

        for seat in &state.seats {
            let display = SeatDisplay::of(seat, Some(employee), state.selected.as_ref());
            let cell = SeatCell {
                id: seat.id().clone(),
                display,
                tooltip: format!("{} - {}", seat.id(), display.label()),
            };

            match view.rows.last_mut() {
                Some(row) if row.label == seat.row() => row.cells.push(cell),
                _ => view.rows.push(SeatRow {
                    label: seat.row().to_string(),
                    cells: vec![cell],
                }),
            }
        }

        view
    }

    /// Finds a cell by seat id
    #[must_use]
    pub fn cell(&self, id: &SeatId) -> Option<&SeatCell> {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .find(|cell| &cell.id == id)
    }
}

impl fmt::Display for SeatMapView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(placeholder) = self.placeholder {
            return writeln!(f, "{placeholder}");
        }

        if let (Some(employee), Some(manager)) = (&self.employee, &self.manager_name) {
            writeln!(f, "{employee}  |  {manager}  |  tokens: {}", self.tokens)?;
        }
        if self.loading {
            writeln!(f, "Loading...")?;
        }

        for row in &self.rows {
            for cell in &row.cells {
                write!(f, " {:>3}{}", cell.id.as_str(), cell.display.marker())?;
            }
            writeln!(f)?;
        }

        writeln!(f, "legend: @ yours  x booked  * selected")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ManagerInfo;

    fn state_for(employee: &str) -> BookingState {
        let mut state = BookingState::new();
        state.employee = Some(EmployeeId::new(employee));
        state.manager = Some(ManagerInfo::new("MGR001", "Manager A"));
        state.tokens = 5;
        state.seats = vec![
            Seat::new("A", 1),
            Seat::new("A", 2).booked_by(EmployeeId::new("EMP102")),
            Seat::new("A", 3),
            Seat::new("B", 1),
        ];
        state
    }

    #[test]
    fn placeholder_without_employee() {
        let view = SeatMapView::from_state(&BookingState::new());
        assert_eq!(view.placeholder, Some(NO_EMPLOYEE_PLACEHOLDER));
        assert!(view.rows.is_empty());
        assert!(!view.confirm_enabled);
        assert_eq!(view.to_string().trim(), NO_EMPLOYEE_PLACEHOLDER);
    }

    #[test]
    fn seats_grouped_by_row() {
        let view = SeatMapView::from_state(&state_for("EMP101"));
        let labels: Vec<_> = view.rows.iter().map(|row| row.label.as_str()).collect();
        assert_eq!(labels, ["A", "B"]);
        assert_eq!(view.rows[0].cells.len(), 3);
    }

    #[test]
    fn display_priority_and_tooltips() {
        let mut state = state_for("EMP102");
        state.selected = Some(SeatId::new("A3"));
        let view = SeatMapView::from_state(&state);

        let tooltip = |id: &str| view.cell(&SeatId::new(id)).map(|cell| cell.tooltip.clone());
        assert_eq!(tooltip("A2").as_deref(), Some("A2 - Your Booking"));
        assert_eq!(tooltip("A3").as_deref(), Some("A3 - Selected"));
        assert_eq!(tooltip("A1").as_deref(), Some("A1 - Available"));

        let other = SeatMapView::from_state(&state_for("EMP101"));
        let a2 = other.cell(&SeatId::new("A2"));
        assert_eq!(a2.map(|cell| cell.display), Some(SeatDisplay::Booked));
        assert_eq!(a2.map(|cell| cell.tooltip.as_str()), Some("A2 - Booked"));
        assert_eq!(SeatDisplay::MyBooking.class_name(), "my-booking");
    }

    #[test]
    fn buttons_need_selection_and_idle() {
        let mut state = state_for("EMP101");
        assert!(!SeatMapView::from_state(&state).confirm_enabled);

        state.selected = Some(SeatId::new("A1"));
        let view = SeatMapView::from_state(&state);
        assert!(view.confirm_enabled && view.reset_enabled);

        state.loading = true;
        let view = SeatMapView::from_state(&state);
        assert!(!view.confirm_enabled && !view.reset_enabled);
    }

    #[test]
    fn text_grid_shows_header_and_markers() {
        let mut state = state_for("EMP102");
        state.selected = Some(SeatId::new("B1"));
        let text = SeatMapView::from_state(&state).to_string();

        assert!(text.starts_with("EMP102  |  Manager A  |  tokens: 5"));
        assert!(text.contains(" A2@"));
        assert!(text.contains(" B1*"));
    }

    #[tokio::test]
    async fn fixed_answer_gate() {
        assert!(FixedAnswer(true).confirm("Book?".to_string()).await);
        assert!(!FixedAnswer(false).confirm("Book?".to_string()).await);
    }
}
