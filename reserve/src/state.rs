//! Session state owned by the booking reconciler.

use crate::types::{EmployeeId, ManagerInfo, Notification, Seat, SeatId, Severity};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Maximum number of notifications kept in the session log
pub const NOTICE_CAPACITY: usize = 32;

/// State of one booking session
///
/// Only the reconciler mutates it. The presentation layer reads it through
/// the store and delivers [`BookingState::notices_since`] to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingState {
    /// Seats in display order
    pub seats: Vec<Seat>,
    /// Active employee identity
    pub employee: Option<EmployeeId>,
    /// Manager of the active employee
    pub manager: Option<ManagerInfo>,
    /// Manager's remaining booking tokens
    pub tokens: u32,
    /// Currently selected seat; always an available seat
    pub selected: Option<SeatId>,
    /// A load or submission is in flight
    pub loading: bool,
    /// Seat waiting on the user's yes/no answer
    pub awaiting_confirmation: Option<SeatId>,
    /// Seat whose booking has been submitted and not yet answered
    pub submitting: Option<SeatId>,
    /// A cleared session's load or submission has not returned yet
    pub draining: bool,
    notices: VecDeque<Notification>,
    last_seq: u64,
}

impl BookingState {
    /// Empty session: no identity, no seats
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a seat by id
    #[must_use]
    pub fn seat(&self, id: &SeatId) -> Option<&Seat> {
        self.seats.iter().find(|seat| seat.id() == id)
    }

    pub(crate) fn seat_mut(&mut self, id: &SeatId) -> Option<&mut Seat> {
        self.seats.iter_mut().find(|seat| seat.id() == id)
    }

    /// Notifications raised after sequence number `seq`, oldest first
    pub fn notices_since(&self, seq: u64) -> impl Iterator<Item = &Notification> {
        self.notices.iter().filter(move |notice| notice.seq > seq)
    }

    /// Most recent notification
    #[must_use]
    pub fn last_notice(&self) -> Option<&Notification> {
        self.notices.back()
    }

    /// Sequence number of the most recent notification (0 before the first)
    #[must_use]
    pub const fn last_seq(&self) -> u64 {
        self.last_seq
    }

    /// Appends a notification, evicting the oldest past capacity
    pub(crate) fn push_notice(
        &mut self,
        severity: Severity,
        message: impl Into<String>,
        raised_at: DateTime<Utc>,
    ) {
        self.last_seq += 1;
        if self.notices.len() == NOTICE_CAPACITY {
            self.notices.pop_front();
        }
        self.notices.push_back(Notification {
            seq: self.last_seq,
            severity,
            message: message.into(),
            raised_at,
        });
    }

    /// Drops identity and everything derived from it; the notification log survives
    ///
    /// A request still in flight marks the session as draining until its
    /// final result comes back.
    pub(crate) fn clear_session(&mut self) {
        self.draining |= self.loading;
        self.seats.clear();
        self.employee = None;
        self.manager = None;
        self.tokens = 0;
        self.selected = None;
        self.loading = false;
        self.awaiting_confirmation = None;
        self.submitting = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_are_numbered_and_bounded() {
        let mut state = BookingState::new();
        let now = Utc::now();
        for i in 0..40 {
            state.push_notice(Severity::Info, format!("notice {i}"), now);
        }

        assert_eq!(state.last_seq(), 40);
        assert_eq!(state.notices_since(0).count(), NOTICE_CAPACITY);
        assert_eq!(state.notices_since(0).next().map(|n| n.seq), Some(9));

        let recent: Vec<_> = state.notices_since(38).map(|n| n.message.as_str()).collect();
        assert_eq!(recent, ["notice 38", "notice 39"]);
    }

    #[test]
    fn clear_session_keeps_notices() {
        let mut state = BookingState::new();
        state.employee = Some(EmployeeId::new("EMP101"));
        state.tokens = 5;
        state.loading = true;
        state.push_notice(Severity::Success, "done", Utc::now());

        state.clear_session();

        assert!(state.employee.is_none());
        assert_eq!(state.tokens, 0);
        assert!(!state.loading);
        assert_eq!(state.last_notice().map(|n| n.message.as_str()), Some("done"));
    }

    #[test]
    fn clearing_mid_request_marks_draining() {
        let mut state = BookingState::new();
        state.clear_session();
        assert!(!state.draining);

        state.employee = Some(EmployeeId::new("EMP101"));
        state.loading = true;
        state.submitting = Some(SeatId::new("B1"));
        state.clear_session();

        assert!(state.draining);
        assert!(state.submitting.is_none());
    }
}
