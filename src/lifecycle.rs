//! The order lifecycle state machine.
//!
//! Orders move `new -> preparing -> served -> closed`, one step at a time.
//! Asking for the status an order already has is a no-op. Everything else is
//! rejected. The engine is a pure function of the record, the requested status
//! and the clock reading handed in; persisting the result is the caller's job.
use super::order::{Order, Status, TimeStamp};
use chrono::Utc;
use std::fmt;

// Legal next statuses, keyed by current status.
const TRANSITIONS: [(Status, &[Status]); 4] = [
    (Status::New, &[Status::Preparing]),
    (Status::Preparing, &[Status::Served]),
    (Status::Served, &[Status::Closed]),
    (Status::Closed, &[]),
];

/// The timestamp recorded when an order enters a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampField {
    StartTime,
    ServeTime,
    CheckoutTime,
}

const STAMPS: [(Status, StampField); 3] = [
    (Status::Preparing, StampField::StartTime),
    (Status::Served, StampField::ServeTime),
    (Status::Closed, StampField::CheckoutTime),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub from: Status,
    pub to: Status,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid transition from {} to {}", self.from, self.to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Already there, nothing to write.
    NoOp,
    /// The updated record, ready for a conditional replace.
    Applied(Order),
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }
}

/// Statuses reachable in one step from `status`.
pub fn next_statuses(status: Status) -> &'static [Status] {
    TRANSITIONS
        .iter()
        .find(|(from, _)| *from == status)
        .map(|(_, to)| *to)
        .unwrap_or(&[])
}

pub fn stamp_field(target: Status) -> Option<StampField> {
    STAMPS
        .iter()
        .find(|(status, _)| *status == target)
        .map(|(_, field)| *field)
}

pub fn is_terminal(status: Status) -> bool {
    next_statuses(status).is_empty()
}

/// Decide what a request to move `order` to `requested` does.
pub fn transition(order: &Order, requested: Status, now: TimeStamp<Utc>) -> Outcome {
    if order.status == requested {
        return Outcome::NoOp;
    }

    if !next_statuses(order.status).contains(&requested) {
        return Outcome::Rejected(Rejection {
            from: order.status,
            to: requested,
        });
    }

    let mut updated = order.clone();
    updated.status = requested;
    match stamp_field(requested) {
        Some(StampField::StartTime) => updated.start_time = Some(now),
        Some(StampField::ServeTime) => updated.serve_time = Some(now),
        Some(StampField::CheckoutTime) => updated.checkout_time = Some(now),
        // nothing transitions into `new`
        None => {}
    }

    Outcome::Applied(updated)
}
