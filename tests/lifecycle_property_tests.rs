//! Property-based tests for the order lifecycle state machine
//!
//! The transition function decides every status change the store ever sees,
//! so these check its rules across arbitrary starting statuses, requests and
//! clock readings rather than a handful of hand-picked cases.

use chrono::{DateTime, Utc};
use order_lifecycle::{
    Item, Order, Outcome, Status, TimeStamp,
    lifecycle::{next_statuses, transition},
};
use proptest::prelude::*;

/// Strategy to pick any status
fn status_strategy() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::New),
        Just(Status::Preparing),
        Just(Status::Served),
        Just(Status::Closed),
    ]
}

/// Strategy for clock readings between 2000 and 2100
fn timestamp_strategy() -> impl Strategy<Value = TimeStamp<Utc>> {
    (946_684_800i64..4_102_444_800i64).prop_map(|secs| {
        DateTime::from_timestamp(secs, 0)
            .expect("in range")
            .into()
    })
}

fn items_strategy() -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec(
        ("[a-z]{1,12}", 1u32..=20).prop_map(|(name, quantity)| Item::new(name, quantity)),
        0..=5,
    )
}

/// A record that reached `status` legally, one step at a time
fn order_at(status: Status, items: Vec<Item>, created: TimeStamp<Utc>) -> Order {
    let mut order = Order::new("order_prop".into(), items, created);
    while order.status < status {
        let next = next_statuses(order.status)[0];
        match transition(&order, next, TimeStamp::new()) {
            Outcome::Applied(updated) => order = updated,
            other => panic!("legal step {} -> {next} gave {other:?}", order.status),
        }
    }
    order
}

fn order_strategy() -> impl Strategy<Value = Order> {
    (status_strategy(), items_strategy(), timestamp_strategy())
        .prop_map(|(status, items, created)| order_at(status, items, created))
}

fn position(status: Status) -> usize {
    Status::ALL.iter().position(|s| *s == status).unwrap_or(usize::MAX)
}

proptest! {
    /// Property: asking for the current status is always a no-op, closed included
    #[test]
    fn prop_same_status_is_noop(order in order_strategy(), now in timestamp_strategy()) {
        prop_assert_eq!(transition(&order, order.status, now), Outcome::NoOp);
    }

    /// Property: only the single next step applies; skips and reversals are rejected
    #[test]
    fn prop_forward_single_step_only(
        order in order_strategy(),
        requested in status_strategy(),
        now in timestamp_strategy(),
    ) {
        let outcome = transition(&order, requested, now);
        let distance = position(requested) as i64 - position(order.status) as i64;

        match distance {
            0 => prop_assert_eq!(outcome, Outcome::NoOp),
            1 => prop_assert!(outcome.is_applied()),
            _ => match outcome {
                Outcome::Rejected(rejection) => {
                    prop_assert_eq!(rejection.from, order.status);
                    prop_assert_eq!(rejection.to, requested);
                }
                other => prop_assert!(false, "expected rejection, got {:?}", other),
            },
        }
    }

    /// Property: a closed order refuses every other status
    #[test]
    fn prop_closed_is_terminal(
        items in items_strategy(),
        created in timestamp_strategy(),
        requested in status_strategy(),
        now in timestamp_strategy(),
    ) {
        prop_assume!(requested != Status::Closed);
        let closed = order_at(Status::Closed, items, created);

        let rejected = matches!(transition(&closed, requested, now), Outcome::Rejected(_));
        prop_assert!(rejected);
    }

    /// Property: applying stamps exactly the field for the target status with `now`
    /// and leaves everything else as it was
    #[test]
    fn prop_apply_stamps_only_its_field(order in order_strategy(), now in timestamp_strategy()) {
        prop_assume!(order.status != Status::Closed);
        let target = next_statuses(order.status)[0];

        let Outcome::Applied(updated) = transition(&order, target, now.clone()) else {
            return Err(TestCaseError::fail("legal step was not applied"));
        };

        prop_assert_eq!(updated.status, target);
        prop_assert_eq!(&updated.id, &order.id);
        prop_assert_eq!(&updated.items, &order.items);
        prop_assert_eq!(&updated.create_time, &order.create_time);

        let stamps = |o: &Order| [o.start_time.clone(), o.serve_time.clone(), o.checkout_time.clone()];
        let before = stamps(&order);
        let after = stamps(&updated);
        let slot = position(target) - 1;

        for i in 0..3 {
            if i == slot {
                prop_assert!(before[i].is_none());
                prop_assert_eq!(after[i].as_ref(), Some(&now));
            } else {
                prop_assert_eq!(&after[i], &before[i]);
            }
        }
    }

    /// Property: a stamp is present exactly when the status has reached it
    #[test]
    fn prop_stamps_track_status(order in order_strategy()) {
        prop_assert_eq!(order.start_time.is_some(), order.status >= Status::Preparing);
        prop_assert_eq!(order.serve_time.is_some(), order.status >= Status::Served);
        prop_assert_eq!(order.checkout_time.is_some(), order.status >= Status::Closed);
    }
}
