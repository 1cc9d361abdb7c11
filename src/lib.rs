//! Order lifecycle tracking: a sled-backed order store and the state machine
//! that moves orders from `new` through `preparing` and `served` to `closed`.

pub mod api;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod order;
pub mod service;
pub mod store;
pub mod utils;

pub use error::{OrderError, StoreError};
pub use lifecycle::{Outcome, Rejection, transition};
pub use order::{Item, Order, Status, TimeStamp};
pub use service::{OrderService, StatusChange};
pub use store::{OrderStore, View};
