//! Sled-backed order store.
//!
//! Each order lives under its id in a single tree, encoded as CBOR. Writes
//! after creation go through one of the conditional replace operations so a
//! record that vanished or moved on underneath a caller is never clobbered.
use super::config::StoreConfig;
use super::error::StoreError;
use super::order::{Item, Order, Status, TimeStamp};
use super::utils;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Named status filters used by the list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Everything not yet closed
    Open,
    /// Waiting for the kitchen
    Pending,
    /// In the kitchen, not yet served
    Plated,
    /// Served, awaiting checkout
    Monitor,
}

impl View {
    pub const ALL: [View; 4] = [View::Open, View::Pending, View::Plated, View::Monitor];

    pub fn matches(&self, status: Status) -> bool {
        match self {
            View::Open => status != Status::Closed,
            View::Pending => status == Status::New,
            View::Plated => status == Status::Preparing,
            View::Monitor => status == Status::Served,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Open => "open",
            View::Pending => "pending",
            View::Plated => "plated",
            View::Monitor => "monitor",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown order view: {0}")]
pub struct UnknownView(pub String);

impl FromStr for View {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|view| view.as_str() == s)
            .ok_or_else(|| UnknownView(s.to_string()))
    }
}

#[derive(Clone)]
pub struct OrderStore {
    tree: sled::Tree,
}

impl OrderStore {
    /// Open (or create) the database described by `config`.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let db = config.sled_config().open()?;
        Self::from_db(&db, &config.tree)
    }

    /// Use the named tree of an already open database.
    pub fn from_db(db: &sled::Db, tree: &str) -> Result<Self, StoreError> {
        Ok(Self {
            tree: db.open_tree(tree)?,
        })
    }

    /// Place a new order. It starts out `new` with only its creation time stamped.
    pub fn insert(&self, items: Vec<Item>) -> Result<String, StoreError> {
        let id = utils::new_order_id().map_err(|e| StoreError::IdGeneration(e.into()))?;
        let order = Order::new(id.clone(), items, TimeStamp::new());
        let bytes = encode(&order)?;

        // swap against an absent key so an id clash can never overwrite a live order
        self.tree
            .compare_and_swap(id.as_bytes(), None::<&[u8]>, Some(bytes))?
            .map_err(|_| StoreError::IdTaken(id.clone()))?;

        debug!(order_id = %id, items = order.items.len(), "order inserted");
        Ok(id)
    }

    pub fn fetch_by_id(&self, id: &str) -> Result<Order, StoreError> {
        self.fetch_with_bytes(id).map(|(order, _)| order)
    }

    /// The decoded order together with the exact bytes it was read from,
    /// for handing back to [`OrderStore::replace_if_unchanged`].
    pub fn fetch_with_bytes(&self, id: &str) -> Result<(Order, sled::IVec), StoreError> {
        match self.tree.get(id.as_bytes())? {
            Some(bytes) => Ok((decode(&bytes)?, bytes)),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    /// Ids of every order whose status passes `predicate`, in key order.
    pub fn list_ids_where<F>(&self, predicate: F) -> Result<Vec<String>, StoreError>
    where
        F: Fn(Status) -> bool,
    {
        let mut ids = Vec::new();
        for entry in self.tree.iter() {
            let (key, value) = entry?;
            let order = decode(&value)?;
            if predicate(order.status) {
                ids.push(String::from_utf8(key.to_vec())?);
            }
        }
        Ok(ids)
    }

    pub fn list_ids(&self, view: View) -> Result<Vec<String>, StoreError> {
        self.list_ids_where(|status| view.matches(status))
    }

    /// Overwrite the order at `id` if one exists. Returns the number of
    /// records replaced: 1, or 0 when there is no such id.
    pub fn replace_if_present(&self, id: &str, order: &Order) -> Result<usize, StoreError> {
        let bytes = encode(order)?;
        let previous = self
            .tree
            .fetch_and_update(id.as_bytes(), |old| old.map(|_| bytes.clone()))?;

        let matched = usize::from(previous.is_some());
        debug!(order_id = %id, matched, "replace if present");
        Ok(matched)
    }

    /// Overwrite the order at `id` only while its stored bytes are still
    /// `expected`, as returned by [`OrderStore::fetch_with_bytes`].
    /// Returns 0 if the record was removed or replaced since it was read.
    pub fn replace_if_unchanged(
        &self,
        id: &str,
        expected: &[u8],
        order: &Order,
    ) -> Result<usize, StoreError> {
        let new = encode(order)?;

        let matched = match self
            .tree
            .compare_and_swap(id.as_bytes(), Some(expected), Some(new))?
        {
            Ok(()) => 1,
            Err(_) => 0,
        };
        debug!(order_id = %id, matched, "replace if unchanged");
        Ok(matched)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Block until everything written so far is durable.
    pub fn flush(&self) -> Result<usize, StoreError> {
        Ok(self.tree.flush()?)
    }

    #[cfg(test)]
    pub(crate) fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.tree.remove(id.as_bytes())?;
        Ok(())
    }
}

fn encode(order: &Order) -> Result<Vec<u8>, StoreError> {
    Ok(order.to_cbor()?)
}

fn decode(bytes: &[u8]) -> Result<Order, StoreError> {
    Ok(Order::from_cbor(bytes)?)
}
