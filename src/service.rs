//! Service layer API for order workflow operations
use super::error::OrderError;
use super::lifecycle::{self, Outcome};
use super::order::{Item, Order, Status, TimeStamp};
use super::store::{OrderStore, View};
use tracing::{error, info, warn};

/// What a status request did to the stored order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
    /// The order already had the requested status.
    Unchanged,
    Applied(Order),
}

impl StatusChange {
    pub fn rows_changed(&self) -> usize {
        match self {
            StatusChange::Unchanged => 0,
            StatusChange::Applied(_) => 1,
        }
    }
}

// Runs between the fetch and the conditional replace in `move_status`.
#[cfg(test)]
pub(crate) type BeforeReplace = std::sync::Arc<dyn Fn(&OrderStore, &str) + Send + Sync>;

#[derive(Clone)]
pub struct OrderService {
    store: OrderStore,
    #[cfg(test)]
    before_replace: Option<BeforeReplace>,
}

impl OrderService {
    pub fn new(store: OrderStore) -> Self {
        Self {
            store,
            #[cfg(test)]
            before_replace: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_before_replace(mut self, hook: BeforeReplace) -> Self {
        self.before_replace = Some(hook);
        self
    }

    pub fn store(&self) -> &OrderStore {
        &self.store
    }

    /// Place a new order and return its id
    pub fn create_order(&self, items: Vec<Item>) -> Result<String, OrderError> {
        let id = self.store.insert(items)?;
        info!(order_id = %id, "order created");
        Ok(id)
    }

    pub fn order_detail(&self, id: &str) -> Result<Order, OrderError> {
        Ok(self.store.fetch_by_id(id)?)
    }

    /// Move an order to `requested`, stamping the time it got there.
    pub fn move_status(&self, id: &str, requested: Status) -> Result<StatusChange, OrderError> {
        // Load from DB, keeping the bytes so the write can check nothing moved
        let (current, raw) = self.store.fetch_with_bytes(id)?;

        let updated = match lifecycle::transition(&current, requested, TimeStamp::new()) {
            Outcome::NoOp => return Ok(StatusChange::Unchanged),
            Outcome::Rejected(rejection) => {
                warn!(order_id = %id, %rejection, "status change rejected");
                return Err(OrderError::InvalidTransition(rejection));
            }
            Outcome::Applied(updated) => updated,
        };

        #[cfg(test)]
        if let Some(hook) = &self.before_replace {
            hook(&self.store, id);
        }

        // Save back to DB, but only over the record we decided on
        let matched = self.store.replace_if_unchanged(id, &raw, &updated)?;
        match matched {
            1 => {
                info!(order_id = %id, from = %current.status, to = %requested, "status changed");
                Ok(StatusChange::Applied(updated))
            }
            0 => {
                warn!(order_id = %id, to = %requested, "order changed underneath status update");
                Err(OrderError::ConflictOnReplace { id: id.to_string() })
            }
            matched => {
                error!(order_id = %id, matched, "replace matched more than one record");
                Err(OrderError::StoreInvariant {
                    id: id.to_string(),
                    matched,
                })
            }
        }
    }

    pub fn list(&self, view: View) -> Result<Vec<String>, OrderError> {
        Ok(self.store.list_ids(view)?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use std::sync::Arc;
    use tempfile::{TempDir, tempdir};

    pub(crate) fn temp_service() -> (TempDir, OrderService) {
        let dir = tempdir().unwrap();
        let config = StoreConfig::default().with_path(dir.path().join("orders.db"));
        (dir, OrderService::new(OrderStore::open(&config).unwrap()))
    }

    /// Another writer moves the order between our fetch and our replace
    pub(crate) fn interleaved_writer() -> BeforeReplace {
        Arc::new(|store: &OrderStore, id: &str| {
            let mut theirs = store.fetch_by_id(id).unwrap();
            theirs.status = Status::Preparing;
            theirs.start_time = Some(TimeStamp::new());
            assert_eq!(store.replace_if_present(id, &theirs).unwrap(), 1);
        })
    }

    #[test]
    fn interleaved_write_is_a_conflict() {
        let (_dir, service) = temp_service();
        let id = service.create_order(vec![Item::new("Burger", 1)]).unwrap();
        let service = service.with_before_replace(interleaved_writer());

        let err = service.move_status(&id, Status::Preparing).unwrap_err();

        assert!(matches!(err, OrderError::ConflictOnReplace { id: ref conflicted } if *conflicted == id));
        // the other writer's record is left alone
        let order = service.order_detail(&id).unwrap();
        assert_eq!(order.status, Status::Preparing);
    }

    #[test]
    fn interleaved_delete_is_a_conflict() {
        let (_dir, service) = temp_service();
        let id = service.create_order(vec![Item::new("Burger", 1)]).unwrap();
        let service = service.with_before_replace(Arc::new(|store: &OrderStore, id: &str| {
            store.remove(id).unwrap();
        }));

        let err = service.move_status(&id, Status::Preparing).unwrap_err();

        assert!(matches!(err, OrderError::ConflictOnReplace { .. }));
        assert!(matches!(
            service.order_detail(&id),
            Err(OrderError::NotFound { .. })
        ));
    }
}
