//! Request-level view of the order operations.
//!
//! Each method answers one REST endpoint with a status code and a JSON body,
//! without tying the crate to an HTTP framework. Failures come back as an
//! [`ErrorStatus`], whose `to_dict` is the error payload a server would send.
use super::error::OrderError;
use super::order::{Item, Status};
use super::service::OrderService;
use super::store::{UnknownView, View};
use http::StatusCode;
use serde_json::{Map, Value, json};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{status_code}: {message}")]
pub struct ErrorStatus {
    pub message: String,
    pub status_code: StatusCode,
    pub payload: Map<String, Value>,
}

impl ErrorStatus {
    /// A 404 unless told otherwise.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::NOT_FOUND,
            payload: Map::new(),
        }
    }

    pub fn with_status(mut self, status_code: StatusCode) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(key.to_string(), value.into());
        self
    }

    /// `{message, ...payload}`; the message wins over a payload field of the same name.
    pub fn to_dict(&self) -> Value {
        let mut rv = self.payload.clone();
        rv.insert("message".to_string(), Value::String(self.message.clone()));
        Value::Object(rv)
    }
}

impl From<OrderError> for ErrorStatus {
    fn from(value: OrderError) -> Self {
        let message = value.to_string();
        match value {
            OrderError::NotFound { id } => ErrorStatus::new(message).with_field("id", id),
            OrderError::InvalidTransition(rejection) => ErrorStatus::new(message)
                .with_status(StatusCode::CONFLICT)
                .with_field("from", rejection.from.as_str())
                .with_field("to", rejection.to.as_str()),
            OrderError::ConflictOnReplace { id } => ErrorStatus::new(message)
                .with_status(StatusCode::BAD_REQUEST)
                .with_field("id", id),
            OrderError::StoreInvariant { id, .. } => ErrorStatus::new(message)
                .with_status(StatusCode::INTERNAL_SERVER_ERROR)
                .with_field("id", id),
            OrderError::Store(_) => {
                ErrorStatus::new(message).with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status_code: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    fn new(status_code: StatusCode, body: Value) -> Self {
        Self { status_code, body }
    }
}

#[derive(Clone)]
pub struct OrderApi {
    service: OrderService,
}

impl OrderApi {
    pub fn new(service: OrderService) -> Self {
        Self { service }
    }

    /// POST /orders: body is the JSON list of `{name, quantity}` items.
    pub fn post_order(&self, body: &str) -> Result<ApiResponse, ErrorStatus> {
        let items: Vec<Item> = serde_json::from_str(body).map_err(|e| {
            ErrorStatus::new(format!("malformed order items: {e}"))
                .with_status(StatusCode::BAD_REQUEST)
        })?;

        if let Some(bad) = items
            .iter()
            .find(|item| item.name.trim().is_empty() || item.quantity == 0)
        {
            return Err(ErrorStatus::new(
                "every item needs a name and a quantity of at least one",
            )
            .with_status(StatusCode::BAD_REQUEST)
            .with_field("name", bad.name.clone())
            .with_field("quantity", bad.quantity));
        }

        let id = self.service.create_order(items)?;
        Ok(ApiResponse::new(StatusCode::CREATED, json!({ "id": id })))
    }

    /// GET /orders/{id}
    pub fn get_order(&self, id: &str) -> Result<ApiResponse, ErrorStatus> {
        let order = self.service.order_detail(id)?;
        let body = serde_json::to_value(&order).map_err(|e| {
            ErrorStatus::new(format!("failed to render order: {e}"))
                .with_status(StatusCode::INTERNAL_SERVER_ERROR)
        })?;
        Ok(ApiResponse::new(StatusCode::OK, body))
    }

    /// PUT /orders/{id}/status/{status}: the body is the number of rows changed.
    pub fn put_status(&self, id: &str, status: &str) -> Result<ApiResponse, ErrorStatus> {
        let requested = match status.parse::<Status>() {
            Ok(requested) => requested,
            Err(_) => {
                // not a status at all, so no transition from the current one can reach it
                let current = self.service.order_detail(id)?;
                return Err(ErrorStatus::new(format!(
                    "invalid transition from {} to {}",
                    current.status, status
                ))
                .with_status(StatusCode::CONFLICT)
                .with_field("from", current.status.as_str())
                .with_field("to", status));
            }
        };

        let change = self.service.move_status(id, requested)?;
        Ok(ApiResponse::new(
            StatusCode::NO_CONTENT,
            json!(change.rows_changed()),
        ))
    }

    /// GET /orders/{open,pending,plated,monitor}
    pub fn get_view(&self, view: &str) -> Result<ApiResponse, ErrorStatus> {
        let view: View = view
            .parse()
            .map_err(|e: UnknownView| ErrorStatus::new(e.to_string()))?;
        let ids = self.service.list(view)?;
        Ok(ApiResponse::new(StatusCode::OK, json!(ids)))
    }
}
