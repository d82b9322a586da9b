use std::future::Future;
use std::sync::{Mutex, PoisonError};

use crmview_core::{ApiError, ApiResponse, Record, RemoteApi};
use serde_json::{json, Value};

/// One call received by a [`MockApi`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub entity: String,
    pub action: String,
    pub params: Value,
}

#[derive(Debug, Clone)]
enum Reply {
    Response(ApiResponse),
    Transport(String),
}

#[derive(Debug, Clone)]
struct Rule {
    entity: String,
    action: String,
    param: Option<(String, Value)>,
    reply: Reply,
}

impl Rule {
    fn matches(&self, entity: &str, action: &str, params: &Value) -> bool {
        if self.entity != entity || self.action != action {
            return false;
        }
        match &self.param {
            Some((key, value)) => params.get(key) == Some(value),
            None => true,
        }
    }
}

/// In-process stand-in for the remote CRM API.
///
/// Replies are scripted per `entity.action`, optionally narrowed to calls
/// whose parameters carry a given value. The most recently added matching
/// rule wins. Unscripted calls answer with an `is_error` envelope. Every
/// call is recorded.
///
/// ```ignore
/// let api = MockApi::new()
///     .with_processor("5", "Contact", "get")
///     .with_fields("Contact", &[("first_name", "First Name")])
///     .respond_values("Contact", "get", vec![json!({"id": 3, "first_name": "Jane"})]);
/// ```
#[derive(Debug, Default)]
pub struct MockApi {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn rule(self, entity: &str, action: &str, param: Option<(String, Value)>, reply: Reply) -> Self {
        self.rules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Rule {
                entity: entity.to_string(),
                action: action.to_string(),
                param,
                reply,
            });
        self
    }

    /// Answer `entity.action` with `response`.
    pub fn respond(self, entity: &str, action: &str, response: ApiResponse) -> Self {
        self.rule(entity, action, None, Reply::Response(response))
    }

    /// Answer `entity.action` with `response` when `params[key] == value`.
    pub fn respond_when(
        self,
        entity: &str,
        action: &str,
        key: &str,
        value: impl Into<Value>,
        response: ApiResponse,
    ) -> Self {
        self.rule(
            entity,
            action,
            Some((key.to_string(), value.into())),
            Reply::Response(response),
        )
    }

    /// Answer `entity.action` with a successful listing of `values`.
    pub fn respond_values(self, entity: &str, action: &str, values: Vec<Value>) -> Self {
        self.respond(entity, action, ApiResponse::ok(records(values)))
    }

    /// Answer `entity.action` with an `is_error` envelope.
    pub fn fail(self, entity: &str, action: &str, message: &str) -> Self {
        self.respond(entity, action, ApiResponse::error(message))
    }

    /// Make `entity.action` fail at the transport level.
    pub fn fail_transport(self, entity: &str, action: &str, message: &str) -> Self {
        self.rule(entity, action, None, Reply::Transport(message.to_string()))
    }

    /// Script the API output lookup of data processor `id`.
    pub fn with_processor(self, id: &str, entity: &str, action: &str) -> Self {
        let output = json!({
            "id": id,
            "data_processor_id": id,
            "type": "api",
            "api_entity": entity,
            "api_action": action,
            "api_count_action": "getcount",
        });
        self.respond_when(
            "DataProcessorOutput",
            "get",
            "data_processor_id",
            id,
            ApiResponse::ok(records(vec![output])),
        )
    }

    /// Script `entity.getfields` with returnable `(name, title)` fields.
    pub fn with_fields(self, entity: &str, fields: &[(&str, &str)]) -> Self {
        let values = fields
            .iter()
            .map(|(name, title)| json!({"name": name, "title": title, "api.return": 1}))
            .collect();
        self.respond_values(entity, "getfields", values)
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Calls received for `entity.action`.
    pub fn calls_to(&self, entity: &str, action: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.entity == entity && call.action == action)
            .collect()
    }

    fn answer(&self, entity: &str, action: &str, params: Value) -> Result<ApiResponse, ApiError> {
        let reply = self
            .rules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|rule| rule.matches(entity, action, &params))
            .map(|rule| rule.reply.clone());
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                entity: entity.to_string(),
                action: action.to_string(),
                params,
            });
        match reply {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Transport(message)) => Err(ApiError::transport(std::io::Error::other(message))),
            None => Ok(ApiResponse::error(format!("no mock reply for {entity}.{action}"))),
        }
    }
}

impl RemoteApi for MockApi {
    fn call(
        &self,
        entity: &str,
        action: &str,
        params: Value,
    ) -> impl Future<Output = Result<ApiResponse, ApiError>> + Send {
        std::future::ready(self.answer(entity, action, params))
    }
}

/// Unwrap a JSON object literal into a [`Record`]. Non-objects give an empty record.
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

pub fn records(values: Vec<Value>) -> Vec<Record> {
    values.into_iter().map(record).collect()
}
