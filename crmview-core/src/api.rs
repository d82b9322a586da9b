//! The remote CRM API contract.
//!
//! The adapter never talks to a transport directly. Every outbound read goes
//! through [`RemoteApi::call`] or its unwrapping variant
//! [`RemoteApi::call_values`], so any client (HTTP, in-process, mock) can be
//! plugged in.

use std::future::Future;
use std::sync::Arc;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// One record as returned by the remote API.
pub type Record = serde_json::Map<String, Value>;

/// The envelope every remote call answers with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default, deserialize_with = "de_flag")]
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "de_count", skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, deserialize_with = "de_values")]
    pub values: Vec<Record>,
}

impl ApiResponse {
    /// A successful listing reply.
    pub fn ok(values: Vec<Record>) -> Self {
        Self {
            count: Some(values.len() as u64),
            values,
            ..Self::default()
        }
    }

    /// A successful scalar reply, as returned by count actions.
    pub fn scalar(result: impl Into<Value>) -> Self {
        Self {
            result: Some(result.into()),
            ..Self::default()
        }
    }

    /// An `is_error` reply carrying `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            error_message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Read the reply of a count action.
    ///
    /// A numeric `result` wins, then the envelope `count`.
    pub fn as_count(&self) -> Option<u64> {
        let from_result = match &self.result {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        from_result.or(self.count)
    }
}

/// Client for the remote CRM API.
///
/// Uses RPITIT (return-position `impl Trait` in traits), no `async-trait`
/// needed. Calls are awaited one after another by the adapter, never
/// concurrently.
pub trait RemoteApi: Send + Sync {
    /// Invoke `entity.action` with `params` and return the raw envelope.
    fn call(
        &self,
        entity: &str,
        action: &str,
        params: Value,
    ) -> impl Future<Output = Result<ApiResponse, ApiError>> + Send;

    /// Invoke `entity.action` and unwrap the record list.
    ///
    /// An `is_error` envelope becomes [`ApiError::Remote`].
    fn call_values(
        &self,
        entity: &str,
        action: &str,
        params: Value,
    ) -> impl Future<Output = Result<Vec<Record>, ApiError>> + Send {
        async move {
            let response = self.call(entity, action, params).await?;
            if response.is_error {
                let message = response
                    .error_message
                    .unwrap_or_else(|| "unknown error".to_string());
                return Err(ApiError::remote(entity, action, message));
            }
            Ok(response.values)
        }
    }
}

impl<T: RemoteApi> RemoteApi for Arc<T> {
    fn call(
        &self,
        entity: &str,
        action: &str,
        params: Value,
    ) -> impl Future<Output = Result<ApiResponse, ApiError>> + Send {
        (**self).call(entity, action, params)
    }
}

impl<T: RemoteApi> RemoteApi for &T {
    fn call(
        &self,
        entity: &str,
        action: &str,
        params: Value,
    ) -> impl Future<Output = Result<ApiResponse, ApiError>> + Send {
        (**self).call(entity, action, params)
    }
}

/// Loose truthiness used by CRM flags such as `api.return`.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(is_truthy(&value))
}

fn de_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

// Non-sequential replies key records by id instead of listing them.
fn de_values<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Record>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let items: Vec<Value> = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        _ => return Err(de::Error::custom("`values` must be an array or an object")),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect())
}
