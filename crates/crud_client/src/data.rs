use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ApiClient;
use crate::errors::ApiError;

/// Nil-UUID id that routes a detail view into create mode.
pub const NEW_RECORD_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Generic data operation posted to `/api/data`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataRequest {
    pub operation: String,
    pub name: String,
    pub id: Option<String>,
    pub data: Value,
}

impl DataRequest {
    /// Select all rows of an entity.
    pub fn select(entity: &str) -> Self {
        DataRequest {
            operation: "select".into(),
            name: entity.into(),
            id: None,
            data: Value::Object(Default::default()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DataResponse {
    pub ok: bool,
    #[serde(default)]
    pub result: Vec<Value>,
}

impl ApiClient {
    /// `POST /api/data`. A missing token is allowed here - in auth-disabled
    /// deployments the server accepts anonymous calls.
    pub async fn execute(
        &self,
        request: &DataRequest,
        token: Option<&str>,
    ) -> Result<DataResponse, ApiError> {
        let response = self
            .request(Method::POST, &["api", "data"], token)?
            .json(request)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }
}

/// Pick a human-readable label for a row, in the conventional column order.
pub fn pick_label(row: &Value) -> String {
    for key in ["full_name", "name", "title", "email", "code", "id"] {
        match row.get(key) {
            Some(Value::String(s)) => return s.clone(),
            Some(Value::Null) | None => continue,
            Some(other) => return other.to_string(),
        }
    }
    "Untitled".to_string()
}
