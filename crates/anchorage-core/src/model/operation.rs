use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::names::OperationName;

/// Error status attached to a failed operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// A long-running operation returned by create and deploy calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: OperationName,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<Status>,
    #[serde(default)]
    pub response: Option<serde_json::Value>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl Operation {
    /// Decode the response payload, if the operation carries one.
    pub fn response_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.response
            .clone()
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }
}
