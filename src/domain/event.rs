//! Change-stream batch delivered to the handler.
//!
//! Only the fields the job reads are modelled; everything else in the stream
//! record is ignored by serde.

use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<StreamRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamRecord {
    #[serde(rename = "eventID", default)]
    pub event_id: Option<String>,
    #[serde(rename = "eventName")]
    pub event_name: EventName,
    #[serde(default)]
    pub dynamodb: Option<StreamPayload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventName {
    Insert,
    Modify,
    Remove,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamPayload {
    #[serde(rename = "Keys", default)]
    pub keys: HashMap<String, KeyAttribute>,
}

/// Key attribute in DynamoDB JSON form, e.g. `{"S": "42"}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyAttribute {
    #[serde(rename = "S", default, skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,
    #[serde(rename = "N", default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
}

impl StreamRecord {
    /// Creations and modifications are processed; deletions are not.
    pub fn is_upsert(&self) -> bool {
        matches!(self.event_name, EventName::Insert | EventName::Modify)
    }

    /// The string `id` key of the changed item.
    pub fn key_id(&self) -> Result<&str> {
        self.dynamodb
            .as_ref()
            .and_then(|payload| payload.keys.get("id"))
            .and_then(|attr| attr.s.as_deref())
            .ok_or_else(|| EtlError::EventError {
                message: format!(
                    "record {} has no string 'id' key",
                    self.event_id.as_deref().unwrap_or("<unknown>")
                ),
            })
    }
}
