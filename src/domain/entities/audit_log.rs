//! Append-only success/failure audit trail (C7).

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Timestamp;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiLog {
    pub api_id: Option<uuid::Uuid>,
    pub method: String,
    pub data: String,
    pub result: String,
    pub time: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFailedLog {
    pub api_id: Option<uuid::Uuid>,
    pub method: String,
    pub data: String,
    pub result: String,
    pub time: Timestamp,
}
