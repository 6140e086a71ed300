use chrono::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::group::Group;

#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateResponse {
    pub message: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

impl UpdateResponse {
    pub fn new(message: impl Into<String>) -> Self {
        UpdateResponse {
            message: message.into(),
            updated_at: Utc::now(),
        }
    }
}

// the output of the capture handler; `group` is absent when nothing was capturable
#[derive(Serialize, Deserialize, Debug)]
pub struct CaptureResponse {
    pub message: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
    pub group: Option<Group>,
}
