//! Stall ("lapak") models

use common::error::{ServiceError, ServiceResult};
use common::validation::{MIN_CATALOG_NAME_LEN, require_min_len};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Whether a stall is currently trading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StallStatus {
    Open,
    Closed,
}

impl StallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StallStatus::Open => "open",
            StallStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for StallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("status must be open or closed, got {0:?}")]
pub struct UnknownStallStatus(pub String);

impl FromStr for StallStatus {
    type Err = UnknownStallStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(StallStatus::Open),
            "closed" => Ok(StallStatus::Closed),
            other => Err(UnknownStallStatus(other.to_string())),
        }
    }
}

fn parse_status(raw: &str) -> ServiceResult<StallStatus> {
    raw.parse()
        .map_err(|e: UnknownStallStatus| ServiceError::invalid(e.to_string()))
}

/// Stall joined with its owner and region
#[derive(Debug, Clone, Serialize)]
pub struct Stall {
    pub user_id: Uuid,
    pub full_name: String,
    pub lapak_id: Uuid,
    pub lapak_name: String,
    pub status: StallStatus,
    pub location_id: Uuid,
    pub daerah: String,
}

/// Rename a stall and set its status
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStallRequest {
    pub name: String,
    pub status: String,
}

impl UpdateStallRequest {
    pub fn validate(&self) -> ServiceResult<StallStatus> {
        require_min_len("name", &self.name, MIN_CATALOG_NAME_LEN)?;
        parse_status(&self.status)
    }
}

/// Open or close a stall
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStallStatusRequest {
    pub status: String,
}

impl UpdateStallStatusRequest {
    pub fn validate(&self) -> ServiceResult<StallStatus> {
        parse_status(&self.status)
    }
}
