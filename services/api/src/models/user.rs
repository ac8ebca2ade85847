//! User account models

use chrono::{DateTime, NaiveDate, Utc};
use common::error::{ServiceError, ServiceResult};
use common::role::Role;
use common::validation::{
    MIN_FULL_NAME_LEN, MIN_UPDATED_PASSWORD_LEN, Validators, require_min_len,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Public view of an account
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "laki-laki")]
    Male,
    #[serde(rename = "perempuan")]
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "laki-laki",
            Gender::Female => "perempuan",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("gender must be laki-laki or perempuan, got {0:?}")]
pub struct UnknownGender(pub String);

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "laki-laki" => Ok(Gender::Male),
            "perempuan" => Ok(Gender::Female),
            other => Err(UnknownGender(other.to_string())),
        }
    }
}

/// Account joined with its profile and region
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub telepon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tanggal_lahir: Option<NaiveDate>,
    pub location_id: Uuid,
    pub daerah: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Replace an account's name, email and password
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl UpdateUserRequest {
    pub fn validate(&self, validators: &Validators) -> ServiceResult<()> {
        require_min_len("full name", &self.full_name, MIN_FULL_NAME_LEN)?;
        validators.require_email(&self.email)?;
        require_min_len("password", &self.password, MIN_UPDATED_PASSWORD_LEN)?;
        Ok(())
    }
}

/// Edit the personal details shown on a profile
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: String,
    pub email: String,
    pub tanggal_lahir: String,
    pub gender: String,
    pub telepon: String,
}

/// Checked profile fields, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub telepon: String,
}

impl UpdateProfileRequest {
    pub fn validate(self, validators: &Validators) -> ServiceResult<ProfileUpdate> {
        require_min_len("full name", &self.full_name, MIN_FULL_NAME_LEN)?;
        let birth_date = validators.require_date(&self.tanggal_lahir)?;
        let gender = self
            .gender
            .parse()
            .map_err(|e: UnknownGender| ServiceError::invalid(e.to_string()))?;
        validators.require_phone(&self.telepon)?;
        validators.require_email(&self.email)?;

        Ok(ProfileUpdate {
            full_name: self.full_name,
            email: self.email,
            birth_date,
            gender,
            telepon: self.telepon,
        })
    }
}
