//! Student model and JWT claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Student account from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i32,
    /// Campus id number, unique, used for authentication and attribution
    pub id_number: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub is_admin: bool,
    pub crea_date: Option<DateTime<Utc>>,
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Id number is required"))]
    pub id_number: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    pub confirm_password: String,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub id_number: String,
    pub password: String,
}

/// Public student representation
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentInfo {
    pub id: i32,
    pub id_number: String,
    pub is_admin: bool,
}

impl From<&Student> for StudentInfo {
    fn from(student: &Student) -> Self {
        StudentInfo {
            id: student.id,
            id_number: student.id_number.clone(),
            is_admin: student.is_admin,
        }
    }
}

/// JWT Claims for authenticated students
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentClaims {
    /// Student id number
    pub sub: String,
    pub student_id: i32,
    pub is_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

impl StudentClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Administrator privileges required".to_string(),
            ))
        }
    }

    /// Require a student (non-admin) account; reservation flows are
    /// student-only.
    pub fn require_student(&self) -> Result<(), AppError> {
        if self.is_admin {
            Err(AppError::Authorization(
                "Student account required".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}
