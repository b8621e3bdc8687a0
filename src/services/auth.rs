//! Authentication service: registration, login and token issuance

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::student::{RegisterRequest, Student, StudentClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new student account
    pub async fn register(&self, request: &RegisterRequest) -> AppResult<Student> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if request.password != request.confirm_password {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }

        if self
            .repository
            .students
            .id_number_exists(&request.id_number)
            .await?
        {
            return Err(AppError::Conflict("Id number already exists".to_string()));
        }

        let hash = self.hash_password(&request.password)?;
        self.repository
            .students
            .create(&request.id_number, &hash)
            .await
    }

    /// Authenticate a student and return a JWT token
    pub async fn authenticate(&self, id_number: &str, password: &str) -> AppResult<(String, Student)> {
        let student = self
            .repository
            .students
            .get_by_id_number(id_number)
            .await?
            .ok_or_else(|| {
                AppError::Authentication("Invalid id number or password".to_string())
            })?;

        if !self.verify_password(&student, password)? {
            return Err(AppError::Authentication(
                "Invalid id number or password".to_string(),
            ));
        }

        let token = self.create_token_for_student(&student)?;
        Ok((token, student))
    }

    /// Create a JWT token for a student
    pub fn create_token_for_student(&self, student: &Student) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = StudentClaims {
            sub: student.id_number.clone(),
            student_id: student.id,
            is_admin: student.is_admin,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, student: &Student, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&student.password)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password with argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
