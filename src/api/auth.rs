//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::student::{LoginRequest, RegisterRequest, StudentInfo},
};

use super::AuthenticatedStudent;

/// Login response with bearer token
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub student: StudentInfo,
}

/// Registration response
#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub student: StudentInfo,
    pub message: String,
}

/// Register a new student account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Missing fields or password mismatch"),
        (status = 409, description = "Id number already exists")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let student = state.services.auth.register(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            student: StudentInfo::from(&student),
            message: "Registration successful! Please log in.".to_string(),
        }),
    ))
}

/// Log in with id number and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, student) = state
        .services
        .auth
        .authenticate(&request.id_number, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        student: StudentInfo::from(&student),
    }))
}

/// Current authenticated student
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current student", body = StudentInfo),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    AuthenticatedStudent(claims): AuthenticatedStudent,
) -> AppResult<Json<StudentInfo>> {
    Ok(Json(StudentInfo {
        id: claims.student_id,
        id_number: claims.sub,
        is_admin: claims.is_admin,
    }))
}
