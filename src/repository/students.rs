//! Students repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::student::Student,
};

#[derive(Clone)]
pub struct StudentsRepository {
    pool: Pool<Postgres>,
}

impl StudentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get student by campus id number
    pub async fn get_by_id_number(&self, id_number: &str) -> AppResult<Option<Student>> {
        let student =
            sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id_number = $1")
                .bind(id_number)
                .fetch_optional(&self.pool)
                .await?;

        Ok(student)
    }

    /// Check if an id number is already registered
    pub async fn id_number_exists(&self, id_number: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE id_number = $1)")
                .bind(id_number)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    /// Create a new student account. Registration never creates admins.
    pub async fn create(&self, id_number: &str, password_hash: &str) -> AppResult<Student> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (id_number, password, is_admin)
            VALUES ($1, $2, FALSE)
            RETURNING *
            "#,
        )
        .bind(id_number)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(student)
    }

    /// List all non-admin students, for admin dropdowns
    pub async fn list_students(&self) -> AppResult<Vec<Student>> {
        let students = sqlx::query_as::<_, Student>(
            "SELECT * FROM students WHERE is_admin = FALSE ORDER BY id_number",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    /// Get a non-admin student, for admin flows that act on a student's
    /// behalf.
    pub async fn get_student(&self, id_number: &str) -> AppResult<Student> {
        let student = self.get_by_id_number(id_number).await?;
        match student {
            Some(s) if !s.is_admin => Ok(s),
            _ => Err(AppError::NotFound(format!(
                "Student {} not found",
                id_number
            ))),
        }
    }
}
