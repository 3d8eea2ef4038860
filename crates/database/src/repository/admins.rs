use crate::DbError;
use core_types::{Admin, AdminProfile};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Data access for the `admins` table. Passwords are stored as bcrypt hashes
/// and never leave this module.
#[derive(Debug, Clone)]
pub struct AdminRepository {
    pool: SqlitePool,
}

impl AdminRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates an admin account with a bcrypt-hashed password.
    pub async fn create(&self, email: &str, password: &str) -> Result<AdminProfile, DbError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(DbError::Validation("admin email is required".to_string()));
        }
        if password.len() < 8 {
            return Err(DbError::Validation(
                "admin password must be at least 8 characters".to_string(),
            ));
        }
        if self.find_by_email(&email).await?.is_some() {
            return Err(DbError::Conflict(format!(
                "an admin with email '{email}' already exists"
            )));
        }

        let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO admins (id, email, password) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(&email)
            .bind(&hash)
            .execute(&self.pool)
            .await?;

        Ok(AdminProfile { id, email })
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, DbError> {
        let admin =
            sqlx::query_as::<_, Admin>("SELECT id, email, password FROM admins WHERE email = $1")
                .bind(email.trim().to_lowercase())
                .fetch_optional(&self.pool)
                .await?;
        Ok(admin)
    }

    /// Checks the credentials and returns the admin profile without the
    /// password hash. Unknown email and wrong password fail identically.
    pub async fn verify_login(&self, email: &str, password: &str) -> Result<AdminProfile, DbError> {
        let admin = self
            .find_by_email(email)
            .await?
            .ok_or(DbError::InvalidCredentials)?;
        if bcrypt::verify(password, &admin.password)? {
            Ok(admin.into())
        } else {
            Err(DbError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn login_roundtrip() {
        let pool = setup_test_db().await;
        let repo = AdminRepository::new(pool);

        let created = repo.create("Admin@Rasoi.app", "let-me-in-please").await.unwrap();
        assert_eq!(created.email, "admin@rasoi.app");

        let profile = repo
            .verify_login("admin@rasoi.app", "let-me-in-please")
            .await
            .unwrap();
        assert_eq!(profile.id, created.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_fail_identically() {
        let pool = setup_test_db().await;
        let repo = AdminRepository::new(pool);

        repo.create("admin@rasoi.app", "let-me-in-please").await.unwrap();

        let err = repo
            .verify_login("admin@rasoi.app", "wrong-password")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidCredentials));

        let err = repo
            .verify_login("nobody@rasoi.app", "let-me-in-please")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidCredentials));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let pool = setup_test_db().await;
        let repo = AdminRepository::new(pool);

        repo.create("admin@rasoi.app", "let-me-in-please").await.unwrap();
        let err = repo
            .create("admin@rasoi.app", "another-password")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
    }
}
