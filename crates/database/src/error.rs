use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfig(String),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A referenced row does not exist; controllers translate this to 404.
    #[error("{0} not found")]
    NotFound(String),

    /// A uniqueness or referential rule was violated; translates to 409.
    #[error("{0}")]
    Conflict(String),

    /// The caller supplied an invalid payload; translates to 400.
    #[error("{0}")]
    Validation(String),

    /// Login failed. Deliberately vague so the message never reveals whether
    /// the email exists.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
}
