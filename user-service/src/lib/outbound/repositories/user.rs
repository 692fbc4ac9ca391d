use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            username: Username::new(row.username)?,
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

/// Translate a write failure, naming the unique constraint that tripped.
fn write_error(err: sqlx::Error, username: &Username, email: &EmailAddress) -> UserError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some("users_username_key") => {
                    return UserError::UsernameAlreadyExists(username.to_string())
                }
                Some("users_email_key") => {
                    return UserError::EmailAlreadyExists(email.as_str().to_string())
                }
                _ => {}
            }
        }
    }
    UserError::StoreUnavailable(err.to_string())
}

fn read_error(err: sqlx::Error) -> UserError {
    UserError::StoreUnavailable(err.to_string())
}

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, &user.username, &user.email))?;

        row.try_into()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(read_error)?
        .map(User::try_from)
        .transpose()
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(read_error)?
        .map(User::try_from)
        .transpose()
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET username = $2, email = $3, password_hash = $4
            WHERE id = $1
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(user.id.as_i64())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, &user.username, &user.email))?;

        match row {
            Some(row) => row.try_into(),
            None => Err(UserError::NotFound(user.id)),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(read_error)?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(*id));
        }

        Ok(())
    }
}
