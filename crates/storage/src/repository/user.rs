use async_trait::async_trait;
use sqlx::PgPool;

use crate::Database;
use crate::error::{Resource, Result, StorageError};
use crate::models::{NewUser, Role, RoleSet, User};
use crate::store::UserStore;

pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &NewUser) -> Result<User> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, first_name, last_name, roles)
            VALUES ($1, $2, $3, $4)
            RETURNING user_id, email, first_name, last_name, roles
            "#,
        )
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.roles.to_strings())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.code().as_deref() == Some("23505") {
                    return StorageError::ConstraintViolation(format!(
                        "email '{}' already registered",
                        user.email
                    ));
                }
            }
            StorageError::from(e)
        })?;

        Ok(created)
    }

    pub async fn find_by_id(&self, user_id: i32) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, email, first_name, last_name, roles FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound(Resource::User))?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, email, first_name, last_name, roles FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound(Resource::User))?;

        Ok(user)
    }

    /// Appends the role unless an identical entry is already present.
    pub async fn grant_role(&self, user_id: i32, role: &Role) -> Result<RoleSet> {
        let roles = sqlx::query_scalar::<_, Vec<String>>(
            r#"
            UPDATE users
            SET roles = CASE WHEN $2 = ANY(roles) THEN roles ELSE array_append(roles, $2) END
            WHERE user_id = $1
            RETURNING roles
            "#,
        )
        .bind(user_id)
        .bind(role.to_string())
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound(Resource::User))?;

        Ok(RoleSet::from(roles))
    }
}

#[async_trait]
impl UserStore for Database {
    async fn create_user(&self, user: &NewUser) -> Result<User> {
        UserRepository::new(self.pool()).create(user).await
    }

    async fn get_user(&self, user_id: i32) -> Result<User> {
        UserRepository::new(self.pool()).find_by_id(user_id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<User> {
        UserRepository::new(self.pool()).find_by_email(email).await
    }

    async fn grant_role(&self, user_id: i32, role: &Role) -> Result<RoleSet> {
        UserRepository::new(self.pool())
            .grant_role(user_id, role)
            .await
    }
}
