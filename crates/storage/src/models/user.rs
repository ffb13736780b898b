use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::role::RoleSet;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[sqlx(try_from = "Vec<String>")]
    pub roles: RoleSet,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: RoleSet,
}
