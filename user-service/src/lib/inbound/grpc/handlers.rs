use crate::domain::user::models::User;

pub mod add_user;
pub mod delete_user_by_id;
pub mod get_token;
pub mod get_user_by_id;
pub mod get_user_by_username;
pub mod get_username_by_id;
pub mod update_user_info;

impl From<User> for crate::proto::users::User {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id.as_i64(),
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}
