use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<UserId, User>,
}

impl Table {
    fn check_unique(&self, candidate: &User) -> Result<(), UserError> {
        for row in self.rows.values().filter(|row| row.id != candidate.id) {
            if row.username == candidate.username {
                return Err(UserError::UsernameAlreadyExists(
                    candidate.username.to_string(),
                ));
            }
            if row.email == candidate.email {
                return Err(UserError::EmailAlreadyExists(
                    candidate.email.as_str().to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Credential store held in process memory. Ids start at 1.
///
/// Used by tests and by local runs without a database.
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<Table>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut table = self.table.write().await;

        let created = User {
            id: UserId(table.next_id + 1),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        table.check_unique(&created)?;

        table.next_id += 1;
        table.rows.insert(created.id, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.table.read().await.rows.get(id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .find(|row| &row.username == username)
            .cloned())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut table = self.table.write().await;

        if !table.rows.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id));
        }
        table.check_unique(&user)?;

        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.table
            .write()
            .await
            .rows
            .remove(id)
            .map(|_| ())
            .ok_or(UserError::NotFound(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::models::EmailAddress;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let repository = InMemoryUserRepository::new();

        let first = repository.create(new_user("alice", "alice@example.com")).await.unwrap();
        let second = repository.create(new_user("bob", "bob@example.com")).await.unwrap();

        assert_eq!(first.id, UserId(1));
        assert_eq!(second.id, UserId(2));
    }

    #[tokio::test]
    async fn test_unique_username_and_email() {
        let repository = InMemoryUserRepository::new();
        repository.create(new_user("alice", "alice@example.com")).await.unwrap();

        assert!(matches!(
            repository.create(new_user("alice", "other@example.com")).await,
            Err(UserError::UsernameAlreadyExists(_))
        ));
        assert!(matches!(
            repository.create(new_user("carol", "alice@example.com")).await,
            Err(UserError::EmailAlreadyExists(_))
        ));
        assert_eq!(repository.len().await, 1);
    }

    #[tokio::test]
    async fn test_find_update_delete() {
        let repository = InMemoryUserRepository::new();
        let mut user = repository.create(new_user("alice", "alice@example.com")).await.unwrap();

        let by_name = repository
            .find_by_username(&Username::new("alice".to_string()).unwrap())
            .await
            .unwrap();
        assert_eq!(by_name.as_ref().map(|u| u.id), Some(user.id));

        user.email = EmailAddress::new("alice@example.org".to_string()).unwrap();
        repository.update(user.clone()).await.unwrap();
        let stored = repository.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.email.as_str(), "alice@example.org");

        repository.delete(&user.id).await.unwrap();
        assert!(repository.find_by_id(&user.id).await.unwrap().is_none());
        assert_eq!(
            repository.delete(&user.id).await,
            Err(UserError::NotFound(user.id))
        );
    }

    #[tokio::test]
    async fn test_update_missing() {
        let repository = InMemoryUserRepository::new();
        let ghost = User {
            id: UserId(9),
            username: Username::new("ghost".to_string()).unwrap(),
            email: EmailAddress::new("ghost@example.com".to_string()).unwrap(),
            password_hash: String::new(),
            created_at: Utc::now(),
        };

        assert_eq!(
            repository.update(ghost).await,
            Err(UserError::NotFound(UserId(9)))
        );
    }
}
