use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local user directory.
///
/// Email uniqueness is checked and the record inserted under one write lock.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if users.values().any(|existing| existing.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| &user.email == email)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::user::models::Role;

    fn user(email: &str) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            name: "Ann".to_string(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            role: Role::User,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_then_find() {
        let repository = InMemoryUserRepository::new();
        let created = repository.create(user("ann@x.com")).await.unwrap();

        let by_id = repository.find_by_id(&created.id).await.unwrap();
        assert_eq!(by_id.map(|u| u.id), Some(created.id));

        let by_email = repository.find_by_email(&created.email).await.unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(created.id));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repository = InMemoryUserRepository::new();
        repository.create(user("ann@x.com")).await.unwrap();

        let result = repository.create(user("ann@x.com")).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));

        // Emails compare exactly as stored.
        assert!(repository.create(user("Ann@x.com")).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_user() {
        let repository = InMemoryUserRepository::new();
        assert!(repository.find_by_id(&UserId::new()).await.unwrap().is_none());
    }
}
