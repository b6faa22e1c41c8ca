use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::SanitizedUser;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Domain service implementing signup and credential validation.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with the default password work factor.
    pub fn new(repository: Arc<UR>) -> Self {
        Self::with_password_hasher(repository, auth::PasswordHasher::new())
    }

    /// Create a new auth service with an explicitly tuned password hasher.
    pub fn with_password_hasher(repository: Arc<UR>, password_hasher: auth::PasswordHasher) -> Self {
        Self {
            repository,
            password_hasher,
        }
    }

    async fn hash_password(&self, password: String) -> Result<String, UserError> {
        let hasher = self.password_hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(UserError::from)
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, UserError> {
        let hasher = self.password_hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| UserError::Unknown(format!("Password verification task failed: {}", e)))
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn signup(&self, command: SignupCommand) -> Result<SanitizedUser, UserError> {
        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self.hash_password(command.password).await?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            name: command.name,
            email: command.email,
            password_hash,
            role: command.role,
            created_at: now,
            updated_at: now,
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, role = %created_user.role, "User created");

        Ok(created_user.into())
    }

    async fn login(&self, command: LoginCommand) -> Result<SanitizedUser, UserError> {
        let user = self
            .repository
            .find_by_email(&command.email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let is_valid = self
            .verify_password(command.password, user.password_hash.clone())
            .await?;

        if !is_valid {
            return Err(UserError::InvalidCredentials);
        }

        Ok(user.into())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<SanitizedUser, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .map(SanitizedUser::from)
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Role;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
        }
    }

    fn light_hasher() -> auth::PasswordHasher {
        auth::PasswordHasher::with_params(8 * 1024, 1, 1).unwrap()
    }

    fn stored_user(email: &str, password: &str) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            name: "Ann".to_string(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: light_hasher().hash(password).unwrap(),
            role: Role::User,
            created_at: now,
            updated_at: now,
        }
    }

    fn signup_command(email: &str, password: &str) -> SignupCommand {
        SignupCommand {
            name: "Ann".to_string(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password: password.to_string(),
            role: Role::User,
        }
    }

    fn login_command(email: &str, password: &str) -> LoginCommand {
        LoginCommand {
            email: EmailAddress::new(email.to_string()).unwrap(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|user| {
                user.name == "Ann"
                    && user.email.as_str() == "ann@x.com"
                    && user.role == Role::User
                    && user.password_hash.starts_with("$argon2id$")
                    && user.password_hash != "longenough1"
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = AuthService::with_password_hasher(Arc::new(repository), light_hasher());

        let user = service
            .signup(signup_command("ann@x.com", "longenough1"))
            .await
            .expect("Signup failed");

        assert_eq!(user.name, "Ann");
        assert_eq!(user.email.as_str(), "ann@x.com");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[tokio::test]
    async fn test_signup_existing_email_conflicts() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(stored_user("ann@x.com", "longenough1"))));
        repository.expect_create().times(0);

        let service = AuthService::with_password_hasher(Arc::new(repository), light_hasher());

        let result = service
            .signup(signup_command("ann@x.com", "a-different-password"))
            .await;

        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_signup_directory_conflict_propagates() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .times(1)
            .returning(|user| Err(UserError::EmailAlreadyExists(user.email.to_string())));

        let service = AuthService::with_password_hasher(Arc::new(repository), light_hasher());

        let result = service
            .signup(signup_command("ann@x.com", "longenough1"))
            .await;

        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("ann@x.com", "longenough1");
        let user_id = user.id;

        repository
            .expect_find_by_email()
            .withf(|email| email.as_str() == "ann@x.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::with_password_hasher(Arc::new(repository), light_hasher());

        let result = service
            .login(login_command("ann@x.com", "longenough1"))
            .await
            .expect("Login failed");

        assert_eq!(result.id, user_id);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("ann@x.com", "longenough1");

        repository
            .expect_find_by_email()
            .returning(move |email| {
                if email.as_str() == "ann@x.com" {
                    Ok(Some(user.clone()))
                } else {
                    Ok(None)
                }
            });

        let service = AuthService::with_password_hasher(Arc::new(repository), light_hasher());

        let wrong_password = service
            .login(login_command("ann@x.com", "wrong-password"))
            .await
            .unwrap_err();
        let unknown_email = service
            .login(login_command("bob@x.com", "longenough1"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, UserError::InvalidCredentials));
        assert!(matches!(unknown_email, UserError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_login_with_corrupt_hash_is_rejected() {
        let mut repository = MockTestUserRepository::new();
        let mut user = stored_user("ann@x.com", "longenough1");
        user.password_hash = "not-a-phc-string".to_string();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::with_password_hasher(Arc::new(repository), light_hasher());

        let result = service
            .login(login_command("ann@x.com", "longenough1"))
            .await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_find_by_id_success() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("ann@x.com", "longenough1");
        let user_id = user.id;

        repository
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::with_password_hasher(Arc::new(repository), light_hasher());

        let result = service.find_by_id(&user_id).await.expect("Lookup failed");
        assert_eq!(result.id, user_id);
        assert_eq!(result.email.as_str(), "ann@x.com");
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = AuthService::with_password_hasher(Arc::new(repository), light_hasher());

        let result = service.find_by_id(&UserId::new()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_database_errors_propagate() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection reset".to_string())));

        let service = AuthService::with_password_hasher(Arc::new(repository), light_hasher());

        let result = service
            .login(login_command("ann@x.com", "longenough1"))
            .await;

        assert!(matches!(result, Err(UserError::DatabaseError(_))));
    }
}
