use async_trait::async_trait;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::SanitizedUser;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for authentication domain operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Validated command containing name, email, password and role
    ///
    /// # Returns
    /// Sanitized projection of the created user
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `PasswordHashing` - Password could not be hashed
    /// * `DatabaseError` - Database operation failed
    async fn signup(&self, command: SignupCommand) -> Result<SanitizedUser, UserError>;

    /// Validate credentials.
    ///
    /// Unknown email and wrong password fail identically.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No such email or password mismatch
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<SanitizedUser, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<SanitizedUser, UserError>;
}

/// User directory: persistence operations for the user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// The created user must be readable by id immediately afterwards.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
}
