//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateProfile, User, UserClaims, UserRole},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new member account
    pub async fn register(&self, request: CreateUser) -> AppResult<User> {
        self.create_account(request, UserRole::Member).await
    }

    /// Register an administrator; gated by the configured admin key
    pub async fn register_admin(&self, request: CreateUser, admin_key: &str) -> AppResult<User> {
        if admin_key != self.config.admin_key {
            return Err(AppError::Authorization("Invalid admin key".to_string()));
        }
        self.create_account(request, UserRole::Admin).await
    }

    async fn create_account(&self, request: CreateUser, role: UserRole) -> AppResult<User> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.repository.users.email_exists(&request.email, None).await? {
            return Err(AppError::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }

        let password_hash = Self::hash_password(&request.password)?;
        let user = self
            .repository
            .users
            .create(
                &request.name,
                &request.email,
                request.phone.as_deref(),
                &password_hash,
                role,
            )
            .await?;

        tracing::info!(user_id = user.id, role = ?role, "User registered");

        Ok(user)
    }

    /// Authenticate by email and password and return a JWT token
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !user.is_active {
            return Err(AppError::Authentication("Account is deactivated".to_string()));
        }

        if !Self::verify_password(&user.password_hash, password)? {
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }

        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    fn create_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.id,
            role: user.role,
            iat: now,
            exp: now + (self.config.jwt_expiration_hours as i64 * 3600),
        };
        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Get the authenticated user's profile
    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Update the authenticated user's profile
    pub async fn update_profile(&self, user_id: i32, update: UpdateProfile) -> AppResult<User> {
        update
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if let Some(ref email) = update.email {
            if self.repository.users.email_exists(email, Some(user_id)).await? {
                return Err(AppError::Conflict("Email already in use".to_string()));
            }
        }

        let password_hash = match update.password.as_deref() {
            Some(password) => Some(Self::hash_password(password)?),
            None => None,
        };

        self.repository
            .users
            .update_profile(
                user_id,
                update.name.as_deref(),
                update.email.as_deref(),
                update.phone.as_deref(),
                password_hash.as_deref(),
            )
            .await
    }

    /// List all users (admin)
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Deactivate a user account (admin)
    pub async fn deactivate_user(&self, id: i32) -> AppResult<()> {
        self.repository.users.deactivate(id).await
    }

    fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
