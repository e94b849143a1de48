//! Registration, login and account bootstrap

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{RegisterUser, Role, User, UserClaims},
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

    /// Register a new account. Only an admin session may create another admin.
    pub async fn register(&self, request: RegisterUser, caller: Option<&UserClaims>) -> AppResult<User> {
        let role = request.role.unwrap_or_default();
        if role == Role::Admin && !caller.map(UserClaims::is_admin).unwrap_or(false) {
            return Err(AppError::Authorization(
                "Only administrators can create administrator accounts".to_string(),
            ));
        }

        if self.repository.users.username_exists(&request.username).await? {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .repository
            .users
            .create(&request.username, &password_hash, role)
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "User registered");
        Ok(user)
    }

    /// Check credentials and issue a session token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(invalid_credentials)?;

        if !verify_password(&user.password_hash, password)? {
            tracing::debug!(username, "Login rejected: wrong password");
            return Err(invalid_credentials());
        }

        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    /// Create JWT token for a user
    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        self.claims_for(user)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn claims_for(&self, user: &User) -> UserClaims {
        let now = Utc::now().timestamp();
        UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role,
            exp: now + (self.config.jwt_expiration_hours as i64 * 3600),
            iat: now,
        }
    }

    /// Create the configured admin account if its username is still free
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<()> {
        let Some(admin) = &self.config.bootstrap_admin else {
            return Ok(());
        };

        if self.repository.users.username_exists(&admin.username).await? {
            return Ok(());
        }

        let password_hash = hash_password(&admin.password)?;
        let user = self
            .repository
            .users
            .create(&admin.username, &password_hash, Role::Admin)
            .await?;

        tracing::warn!(user_id = user.id, username = %user.username, "Created bootstrap admin account");
        Ok(())
    }
}

fn invalid_credentials() -> AppError {
    AppError::Authentication("Invalid username or password".to_string())
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
