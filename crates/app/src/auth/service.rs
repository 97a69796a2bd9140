//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenMetadata, AuthServiceError, IssuedApiToken, NewUser, Principal, User, UserUuid,
        format_api_token, generate_api_token_secret, hash_api_token, parse_api_token,
        repository::PgAuthRepository,
    },
    database::Db,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: &Db) -> Self {
        Self {
            repository: PgAuthRepository::new(db.pool().clone()),
        }
    }

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insertion fails.
    pub async fn create_user(&self, user: NewUser) -> Result<User, AuthServiceError> {
        self.repository
            .create_user(UserUuid::new(), &user, Timestamp::now())
            .await
            .map_err(AuthServiceError::from)
    }

    /// List every user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_users(&self) -> Result<Vec<User>, AuthServiceError> {
        self.repository
            .list_users()
            .await
            .map_err(AuthServiceError::from)
    }

    /// Issue a new API token for the given user. The raw token is only returned here.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::InvalidReference`] for unknown users, or an error if the
    /// database insertion fails.
    pub async fn issue_api_token(&self, user: UserUuid) -> Result<IssuedApiToken, AuthServiceError> {
        let secret = generate_api_token_secret();
        let token = format_api_token(&secret);

        let metadata = self
            .repository
            .create_api_token(Uuid::now_v7(), user, &hash_api_token(&secret), Timestamp::now())
            .await
            .map_err(AuthServiceError::from)?;

        Ok(IssuedApiToken { token, metadata })
    }

    /// List all tokens for the given user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        user: UserUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        self.repository
            .list_api_tokens(user)
            .await
            .map_err(AuthServiceError::from)
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        self.repository
            .revoke_api_token(token_uuid)
            .await
            .map(|record| record.is_some())
            .map_err(AuthServiceError::from)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError> {
        let secret = parse_api_token(bearer_token).map_err(|_| AuthServiceError::NotFound)?;

        let found = self
            .repository
            .find_principal_by_token_hash(&hash_api_token(&secret))
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if let Err(error) = self
            .repository
            .touch_api_token_last_used(found.token_uuid)
            .await
        {
            warn!(token_uuid = %found.token_uuid, error = %error, "auth.touch_failed");
        }

        Ok(found.principal)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a raw bearer token to the user it was issued to.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError>;
}
