//! Auth repository.

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    auth::models::{ApiTokenMetadata, NewUser, Principal, Role, User, UserUuid},
    database::decode_error,
};

const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const LIST_USERS_SQL: &str = include_str!("sql/list_users.sql");
const CREATE_API_TOKEN_SQL: &str = include_str!("sql/create_api_token.sql");
const LIST_API_TOKENS_SQL: &str = include_str!("sql/list_api_tokens.sql");
const FIND_PRINCIPAL_BY_TOKEN_HASH_SQL: &str =
    include_str!("sql/find_principal_by_token_hash.sql");
const TOUCH_API_TOKEN_LAST_USED_SQL: &str = include_str!("sql/touch_api_token_last_used.sql");
const REVOKE_API_TOKEN_SQL: &str = include_str!("sql/revoke_api_token.sql");

/// A principal together with the token that authenticated it.
#[derive(Debug, Clone)]
pub(crate) struct TokenPrincipal {
    pub principal: Principal,
    pub token_uuid: Uuid,
}

#[derive(Debug, Clone)]
pub(crate) struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_user(
        &self,
        uuid: UserUuid,
        user: &NewUser,
        now: Timestamp,
    ) -> Result<User, sqlx::Error> {
        query_as::<Postgres, User>(CREATE_USER_SQL)
            .bind(uuid.into_uuid())
            .bind(&user.name)
            .bind(user.role.as_str())
            .bind(SqlxTimestamp::from(now))
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn list_users(&self) -> Result<Vec<User>, sqlx::Error> {
        query_as::<Postgres, User>(LIST_USERS_SQL)
            .fetch_all(&self.pool)
            .await
    }

    pub(crate) async fn create_api_token(
        &self,
        uuid: Uuid,
        user: UserUuid,
        token_hash: &str,
        now: Timestamp,
    ) -> Result<ApiTokenMetadata, sqlx::Error> {
        query_as::<Postgres, ApiTokenMetadata>(CREATE_API_TOKEN_SQL)
            .bind(uuid)
            .bind(user.into_uuid())
            .bind(token_hash)
            .bind(SqlxTimestamp::from(now))
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn list_api_tokens(
        &self,
        user: UserUuid,
    ) -> Result<Vec<ApiTokenMetadata>, sqlx::Error> {
        query_as::<Postgres, ApiTokenMetadata>(LIST_API_TOKENS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&self.pool)
            .await
    }

    pub(crate) async fn find_principal_by_token_hash(
        &self,
        hash: &str,
    ) -> Result<Option<TokenPrincipal>, sqlx::Error> {
        query_as::<Postgres, TokenPrincipal>(FIND_PRINCIPAL_BY_TOKEN_HASH_SQL)
            .bind(hash)
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn touch_api_token_last_used(&self, token: Uuid) -> Result<(), sqlx::Error> {
        query(TOUCH_API_TOKEN_LAST_USED_SQL)
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub(crate) async fn revoke_api_token(&self, token: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        query(REVOKE_API_TOKEN_SQL)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| row.try_get("uuid"))
            .transpose()
    }
}

fn role_column(row: &PgRow) -> sqlx::Result<Role> {
    row.try_get::<String, _>("role")?
        .parse()
        .map_err(|error| decode_error("role", error))
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get::<Uuid, _>("uuid")?.into(),
            name: row.try_get("name")?,
            role: role_column(row)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ApiTokenMetadata {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            user_uuid: row.try_get::<Uuid, _>("user_uuid")?.into(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            last_used_at: row
                .try_get::<Option<SqlxTimestamp>, _>("last_used_at")?
                .map(SqlxTimestamp::to_jiff),
            revoked_at: row
                .try_get::<Option<SqlxTimestamp>, _>("revoked_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for TokenPrincipal {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            principal: Principal {
                user_uuid: row.try_get::<Uuid, _>("uuid")?.into(),
                name: row.try_get("name")?,
                role: role_column(row)?,
            },
            token_uuid: row.try_get("token_uuid")?,
        })
    }
}
