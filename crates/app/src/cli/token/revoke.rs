use clap::Args;
use fieldwork_app::{
    auth::{PgAuthService, UserUuid},
    database::{self, Db},
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct RevokeTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[command(flatten)]
    target: RevokeTarget,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct RevokeTarget {
    /// Single `fw_` token to revoke, by its UUID
    #[arg(long)]
    token_uuid: Option<Uuid>,

    /// Revoke every active token held by this user, e.g. a technician who has left
    #[arg(long)]
    user_uuid: Option<UserUuid>,
}

pub(crate) async fn run(args: RevokeTokenArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let auth = PgAuthService::new(&Db::new(pool));

    let token_uuids = match (args.target.token_uuid, args.target.user_uuid) {
        (Some(token_uuid), _) => vec![token_uuid],
        (None, Some(user_uuid)) => auth
            .list_api_tokens(user_uuid)
            .await
            .map_err(|error| format!("failed to list tokens: {error}"))?
            .into_iter()
            .filter(|token| token.revoked_at.is_none())
            .map(|token| token.uuid)
            .collect(),
        (None, None) => return Err("pass --token-uuid or --user-uuid".to_string()),
    };

    if token_uuids.is_empty() {
        println!("no active tokens to revoke");
        return Ok(());
    }

    for token_uuid in token_uuids {
        let revoked = auth
            .revoke_api_token(token_uuid)
            .await
            .map_err(|error| format!("failed to revoke token {token_uuid}: {error}"))?;

        if revoked {
            println!("revoked token {token_uuid}");
        } else {
            println!("token {token_uuid} was not active");
        }
    }

    Ok(())
}
