use clap::Args;
use fieldwork_app::{
    auth::PgAuthService,
    database::{self, Db},
};

#[derive(Debug, Args)]
pub(crate) struct ListUsersArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: ListUsersArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let users = PgAuthService::new(&Db::new(pool))
        .list_users()
        .await
        .map_err(|error| format!("failed to list users: {error}"))?;

    if users.is_empty() {
        println!("no users found");
        return Ok(());
    }

    for user in users {
        println!("{}  {:<10}  {}", user.uuid, user.role, user.name);
    }

    Ok(())
}
