use clap::Args;
use fieldwork_app::{
    auth::{NewUser, PgAuthService, Role},
    database::{self, Db},
};

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// One of admin, dispatcher, technician
    #[arg(long)]
    role: Role,

    /// Skip issuing a first API token
    #[arg(long)]
    no_token: bool,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    if args.name.trim().is_empty() {
        return Err("name cannot be empty".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgAuthService::new(&Db::new(pool));

    let user = service
        .create_user(NewUser {
            name: args.name,
            role: args.role,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("user_name: {}", user.name);
    println!("user_role: {}", user.role);

    if args.no_token {
        return Ok(());
    }

    let issued = service
        .issue_api_token(user.uuid)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("token_uuid: {}", issued.metadata.uuid);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
