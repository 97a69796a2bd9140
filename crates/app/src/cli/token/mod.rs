//! Bearer tokens for the JSON API.
//!
//! Tokens look like `fw_<hex>` and act with the role of the user they were issued to.
//! Only a SHA-256 hash is stored, so the raw token is printed once, at creation.

use clap::{Args, Subcommand};

mod create;
mod list;
mod revoke;

#[derive(Debug, Args)]
pub(crate) struct TokenCommand {
    #[command(subcommand)]
    action: TokenAction,
}

#[derive(Debug, Subcommand)]
enum TokenAction {
    /// Issue a token for a user
    Create(create::CreateTokenArgs),
    /// Show a user's tokens and when they were last used
    List(list::ListTokensArgs),
    /// Revoke one token, or every active token a user holds
    Revoke(revoke::RevokeTokenArgs),
}

pub(crate) async fn run(command: TokenCommand) -> Result<(), String> {
    match command.action {
        TokenAction::Create(args) => create::run(args).await,
        TokenAction::List(args) => list::run(args).await,
        TokenAction::Revoke(args) => revoke::run(args).await,
    }
}
