use std::{io, sync::Arc};

use clap::Args;
use fieldwork::{jobs::JobUuid, receipt::Receipt};
use fieldwork_app::{
    database::{self, Db},
    domain::{
        customers::PgCustomerDirectory,
        jobs::{JobsService, PgJobsService},
    },
    notifications::LogNotifier,
    settings::BillingSettings,
};

#[derive(Debug, Args)]
pub(crate) struct ReceiptArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// ISO 4217 currency amounts are shown in
    #[arg(long, env = "CURRENCY", default_value = "USD")]
    currency: String,

    /// Job to print
    #[arg(long)]
    job: JobUuid,
}

pub(crate) async fn run(args: ReceiptArgs) -> Result<(), String> {
    let settings = BillingSettings::for_currency(&args.currency).map_err(|error| error.to_string())?;

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let db = Db::new(pool);

    let jobs = PgJobsService::new(
        db.clone(),
        settings,
        Arc::new(PgCustomerDirectory::new(db)),
        Arc::new(LogNotifier),
    );

    let job = jobs
        .get_job(args.job)
        .await
        .map_err(|error| format!("failed to load job: {error}"))?;

    Receipt::for_job(&job, settings.currency)
        .and_then(|receipt| receipt.write_to(io::stdout().lock()))
        .map_err(|error| format!("failed to render receipt: {error}"))
}
