use std::io;

use clap::Args;
use fieldwork::{revenue::TimeRange, technicians::TechUuid};
use fieldwork_app::{
    database::{self, Db},
    domain::time_entries::{PgTimeClockService, TimeClockService},
};
use jiff::Timestamp;

#[derive(Debug, Args)]
pub(crate) struct TimesheetArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Start of the period, inclusive (RFC 3339)
    #[arg(long)]
    from: Timestamp,

    /// End of the period, exclusive (RFC 3339)
    #[arg(long)]
    to: Timestamp,

    /// Only this technician
    #[arg(long)]
    tech: Option<TechUuid>,
}

pub(crate) async fn run(args: TimesheetArgs) -> Result<(), String> {
    let range = TimeRange::new(args.from, args.to).map_err(|error| error.to_string())?;

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let report = PgTimeClockService::new(Db::new(pool), false)
        .worked_time(range, args.tech)
        .await
        .map_err(|error| format!("failed to load time entries: {error}"))?;

    if report.is_empty() {
        println!("no shifts between {} and {}", args.from, args.to);
        return Ok(());
    }

    report
        .write_to(io::stdout().lock())
        .map_err(|error| format!("failed to write timesheet: {error}"))
}
