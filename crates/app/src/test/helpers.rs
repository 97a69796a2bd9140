//! Test Helpers

use fieldwork::jobs::{CustomerDetails, Job, JobUuid};

use crate::{
    domain::jobs::{JobsService, JobsServiceError, data::NewJob},
    test::TestContext,
};

pub(crate) fn customer() -> CustomerDetails {
    CustomerDetails {
        name: "Margaret Hamilton".to_string(),
        phone: "555-010-1000".to_string(),
        email: Some("margaret@example.com".to_string()),
        address: Some("1 Apollo Way".to_string()),
    }
}

pub(crate) async fn create_job(ctx: &TestContext) -> Result<Job, JobsServiceError> {
    ctx.jobs
        .create_job(NewJob {
            uuid: JobUuid::new(),
            customer: customer(),
            description: "Furnace not igniting".to_string(),
            scheduled_for: None,
            tech_uuid: None,
        })
        .await
}
