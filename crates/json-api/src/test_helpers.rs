//! Test helpers.

use std::sync::Arc;

use fieldwork::jobs::{CustomerDetails, InvoiceError, Job, JobUuid, LineItem, TaxRate};
use fieldwork_app::{
    auth::{MockAuthService, Principal, Role, UserUuid},
    context::AppContext,
    domain::{
        customers::MockCustomerDirectory, jobs::MockJobsService,
        payments::MockCardPaymentsService, time_entries::MockTimeClockService,
    },
    settings::BillingSettings,
};
use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::state::State;

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

pub(crate) fn principal(role: Role) -> Principal {
    Principal {
        user_uuid: TEST_USER_UUID,
        name: "Test User".to_string(),
        role,
    }
}

/// Service mocks; any call without an expectation fails the test.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) jobs: MockJobsService,
    pub(crate) card_payments: MockCardPaymentsService,
    pub(crate) timeclock: MockTimeClockService,
    pub(crate) customers: MockCustomerDirectory,
    pub(crate) auth: MockAuthService,
}

impl Mocks {
    pub(crate) fn jobs(jobs: MockJobsService) -> Self {
        Self {
            jobs,
            ..Self::default()
        }
    }

    pub(crate) fn timeclock(timeclock: MockTimeClockService) -> Self {
        Self {
            timeclock,
            ..Self::default()
        }
    }

    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            settings: BillingSettings::default(),
            jobs: Arc::new(self.jobs),
            card_payments: Arc::new(self.card_payments),
            timeclock: Arc::new(self.timeclock),
            customers: Arc::new(self.customers),
            auth: Arc::new(self.auth),
        })
    }

    /// Serve `route` as an authenticated caller with `role`.
    pub(crate) fn service(self, role: Role, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_state()))
                .hoop(inject(principal(role)))
                .push(route),
        )
    }
}

pub(crate) fn customer() -> CustomerDetails {
    CustomerDetails {
        name: "Ada Lovelace".to_string(),
        phone: "5550101000".to_string(),
        email: None,
        address: Some("1 Analytical Way".to_string()),
    }
}

pub(crate) fn make_job(uuid: JobUuid) -> Job {
    Job::booked(uuid, customer(), "Replace water heater", Timestamp::UNIX_EPOCH)
}

/// A job authorized for `price`, untaxed.
pub(crate) fn authorized_job(uuid: JobUuid, price: Decimal) -> Result<Job, InvoiceError> {
    let mut job = make_job(uuid);

    job.authorize(
        vec![LineItem::new("Water heater", price)],
        false,
        TaxRate::DEFAULT,
        Timestamp::UNIX_EPOCH,
    )?;

    Ok(job)
}
