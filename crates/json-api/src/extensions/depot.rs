//! Depot helper extensions.

use std::any::Any;

use fieldwork_app::auth::Principal;
use salvo::prelude::{Depot, StatusError};

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_principal(&mut self, principal: Principal);

    /// The authenticated caller.
    fn principal_or_401(&self) -> Result<&Principal, StatusError>;

    /// The caller, if they may manage the job board.
    fn dispatcher_or_403(&self) -> Result<&Principal, StatusError>;

    /// The caller, if they are an administrator.
    fn admin_or_403(&self) -> Result<&Principal, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_principal(&mut self, principal: Principal) {
        self.inject(principal);
    }

    fn principal_or_401(&self) -> Result<&Principal, StatusError> {
        self.obtain::<Principal>()
            .map_err(|_ignored| StatusError::unauthorized())
    }

    fn dispatcher_or_403(&self) -> Result<&Principal, StatusError> {
        let principal = self.principal_or_401()?;

        if !principal.can_dispatch() {
            return Err(StatusError::forbidden().brief("Requires the dispatcher or admin role"));
        }

        Ok(principal)
    }

    fn admin_or_403(&self) -> Result<&Principal, StatusError> {
        let principal = self.principal_or_401()?;

        if !principal.is_admin() {
            return Err(StatusError::forbidden().brief("Requires the admin role"));
        }

        Ok(principal)
    }
}
