//! Job Status

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    /// Created by a dispatcher.
    #[serde(rename = "booked")]
    Booked,

    /// Technician is travelling to the site.
    #[serde(rename = "en_route")]
    EnRoute,

    /// Technician is on site.
    #[serde(rename = "on_site")]
    OnSite,

    /// A signed price has been recorded; payments may be taken.
    #[serde(rename = "Authorized")]
    Authorized,

    /// Fully paid and settled.
    #[serde(rename = "Closed")]
    Closed,
}

/// Errors raised by status parsing and transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusError {
    /// The transition is not in the allowed-transition table.
    #[error("cannot move a job from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: JobStatus,
        /// Requested status.
        to: JobStatus,
    },

    /// The target status may only be reached through its own operation.
    #[error("{0} can only be reached through its dedicated operation")]
    Reserved(JobStatus),

    /// The value is not one of the five known statuses.
    #[error("unknown job status {0:?}")]
    Unknown(String),
}

impl JobStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Booked,
        Self::EnRoute,
        Self::OnSite,
        Self::Authorized,
        Self::Closed,
    ];

    /// Stored/serialized representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Booked => "booked",
            Self::EnRoute => "en_route",
            Self::OnSite => "on_site",
            Self::Authorized => "Authorized",
            Self::Closed => "Closed",
        }
    }

    /// Statuses reachable from this one.
    #[must_use]
    pub const fn allowed_next(self) -> &'static [Self] {
        match self {
            Self::Booked => &[Self::EnRoute, Self::OnSite, Self::Authorized],
            Self::EnRoute => &[Self::OnSite, Self::Authorized],
            Self::OnSite => &[Self::Authorized],
            Self::Authorized => &[Self::Closed],
            Self::Closed => &[],
        }
    }

    /// Whether `next` is in the transition table for this status.
    ///
    /// Re-authorizing an `Authorized` job is not a status change and is not listed here.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next().contains(&next)
    }

    /// Closed is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Validate a dispatcher/technician status change.
    ///
    /// Only the travel states can be set directly; `Authorized` and `Closed` carry
    /// monetary preconditions and have their own operations.
    ///
    /// # Errors
    ///
    /// - [`StatusError::Reserved`]: the target is `Authorized` or `Closed`.
    /// - [`StatusError::InvalidTransition`]: the move is not in the transition table.
    pub fn dispatch_to(self, next: Self) -> Result<Self, StatusError> {
        if matches!(next, Self::Authorized | Self::Closed) {
            return Err(StatusError::Reserved(next));
        }

        if !self.can_transition_to(next) {
            return Err(StatusError::InvalidTransition {
                from: self,
                to: next,
            });
        }

        Ok(next)
    }
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = StatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| StatusError::Unknown(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_stored_representation() -> TestResult {
        for status in JobStatus::ALL {
            assert_eq!(status.as_str().parse::<JobStatus>()?, status);
        }

        assert_eq!(
            "closed".parse::<JobStatus>(),
            Err(StatusError::Unknown("closed".to_string()))
        );

        Ok(())
    }

    #[test]
    fn transition_table_matches_lifecycle() {
        use JobStatus::{Authorized, Booked, Closed, EnRoute, OnSite};

        assert!(Booked.can_transition_to(EnRoute));
        assert!(Booked.can_transition_to(OnSite));
        assert!(Booked.can_transition_to(Authorized));
        assert!(EnRoute.can_transition_to(OnSite));
        assert!(EnRoute.can_transition_to(Authorized));
        assert!(OnSite.can_transition_to(Authorized));

        assert!(!OnSite.can_transition_to(EnRoute), "no regression");
        assert!(!EnRoute.can_transition_to(Booked), "no regression");
        assert!(Authorized.can_transition_to(Closed));

        assert!(!Booked.can_transition_to(Closed), "closure needs a price");
        assert!(Closed.allowed_next().is_empty(), "closed is terminal");
    }

    #[test]
    fn dispatch_allows_travel_states() -> TestResult {
        assert_eq!(
            JobStatus::Booked.dispatch_to(JobStatus::EnRoute)?,
            JobStatus::EnRoute
        );
        assert_eq!(
            JobStatus::EnRoute.dispatch_to(JobStatus::OnSite)?,
            JobStatus::OnSite
        );

        Ok(())
    }

    #[test]
    fn dispatch_rejects_reserved_targets() {
        assert_eq!(
            JobStatus::Booked.dispatch_to(JobStatus::Closed),
            Err(StatusError::Reserved(JobStatus::Closed))
        );
        assert_eq!(
            JobStatus::OnSite.dispatch_to(JobStatus::Authorized),
            Err(StatusError::Reserved(JobStatus::Authorized))
        );
    }

    #[test]
    fn dispatch_rejects_regressions() {
        assert_eq!(
            JobStatus::Authorized.dispatch_to(JobStatus::OnSite),
            Err(StatusError::InvalidTransition {
                from: JobStatus::Authorized,
                to: JobStatus::OnSite,
            })
        );
        assert_eq!(
            JobStatus::Closed.dispatch_to(JobStatus::Booked),
            Err(StatusError::InvalidTransition {
                from: JobStatus::Closed,
                to: JobStatus::Booked,
            })
        );
    }

    #[test]
    fn serde_uses_stored_names() -> TestResult {
        assert_eq!(serde_json::to_string(&JobStatus::EnRoute)?, "\"en_route\"");
        assert_eq!(
            serde_json::from_str::<JobStatus>("\"Authorized\"")?,
            JobStatus::Authorized
        );

        Ok(())
    }
}
