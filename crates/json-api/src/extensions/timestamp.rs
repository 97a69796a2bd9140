//! Timestamp parsing helpers.

use fieldwork::revenue::TimeRange;
use jiff::Timestamp;
use salvo::{oapi::extract::QueryParam, prelude::StatusError};

use crate::extensions::*;

pub(crate) trait TimestampQueryExt {
    /// Parse an optional RFC 3339 timestamp query parameter.
    fn into_timestamp(self, name: &str) -> Result<Option<Timestamp>, StatusError>;
}

impl TimestampQueryExt for QueryParam<String, false> {
    fn into_timestamp(self, name: &str) -> Result<Option<Timestamp>, StatusError> {
        parse_timestamp(self.into_inner().as_deref(), name)
    }
}

/// Parse an optional RFC 3339 timestamp field.
pub(crate) fn parse_timestamp(
    value: Option<&str>,
    name: &str,
) -> Result<Option<Timestamp>, StatusError> {
    value
        .map(str::parse::<Timestamp>)
        .transpose()
        .or_400(&format!("could not parse \"{name}\""))
}

/// Build a report range from required `from` and `to` query parameters.
pub(crate) fn time_range(
    from: QueryParam<String, false>,
    to: QueryParam<String, false>,
) -> Result<TimeRange, StatusError> {
    let from = from
        .into_timestamp("from")?
        .ok_or_else(|| StatusError::bad_request().brief("\"from\" query parameter is required"))?;

    let to = to
        .into_timestamp("to")?
        .ok_or_else(|| StatusError::bad_request().brief("\"to\" query parameter is required"))?;

    TimeRange::new(from, to).or_400("invalid range")
}
