//! Technicians

use crate::uuids::TypedUuid;

/// Marker for technician identifiers.
///
/// Technicians are owned by the surrounding user directory; jobs and time entries only hold
/// weak references to them.
#[derive(Debug)]
pub struct Technician;

/// Technician UUID
pub type TechUuid = TypedUuid<Technician>;
