/// Opaque conversation key extracted from the NLU front end's context names.
pub type SessionId = String;

/// Server-assigned integer identifier of a persisted order.
pub type OrderId = i64;

/// Tracking status written at completion time. Later states are recorded by
/// out-of-band fulfillment processes, not by this backend.
pub const STATUS_IN_PROGRESS: &str = "in progress";
