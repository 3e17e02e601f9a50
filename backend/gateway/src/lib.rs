//! `platewire-gateway` — webhook transport for the NLU front end.
//!
//! Decodes the front end's query-result envelope, derives the session key
//! from the first output context, and hands the event to the fulfillment
//! core. Every decoded event produces `200 OK` with a fulfillment text;
//! nothing in this crate surfaces a transport-level failure to the NLU.

pub mod server;
pub mod session_id;
pub mod webhook;

pub use server::{router, start_server, GatewayState};
pub use session_id::extract_session_id;
