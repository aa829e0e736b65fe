//! Resource handlers
//!
//! One handler per resource kind. Each method builds a typed request
//! payload, sends it through the transport core and reshapes the decoded
//! response into a flat client-facing struct.

pub mod load_balancer;
pub mod project;
pub mod service;
