//! gRPC surface of the user service.
//!
//! ## Structure
//!
//! - [`handler`] - gRPC service entry point (`UserRpcHandler`).
//! - [`convert`] - Domain-to-wire response mapping.

pub mod convert;
pub mod handler;
