//! Service layer between the RPC handler and the persistence gateway.

pub mod service;

pub use service::UserService;
