pub mod error;
pub mod types;

pub use error::{Error, Result};

/// Messages and service stubs generated from `proto/user.proto`.
pub mod proto {
    tonic::include_proto!("user");

    /// Encoded descriptor set for `tonic-reflection`.
    pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("user_descriptor");
}
