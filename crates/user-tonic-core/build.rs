/// Builds the gRPC client and server code for `proto/user.proto` using
/// `tonic-prost-build`.
///
/// Alongside the generated modules, the build writes an encoded
/// `FileDescriptorSet` to `OUT_DIR/user_descriptor.bin`. The server registers
/// it with `tonic-reflection` so tools like `grpcurl` can discover the API
/// without a local copy of the proto file.
///
/// # Files and Paths
///
/// - Proto file: `proto/user.proto`
/// - Includes: `proto/`
///
/// # Panics
///
/// Panics if code generation fails, which aborts the build.
///
/// # Output
///
/// Generated code is exposed as:
///
/// ```rust
/// pub mod proto {
///     tonic::include_proto!("user");
/// }
/// ```
use std::env;
use std::path::PathBuf;
fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let descriptor_path = out_dir.join("user_descriptor.bin");

    let mut config = tonic_prost_build::Config::new();
    config.file_descriptor_set_path(&descriptor_path);

    tonic_prost_build::configure()
        .compile_with_config(config, &["proto/user.proto"], &["proto"])
        .unwrap();
}
