use anyhow::bail;
use clap::{Parser, ValueEnum};

/// Runtime configuration for the `user-tonic-server` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file is loaded first when present).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "user-tonic-server",
    version,
    about = "A gRPC service for managing user records"
)]
pub struct CliArgs {
    /// Address to listen on (TCP or Unix socket path; use --uds for Unix socket).
    ///
    /// Example: "0.0.0.0:50051" or "/tmp/user-tonic.sock"
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:50051"))]
    pub server_addr: String,

    /// Listen on a Unix socket instead of TCP. If set, `SERVER_ADDR` must be a file path.
    #[arg(short, long, default_value_t = false)]
    pub uds: bool,

    /// Where user records are kept.
    ///
    /// Environment variable: `STORAGE`
    #[arg(long, env = "STORAGE", value_enum, default_value_t = Storage::Memory)]
    pub storage: Storage,

    /// Connection string for the `postgres` storage backend.
    ///
    /// Environment variable: `DATABASE_URL`
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Upper bound on pooled database connections.
    ///
    /// Environment variable: `DB_MAX_CONNECTIONS`
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub db_max_connections: u32,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// Process-local map, lost on exit.
    Memory,
    /// PostgreSQL through a connection pool.
    Postgres,
}

#[derive(Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Memory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

// The database URL may carry credentials, so it is never printed.
impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageConfig::Memory => f.write_str("Memory"),
            StorageConfig::Postgres {
                max_connections, ..
            } => f
                .debug_struct("Postgres")
                .field("database_url", &"<redacted>")
                .field("max_connections", max_connections)
                .finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub uds: bool,
    pub storage: StorageConfig,
}

impl ServerConfig {
    pub fn storage_kind(&self) -> Storage {
        match self.storage {
            StorageConfig::Memory => Storage::Memory,
            StorageConfig::Postgres { .. } => Storage::Postgres,
        }
    }
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let storage = match args.storage {
            Storage::Memory => StorageConfig::Memory,
            Storage::Postgres => {
                if !cfg!(feature = "postgres") {
                    bail!("STORAGE=postgres requires building with the `postgres` feature");
                }
                let Some(database_url) = args.database_url else {
                    bail!("DATABASE_URL is required when STORAGE=postgres");
                };
                if args.db_max_connections == 0 {
                    bail!("DB_MAX_CONNECTIONS must be greater than 0");
                }
                StorageConfig::Postgres {
                    database_url,
                    max_connections: args.db_max_connections,
                }
            }
        };

        Ok(Self {
            server_addr: args.server_addr,
            uds: args.uds,
            storage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("user-tonic-server").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn explicit_flags_select_memory_storage() {
        let config =
            ServerConfig::try_from(parse(&["--server-addr", "127.0.0.1:6000", "--storage", "memory"]))
                .unwrap();
        assert_eq!(config.server_addr, "127.0.0.1:6000");
        assert!(!config.uds);
        assert_eq!(config.storage, StorageConfig::Memory);
    }

    #[test]
    fn postgres_requires_database_url() {
        let args = CliArgs {
            server_addr: "0.0.0.0:50051".to_string(),
            uds: false,
            storage: Storage::Postgres,
            database_url: None,
            db_max_connections: 10,
        };
        assert!(ServerConfig::try_from(args).is_err());
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn postgres_rejects_empty_pool() {
        let args = CliArgs {
            server_addr: "0.0.0.0:50051".to_string(),
            uds: false,
            storage: Storage::Postgres,
            database_url: Some("postgres://localhost/users".to_string()),
            db_max_connections: 0,
        };
        let err = ServerConfig::try_from(args).unwrap_err();
        assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn postgres_with_url_is_accepted() {
        let args = CliArgs {
            server_addr: "0.0.0.0:50051".to_string(),
            uds: false,
            storage: Storage::Postgres,
            database_url: Some("postgres://localhost/users".to_string()),
            db_max_connections: 4,
        };
        let config = ServerConfig::try_from(args).unwrap();
        assert_eq!(
            config.storage,
            StorageConfig::Postgres {
                database_url: "postgres://localhost/users".to_string(),
                max_connections: 4,
            }
        );
        assert_eq!(config.storage_kind(), Storage::Postgres);
        assert!(!format!("{config:?}").contains("localhost/users"));
    }

    #[cfg(not(feature = "postgres"))]
    #[test]
    fn postgres_without_feature_is_rejected() {
        let args = CliArgs {
            server_addr: "0.0.0.0:50051".to_string(),
            uds: false,
            storage: Storage::Postgres,
            database_url: Some("postgres://localhost/users".to_string()),
            db_max_connections: 4,
        };
        let err = ServerConfig::try_from(args).unwrap_err();
        assert!(err.to_string().contains("`postgres` feature"));
    }
}
