/// Process configuration, read from flags and `TODO_*` environment variables.
use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

use clap::{Parser, ValueEnum};

/// Upper bound for `--session-ttl-minutes`: one year
pub const MAX_SESSION_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    /// `users.json` plus one `todos/user_<id>.json` per user
    Json,
    /// SQLite tables keyed by user id
    Sqlite,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "todo-web-app", version)]
#[command(about = "Multi-user to-do list web application", long_about = None)]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "TODO_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to bind
    #[arg(long, env = "TODO_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Directory holding the JSON store
    #[arg(long, env = "TODO_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Storage backend
    #[arg(long, env = "TODO_STORE", value_enum, default_value_t = StoreBackend::Json)]
    pub store: StoreBackend,

    /// SQLite database URL, used with `--store sqlite`
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://todo.db")]
    pub database_url: String,

    /// Minutes a login session stays valid
    #[arg(
        long,
        env = "TODO_SESSION_TTL_MINUTES",
        default_value_t = 720,
        value_parser = clap::value_parser!(i64).range(1..=MAX_SESSION_TTL_MINUTES)
    )]
    pub session_ttl_minutes: i64,

    /// Secret used to sign session cookies; random per process when unset
    #[arg(long, env = "TODO_SESSION_SECRET", hide_env_values = true)]
    pub session_secret: Option<String>,

    /// PBKDF2 iterations for new password hashes
    #[arg(long, env = "TODO_PASSWORD_ITERATIONS", default_value_t = 100_000)]
    pub password_iterations: u32,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.session_ttl_minutes)
    }
}
