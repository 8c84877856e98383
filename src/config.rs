use std::net::SocketAddr;

use clap::Parser;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://asd_screening.db";

/// Runtime settings. Each one can come from a flag, the environment, or a
/// `.env` file in the working directory.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// SQLite connection string; the file is created if missing
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Address the HTTP server listens on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    #[arg(long, env = "MAX_CONNECTIONS", default_value_t = 16)]
    pub max_connections: u32,

    /// Minutes of inactivity before a login session expires
    #[arg(
        long,
        env = "SESSION_INACTIVITY_MINUTES",
        default_value_t = 30,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub session_inactivity_minutes: u32,

    /// Only send the session cookie over HTTPS
    #[arg(long, env = "SECURE_COOKIES", default_value_t = false)]
    pub secure_cookies: bool,
}

impl Config {
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Config::parse()
    }

    pub fn session_inactivity(&self) -> time::Duration {
        time::Duration::minutes(i64::from(self.session_inactivity_minutes))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            max_connections: 16,
            session_inactivity_minutes: 30,
            secure_cookies: false,
        }
    }
}
