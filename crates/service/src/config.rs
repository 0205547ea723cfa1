use futsal_core::booking_window::DEFAULT_HORIZON_DAYS;

/// Service configuration loaded from environment variables.
///
/// All fields have defaults suitable for local use except the seed admin
/// password, which must be provided for an admin to be created.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// SQLite database URL (default: `sqlite://futsal.db`).
    pub database_url: String,
    /// Connection pool size (default: `5`).
    pub db_max_connections: u32,
    /// Username of the admin seeded on first run (default: `texas`).
    pub seed_admin_username: String,
    /// Password of the seeded admin. No admin is seeded when unset.
    pub seed_admin_password: Option<String>,
    /// How many days ahead students may book (default: `5`).
    pub booking_horizon_days: u64,
}

impl ServiceConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default              |
    /// |------------------------|----------------------|
    /// | `DATABASE_URL`         | `sqlite://futsal.db` |
    /// | `DB_MAX_CONNECTIONS`   | `5`                  |
    /// | `SEED_ADMIN_USERNAME`  | `texas`              |
    /// | `SEED_ADMIN_PASSWORD`  | (unset)              |
    /// | `BOOKING_HORIZON_DAYS` | `5`                  |
    pub fn from_env() -> Self {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://futsal.db".into());

        let db_max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let seed_admin_username =
            std::env::var("SEED_ADMIN_USERNAME").unwrap_or_else(|_| "texas".into());

        let seed_admin_password = std::env::var("SEED_ADMIN_PASSWORD")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let booking_horizon_days: u64 = std::env::var("BOOKING_HORIZON_DAYS")
            .unwrap_or_else(|_| DEFAULT_HORIZON_DAYS.to_string())
            .parse()
            .expect("BOOKING_HORIZON_DAYS must be a valid u64");

        Self {
            database_url,
            db_max_connections,
            seed_admin_username,
            seed_admin_password,
            booking_horizon_days,
        }
    }
}
