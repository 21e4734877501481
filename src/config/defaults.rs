pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: i64 = 3000;
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info,sea_orm=warn";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://club_hub.db?mode=rwc";
pub const DEFAULT_DB_MAX_CONNECTIONS: i64 = 10;
pub const DEFAULT_DB_MIN_IDLE: i64 = 2;
pub const DEFAULT_DEV_JWT_SECRET: &str = "super-secret-change-me";
pub const DEFAULT_PAGE_SIZE: i64 = 50;
