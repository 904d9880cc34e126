use std::env;

pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub seed_dir: String,
}

impl Config {
    pub fn load() -> Self {
        Config {
            bind_addr: load_or("BIND_ADDR", "0.0.0.0:4000"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: load_or("JWT_SECRET", "dev-only-secret-change-me"),
            seed_dir: load_or("SEED_DIR", "seed"),
        }
    }
}

fn load_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        log::info!("{} not set, using default: {}", key, default);
        default.to_string()
    })
}
