use std::env;

/// Service configuration assembled from environment variables at startup.
/// Constructed explicitly and handed to each component, so multiple
/// instances with different configurations can coexist in one process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub service_name: &'static str,
    pub host: String,
    pub port: u16,

    // Store
    pub database_host: String,
    pub database_port: u16,
    pub database_name: String,
    pub database_user: String,
    pub database_password: String,

    // Deployment
    pub region: String,
    pub environment: String,
    pub log_level: String,

    // Backend base URLs, gateway only. Empty for the backend services.
    pub validator_url: String,
    pub ingest_url: String,
}

impl AppConfig {
    pub fn gateway_from_env() -> Self {
        let mut config = Self::base("meridian-gateway", 8080);
        config.validator_url = env_or("VALIDATOR_URL", "http://localhost:8081");
        config.ingest_url = env_or("INGEST_URL", "http://localhost:8082");
        config
    }

    pub fn validator_from_env() -> Self {
        Self::base("meridian-validator", 8081)
    }

    pub fn ingest_from_env() -> Self {
        Self::base("meridian-ingest", 8082)
    }

    fn base(service_name: &'static str, default_port: u16) -> Self {
        dotenvy::dotenv().ok();

        Self {
            service_name,
            host: env_or("HOST", "0.0.0.0"),
            port: env::var("PORT")
                .unwrap_or_else(|_| default_port.to_string())
                .parse()
                .expect("PORT must be a number"),
            database_host: env_or("DATABASE_HOST", "localhost"),
            database_port: env::var("DATABASE_PORT")
                .unwrap_or_else(|_| "5432".to_string())
                .parse()
                .expect("DATABASE_PORT must be a number"),
            database_name: env_or("DATABASE_NAME", "appdb"),
            database_user: env_or("DATABASE_USER", "appuser"),
            database_password: env_or("DATABASE_PASSWORD", "password"),
            region: env_or("REGION", "unknown"),
            environment: env_or("ENVIRONMENT", "production"),
            log_level: env_or("LOG_LEVEL", "info"),
            validator_url: String::new(),
            ingest_url: String::new(),
        }
    }

    /// Postgres connection URL for the store pool.
    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.database_user,
            self.database_password,
            self.database_host,
            self.database_port,
            self.database_name
        )
    }

    /// A config for tests: in-process region label, no real endpoints.
    pub fn for_tests(service_name: &'static str, region: &str) -> Self {
        Self {
            service_name,
            host: "127.0.0.1".to_string(),
            port: 0,
            database_host: "localhost".to_string(),
            database_port: 5432,
            database_name: "appdb".to_string(),
            database_user: "appuser".to_string(),
            database_password: "password".to_string(),
            region: region.to_string(),
            environment: "test".to_string(),
            log_level: "info".to_string(),
            validator_url: String::new(),
            ingest_url: String::new(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
