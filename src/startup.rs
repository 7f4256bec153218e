use crate::config::{Config, StorageBackend};
use crate::ports::TransactionRepository;
use anyhow::{Context, Result};

pub struct ValidationReport {
    pub environment: bool,
    pub storage: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.environment && self.storage
    }

    pub fn print(&self) {
        println!("\n=== Startup Validation Report ===");
        println!("Environment Variables: {}", status(self.environment));
        println!("Storage Connectivity:  {}", status(self.storage));

        if !self.errors.is_empty() {
            println!("\nErrors:");
            for error in &self.errors {
                println!("  ❌ {}", error);
            }
        }

        println!("\nOverall Status: {}", if self.is_valid() { "✅ PASS" } else { "❌ FAIL" });
        println!("=================================\n");
    }
}

fn status(ok: bool) -> &'static str {
    if ok { "✅ OK" } else { "❌ FAIL" }
}

pub async fn validate_environment(
    config: &Config,
    repository: &dyn TransactionRepository,
) -> ValidationReport {
    let mut report = ValidationReport {
        environment: true,
        storage: true,
        errors: Vec::new(),
    };

    if let Err(e) = validate_env_vars(config) {
        report.environment = false;
        report.errors.push(format!("Environment: {:#}", e));
    }

    if let Err(e) = repository.health_check().await {
        report.storage = false;
        report.errors.push(format!("Storage: {}", e));
    }

    report
}

fn validate_env_vars(config: &Config) -> Result<()> {
    if config.server_port == 0 {
        anyhow::bail!("SERVER_PORT must be greater than 0");
    }
    if config.database_max_connections == 0 {
        anyhow::bail!("DATABASE_MAX_CONNECTIONS must be greater than 0");
    }

    if config.storage_backend == StorageBackend::Postgres {
        let database_url = config.require_database_url()?;
        let parsed = url::Url::parse(database_url).context("DATABASE_URL is not a valid URL")?;
        if !matches!(parsed.scheme(), "postgres" | "postgresql") {
            anyhow::bail!("DATABASE_URL must use the postgres:// scheme");
        }
    }

    if let Some(origins) = &config.cors_allowed_origins {
        for origin in origins {
            url::Url::parse(origin)
                .with_context(|| format!("CORS origin '{}' is not a valid URL", origin))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryTransactionRepository;
    use crate::config::LogFormat;

    fn config() -> Config {
        Config {
            server_port: 3000,
            storage_backend: StorageBackend::Postgres,
            database_url: Some("postgres://localhost:5432/payments".to_string()),
            database_max_connections: 5,
            log_format: LogFormat::Text,
            cors_allowed_origins: None,
        }
    }

    #[test]
    fn test_validate_env_vars_accepts_defaults() {
        assert!(validate_env_vars(&config()).is_ok());
    }

    #[test]
    fn test_validate_env_vars_missing_database_url() {
        let config = Config {
            database_url: None,
            ..config()
        };

        assert!(validate_env_vars(&config).is_err());
    }

    #[test]
    fn test_validate_env_vars_memory_backend_needs_no_database() {
        let config = Config {
            storage_backend: StorageBackend::Memory,
            database_url: None,
            ..config()
        };

        assert!(validate_env_vars(&config).is_ok());
    }

    #[test]
    fn test_validate_env_vars_invalid_url() {
        let config = Config {
            database_url: Some("not-a-url".to_string()),
            ..config()
        };

        assert!(validate_env_vars(&config).is_err());
    }

    #[test]
    fn test_validate_env_vars_invalid_cors_origin() {
        let config = Config {
            cors_allowed_origins: Some(vec!["shop.example".to_string()]),
            ..config()
        };

        assert!(validate_env_vars(&config).is_err());
    }

    #[tokio::test]
    async fn test_report_with_in_memory_storage() {
        let config = Config {
            storage_backend: StorageBackend::Memory,
            database_url: None,
            ..config()
        };
        let repo = InMemoryTransactionRepository::new();

        let report = validate_environment(&config, &repo).await;
        assert!(report.is_valid());
        assert!(report.errors.is_empty());
    }
}
