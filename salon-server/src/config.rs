//! Server configuration

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration
///
/// | Env var | Default | |
/// |---------|---------|---|
/// | DATABASE_URL | sqlite:salon.db | SQLite database |
/// | HTTP_PORT | 8080 | HTTP API port |
/// | ENVIRONMENT | development | development / staging / production |
/// | EMAIL_FROM_ADDRESS | noreply@salon.local | sender address of every email |
/// | PLATFORM_NAME | Salon Platform | sender name of platform mail |
/// | REVIEW_BASE_URL | http://localhost:8080/review | link in thank-you messages |
/// | SMTP_HOST | (unset) | unset = log emails instead of sending |
/// | SMTP_PORT | 587 | |
/// | SMTP_USERNAME / SMTP_PASSWORD | | password required outside development |
/// | LOG_LEVEL | (unset) | overrides `RUST_LOG` |
/// | LOG_DIR | (unset) | daily rolling log files |
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub http_port: u16,
    pub environment: String,
    pub email_from_address: String,
    pub platform_name: String,
    pub review_base_url: String,
    pub smtp: Option<SmtpConfig>,
    pub log_level: Option<String>,
    pub log_dir: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<Option<String>, BoxError> {
        match std::env::var(name) {
            Ok(v) if !v.is_empty() => Ok(Some(v)),
            _ if environment != "development" => {
                Err(format!("{name} must be set in {environment} environment").into())
            }
            _ => Ok(None),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let smtp = match std::env::var("SMTP_HOST").ok().filter(|h| !h.is_empty()) {
            Some(host) => Some(SmtpConfig {
                host,
                port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(587),
                username: std::env::var("SMTP_USERNAME").ok().filter(|s| !s.is_empty()),
                password: Self::require_secret("SMTP_PASSWORD", &environment)?,
            }),
            None => None,
        };

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:salon.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment,
            email_from_address: std::env::var("EMAIL_FROM_ADDRESS")
                .unwrap_or_else(|_| "noreply@salon.local".into()),
            platform_name: std::env::var("PLATFORM_NAME")
                .unwrap_or_else(|_| "Salon Platform".into()),
            review_base_url: std::env::var("REVIEW_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080/review".into()),
            smtp,
            log_level: std::env::var("LOG_LEVEL").ok().filter(|s| !s.is_empty()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            http_port: 8080,
            environment: "development".into(),
            email_from_address: "noreply@salon.local".into(),
            platform_name: "Salon Platform".into(),
            review_base_url: "http://localhost:8080/review".into(),
            smtp: None,
            log_level: None,
            log_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_optional_in_development() {
        assert!(matches!(
            Config::require_secret("SALON_TEST_UNSET_SECRET", "development"),
            Ok(None)
        ));
    }

    #[test]
    fn secrets_are_required_elsewhere() {
        let err = Config::require_secret("SALON_TEST_UNSET_SECRET", "production").unwrap_err();
        assert!(err.to_string().contains("must be set in production"));
    }
}
