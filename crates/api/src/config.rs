use serde::Deserialize;
use shared::phone::PhoneNormalizer;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    /// JWT verification configuration
    pub jwt: JwtAuthConfig,
    #[serde(default)]
    pub phone: PhoneConfig,
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub wishes: WishesConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Upper bound for request bodies; wish submissions carry base64 images.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl From<&DatabaseConfig> for persistence::db::DatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connect_timeout_secs: config.connect_timeout_secs,
            idle_timeout_secs: config.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Send Strict-Transport-Security; only behind TLS termination
    #[serde(default)]
    pub hsts_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtAuthConfig {
    /// RSA public key in PEM format for verifying tokens
    #[serde(default)]
    pub public_key: String,

    /// Shared HS256 secret, used when no public key is configured
    #[serde(default)]
    pub secret: String,

    /// Leeway in seconds for clock skew tolerance (default: 30)
    #[serde(default = "default_jwt_leeway")]
    pub leeway_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhoneConfig {
    /// Country code prepended to bare national numbers
    #[serde(default = "default_country_code")]
    pub default_country_code: String,

    /// Prefixes that mark a number as already carrying a country code
    #[serde(default = "default_recognized_prefixes")]
    pub recognized_prefixes: Vec<String>,

    #[serde(default = "default_national_number_length")]
    pub national_number_length: usize,
}

impl Default for PhoneConfig {
    fn default() -> Self {
        Self {
            default_country_code: default_country_code(),
            recognized_prefixes: default_recognized_prefixes(),
            national_number_length: default_national_number_length(),
        }
    }
}

impl PhoneConfig {
    pub fn normalizer(&self) -> PhoneNormalizer {
        PhoneNormalizer::new(
            self.default_country_code.clone(),
            self.recognized_prefixes.clone(),
        )
        .with_national_number_length(self.national_number_length)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Origin the wishes widget is served from
    pub self_origin: String,

    /// Additional origins allowed to exchange bridge messages
    #[serde(default)]
    pub trusted_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WishesConfig {
    /// Whether new wishes are visible without moderation
    #[serde(default = "default_auto_approve")]
    pub auto_approve: bool,

    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
}

impl Default for WishesConfig {
    fn default() -> Self {
        Self {
            auto_approve: default_auto_approve(),
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory wish images are written to
    #[serde(default = "default_image_dir")]
    pub image_dir: String,

    /// Base URL the image directory is served under
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            image_dir: default_image_dir(),
            public_base_url: default_public_base_url(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_body_size() -> usize {
    8 * 1_048_576
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_jwt_leeway() -> u64 {
    30 // 30 seconds for clock skew tolerance
}
fn default_country_code() -> String {
    shared::phone::DEFAULT_COUNTRY_CODE.to_string()
}
fn default_recognized_prefixes() -> Vec<String> {
    vec![shared::phone::DEFAULT_COUNTRY_CODE.to_string()]
}
fn default_national_number_length() -> usize {
    shared::phone::DEFAULT_NATIONAL_NUMBER_LENGTH
}
fn default_auto_approve() -> bool {
    true
}
fn default_max_image_bytes() -> usize {
    5 * 1_048_576
}
fn default_image_dir() -> String {
    "data/images".to_string()
}
fn default_public_base_url() -> String {
    "/images".to_string()
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with INV__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("INV")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("security.cors_origins")
                    .with_list_parse_key("phone.recognized_prefixes")
                    .with_list_parse_key("bridge.trusted_origins")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// This method creates a config entirely from defaults and overrides,
    /// without relying on config files (which may not be accessible during tests).
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        // Embed defaults directly to avoid file system dependency in tests
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30
            max_body_size = 8388608

            [database]
            url = ""
            max_connections = 5
            min_connections = 0
            connect_timeout_secs = 2
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []
            hsts_enabled = false

            [jwt]
            public_key = ""
            secret = "test-secret-for-invitations"
            leeway_secs = 30

            [phone]
            default_country_code = "91"
            recognized_prefixes = ["91"]
            national_number_length = 10

            [bridge]
            self_origin = "https://invites.example.com"
            trusted_origins = ["https://host.example.com"]

            [wishes]
            auto_approve = true
            max_image_bytes = 5242880

            [storage]
            image_dir = "target/test-images"
            public_base_url = "/images"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        // Database URL is required
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "INV__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        // Validate port range
        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        // Validate connection pool settings
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if self.jwt.public_key.is_empty() && self.jwt.secret.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "INV__JWT__PUBLIC_KEY or INV__JWT__SECRET must be set".to_string(),
            ));
        }

        let cc = &self.phone.default_country_code;
        if cc.is_empty() || cc.len() > 3 || !cc.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigValidationError::InvalidValue(format!(
                "phone.default_country_code must be 1-3 digits, got {:?}",
                cc
            )));
        }

        if let Some(prefix) = self
            .phone
            .recognized_prefixes
            .iter()
            .find(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(ConfigValidationError::InvalidValue(format!(
                "phone.recognized_prefixes entries must be digits, got {:?}",
                prefix
            )));
        }

        if self.phone.national_number_length == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "phone.national_number_length cannot be 0".to_string(),
            ));
        }

        if self.bridge.self_origin.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "bridge.self_origin must be set".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}
