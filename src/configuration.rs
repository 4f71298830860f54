use secrecy::Secret;
#[cfg(feature = "postgres")]
use secrecy::ExposeSecret;
#[cfg(feature = "postgres")]
use serde_aux::field_attributes::deserialize_number_from_string;
use serde_aux::field_attributes::deserialize_option_number_from_string;
use std::net::IpAddr;
use std::time::Duration;

pub enum Environment {
    Local,
    Production,
}

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub firebase: FirebaseSettings,
    pub operator: OperatorSettings,
    pub client: ClientSettings,
    #[cfg(feature = "postgres")]
    pub database: DatabaseSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_option_number_from_string")]
    pub port: Option<u16>,
    pub host: IpAddr,
}

#[derive(serde::Deserialize, Clone)]
pub struct FirebaseSettings {
    pub api_key: Secret<String>,
    pub identity_endpoint: String,
    pub timeout_milliseconds: u64,
    pub fcm: FcmSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct FcmSettings {
    pub project_id: String,
    pub endpoint: String,
    pub service_account_key_path: String,
    pub timeout_milliseconds: u64,
}

/// Credentials for operator-only routes. The password is stored as an
/// argon2 PHC string.
#[derive(serde::Deserialize, Clone)]
pub struct OperatorSettings {
    pub username: String,
    pub password_hash: Secret<String>,
}

#[derive(serde::Deserialize, Clone)]
pub struct ClientSettings {
    pub backend_url: String,
    pub max_retries: u32,
    pub base_delay_milliseconds: u64,
    pub timeout_milliseconds: u64,
    pub storage_path: String,
}

#[cfg(feature = "postgres")]
#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
}

impl FirebaseSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

impl FcmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

impl ClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_milliseconds)
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either 'local' or 'production'.",
                other
            )),
        }
    }
}

#[cfg(feature = "postgres")]
impl DatabaseSettings {
    pub fn connection_string(&self) -> Secret<String> {
        Secret::new(format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.username,
            self.password.expose_secret(),
            self.host,
            self.port,
            self.database_name,
            ssl_mode(self.require_ssl)
        ))
    }
}

#[cfg(feature = "postgres")]
fn ssl_mode(require_ssl: bool) -> &'static str {
    match require_ssl {
        true => "require",
        false => "prefer",
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("No current directory: {}", e)))?;
    let configuration_directory = base_path.join("configuration");
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    let mut settings = config::Config::default();
    settings.merge(config::File::from(configuration_directory.join("base")).required(true))?;
    settings.merge(
        config::File::from(configuration_directory.join(environment.as_str())).required(true),
    )?;
    settings.merge(config::Environment::with_prefix("app").separator("__"))?;
    settings.try_into()
}
