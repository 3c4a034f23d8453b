use std::net::SocketAddr;
use std::path::PathBuf;

use crate::weather::DEFAULT_BASE_URL;

pub const OPENWEATHER_KEY_ENV: &str = "WAYFARE_OPENWEATHER_API_KEY";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// OpenWeather API key. When absent the weather routes answer 503
    /// and the rest of the server works normally.
    pub openweather_api_key: Option<String>,
    pub openweather_base_url: String,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("wayfare.db")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            openweather_api_key: None,
            openweather_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}
