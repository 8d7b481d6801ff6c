use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use crate::error::{AppError, Result};

/// Fallback content API host used when CONTENT_API_URL is unset.
const DEFAULT_CONTENT_API_URL: &str = "https://server808.vercel.app";

#[derive(Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    /// Base URL of the remote content API (articles, overalls, sitemap).
    pub content_api_url: String,
    /// Origin to re-fetch the SPA shell from. When unset, the shell is
    /// fetched from the request's own Host header over https.
    pub shell_origin: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        let content_api_url = env::var("CONTENT_API_URL")
            .unwrap_or_else(|_| DEFAULT_CONTENT_API_URL.to_string());
        // Trailing slash would double up when paths get appended.
        let content_api_url = content_api_url.trim_end_matches('/').to_string();

        let shell_origin = env::var("SHELL_ORIGIN")
            .ok()
            .map(|origin| origin.trim_end_matches('/').to_string());

        // Load server configuration with defaults
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host)
            .map_err(|e| AppError::Config(format!("Invalid host address: {}", e)))?;

        let server_addr = SocketAddr::new(ip, port);

        Ok(Config {
            server_addr,
            content_api_url,
            shell_origin,
        })
    }
}
