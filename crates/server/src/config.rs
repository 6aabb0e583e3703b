use log::{info, warn};
use std::{env, fmt::Display, net::SocketAddr, str::FromStr};

pub struct Config {
    pub database_url: String,
    pub oidc_issuer_url: String,
    pub bind_addr: SocketAddr,
    /// Reviews per feed page when the caller does not say
    pub feed_page_size: u64,
}

impl Config {
    pub fn load() -> Self {
        if dotenvy::dotenv().is_err() {
            info!("No .env file found, reading the environment only");
        }

        Self {
            database_url: required("DATABASE_URL"),
            oidc_issuer_url: required("OIDC_ISSUER_URL"),
            bind_addr: try_load("BIND_ADDR", "0.0.0.0:3000"),
            feed_page_size: try_load("FEED_PAGE_SIZE", "20"),
        }
    }
}

fn required(key: &str) -> String {
    env::var(key)
        .map_err(|_| {
            warn!("Environment variable {key} not found");
        })
        .expect("Environment misconfigured!")
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    parse_or_default(key, env::var(key).ok(), default)
        .map_err(|e| {
            warn!("{e}");
        })
        .expect("Environment misconfigured!")
}

fn parse_or_default<T: FromStr>(key: &str, value: Option<String>, default: &str) -> Result<T, String>
where
    T::Err: Display,
{
    let value = value.unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value
        .trim()
        .parse()
        .map_err(|e| format!("Invalid {key} value {value:?}: {e}"))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_and_overrides() {
        let addr: SocketAddr = parse_or_default("BIND_ADDR", None, "0.0.0.0:3000").unwrap();
        assert_eq!(addr.port(), 3000);

        let size: u64 = parse_or_default("FEED_PAGE_SIZE", Some(" 50 ".to_string()), "20").unwrap();
        assert_eq!(size, 50);

        let err = parse_or_default::<u64>("FEED_PAGE_SIZE", Some("many".to_string()), "20");
        assert!(err.unwrap_err().starts_with("Invalid FEED_PAGE_SIZE"));
    }
}
