use crate::error::ConfigError;
use crate::preview::CtaLabelMode;
use crate::utils::non_empty;
use std::env;
use std::net::SocketAddr;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 21296);

/// Credential lookups, first hit wins.
const API_KEY_VARS: [&str; 3] = ["API_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY"];

#[derive(Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub api_base: Url,
    pub text_model: String,
    pub image_model: String,
    pub bind_addr: SocketAddr,
    pub cta_label: CtaLabelMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL"),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            bind_addr: SocketAddr::from(DEFAULT_BIND_ADDR),
            cta_label: CtaLabelMode::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(lookup(key));
        let mut config = Self::default();

        config.api_key = API_KEY_VARS.into_iter().find_map(|key| get(key));

        if let Some(base) = get("GEMINI_API_BASE") {
            config.api_base = Url::parse(base.trim_end_matches('/'))?;
        }
        if let Some(model) = get("AD_TEXT_MODEL") {
            config.text_model = model;
        }
        if let Some(model) = get("AD_IMAGE_MODEL") {
            config.image_model = model;
        }
        if let Some(addr) = get("AD_BIND_ADDR") {
            config.bind_addr = addr.parse().map_err(|_| ConfigError::BindAddr(addr))?;
        }
        if let Some(mode) = get("AD_CTA_LABEL") {
            config.cta_label = mode.parse()?;
        }

        if config.api_key.is_none() {
            log::warn!(
                "No API credential found in {:?}; generation will fail until one is set",
                API_KEY_VARS
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.api_base.as_str(), "https://generativelanguage.googleapis.com/v1beta");
        assert_eq!(config.text_model, "gemini-2.5-flash");
        assert_eq!(config.image_model, "imagen-4.0-generate-001");
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:21296");
        assert_eq!(config.cta_label, CtaLabelMode::Heuristic);
    }

    #[test]
    fn api_key_falls_back_in_order() {
        let config = AppConfig::from_lookup(lookup(&[
            ("API_KEY", " "),
            ("GEMINI_API_KEY", "gemini"),
            ("GOOGLE_API_KEY", "google"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("gemini"));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AppConfig::from_lookup(lookup(&[
            ("GEMINI_API_BASE", "http://localhost:8080/v1/"),
            ("AD_BIND_ADDR", "0.0.0.0:8000"),
            ("AD_CTA_LABEL", "selected"),
            ("AD_TEXT_MODEL", "gemini-2.5-pro"),
        ]))
        .unwrap();
        assert_eq!(config.api_base.as_str(), "http://localhost:8080/v1");
        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.cta_label, CtaLabelMode::Selected);
        assert_eq!(config.text_model, "gemini-2.5-pro");
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("AD_BIND_ADDR", "nowhere")])),
            Err(ConfigError::BindAddr(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("AD_CTA_LABEL", "loud")])),
            Err(ConfigError::CtaLabelMode(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("GEMINI_API_BASE", "not a url")])),
            Err(ConfigError::Url(_))
        ));
    }
}
