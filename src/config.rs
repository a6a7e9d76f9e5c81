use crate::error::{Error, Result};
use std::env;

pub const DEFAULT_SITE_TITLE: &str = "Blogger to WordPress Export";
pub const DEFAULT_SITE_LINK: &str = "https://example.wordpress.com";
pub const DEFAULT_PLACEHOLDER_EMAIL: &str = "noreply@example.com";
pub const DEFAULT_UNTITLED: &str = "No Title";

#[derive(Debug, Clone)]
pub struct Config {
    pub site_title: String,
    pub site_link: String,
    pub placeholder_email: String,
    pub untitled: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let site_title = read_var("BLOGGER2WXR_SITE_TITLE", DEFAULT_SITE_TITLE)?;
        let site_link = read_var("BLOGGER2WXR_SITE_LINK", DEFAULT_SITE_LINK)?;
        let placeholder_email =
            read_var("BLOGGER2WXR_PLACEHOLDER_EMAIL", DEFAULT_PLACEHOLDER_EMAIL)?;
        let untitled = read_var("BLOGGER2WXR_UNTITLED", DEFAULT_UNTITLED)?;

        Ok(Self {
            site_title,
            site_link,
            placeholder_email,
            untitled,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_title: DEFAULT_SITE_TITLE.to_string(),
            site_link: DEFAULT_SITE_LINK.to_string(),
            placeholder_email: DEFAULT_PLACEHOLDER_EMAIL.to_string(),
            untitled: DEFAULT_UNTITLED.to_string(),
        }
    }
}

fn read_var(name: &str, default: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Err(Error::Config(format!(
            "{} is set but empty",
            name
        ))),
        Ok(value) => Ok(value),
        Err(_) => Ok(default.to_string()),
    }
}

#[derive(Debug, Clone)]
pub struct ConverterConfig {
    pub site_title: String,
    pub site_link: String,
    pub placeholder_email: String,
    pub untitled: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ConverterConfig {
    fn from(config: &Config) -> Self {
        Self {
            site_title: config.site_title.clone(),
            site_link: config.site_link.clone(),
            placeholder_email: config.placeholder_email.clone(),
            untitled: config.untitled.clone(),
        }
    }
}
