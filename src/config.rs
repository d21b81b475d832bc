use std::path::PathBuf;

/// Runtime mode controlling error-detail disclosure. Anything other than an
/// explicit development flag suppresses detail in rendered error pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
    Development,
    Production,
}

impl RuntimeMode {
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("development") {
            Self::Development
        } else {
            Self::Production
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub runtime_mode: RuntimeMode,
    /// Default page title injected into every request context; individual
    /// views override it per page.
    pub site_title: String,
    pub static_dir: PathBuf,
    pub max_body_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            runtime_mode: RuntimeMode::Production,
            site_title: "NGO Volunteer Management".to_string(),
            static_dir: PathBuf::from("public"),
            max_body_bytes: 16 * 1024,
        }
    }
}

pub fn validate_startup_config(config: &AppConfig) -> Result<(), String> {
    if config.site_title.trim().is_empty() {
        return Err("site title must not be empty".to_string());
    }
    if config.max_body_bytes == 0 {
        return Err("max body bytes must be > 0".to_string());
    }
    Ok(())
}
