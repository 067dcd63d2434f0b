use std::{collections::HashMap, fs};

#[derive(Debug, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".into(),
        }
    }
}

/// Resolution order: defaults, then `client.toml`, then environment, then
/// the command-line flag.
pub fn load_settings(flag_server_url: Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("client.toml") {
        apply_file_config(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = flag_server_url {
        settings.server_url = v;
    }

    normalize_server_url(&mut settings);
    settings
}

fn apply_file_config(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("server_url") {
            settings.server_url = v.clone();
        }
    }
}

// The transport joins endpoint paths with a bare '/'.
fn normalize_server_url(settings: &mut Settings) {
    while settings.server_url.ends_with('/') {
        settings.server_url.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_the_local_interpretation_service() {
        assert_eq!(Settings::default().server_url, "http://localhost:8000");
    }

    #[test]
    fn file_config_overrides_the_default() {
        let mut settings = Settings::default();
        apply_file_config(&mut settings, r#"server_url = "http://dreams.example:9000""#);
        assert_eq!(settings.server_url, "http://dreams.example:9000");
    }

    #[test]
    fn unparseable_file_config_is_ignored() {
        let mut settings = Settings::default();
        apply_file_config(&mut settings, "server_url = [not toml");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn trailing_slashes_are_stripped() {
        let mut settings = Settings {
            server_url: "http://dreams.example:9000//".into(),
        };
        normalize_server_url(&mut settings);
        assert_eq!(settings.server_url, "http://dreams.example:9000");
    }
}
