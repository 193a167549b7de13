//! Tests for configuration

#[cfg(test)]
mod tests {
    use super::super::config::*;

    #[test]
    fn test_config_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.path, "data/journal.db");
        assert_eq!(config.llm.provider, "groq");
        assert_eq!(config.settings.theme_path, "data/theme.json");
    }

    #[test]
    fn test_server_config_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_server_config_explicit() {
        let toml_str = r#"
host = "127.0.0.1"
port = 9000
"#;
        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_database_config() {
        let toml_str = r#"
path = "data/trades.db"
"#;
        let config: DatabaseConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.path, "data/trades.db");
    }

    #[test]
    fn test_llm_config_minimal() {
        let config: LlmConfig = toml::from_str("").unwrap();
        assert_eq!(config.provider, "groq");
        assert_eq!(config.api_key, ""); // defaults to empty
        assert!(config.model.is_none());
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_llm_config_with_model() {
        let toml_str = r#"
provider = "openai"
api_key = "sk-xxx"
model = "gpt-4o-mini"
base_url = "https://api.openai.com"
"#;
        let config: LlmConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider, "openai");
        assert_eq!(config.api_key, "sk-xxx");
        assert_eq!(config.model, Some("gpt-4o-mini".to_string()));
        assert_eq!(config.base_url, Some("https://api.openai.com".to_string()));
    }

    #[test]
    fn test_llm_config_ollama() {
        let toml_str = r#"
provider = "ollama"
"#;
        let config: LlmConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider, "ollama");
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_settings_config() {
        let toml_str = r#"
theme_path = "prefs/theme.json"
"#;
        let config: SettingsConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme_path, "prefs/theme.json");
    }

    #[test]
    fn test_full_config_document() {
        let toml_str = r#"
[server]
port = 8080

[database]
path = "journal.db"

[llm]
provider = "groq"
api_key = "gsk-test"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0"); // defaulted
        assert_eq!(config.database.path, "journal.db");
        assert_eq!(config.llm.api_key, "gsk-test");
    }
}
