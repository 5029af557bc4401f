//! `factline config` -- display resolved configuration.
//!
//! # Examples
//!
//! ```text
//! factline config show
//! FACTLINE_CONFIG=/etc/factline.json factline config show
//! ```

use factline_types::Config;

/// Render the resolved configuration as formatted JSON.
pub fn render(config: &Config) -> anyhow::Result<String> {
    serde_json::to_string_pretty(config)
        .map_err(|e| anyhow::anyhow!("failed to serialize config: {e}"))
}

/// Print the resolved configuration as formatted JSON.
pub fn config_show(config: &Config) -> anyhow::Result<()> {
    println!("{}", render(config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_config_round_trips() {
        let config = Config::default();
        let json = render(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.gateway.port, 4000);
        assert_eq!(parsed.classifier.model.model, "llama3.2:1b");
        assert_eq!(parsed.summarizer.model.base_url, "http://ollama-summarizer:11434");
    }
}
