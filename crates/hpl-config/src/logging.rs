use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Levels accepted by `level` and by every `modules` override.
pub(crate) const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// `[logging]` section. Every key is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Module path → level, e.g. `{ "hpl_lang::batch" = "debug" }`.
    pub modules: BTreeMap<String, String>,
    /// Log file, relative to the config file's directory unless absolute.
    pub file: Option<PathBuf>,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".into(),
            modules: BTreeMap::new(),
            file: None,
            format: LogFormat::Plain,
        }
    }
}

impl LoggingConfig {
    /// `EnvFilter` directives: the global level, then one `module=level`
    /// per override.
    pub fn directives(&self) -> String {
        self.modules
            .iter()
            .fold(self.level.clone(), |mut acc, (module, level)| {
                acc.push(',');
                acc.push_str(module);
                acc.push('=');
                acc.push_str(level);
                acc
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `[domain]`-prefixed text lines.
    Plain,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_list_overrides_after_level() {
        let mut config = LoggingConfig::default();
        assert_eq!(config.directives(), "info");

        config.level = "warn".into();
        config.modules.insert("hpl_lang::parser".into(), "trace".into());
        config.modules.insert("hpl_lang::batch".into(), "debug".into());
        assert_eq!(
            config.directives(),
            "warn,hpl_lang::batch=debug,hpl_lang::parser=trace"
        );
    }
}
