use std::collections::HashSet;

use crate::config::HplConfig;
use crate::logging::LEVELS;
use crate::types::EntityConfig;

/// Internal validation, called automatically during `HplConfig::from_str` / `load`.
pub(crate) fn validate(config: &HplConfig) -> anyhow::Result<()> {
    check_level("logging.level", &config.logging.level)?;
    for (module, level) in &config.logging.modules {
        check_level(&format!("logging.modules.{module:?}"), level)?;
    }

    check_entities("node", &config.nodes)?;
    check_entities("configuration", &config.configurations)?;

    Ok(())
}

fn check_level(key: &str, level: &str) -> anyhow::Result<()> {
    if !LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        anyhow::bail!(
            "{key}: unknown log level {level:?}, expected one of {}",
            LEVELS.join(", "),
        );
    }
    Ok(())
}

/// Entity names must be non-empty and unique within their kind.
fn check_entities(kind: &str, entities: &[EntityConfig]) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for (i, entity) in entities.iter().enumerate() {
        if entity.name.trim().is_empty() {
            anyhow::bail!("{kind}[{i}]: name must not be empty");
        }
        if !seen.insert(entity.name.as_str()) {
            anyhow::bail!("{kind}[{i}]: duplicate {kind} name {:?}", entity.name);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::config::HplConfig;

    #[test]
    fn rejects_unknown_level() {
        let err = "[logging]\nlevel = \"loud\"\n".parse::<HplConfig>().unwrap_err();
        assert!(err.to_string().contains("unknown log level"), "{err}");

        let err = "[logging]\nmodules = { \"hpl_lang\" = \"chatty\" }\n"
            .parse::<HplConfig>()
            .unwrap_err();
        assert!(err.to_string().contains("logging.modules"), "{err}");
    }

    #[test]
    fn rejects_duplicate_names() {
        let toml = r#"
[[node]]
name = "a"

[[node]]
name = "a"
"#;
        let err = toml.parse::<HplConfig>().unwrap_err();
        assert!(err.to_string().contains("duplicate node name"), "{err}");
    }

    #[test]
    fn same_name_across_kinds_is_allowed() {
        let toml = r#"
[[node]]
name = "a"

[[configuration]]
name = "a"
"#;
        assert!(toml.parse::<HplConfig>().is_ok());
    }

    #[test]
    fn rejects_empty_name() {
        let err = "[[configuration]]\nname = \" \"\n"
            .parse::<HplConfig>()
            .unwrap_err();
        assert!(err.to_string().contains("must not be empty"), "{err}");
    }
}
