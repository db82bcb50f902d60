use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use hpl_lang::{EntityKind, FieldType, SpecEntity, TopicSchema, TopicTable};

use crate::logging::LoggingConfig;
use crate::types::{EntityConfig, ParserConfig};
use crate::validate;

// ---------------------------------------------------------------------------
// Raw TOML structure (intermediate representation)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct HplConfigRaw {
    #[serde(default)]
    parser: ParserConfig,
    #[serde(default)]
    logging: LoggingConfig,
    /// topic → field path → type name
    #[serde(default)]
    topics: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    node: Vec<EntityConfig>,
    #[serde(default)]
    configuration: Vec<EntityConfig>,
}

// ---------------------------------------------------------------------------
// HplConfig (resolved, validated)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct HplConfig {
    pub parser: ParserConfig,
    pub logging: LoggingConfig,
    /// Message schemas used to type field accesses.
    pub topics: TopicTable,
    pub nodes: Vec<EntityConfig>,
    pub configurations: Vec<EntityConfig>,
}

impl HplConfig {
    /// Read and parse an `hpl.toml` file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.as_ref().display()))?;
        content.parse()
    }

    /// Host entities holding the raw texts of every node and configuration,
    /// nodes first.
    pub fn entities(&self) -> Vec<SpecEntity> {
        let nodes = self.nodes.iter().map(|e| (EntityKind::Node, e));
        let configurations = self
            .configurations
            .iter()
            .map(|e| (EntityKind::Configuration, e));
        nodes
            .chain(configurations)
            .map(|(kind, e)| {
                SpecEntity::new(kind, e.name.clone())
                    .with_properties(e.properties.iter().cloned())
                    .with_assumptions(e.assumptions.iter().cloned())
            })
            .collect()
    }
}

impl FromStr for HplConfig {
    type Err = anyhow::Error;

    /// Parse a TOML string into a resolved, validated [`HplConfig`].
    fn from_str(toml_str: &str) -> anyhow::Result<Self> {
        let raw: HplConfigRaw = toml::from_str(toml_str)?;

        let mut topics = TopicTable::new();
        for (topic, fields) in raw.topics {
            let mut schema = TopicSchema::new();
            for (path, type_name) in fields {
                let ty: FieldType = type_name
                    .parse()
                    .map_err(|e| anyhow::anyhow!("topics.{topic:?}.{path:?}: {e}"))?;
                schema.insert(path, ty);
            }
            topics.insert(topic, schema);
        }

        let config = HplConfig {
            parser: raw.parser,
            logging: raw.logging,
            topics,
            nodes: raw.node,
            configurations: raw.configuration,
        };

        validate::validate(&config)?;

        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
