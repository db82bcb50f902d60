use serde::Deserialize;

use hpl_lang::SyntaxErrorPolicy;

/// `[parser]` section.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// What a batch run does with texts that do not parse.
    pub syntax_errors: SyntaxErrors,
}

/// `syntax_errors = "fail_fast" | "report"`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxErrors {
    #[default]
    FailFast,
    Report,
}

impl From<SyntaxErrors> for SyntaxErrorPolicy {
    fn from(value: SyntaxErrors) -> Self {
        match value {
            SyntaxErrors::FailFast => SyntaxErrorPolicy::FailFast,
            SyntaxErrors::Report => SyntaxErrorPolicy::Report,
        }
    }
}

/// One `[[node]]` or `[[configuration]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityConfig {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub assumptions: Vec<String>,
}
