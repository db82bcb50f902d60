use std::fmt;

use crate::ast::{Assumption, Property};
use crate::error::{ErrorKind, ParseError, ParseResult};
use crate::parser::HplParser;

// ---------------------------------------------------------------------------
// Host model
// ---------------------------------------------------------------------------

/// One entry of a host list: raw text until it parses, then its AST.
#[derive(Debug, Clone, PartialEq)]
pub enum SpecItem<T> {
    Text(String),
    Parsed(T),
}

impl<T> SpecItem<T> {
    pub fn is_parsed(&self) -> bool {
        matches!(self, SpecItem::Parsed(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SpecItem::Text(t) => Some(t),
            SpecItem::Parsed(_) => None,
        }
    }

    pub fn as_parsed(&self) -> Option<&T> {
        match self {
            SpecItem::Parsed(v) => Some(v),
            SpecItem::Text(_) => None,
        }
    }
}

impl<T> From<&str> for SpecItem<T> {
    fn from(text: &str) -> Self {
        SpecItem::Text(text.to_string())
    }
}

impl<T> From<String> for SpecItem<T> {
    fn from(text: String) -> Self {
        SpecItem::Text(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Node,
    Configuration,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Node => f.write_str("Node"),
            EntityKind::Configuration => f.write_str("Configuration"),
        }
    }
}

/// A named entity carrying specification texts.
pub trait SpecHost {
    fn kind(&self) -> EntityKind;
    fn name(&self) -> &str;
    fn properties_mut(&mut self) -> &mut [SpecItem<Property>];
    fn assumptions_mut(&mut self) -> &mut [SpecItem<Assumption>];
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpecEntity {
    pub kind: EntityKind,
    pub name: String,
    pub properties: Vec<SpecItem<Property>>,
    pub assumptions: Vec<SpecItem<Assumption>>,
}

impl SpecEntity {
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        SpecEntity {
            kind,
            name: name.into(),
            properties: Vec::new(),
            assumptions: Vec::new(),
        }
    }

    pub fn with_properties<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties
            .extend(texts.into_iter().map(|t| SpecItem::Text(t.into())));
        self
    }

    pub fn with_assumptions<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assumptions
            .extend(texts.into_iter().map(|t| SpecItem::Text(t.into())));
        self
    }
}

impl SpecHost for SpecEntity {
    fn kind(&self) -> EntityKind {
        self.kind
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn properties_mut(&mut self) -> &mut [SpecItem<Property>] {
        &mut self.properties
    }

    fn assumptions_mut(&mut self) -> &mut [SpecItem<Assumption>] {
        &mut self.assumptions
    }
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Property,
    Assumption,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Property => "property",
            ItemKind::Assumption => "assumption",
        }
    }
}

/// One failed specification text.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub entity_kind: EntityKind,
    pub entity_name: String,
    pub item_kind: ItemKind,
    /// Position of the text in its host list.
    pub index: usize,
    pub text: String,
    pub error_kind: ErrorKind,
    pub detail: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error in {} '{}' when parsing {} `{}`: {} error: {}",
            self.entity_kind,
            self.entity_name,
            self.item_kind.as_str(),
            self.text,
            self.error_kind.as_str(),
            self.detail
        )
    }
}

/// Outcome of one batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub parsed: usize,
    /// Entries that were already ASTs.
    pub skipped: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn merge(&mut self, other: BatchReport) {
        self.parsed += other.parsed;
        self.skipped += other.skipped;
        self.diagnostics.extend(other.diagnostics);
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// What a batch run does with text that does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyntaxErrorPolicy {
    /// Abort the run with the syntax error.
    #[default]
    FailFast,
    /// Record a diagnostic and continue, like sanity and type errors.
    Report,
}

/// Parses every raw text of a host in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchDriver<'p> {
    parser: HplParser<'p>,
    policy: SyntaxErrorPolicy,
}

impl<'p> BatchDriver<'p> {
    pub fn new(parser: HplParser<'p>) -> Self {
        BatchDriver {
            parser,
            policy: SyntaxErrorPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: SyntaxErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace each parsable text of `host` with its AST, leaving failed
    /// texts in place. Sanity and type errors (and syntax errors under
    /// [`SyntaxErrorPolicy::Report`]) become diagnostics; anything else
    /// aborts the run.
    pub fn run<H: SpecHost + ?Sized>(&self, host: &mut H) -> ParseResult<BatchReport> {
        let kind = host.kind();
        let name = host.name().to_string();
        let mut report = BatchReport::default();
        self.process(
            host.properties_mut(),
            |text| self.parser.parse_property(text),
            (kind, &name, ItemKind::Property),
            &mut report,
        )?;
        self.process(
            host.assumptions_mut(),
            |text| self.parser.parse_assumption(text),
            (kind, &name, ItemKind::Assumption),
            &mut report,
        )?;
        hpl_info!(
            batch,
            entity = %name,
            parsed = report.parsed,
            skipped = report.skipped,
            failed = report.diagnostics.len(),
            "{kind} '{name}' processed"
        );
        Ok(report)
    }

    fn process<T>(
        &self,
        items: &mut [SpecItem<T>],
        parse: impl Fn(&str) -> ParseResult<T>,
        (entity_kind, entity_name, item_kind): (EntityKind, &str, ItemKind),
        report: &mut BatchReport,
    ) -> ParseResult<()> {
        for (index, item) in items.iter_mut().enumerate() {
            let SpecItem::Text(text) = item else {
                report.skipped += 1;
                continue;
            };
            match parse(text) {
                Ok(ast) => {
                    *item = SpecItem::Parsed(ast);
                    report.parsed += 1;
                }
                Err(e) if self.is_reported(&e) => {
                    hpl_error!(
                        batch,
                        error_kind = e.kind().as_str(),
                        text = %text,
                        detail = %e,
                        "Error in {entity_kind} '{entity_name}' when parsing {}",
                        item_kind.as_str()
                    );
                    report.diagnostics.push(Diagnostic {
                        entity_kind,
                        entity_name: entity_name.to_string(),
                        item_kind,
                        index,
                        text: text.clone(),
                        error_kind: e.kind(),
                        detail: detail(&e),
                    });
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn is_reported(&self, error: &ParseError) -> bool {
        error.is_recoverable()
            || (self.policy == SyntaxErrorPolicy::Report && matches!(error, ParseError::Syntax(_)))
    }
}

/// Error message without the kind prefix.
fn detail(error: &ParseError) -> String {
    match error {
        ParseError::Syntax(e) => e.to_string(),
        ParseError::Sanity(e) => e.0.clone(),
        ParseError::Type(e) => e.0.clone(),
        ParseError::Grammar(e) => e.to_string(),
    }
}
