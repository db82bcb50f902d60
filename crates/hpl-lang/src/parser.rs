use crate::ast::{Assumption, Expr, Property};
use crate::error::ParseResult;
use crate::grammar::{StartRule, parse_tree};
use crate::schema::FieldTypeResolver;
use crate::transform::{self, Context};

/// Entry point for parsing HPL text.
///
/// Holds no mutable state: one parser can serve any number of calls. When
/// built [`with_resolver`](Self::with_resolver), field accesses are typed
/// against the resolver's topic schemas.
#[derive(Default, Clone, Copy)]
pub struct HplParser<'r> {
    resolver: Option<&'r dyn FieldTypeResolver>,
}

impl<'r> HplParser<'r> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolver(resolver: &'r dyn FieldTypeResolver) -> Self {
        HplParser {
            resolver: Some(resolver),
        }
    }

    fn context(&self) -> Context<'r> {
        Context {
            resolver: self.resolver,
        }
    }

    /// `scope: pattern`
    pub fn parse_property(&self, text: &str) -> ParseResult<Property> {
        hpl_debug!(parse, start = "property", "parsing `{text}`");
        let tree = parse_tree(text, StartRule::Property)?;
        transform::build_property(tree, self.context())
    }

    /// `topic { condition }`
    pub fn parse_assumption(&self, text: &str) -> ParseResult<Assumption> {
        hpl_debug!(parse, start = "assumption", "parsing `{text}`");
        let tree = parse_tree(text, StartRule::Assumption)?;
        transform::build_assumption(tree, self.context())
    }

    /// A bare boolean condition, returned without a predicate wrapper.
    pub fn parse_predicate(&self, text: &str) -> ParseResult<Expr> {
        hpl_debug!(parse, start = "predicate", "parsing `{text}`");
        let tree = parse_tree(text, StartRule::Predicate)?;
        transform::build_predicate(tree, self.context())
    }
}

impl std::fmt::Debug for HplParser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HplParser")
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

/// Parse a property with no field type information.
pub fn parse_property(text: &str) -> ParseResult<Property> {
    HplParser::new().parse_property(text)
}

/// Parse an assumption with no field type information.
pub fn parse_assumption(text: &str) -> ParseResult<Assumption> {
    HplParser::new().parse_assumption(text)
}

/// Parse a bare predicate with no field type information.
pub fn parse_predicate(text: &str) -> ParseResult<Expr> {
    HplParser::new().parse_predicate(text)
}
