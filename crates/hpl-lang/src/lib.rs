#[macro_use]
mod log_macros;

pub mod ast;
pub mod batch;
pub mod check;
mod error;
pub mod grammar;
pub mod parse_utils;
mod parser;
pub mod schema;
mod transform;

pub use batch::{
    BatchDriver, BatchReport, Diagnostic, EntityKind, ItemKind, SpecEntity, SpecHost, SpecItem,
    SyntaxErrorPolicy,
};
pub use error::{
    ErrorKind, GrammarError, ParseError, ParseResult, SanityError, SyntaxError, TypeError,
};
pub use parser::{HplParser, parse_assumption, parse_predicate, parse_property};
pub use schema::{BaseType, FieldType, FieldTypeResolver, TopicSchema, TopicTable};
