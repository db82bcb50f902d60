use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Base data types of message fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Bool,
    Int,
    Float,
    String,
    /// A nested message; its own fields are declared with dotted paths.
    Message,
}

/// A field type: either a base type or an array of a base type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Base(BaseType),
    Array(BaseType),
}

impl BaseType {
    pub fn name(self) -> &'static str {
        match self {
            BaseType::Bool => "bool",
            BaseType::Int => "int",
            BaseType::Float => "float",
            BaseType::String => "string",
            BaseType::Message => "message",
        }
    }
}

impl FromStr for BaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bool" => Ok(BaseType::Bool),
            "int" => Ok(BaseType::Int),
            "float" => Ok(BaseType::Float),
            "string" => Ok(BaseType::String),
            "message" => Ok(BaseType::Message),
            other => Err(format!("unknown field type '{other}'")),
        }
    }
}

/// `float`, `int[]`, `message[]`, ...
impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().strip_suffix("[]") {
            Some(elem) => Ok(FieldType::Array(elem.trim().parse()?)),
            None => Ok(FieldType::Base(s.trim().parse()?)),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Base(b) => f.write_str(b.name()),
            FieldType::Array(b) => write!(f, "{}[]", b.name()),
        }
    }
}

// ---------------------------------------------------------------------------
// Topic schemas
// ---------------------------------------------------------------------------

/// Field layout of the message type published on one topic. Nested fields
/// use dotted paths (`linear.x`); array elements are addressed without an
/// index (`points.x` is field `x` of every element of `points`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicSchema {
    fields: BTreeMap<String, FieldType>,
}

impl TopicSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, path: impl Into<String>, ty: FieldType) -> Self {
        self.insert(path, ty);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, ty: FieldType) {
        self.fields.insert(path.into(), ty);
    }

    /// Declared type of `path`. A path that is only a prefix of declared
    /// paths is an implicit nested message.
    pub fn field(&self, path: &str) -> Option<FieldType> {
        if let Some(ty) = self.fields.get(path) {
            return Some(*ty);
        }
        let prefix = format!("{path}.");
        self.fields
            .range(prefix.clone()..)
            .next()
            .filter(|(k, _)| k.starts_with(&prefix))
            .map(|_| FieldType::Base(BaseType::Message))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Supplies message field types for type checking. Implementations are
/// consulted only for topics they claim to know; every other topic is typed
/// permissively.
pub trait FieldTypeResolver: Send + Sync {
    fn knows_topic(&self, topic: &str) -> bool;

    /// `None` for a known topic means the field does not exist.
    fn field_type(&self, topic: &str, path: &str) -> Option<FieldType>;
}

/// Table-backed [`FieldTypeResolver`], keyed by topic name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicTable {
    topics: BTreeMap<String, TopicSchema>,
}

impl TopicTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, topic: impl Into<String>, schema: TopicSchema) {
        self.topics.insert(topic.into(), schema);
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

impl FieldTypeResolver for TopicTable {
    fn knows_topic(&self, topic: &str) -> bool {
        self.topics.contains_key(topic)
    }

    fn field_type(&self, topic: &str, path: &str) -> Option<FieldType> {
        self.topics.get(topic)?.field(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_field_types() {
        assert_eq!("float".parse::<FieldType>(), Ok(FieldType::Base(BaseType::Float)));
        assert_eq!("int[]".parse::<FieldType>(), Ok(FieldType::Array(BaseType::Int)));
        assert!("double".parse::<FieldType>().is_err());
        assert_eq!(FieldType::Array(BaseType::String).to_string(), "string[]");
    }

    #[test]
    fn nested_paths_are_messages() {
        let schema = TopicSchema::new()
            .with_field("linear.x", FieldType::Base(BaseType::Float))
            .with_field("linearity", FieldType::Base(BaseType::Int));
        assert_eq!(
            schema.field("linear"),
            Some(FieldType::Base(BaseType::Message))
        );
        assert_eq!(
            schema.field("linear.x"),
            Some(FieldType::Base(BaseType::Float))
        );
        assert_eq!(schema.field("linear.y"), None);
        assert_eq!(schema.field("angular"), None);
    }

    #[test]
    fn table_resolves_by_topic() {
        let mut table = TopicTable::new();
        table.insert(
            "/scan",
            TopicSchema::new().with_field("ranges", FieldType::Array(BaseType::Float)),
        );
        assert!(table.knows_topic("/scan"));
        assert!(!table.knows_topic("/odom"));
        assert_eq!(
            table.field_type("/scan", "ranges"),
            Some(FieldType::Array(BaseType::Float))
        );
        assert_eq!(table.field_type("/odom", "ranges"), None);
    }
}
