use thiserror::Error;

#[derive(Error, Debug)]
pub enum OboError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {message}")]
    Parse { message: String, line: Option<usize>, col: Option<usize> },
    #[error("Missing id in {stanza} stanza")]
    MissingId { stanza: String },
    #[error("Malformed identifier '{value}', expected {expected}")]
    MalformedId { value: String, expected: String },
    #[error("Malformed relationship '{0}', expected a relation type, a space and a term id")]
    MalformedRelationship(String),
    #[error("Unknown namespace: {0}")]
    UnknownNamespace(String),
    #[error("In {stanza} stanza starting at line {line}: {source}")]
    Record {
        stanza: String,
        line: usize,
        #[source]
        source: Box<OboError>,
    },
    #[error("Ontology is sealed, facts cannot be added after closure")]
    Sealed,
}

pub type Result<T> = std::result::Result<T, OboError>;

// Helper conversions
impl From<config::ConfigError> for OboError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}

impl<R: pest::RuleType> From<pest::error::Error<R>> for OboError {
    fn from(e: pest::error::Error<R>) -> Self {
        let (line, col) = match e.line_col {
            pest::error::LineColLocation::Pos((l, c)) => (l, c),
            pest::error::LineColLocation::Span((l, c), _) => (l, c),
        };
        Self::Parse { message: e.variant.message().into_owned(), line: Some(line), col: Some(col) }
    }
}
