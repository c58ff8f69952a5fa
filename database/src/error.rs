use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Query execution error: {0}")]
    Query(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Record not found: {kind}/{id}")]
    RecordNotFound { kind: String, id: String },

    #[error("Unknown record kind: {0}")]
    UnknownKind(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Retry exhausted: {0}")]
    RetryExhausted(String),

    #[error("UUID parsing error: {0}")]
    UuidParsing(#[from] uuid::Error),
}

impl DatabaseError {
    /// Short stable name used when a failure is kept for later export.
    pub fn error_type(&self) -> &'static str {
        match self {
            DatabaseError::Connection(_) => "connection",
            DatabaseError::Query(_) => "query",
            DatabaseError::Serialization(_) => "serialization",
            DatabaseError::Transaction(_) => "transaction",
            DatabaseError::RecordNotFound { .. } => "record_not_found",
            DatabaseError::UnknownKind(_) => "unknown_kind",
            DatabaseError::Unavailable(_) => "unavailable",
            DatabaseError::RetryExhausted(_) => "retry_exhausted",
            DatabaseError::UuidParsing(_) => "uuid_parsing",
        }
    }
}
