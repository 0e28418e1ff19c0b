use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("invalid condition JSON stored for rule {rule_id}: {source}")]
    MalformedCondition {
        rule_id: i64,
        #[source]
        source: serde_json::Error,
    },
    #[error("rule {0} not found")]
    RuleNotFound(i64),
    #[error("rule version {version} not found for rule {rule_id}")]
    VersionNotFound { rule_id: i64, version: i32 },
    #[error("a rule named '{0}' already exists")]
    DuplicateName(String),
    #[error("field '{0}' is required")]
    MissingField(&'static str),
    #[error("invalid condition tree: {0}")]
    InvalidCondition(#[from] conditions::ConditionError),
}
