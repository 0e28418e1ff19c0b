use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleModelError {
    #[error("rule version {requested} not found for rule {rule_id}")]
    VersionNotFound { rule_id: i64, requested: i32 },
}
