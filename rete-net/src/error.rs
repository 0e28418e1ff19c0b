use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("duplicate rule id {0} in compile input")]
    DuplicateRuleId(i64),
}
