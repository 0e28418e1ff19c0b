use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("action '{0}' failed: {1}")]
    Failed(String, String),
}
