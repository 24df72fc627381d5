use eventide_domain::error::DomainError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// 领域层错误，原样透出
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("handler not found: command={0}")]
    HandlerNotFound(String),

    #[error("handler already registered: command={0}")]
    HandlerAlreadyRegistered(String),

    #[error("infra: {0}")]
    Infra(String),
}

impl AppError {
    /// 若为领域错误，返回其引用
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            AppError::Domain(err) => Some(err),
            _ => None,
        }
    }
}
