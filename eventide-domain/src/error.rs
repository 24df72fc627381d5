//! 领域层统一错误定义
//!
//! 覆盖类型注册、事件重放、命令处理、读模型投影与协作方（事件存储/总线/仓储）故障，
//! 便于各实现层统一转换为 `DomainError`。
//!
//! 注册表的误用（空类型名、重复注册）属于编程错误，直接 panic，不在此列。
//!
use crate::domain_event::Event;
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 类型注册 ---
    #[error("{kind} type not registered: {type_name}")]
    TypeNotRegistered {
        kind: &'static str,
        type_name: String,
    },

    // --- 事件重放/提交 ---
    #[error("mismatched event type: expected={expected}, found={found}, event={event}")]
    MismatchedEventType {
        expected: String,
        found: String,
        event: String,
    },
    #[error("event out of order: aggregate_id={aggregate_id}, expected>={expected}, found={found}")]
    EventOutOfOrder {
        aggregate_id: String,
        expected: usize,
        found: usize,
    },
    #[error("could not apply event {event}: {source}")]
    ApplyEvent {
        event: Box<Event>,
        #[source]
        source: Box<DomainError>,
    },

    // --- 存在性 ---
    #[error("aggregate not found: type={aggregate_type}, id={aggregate_id}")]
    AggregateNotFound {
        aggregate_type: String,
        aggregate_id: String,
    },
    #[error("entity not found: {id}")]
    EntityNotFound { id: String },

    // --- 一致性 ---
    #[error("version conflict: expected={expected}, actual={actual}")]
    VersionConflict { expected: usize, actual: usize },
    #[error("consistency timeout: id={id}, required version={required}, actual={actual:?}")]
    ConsistencyTimeout {
        id: String,
        required: usize,
        actual: Option<usize>,
    },

    // --- 取消/超时 ---
    #[error("operation cancelled")]
    Cancelled,
    #[error("deadline exceeded")]
    DeadlineExceeded,

    // --- 协作方故障 ---
    #[error("event store error: {reason}")]
    EventStore { reason: String },
    #[error("event bus error: {reason}")]
    EventBus { reason: String },
    #[error("repository error: {reason}")]
    Repository { reason: String },

    // --- 领域规则/命令与状态 ---
    #[error("invalid command: {reason}")]
    InvalidCommand { reason: String },
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },
    #[error("invalid value: {reason}")]
    InvalidValue { reason: String },
    #[error("validation failed: {reason}")]
    Validation { reason: String },
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn event_store(reason: impl Into<String>) -> Self {
        DomainError::EventStore {
            reason: reason.into(),
        }
    }

    pub fn event_bus(reason: impl Into<String>) -> Self {
        DomainError::EventBus {
            reason: reason.into(),
        }
    }

    pub fn repository(reason: impl Into<String>) -> Self {
        DomainError::Repository {
            reason: reason.into(),
        }
    }

    pub fn invalid_command(reason: impl Into<String>) -> Self {
        DomainError::InvalidCommand {
            reason: reason.into(),
        }
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        DomainError::Validation {
            reason: reason.into(),
        }
    }

    /// 是否为取消或截止时间到达
    pub fn is_cancellation(&self) -> bool {
        matches!(self, DomainError::Cancelled | DomainError::DeadlineExceeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_event::Event;
    use chrono::Utc;

    #[test]
    fn apply_event_error_keeps_event_and_cause() {
        let event = Event::for_aggregate("counter.added", None, Utc::now(), "counter", "c-1", 2);
        let err = DomainError::ApplyEvent {
            event: Box::new(event),
            source: Box::new(DomainError::InvalidState {
                reason: "boom".into(),
            }),
        };

        assert_eq!(
            err.to_string(),
            "could not apply event counter.added@2: invalid state: boom"
        );
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("invalid state: boom"));
    }

    #[test]
    fn cancellation_kinds() {
        assert!(DomainError::Cancelled.is_cancellation());
        assert!(DomainError::DeadlineExceeded.is_cancellation());
        assert!(!DomainError::event_store("x").is_cancellation());
    }
}
