//! 调用上下文（Context）
//!
//! 显式贯穿每一次命令处理、事件处理与仓储调用的参数对象，只携带白名单字段：
//! - 命名空间（`namespace`）：多租户场景下用于归属错误与数据；
//! - 截止时间（`deadline`）与取消令牌（`cancellation`）；
//! - 业务语境（`BusinessContext`）：关联/因果 ID 与执行主体，会被复制到新产生的事件上。
//!
//! 对协作方的调用统一经过 [`Context::run`]，在取消或超时时立即返回
//! `DomainError::Cancelled` / `DomainError::DeadlineExceeded`。
//!
use crate::domain_event::BusinessContext;
use crate::error::{DomainError, DomainResult};
use bon::Builder;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// 默认命名空间
pub const DEFAULT_NAMESPACE: &str = "default";

#[derive(Builder, Debug, Clone)]
pub struct Context {
    #[builder(into, default = DEFAULT_NAMESPACE.to_string())]
    namespace: String,
    deadline: Option<Instant>,
    #[builder(default)]
    cancellation: CancellationToken,
    #[builder(default)]
    business: BusinessContext,
}

impl Default for Context {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Context {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn business(&self) -> &BusinessContext {
        &self.business
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// 派生一个带新命名空间的上下文，共享同一个取消令牌
    pub fn with_namespace(&self, namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..self.clone()
        }
    }

    /// 派生一个带截止时间的上下文（取更早者）
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(existing) if existing < candidate => existing,
            _ => candidate,
        };
        Self {
            deadline: Some(deadline),
            ..self.clone()
        }
    }

    /// 检查当前是否已被取消或超过截止时间
    pub fn check(&self) -> DomainResult<()> {
        if self.is_cancelled() {
            return Err(DomainError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(DomainError::DeadlineExceeded);
            }
        }
        Ok(())
    }

    /// 在取消/截止时间约束下执行一次协作方调用
    pub async fn run<F, T>(&self, fut: F) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        self.check()?;

        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = self.cancellation.cancelled() => Err(DomainError::Cancelled),
                    _ = tokio::time::sleep_until(deadline) => Err(DomainError::DeadlineExceeded),
                    out = fut => out,
                }
            }
            None => {
                tokio::select! {
                    biased;
                    _ = self.cancellation.cancelled() => Err(DomainError::Cancelled),
                    out = fut => out,
                }
            }
        }
    }

    /// 可取消的等待，用于轮询间隔
    pub async fn sleep(&self, duration: Duration) -> DomainResult<()> {
        self.run(async {
            tokio::time::sleep(duration).await;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_context() {
        let ctx = Context::default();
        assert_eq!(ctx.namespace(), DEFAULT_NAMESPACE);
        assert!(ctx.deadline().is_none());
        assert!(!ctx.is_cancelled());
        assert!(ctx.business().correlation_id().is_none());
    }

    #[test]
    fn derived_context_shares_cancellation() {
        let ctx = Context::builder().namespace("tenant-a").build();
        let child = ctx.with_namespace("tenant-b");
        assert_eq!(ctx.namespace(), "tenant-a");
        assert_eq!(child.namespace(), "tenant-b");

        ctx.cancellation().cancel();
        assert!(child.is_cancelled());
        assert!(matches!(child.check(), Err(DomainError::Cancelled)));
    }

    #[tokio::test]
    async fn run_returns_inner_result() {
        let ctx = Context::default();
        let out = ctx.run(async { Ok::<_, DomainError>(7) }).await.unwrap();
        assert_eq!(out, 7);
    }

    #[tokio::test]
    async fn run_aborts_on_cancel() {
        let ctx = Context::default();
        let token = ctx.cancellation().clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let err = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, DomainError>(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn run_aborts_on_deadline() {
        let ctx = Context::default().with_timeout(Duration::from_millis(50));
        let err = ctx.sleep(Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, DomainError::DeadlineExceeded));
    }
}
