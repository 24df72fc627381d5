//! 命令处理中间件
//!
//! 中间件把一个命令处理器包装成另一个命令处理器（装饰器）。
//! 组合时第一个中间件位于最外层：`use_middleware(h, [A, B])` 的调用顺序为 A → B → h。
//!
mod logging;
mod validator;

pub use logging::LoggingMiddleware;
pub use validator::{CommandWithValidation, ValidatorMiddleware};

use crate::command_handler::CommandHandler;
use std::sync::Arc;

pub trait CommandHandlerMiddleware: Send + Sync {
    fn wrap(&self, next: Arc<dyn CommandHandler>) -> Arc<dyn CommandHandler>;
}

impl<F> CommandHandlerMiddleware for F
where
    F: Fn(Arc<dyn CommandHandler>) -> Arc<dyn CommandHandler> + Send + Sync,
{
    fn wrap(&self, next: Arc<dyn CommandHandler>) -> Arc<dyn CommandHandler> {
        self(next)
    }
}

/// 按顺序套用中间件，第一个位于最外层
pub fn use_middleware(
    handler: Arc<dyn CommandHandler>,
    middlewares: &[Arc<dyn CommandHandlerMiddleware>],
) -> Arc<dyn CommandHandler> {
    middlewares
        .iter()
        .rev()
        .fold(handler, |next, middleware| middleware.wrap(next))
}

/// 中间件链构建器
#[derive(Default, Clone)]
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn CommandHandlerMiddleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个中间件（位于已追加中间件的内层）
    pub fn with<M>(mut self, middleware: M) -> Self
    where
        M: CommandHandlerMiddleware + 'static,
    {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    pub fn build<H>(&self, handler: H) -> Arc<dyn CommandHandler>
    where
        H: CommandHandler + 'static,
    {
        use_middleware(Arc::new(handler), &self.middlewares)
    }
}
