use super::CommandHandlerMiddleware;
use crate::command_handler::CommandHandler;
use crate::error::AppError;
use async_trait::async_trait;
use eventide_domain::command::Command;
use eventide_domain::context::Context;
use eventide_domain::error::DomainResult;
use std::fmt;
use std::sync::Arc;

type ValidateFn = Box<dyn Fn() -> DomainResult<()> + Send + Sync>;

/// 附带校验函数的命令
///
/// 标识与类型委托给被包装的命令，`downcast_ref` 可穿透还原出原命令。
pub struct CommandWithValidation {
    command: Box<dyn Command>,
    validate: ValidateFn,
}

impl CommandWithValidation {
    pub fn new<C, F>(command: C, validate: F) -> Self
    where
        C: Command,
        F: Fn() -> DomainResult<()> + Send + Sync + 'static,
    {
        Self::from_boxed(Box::new(command), validate)
    }

    pub fn from_boxed<F>(command: Box<dyn Command>, validate: F) -> Self
    where
        F: Fn() -> DomainResult<()> + Send + Sync + 'static,
    {
        Self {
            command,
            validate: Box::new(validate),
        }
    }

    /// 丢弃校验函数，取回被包装的命令
    pub fn into_inner(self) -> Box<dyn Command> {
        self.command
    }
}

impl fmt::Debug for CommandWithValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandWithValidation")
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

impl Command for CommandWithValidation {
    fn aggregate_id(&self) -> &str {
        self.command.aggregate_id()
    }

    fn command_type(&self) -> &str {
        self.command.command_type()
    }

    fn creates_aggregate(&self) -> bool {
        self.command.creates_aggregate()
    }

    fn validate(&self) -> Option<DomainResult<()>> {
        Some((self.validate)())
    }

    fn inner(&self) -> Option<&dyn Command> {
        Some(&*self.command)
    }
}

/// 校验中间件：执行命令携带的校验，失败时短路返回，成功或未携带校验时原样转发
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidatorMiddleware;

impl ValidatorMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl CommandHandlerMiddleware for ValidatorMiddleware {
    fn wrap(&self, next: Arc<dyn CommandHandler>) -> Arc<dyn CommandHandler> {
        Arc::new(ValidatingHandler { next })
    }
}

struct ValidatingHandler {
    next: Arc<dyn CommandHandler>,
}

#[async_trait]
impl CommandHandler for ValidatingHandler {
    async fn handle(&self, ctx: &Context, command: Box<dyn Command>) -> Result<(), AppError> {
        if let Some(result) = command.validate() {
            result?;
        }
        self.next.handle(ctx, command).await
    }
}
