//! 领域事件（Domain Event）
//!
//! 定义不可变的事件值 `Event`、类型擦除的事件载荷 `EventData`，
//! 以及随事件一同记录的业务上下文 `BusinessContext`。

mod business_context;
mod event;

pub use business_context::BusinessContext;
pub use event::{Event, EventData};
