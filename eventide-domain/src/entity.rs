//! 读模型实体（Entity）
//!
//! 投影维护的读模型只需暴露标识与（可选的）版本；
//! 报告版本的实体会参与投影时的最终一致性等待。
//!
use std::fmt::Debug;

pub trait Entity: Debug + Send + Sync {
    fn id(&self) -> &str;

    /// 已投影到实体上的事件数，与聚合版本同义
    ///
    /// 投影版本为 N 的事件后应把版本置为 `N + 1`；零值实体为 0。
    /// `None` 表示该实体不跟踪版本，投影时不做一致性等待。
    fn version(&self) -> Option<usize> {
        None
    }
}
