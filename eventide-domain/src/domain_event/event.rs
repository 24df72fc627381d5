use super::business_context::BusinessContext;
use crate::as_any::AsAny;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// 事件载荷：任意 `'static + Debug + Send + Sync` 类型，按类型名在注册表中登记
pub trait EventData: AsAny + fmt::Debug + Send + Sync + 'static {}

impl<T> EventData for T where T: AsAny + fmt::Debug + Send + Sync + 'static {}

/// 不可变事件值
///
/// 由聚合在处理命令时创建，追加到未提交列表后不再修改。
/// `version` 从 0 开始计数，字符串形式为 `"<type>@<version>"`。
#[derive(Debug, Clone)]
pub struct Event {
    event_type: String,
    data: Option<Arc<dyn EventData>>,
    timestamp: DateTime<Utc>,
    aggregate_type: String,
    aggregate_id: String,
    version: usize,
    metadata: BusinessContext,
}

impl Event {
    /// 创建不归属任何聚合的事件（版本为 0）
    pub fn new(
        event_type: impl Into<String>,
        data: Option<Arc<dyn EventData>>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            data,
            timestamp,
            aggregate_type: String::new(),
            aggregate_id: String::new(),
            version: 0,
            metadata: BusinessContext::default(),
        }
    }

    /// 创建归属于某个聚合的事件
    pub fn for_aggregate(
        event_type: impl Into<String>,
        data: Option<Arc<dyn EventData>>,
        timestamp: DateTime<Utc>,
        aggregate_type: impl Into<String>,
        aggregate_id: impl Into<String>,
        version: usize,
    ) -> Self {
        Self {
            aggregate_type: aggregate_type.into(),
            aggregate_id: aggregate_id.into(),
            version,
            ..Self::new(event_type, data, timestamp)
        }
    }

    /// 附加业务上下文（仅在事件交出之前调用）
    pub fn with_metadata(mut self, metadata: BusinessContext) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn data(&self) -> Option<&dyn EventData> {
        self.data.as_deref()
    }

    /// 将载荷还原为具体类型
    pub fn data_as<T: EventData>(&self) -> Option<&T> {
        self.data()?.as_any().downcast_ref::<T>()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn aggregate_id(&self) -> &str {
        &self.aggregate_id
    }

    pub fn version(&self) -> usize {
        self.version
    }

    pub fn metadata(&self) -> &BusinessContext {
        &self.metadata
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        let same_data = match (&self.data, &other.data) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };

        same_data
            && self.event_type == other.event_type
            && self.timestamp == other.timestamp
            && self.aggregate_type == other.aggregate_type
            && self.aggregate_id == other.aggregate_id
            && self.version == other.version
            && self.metadata == other.metadata
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.event_type, self.version)
    }
}
