//! 类型注册表（TypeRegistry）
//!
//! 按类型名登记工厂函数，用于在重放或反序列化时多态地重建对象：
//! - `AggregateRegistry`：聚合类型名 → `Fn(id) -> Box<dyn Aggregate>`；
//! - `EventDataRegistry`：事件类型名 → `Fn() -> Box<dyn EventData>`。
//!
//! 注册表是显式对象（通常包在 `Arc` 中注入聚合存储），启动时填充，运行期可并发读取。
//! 空类型名与重复注册属于编程错误，直接 panic。
//!
use crate::aggregate::Aggregate;
use crate::domain_event::EventData;
use crate::error::{DomainError, DomainResult};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::fmt;
use std::sync::Arc;

/// 聚合工厂：以聚合 ID 创建处于版本 0 的新聚合
pub type AggregateFactory = dyn Fn(&str) -> Box<dyn Aggregate> + Send + Sync;

/// 事件载荷工厂：创建空白载荷
pub type EventDataFactory = dyn Fn() -> Box<dyn EventData> + Send + Sync;

pub type AggregateRegistry = TypeRegistry<AggregateFactory>;
pub type EventDataRegistry = TypeRegistry<EventDataFactory>;

/// 类型名 → 工厂 的并发安全映射
pub struct TypeRegistry<F: ?Sized> {
    kind: &'static str,
    factories: DashMap<String, Arc<F>>,
}

impl<F: ?Sized> TypeRegistry<F> {
    fn with_kind(kind: &'static str) -> Self {
        Self {
            kind,
            factories: DashMap::new(),
        }
    }

    /// 注册表登记的对象种类（"aggregate" / "event data"）
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    fn insert(&self, type_name: String, factory: Arc<F>) {
        if type_name.is_empty() {
            panic!("attempt to register empty {} type", self.kind);
        }

        match self.factories.entry(type_name) {
            Entry::Occupied(entry) => {
                panic!(
                    "duplicate registration for {} type \"{}\"",
                    self.kind,
                    entry.key()
                );
            }
            Entry::Vacant(entry) => {
                entry.insert(factory);
            }
        }
    }

    /// 注销一个类型
    pub fn unregister(&self, type_name: &str) {
        if type_name.is_empty() {
            panic!("attempt to unregister empty {} type", self.kind);
        }

        if self.factories.remove(type_name).is_none() {
            panic!(
                "unregister of non-registered {} type \"{}\"",
                self.kind, type_name
            );
        }
    }

    pub fn is_registered(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// 已注册的类型名（升序）
    pub fn registered_types(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    // 取出工厂后立即释放分片锁，调用工厂时不持有锁
    fn factory(&self, type_name: &str) -> DomainResult<Arc<F>> {
        self.factories
            .get(type_name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| DomainError::TypeNotRegistered {
                kind: self.kind,
                type_name: type_name.to_string(),
            })
    }
}

impl<F: ?Sized> fmt::Debug for TypeRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("kind", &self.kind)
            .field("types", &self.registered_types())
            .finish()
    }
}

impl TypeRegistry<AggregateFactory> {
    pub fn new() -> Self {
        Self::with_kind("aggregate")
    }

    /// 注册聚合类型
    ///
    /// # Panics
    /// 类型名为空或已被注册时 panic。
    pub fn register<F>(&self, aggregate_type: impl Into<String>, factory: F)
    where
        F: Fn(&str) -> Box<dyn Aggregate> + Send + Sync + 'static,
    {
        self.insert(aggregate_type.into(), Arc::new(factory));
    }

    /// 创建指定类型、指定 ID 的新聚合
    pub fn create(&self, aggregate_type: &str, id: &str) -> DomainResult<Box<dyn Aggregate>> {
        let factory = self.factory(aggregate_type)?;
        Ok(factory(id))
    }
}

impl Default for TypeRegistry<AggregateFactory> {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry<EventDataFactory> {
    pub fn new() -> Self {
        Self::with_kind("event data")
    }

    /// 注册事件载荷类型
    ///
    /// # Panics
    /// 类型名为空或已被注册时 panic。
    pub fn register<F>(&self, event_type: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn EventData> + Send + Sync + 'static,
    {
        self.insert(event_type.into(), Arc::new(factory));
    }

    /// 以 `T::default()` 作为工厂注册
    pub fn register_default<T>(&self, event_type: impl Into<String>)
    where
        T: EventData + Default,
    {
        self.register(event_type, || Box::new(T::default()) as Box<dyn EventData>);
    }

    /// 创建指定事件类型的空白载荷
    pub fn create(&self, event_type: &str) -> DomainResult<Box<dyn EventData>> {
        let factory = self.factory(event_type)?;
        Ok(factory())
    }
}

impl Default for TypeRegistry<EventDataFactory> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{Aggregate, AggregateBase};
    use crate::command::Command;
    use crate::context::Context;
    use crate::domain_event::Event;

    #[derive(Debug)]
    struct Probe {
        base: AggregateBase,
    }

    impl Aggregate for Probe {
        fn base(&self) -> &AggregateBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut AggregateBase {
            &mut self.base
        }

        fn handle_command(&mut self, _ctx: &Context, _command: &dyn Command) -> DomainResult<()> {
            Ok(())
        }

        fn apply_event(&mut self, _ctx: &Context, _event: &Event) -> DomainResult<()> {
            Ok(())
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct Opened {
        owner: String,
    }

    fn probe_registry() -> AggregateRegistry {
        let registry = AggregateRegistry::new();
        registry.register("probe", |id| {
            Box::new(Probe {
                base: AggregateBase::new("probe", id),
            })
        });
        registry
    }

    #[test]
    fn create_registered_aggregate() {
        let registry = probe_registry();
        let id = ulid::Ulid::new().to_string();

        let aggregate = registry.create("probe", &id).unwrap();
        assert_eq!(aggregate.aggregate_type(), "probe");
        assert_eq!(aggregate.id(), id);
        assert_eq!(aggregate.version(), 0);
        assert!(aggregate.downcast_ref::<Probe>().is_some());
        assert!(registry.is_registered("probe"));
    }

    #[test]
    fn create_unregistered_aggregate() {
        let registry = AggregateRegistry::new();
        let err = registry.create("missing", "a-1").err().unwrap();
        assert!(matches!(
            err,
            DomainError::TypeNotRegistered { kind: "aggregate", ref type_name } if type_name == "missing"
        ));
        assert_eq!(err.to_string(), "aggregate type not registered: missing");
    }

    #[test]
    #[should_panic(expected = "attempt to register empty aggregate type")]
    fn register_empty_aggregate_type() {
        let registry = AggregateRegistry::new();
        registry.register("", |id| {
            Box::new(Probe {
                base: AggregateBase::new("", id),
            })
        });
    }

    #[test]
    #[should_panic(expected = "duplicate registration for aggregate type \"probe\"")]
    fn register_twice() {
        let registry = probe_registry();
        registry.register("probe", |id| {
            Box::new(Probe {
                base: AggregateBase::new("probe", id),
            })
        });
    }

    #[test]
    fn unregister_then_create_fails() {
        let registry = probe_registry();
        registry.unregister("probe");
        assert!(!registry.is_registered("probe"));
        assert!(registry.create("probe", "a-1").is_err());
    }

    #[test]
    #[should_panic(expected = "unregister of non-registered event data type \"Opened\"")]
    fn unregister_unknown_type() {
        EventDataRegistry::new().unregister("Opened");
    }

    #[test]
    #[should_panic(expected = "attempt to unregister empty event data type")]
    fn unregister_empty_type() {
        EventDataRegistry::new().unregister("");
    }

    #[test]
    fn event_data_registry_creates_fresh_payloads() {
        let registry = EventDataRegistry::new();
        registry.register_default::<Opened>("Opened");
        registry.register("Closed", || Box::new(String::from("closed")) as Box<dyn EventData>);

        let data = registry.create("Opened").unwrap();
        assert_eq!(
            (*data).as_any().downcast_ref::<Opened>(),
            Some(&Opened::default())
        );
        assert_eq!(registry.registered_types(), vec!["Closed", "Opened"]);

        let err = registry.create("Renamed").err().unwrap();
        assert_eq!(err.to_string(), "event data type not registered: Renamed");
    }

    #[test]
    fn concurrent_create_while_registering() {
        let registry = Arc::new(EventDataRegistry::new());
        registry.register_default::<Opened>("Opened");

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        assert!(registry.create("Opened").is_ok());
                    }
                })
            })
            .collect();

        for i in 0..50 {
            registry.register_default::<Opened>(format!("Opened.v{i}"));
        }
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(registry.registered_types().len(), 51);
    }
}
