//! 类型擦除后的向下转型支持
//!
//! 聚合、事件载荷与命令都以 trait object 形式流转，
//! 需要还原为具体类型时通过 `AsAny` 取得 `&dyn Any`。
//!
use std::any::Any;

pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
