//! 服务层（Services Layer）
//!
//! 描述"我能做什么"的能力模块，目前只有一项：
//! 监听器的注册、移除与事件分发。

pub mod listener_registry;

pub use listener_registry::{EvaluationEvent, EvaluationListener, ListenerRegistry};
