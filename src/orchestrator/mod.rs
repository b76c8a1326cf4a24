//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层是系统的"指挥中心"，负责评估周期的调度与状态管理。
//!
//! ### `evaluator` - 评估编排器
//! - 单飞保证（同时最多一个周期，FIFO 排队，队满拒绝）
//! - 生命周期事件分发（started → done/failed，顺序结构性保证）
//! - 结果缓存（失败不覆盖上次成功结果）
//! - 进行中周期的取消句柄
//!
//! ### `session` - 评估会话实体
//! - 请求快照（文档在 evaluate 时序列化，之后不再读取文档）
//! - 周期状态机：pending → running → succeeded/failed
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::Evaluator (调度周期、管理状态)
//!     ↓
//! services::ListenerRegistry (事件分发)
//!     ↓
//! clients::OopsTransport (网络调用)
//!     ↓
//! model (值对象)
//! ```

pub mod evaluator;
pub mod session;

// 重新导出主要类型
pub use evaluator::Evaluator;
pub use session::{CycleStatus, EvaluationRequest, SessionSnapshot};
