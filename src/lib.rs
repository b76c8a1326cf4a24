//! # OOPS! 本体缺陷评估器
//!
//! 把可变的本体文档提交给远程 OOPS! 缺陷检测服务
//! (oops.linkeddata.es)，在后台完成评估，并把生命周期事件
//! 分发给所有注册的监听器。宿主应用（编辑器）在评估期间保持响应。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 模型层（Model）
//! - `model/` - 不可变的领域值对象
//! - `Pitfall` / `EvaluationResult` - 缺陷记录与评估结果
//! - `OntologyDocument` - 文档协作方接口（只暴露序列化能力）
//!
//! ### ② 客户端层（Clients）
//! - `clients/` - 与外部服务的全部交互
//! - `OopsClient` - 请求信封、POST、超时、状态码检查
//! - `response_parser` - RDF/XML 响应解析
//!
//! ### ③ 服务层（Services）
//! - `services/` - 描述"我能做什么"的能力模块
//! - `ListenerRegistry` - 监听器注册与快照式事件分发
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 评估周期的调度与状态管理
//! - `Evaluator` - 单飞保证、FIFO 排队、结果缓存、取消句柄
//! - `session` - 显式的评估会话实体
//!
//! ## 生命周期
//!
//! ```text
//! evaluate(文档)
//!     ↓ 序列化快照（失败同步返回）
//! started 通知（注册顺序，同步）
//!     ↓ 后台任务
//! OopsTransport::submit（唯一阻塞点，受超时约束）
//!     ↓
//! done(结果) / failed(错误) 通知
//!     ↓ 队列非空时
//! 下一个周期的 started ...
//! ```

pub mod clients;
pub mod config;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use clients::{OopsClient, OopsTransport};
pub use config::Config;
pub use error::{EvalError, EvalResult, ParseError, TransportError};
pub use model::{
    EvaluationResult, OntologyDocument, Pitfall, PitfallImportanceLevel, RdfXmlDocument,
};
pub use orchestrator::{CycleStatus, Evaluator, SessionSnapshot};
pub use services::{EvaluationEvent, EvaluationListener, ListenerRegistry};
