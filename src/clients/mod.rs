//! 客户端层（Clients Layer）
//!
//! 与外部 OOPS! 评估服务的全部交互：传输客户端与响应解析。

pub mod oops_client;
pub mod response_parser;

pub use oops_client::{OopsClient, OopsTransport};
