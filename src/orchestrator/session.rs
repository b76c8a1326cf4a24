//! 评估会话实体
//!
//! 把"一次评估请求"显式建模：目标文档的序列化快照、
//! 请求时间戳、周期状态。快照在 evaluate 调用时生成，
//! 之后宿主再怎么改动文档都不影响已提交的请求。

use chrono::{DateTime, Local};

/// 单个评估周期的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStatus {
    /// 已入队，等待前一个周期完成
    Pending,
    /// 正在执行（已通知 started，后台任务运行中）
    Running,
    /// 成功完成
    Succeeded,
    /// 失败（传输错误、解析错误或被取消）
    Failed,
}

impl std::fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CycleStatus::Pending => "pending",
            CycleStatus::Running => "running",
            CycleStatus::Succeeded => "succeeded",
            CycleStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// 一次评估请求（目标文档的序列化快照）
#[derive(Debug)]
pub struct EvaluationRequest {
    label: String,
    payload: String,
    requested_at: DateTime<Local>,
}

impl EvaluationRequest {
    /// 创建新的评估请求
    pub fn new(label: impl Into<String>, payload: String) -> Self {
        Self {
            label: label.into(),
            payload,
            requested_at: Local::now(),
        }
    }

    /// 目标文档标识
    pub fn label(&self) -> &str {
        &self.label
    }

    /// 序列化快照（RDF/XML）
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// 请求时间
    pub fn requested_at(&self) -> DateTime<Local> {
        self.requested_at
    }
}

/// 会话只读快照（状态查询用）
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// 目标文档标识
    pub label: String,
    /// 请求时间
    pub requested_at: DateTime<Local>,
    /// 周期状态
    pub status: CycleStatus,
}

impl SessionSnapshot {
    pub(crate) fn from_request(request: &EvaluationRequest, status: CycleStatus) -> Self {
        Self {
            label: request.label().to_string(),
            requested_at: request.requested_at(),
            status,
        }
    }
}
