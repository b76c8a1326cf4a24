//! 错误类型定义
//!
//! 按来源划分为三层：评估器顶层错误、传输层错误、响应解析错误。
//! 传输失败与解析失败是两类不同的错误，不能混用。

use thiserror::Error;

/// 评估器错误类型
#[derive(Debug, Error)]
pub enum EvalError {
    /// 文档序列化失败（无法转换为 RDF/XML 线上格式）
    #[error("文档序列化失败: {reason}")]
    Serialization { reason: String },

    /// 传输层错误（网络、超时、非 200 状态码）
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// 响应解析错误（服务返回 200 但响应体无法解析）
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// 评估队列已满，请求被拒绝
    #[error("评估器繁忙: 队列已满 (排队中 {pending} 个请求)")]
    Busy { pending: usize },

    /// 评估周期在完成前被调用方取消
    #[error("评估周期已取消")]
    Cancelled,
}

/// 传输层错误
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP 客户端初始化失败
    #[error("HTTP 客户端初始化失败: {source}")]
    ClientInit {
        #[source]
        source: reqwest::Error,
    },

    /// 网络请求失败
    #[error("OOPS! 服务请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 服务返回非 200 状态码
    #[error("OOPS! 服务返回错误状态码: {status}")]
    BadStatus { status: u16 },

    /// 请求超时
    #[error("OOPS! 服务请求超时 (超过 {timeout_secs} 秒)")]
    Timeout { timeout_secs: u64 },

    /// 读取响应体失败
    #[error("读取响应体失败: {source}")]
    BodyRead {
        #[source]
        source: reqwest::Error,
    },
}

/// 响应解析错误
#[derive(Debug, Error)]
pub enum ParseError {
    /// 缺陷条目缺少必需元素
    #[error("缺陷条目 {code} 缺少 <{element}> 元素")]
    MissingElement { code: String, element: String },

    /// 无法识别的严重程度
    #[error("无法识别的严重程度: '{value}'")]
    UnknownImportance { value: String },
}

// ========== 便捷构造函数 ==========

impl EvalError {
    /// 创建序列化错误
    pub fn serialization(reason: impl Into<String>) -> Self {
        EvalError::Serialization {
            reason: reason.into(),
        }
    }

    /// 是否为取消错误
    pub fn is_cancelled(&self) -> bool {
        matches!(self, EvalError::Cancelled)
    }

    /// 是否为繁忙错误
    pub fn is_busy(&self) -> bool {
        matches!(self, EvalError::Busy { .. })
    }
}

impl TransportError {
    /// 根据 reqwest 错误分类：超时单独归类，其余归为请求失败
    pub fn from_request_error(endpoint: &str, timeout_secs: u64, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            TransportError::Timeout { timeout_secs }
        } else {
            TransportError::RequestFailed {
                endpoint: endpoint.to_string(),
                source,
            }
        }
    }
}

// ========== Result 类型别名 ==========

/// 评估器结果类型
pub type EvalResult<T> = std::result::Result<T, EvalError>;
