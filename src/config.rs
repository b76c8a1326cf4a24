use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 程序配置
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OOPS! Web 服务端点
    pub oops_endpoint: String,
    /// 单次请求的读取超时（秒）
    pub request_timeout_secs: u64,
    /// 评估队列最大排队数量（超出后 evaluate 返回 Busy）
    pub max_pending_evaluations: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            oops_endpoint: "http://oops-ws.oeg-upm.net/rest".to_string(),
            request_timeout_secs: 30,
            max_pending_evaluations: 8,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            oops_endpoint: std::env::var("OOPS_ENDPOINT").unwrap_or(default.oops_endpoint),
            request_timeout_secs: std::env::var("OOPS_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            max_pending_evaluations: std::env::var("OOPS_MAX_PENDING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_pending_evaluations),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 从 TOML 文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", path.display()))?;

        Ok(config)
    }
}
