//! 日志工具模块
//!
//! 提供 tracing 订阅器初始化和日志格式化的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::model::EvaluationResult;

/// 初始化日志订阅器
///
/// 默认级别 info，可用 RUST_LOG 环境变量覆盖。
/// 重复调用是无操作（测试中各用例都会调用）。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 OOPS! 本体缺陷评估器启动");
    info!("🌐 服务端点: {}", config.oops_endpoint);
    info!("⏱️ 请求超时: {} 秒", config.request_timeout_secs);
    info!("{}", "=".repeat(60));
}

/// 打印评估结果统计
pub fn log_result_summary(result: &EvaluationResult) {
    let (minor, important, critical) = result.count_by_importance();

    info!("\n{}", "=".repeat(60));
    info!("📊 评估结果统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📄 受影响实体: {} 个", result.entity_count());
    info!("✅ 轻微: {}", minor);
    info!("⚠️ 重要: {}", important);
    info!("❌ 严重: {}", critical);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
