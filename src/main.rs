//! 命令行入口
//!
//! 扮演宿主应用的角色：加载一个 RDF/XML 本体文件，
//! 发起一次评估，等待终止事件，打印统计和 JSON 格式的结果。

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc;
use tracing::{info, warn};

use oops_evaluator::utils::logging;
use oops_evaluator::{
    Config, EvaluationEvent, EvaluationListener, Evaluator, OopsClient, RdfXmlDocument,
};

/// 控制台监听器：把生命周期事件写进日志
struct ConsoleListener;

impl EvaluationListener for ConsoleListener {
    fn on_event(&self, event: &EvaluationEvent) -> anyhow::Result<()> {
        match event {
            EvaluationEvent::Started => info!("🔍 评估进行中，界面应当禁用交互..."),
            EvaluationEvent::Done(result) => {
                info!("✓ 收到评估结果: {} 个实体存在缺陷", result.entity_count());
            }
            EvaluationEvent::Failed(e) => warn!("⚠️ 收到失败通知: {}", e),
        }
        Ok(())
    }
}

/// 完成监听器：把终止事件转发给 main 等待
struct CompletionListener {
    tx: mpsc::UnboundedSender<EvaluationEvent>,
}

impl EvaluationListener for CompletionListener {
    fn on_event(&self, event: &EvaluationEvent) -> anyhow::Result<()> {
        if event.is_terminal() {
            self.tx.send(event.clone())?;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let Some(ontology_path) = args.next() else {
        bail!("用法: oops_evaluator <本体文件.owl> [配置文件.toml]");
    };
    let config = match args.next() {
        Some(config_path) => Config::from_file(Path::new(&config_path))?,
        None => Config::from_env(),
    };

    logging::log_startup(&config);

    // 加载本体文件（内容已经是 RDF/XML 线上格式）
    let content = std::fs::read_to_string(&ontology_path)
        .with_context(|| format!("无法读取本体文件: {}", ontology_path))?;
    let label = Path::new(&ontology_path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| ontology_path.clone());
    let document = RdfXmlDocument::new(label, content);

    // 构造传输客户端和编排器
    let client = Arc::new(OopsClient::new(&config)?);
    let evaluator = Evaluator::new(client, &config);

    evaluator.add_listener(Arc::new(ConsoleListener));
    let (tx, mut rx) = mpsc::unbounded_channel();
    evaluator.add_listener(Arc::new(CompletionListener { tx }));

    // 发起评估并等待终止事件
    evaluator.evaluate(&document)?;

    let Some(event) = rx.recv().await else {
        bail!("评估器在产生终止事件前退出");
    };

    match event {
        EvaluationEvent::Done(result) => {
            logging::log_result_summary(&result);
            println!("{}", serde_json::to_string_pretty(&*result)?);
            Ok(())
        }
        EvaluationEvent::Failed(e) => bail!("评估失败: {}", e),
        EvaluationEvent::Started => bail!("收到预期之外的 started 事件"),
    }
}
