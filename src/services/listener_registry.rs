//! 监听器注册与事件分发 - 业务能力层
//!
//! 只负责"维护监听器集合并按注册顺序分发事件"这一件事，
//! 不关心评估流程本身。

use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::error::EvalError;
use crate::model::EvaluationResult;

/// 评估生命周期事件
///
/// 一次评估周期严格产生一个 `Started`，随后恰好一个 `Done` 或 `Failed`。
#[derive(Debug, Clone)]
pub enum EvaluationEvent {
    /// 评估周期开始
    Started,
    /// 评估成功完成，携带本次结果
    Done(Arc<EvaluationResult>),
    /// 评估失败，携带失败原因
    Failed(Arc<EvalError>),
}

impl EvaluationEvent {
    /// 事件名称（用于日志显示）
    pub fn name(&self) -> &'static str {
        match self {
            EvaluationEvent::Started => "started",
            EvaluationEvent::Done(_) => "done",
            EvaluationEvent::Failed(_) => "failed",
        }
    }

    /// 是否为终止事件（Done 或 Failed）
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EvaluationEvent::Started)
    }
}

/// 评估事件监听器
///
/// 处理函数返回 Err 时只记录日志，不会中断分发，也不会传播给
/// 编排器的调用方。通知发生在后台工作任务的执行上下文中，
/// 监听器自行负责切换到自己的线程模型。
pub trait EvaluationListener: Send + Sync {
    /// 处理一个生命周期事件
    fn on_event(&self, event: &EvaluationEvent) -> anyhow::Result<()>;
}

/// 监听器注册表
///
/// - 重复注册是无操作（按指针身份判断）
/// - 移除未注册的监听器是无操作
/// - 分发顺序即注册顺序
/// - 分发前对集合做快照，分发过程中并发增删不会影响本轮
pub struct ListenerRegistry {
    listeners: Mutex<Vec<Arc<dyn EvaluationListener>>>,
}

impl ListenerRegistry {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// 注册监听器（重复注册无操作）
    pub fn add(&self, listener: Arc<dyn EvaluationListener>) {
        let mut listeners = self.listeners.lock().expect("监听器锁中毒");
        if !listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            listeners.push(listener);
        }
    }

    /// 移除监听器（未注册时无操作）
    pub fn remove(&self, listener: &Arc<dyn EvaluationListener>) {
        let mut listeners = self.listeners.lock().expect("监听器锁中毒");
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
    }

    /// 当前注册的监听器数量
    pub fn len(&self) -> usize {
        self.listeners.lock().expect("监听器锁中毒").len()
    }

    /// 是否没有任何监听器
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 按注册顺序把事件分发给所有监听器
    ///
    /// 单个监听器的错误被记录后跳过，不影响后续监听器。
    pub fn notify_all(&self, event: &EvaluationEvent) {
        let snapshot: Vec<Arc<dyn EvaluationListener>> = {
            let listeners = self.listeners.lock().expect("监听器锁中毒");
            listeners.clone()
        };

        for (index, listener) in snapshot.iter().enumerate() {
            if let Err(e) = listener.on_event(event) {
                warn!(
                    "⚠️ 监听器 #{} 处理 {} 事件失败: {}",
                    index,
                    event.name(),
                    e
                );
            }
        }
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
