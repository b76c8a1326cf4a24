//! 评估编排器 - 编排层
//!
//! ## 职责
//!
//! 1. **单飞保证**：任意时刻最多一个评估周期在执行；
//!    执行期间到达的请求按 FIFO 入队，队满拒绝（Busy）
//! 2. **生命周期通知**：每个周期严格按 started → done/failed 分发，
//!    且周期 N 的终止事件一定先于周期 N+1 的 started
//! 3. **结果缓存**：保存最近一次成功结果；失败不覆盖旧结果
//! 4. **取消**：持有进行中周期的取消句柄，宿主可以放弃过期周期
//!
//! ## 并发模型
//!
//! 共享状态集中在一把 `Mutex<EvaluatorState>` 里，临界区内从不 await。
//! 唯一的阻塞点在传输层请求内部（受超时约束），由一个后台任务承担；
//! 该任务在当前周期结束后顺序排空队列，事件顺序因此是结构性保证，
//! 不依赖锁的竞争时序。

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::sync::oneshot;
use tracing::{error, info, warn};

use crate::clients::OopsTransport;
use crate::config::Config;
use crate::error::{EvalError, EvalResult};
use crate::model::{EvaluationResult, OntologyDocument};
use crate::orchestrator::session::{CycleStatus, EvaluationRequest, SessionSnapshot};
use crate::services::{EvaluationEvent, EvaluationListener, ListenerRegistry};

/// 进行中的评估周期
struct ActiveCycle {
    session: SessionSnapshot,
    /// 取消句柄；已被取走说明取消信号已发出
    cancel_tx: Option<oneshot::Sender<()>>,
}

/// 编排器共享状态
#[derive(Default)]
struct EvaluatorState {
    /// 最近一次成功评估的结果
    last_result: Option<Arc<EvaluationResult>>,
    /// 进行中的周期（None 表示空闲）
    current: Option<ActiveCycle>,
    /// 最近一个已终止周期的会话记录
    last_session: Option<SessionSnapshot>,
    /// 排队中的请求（FIFO）
    queue: VecDeque<EvaluationRequest>,
}

/// 评估编排器
///
/// 在应用启动时构造一次，按引用注入给所有协作方，
/// 不使用任何全局可变状态。
pub struct Evaluator {
    transport: Arc<dyn OopsTransport>,
    registry: Arc<ListenerRegistry>,
    max_pending: usize,
    state: Arc<Mutex<EvaluatorState>>,
}

impl Evaluator {
    /// 创建新的评估编排器
    pub fn new(transport: Arc<dyn OopsTransport>, config: &Config) -> Self {
        Self {
            transport,
            registry: Arc::new(ListenerRegistry::new()),
            max_pending: config.max_pending_evaluations,
            state: Arc::new(Mutex::new(EvaluatorState::default())),
        }
    }

    // ========== 公开接口 ==========

    /// 为指定文档发起一个评估周期
    ///
    /// 立即返回，评估在后台执行：
    /// - 空闲时：同步通知 started，然后启动后台任务
    /// - 有周期在执行时：请求入队，等前一个周期终止后再开始
    /// - 队列已满时：返回 `EvalError::Busy`
    ///
    /// 文档在本方法内序列化成快照，序列化失败同步返回
    /// `EvalError::Serialization`，不产生任何事件。
    pub fn evaluate(&self, document: &dyn OntologyDocument) -> EvalResult<()> {
        let payload = document.to_rdf_xml()?;
        let request = EvaluationRequest::new(document.label(), payload);

        let (request, cancel_rx) = {
            let mut state = self.state.lock().expect("评估器状态锁中毒");

            if state.current.is_some() {
                if state.queue.len() >= self.max_pending {
                    return Err(EvalError::Busy {
                        pending: state.queue.len(),
                    });
                }
                info!(
                    "📥 评估器忙，请求已入队: {} (第 {} 位)",
                    request.label(),
                    state.queue.len() + 1
                );
                state.queue.push_back(request);
                return Ok(());
            }

            let (cancel_tx, cancel_rx) = oneshot::channel();
            state.current = Some(ActiveCycle {
                session: SessionSnapshot::from_request(&request, CycleStatus::Running),
                cancel_tx: Some(cancel_tx),
            });
            (request, cancel_rx)
        };

        info!("🚀 开始评估: {}", request.label());
        self.registry.notify_all(&EvaluationEvent::Started);

        tokio::spawn(Self::run_cycles(
            Arc::clone(&self.transport),
            Arc::clone(&self.registry),
            Arc::clone(&self.state),
            request,
            cancel_rx,
        ));

        Ok(())
    }

    /// 最近一次成功评估的结果
    pub fn last_result(&self) -> Option<Arc<EvaluationResult>> {
        self.state.lock().expect("评估器状态锁中毒").last_result.clone()
    }

    /// 清空已保存的评估结果（不影响进行中的周期）
    pub fn reset_last_result(&self) {
        self.state.lock().expect("评估器状态锁中毒").last_result = None;
    }

    /// 取消进行中的评估周期
    ///
    /// 监听器会收到携带 `Cancelled` 错误的 failed 事件；
    /// 排队中的请求不受影响，之后照常执行。
    /// 返回是否发出了取消信号（空闲或已取消时为 false）。
    pub fn cancel_current(&self) -> bool {
        let mut state = self.state.lock().expect("评估器状态锁中毒");
        if let Some(active) = state.current.as_mut() {
            if let Some(cancel_tx) = active.cancel_tx.take() {
                let _ = cancel_tx.send(());
                return true;
            }
        }
        false
    }

    /// 注册评估事件监听器（重复注册无操作）
    pub fn add_listener(&self, listener: Arc<dyn EvaluationListener>) {
        self.registry.add(listener);
    }

    /// 移除评估事件监听器（未注册时无操作）
    pub fn remove_listener(&self, listener: &Arc<dyn EvaluationListener>) {
        self.registry.remove(listener);
    }

    /// 当前注册的监听器数量
    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }

    // ========== 状态查询 ==========

    /// 是否有评估周期在执行
    pub fn is_busy(&self) -> bool {
        self.state.lock().expect("评估器状态锁中毒").current.is_some()
    }

    /// 排队中的请求数量
    pub fn pending_count(&self) -> usize {
        self.state.lock().expect("评估器状态锁中毒").queue.len()
    }

    /// 进行中周期的会话快照（空闲时为 None）
    pub fn current_session(&self) -> Option<SessionSnapshot> {
        let state = self.state.lock().expect("评估器状态锁中毒");
        state.current.as_ref().map(|active| active.session.clone())
    }

    /// 最近一个已终止周期的会话快照
    pub fn last_session(&self) -> Option<SessionSnapshot> {
        self.state.lock().expect("评估器状态锁中毒").last_session.clone()
    }

    /// 排队中请求的会话快照（FIFO 顺序）
    pub fn pending_sessions(&self) -> Vec<SessionSnapshot> {
        let state = self.state.lock().expect("评估器状态锁中毒");
        state
            .queue
            .iter()
            .map(|request| SessionSnapshot::from_request(request, CycleStatus::Pending))
            .collect()
    }

    // ========== 后台工作任务 ==========

    /// 执行当前周期并顺序排空队列
    ///
    /// 整个循环在同一个任务里顺序执行，保证周期 N 的终止事件
    /// 先于周期 N+1 的 started 事件。
    async fn run_cycles(
        transport: Arc<dyn OopsTransport>,
        registry: Arc<ListenerRegistry>,
        state: Arc<Mutex<EvaluatorState>>,
        mut request: EvaluationRequest,
        mut cancel_rx: oneshot::Receiver<()>,
    ) {
        loop {
            let started_at = Instant::now();

            let outcome = tokio::select! {
                result = transport.submit(request.payload()) => result,
                _ = &mut cancel_rx => Err(EvalError::Cancelled),
            };

            match outcome {
                Ok(result) => {
                    let result = Arc::new(result);
                    {
                        let mut state = state.lock().expect("评估器状态锁中毒");
                        state.last_result = Some(Arc::clone(&result));
                        state.last_session =
                            Some(SessionSnapshot::from_request(&request, CycleStatus::Succeeded));
                    }
                    info!(
                        "✅ 评估成功: {} (检测到 {} 个缺陷，耗时 {} 秒)",
                        request.label(),
                        result.pitfall_count(),
                        started_at.elapsed().as_secs()
                    );
                    registry.notify_all(&EvaluationEvent::Done(result));
                }
                Err(e) => {
                    {
                        let mut state = state.lock().expect("评估器状态锁中毒");
                        state.last_session =
                            Some(SessionSnapshot::from_request(&request, CycleStatus::Failed));
                    }
                    if e.is_cancelled() {
                        warn!("🛑 评估已取消: {}", request.label());
                    } else {
                        error!("❌ 评估失败: {}: {}", request.label(), e);
                    }
                    registry.notify_all(&EvaluationEvent::Failed(Arc::new(e)));
                }
            }

            // 取下一个排队请求；队列已空则回到空闲并退出
            let next = {
                let mut state = state.lock().expect("评估器状态锁中毒");
                match state.queue.pop_front() {
                    Some(next_request) => {
                        let (cancel_tx, next_cancel_rx) = oneshot::channel();
                        state.current = Some(ActiveCycle {
                            session: SessionSnapshot::from_request(
                                &next_request,
                                CycleStatus::Running,
                            ),
                            cancel_tx: Some(cancel_tx),
                        });
                        Some((next_request, next_cancel_rx))
                    }
                    None => {
                        state.current = None;
                        None
                    }
                }
            };

            match next {
                Some((next_request, next_cancel_rx)) => {
                    request = next_request;
                    cancel_rx = next_cancel_rx;
                    info!("🚀 开始评估: {}", request.label());
                    registry.notify_all(&EvaluationEvent::Started);
                }
                None => break,
            }
        }
    }
}
