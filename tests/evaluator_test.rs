//! 评估编排器集成测试
//!
//! 通过 OopsTransport 接口注入脚本化的模拟传输层，
//! 验证生命周期通知顺序、单飞保证、结果缓存和取消语义。

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Notify};
use tokio_test::assert_ok;

use oops_evaluator::{
    Config, CycleStatus, EvalError, EvalResult, EvaluationEvent, EvaluationListener,
    EvaluationResult, Evaluator, OntologyDocument, OopsTransport, Pitfall,
    PitfallImportanceLevel, RdfXmlDocument, TransportError,
};

// ========== 模拟传输层 ==========

/// 每次 submit 的脚本化行为
enum MockReply {
    /// 立即成功
    Ok(EvaluationResult),
    /// 返回指定状态码的传输错误
    Status(u16),
    /// 延迟指定时长后成功（模拟慢服务）
    DelayedOk(Duration, EvaluationResult),
    /// 阻塞到放行信号后成功
    WaitForGate(EvaluationResult),
}

struct MockTransport {
    replies: Mutex<VecDeque<MockReply>>,
    gate: Notify,
}

impl MockTransport {
    fn new(replies: Vec<MockReply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            gate: Notify::new(),
        })
    }

    /// 放行一个 WaitForGate 响应
    fn open_gate(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl OopsTransport for MockTransport {
    async fn submit(&self, _rdf_content: &str) -> EvalResult<EvaluationResult> {
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("脚本中没有更多响应");

        match reply {
            MockReply::Ok(result) => Ok(result),
            MockReply::Status(status) => Err(TransportError::BadStatus { status }.into()),
            MockReply::DelayedOk(delay, result) => {
                tokio::time::sleep(delay).await;
                Ok(result)
            }
            MockReply::WaitForGate(result) => {
                self.gate.notified().await;
                Ok(result)
            }
        }
    }
}

// ========== 测试辅助 ==========

/// 记录监听器：保存收到的全部事件，并把终止事件转发给测试等待
struct RecordingListener {
    events: Mutex<Vec<EvaluationEvent>>,
    terminal_tx: mpsc::UnboundedSender<()>,
}

impl RecordingListener {
    fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<()>) {
        let (terminal_tx, terminal_rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                events: Mutex::new(Vec::new()),
                terminal_tx,
            }),
            terminal_rx,
        )
    }

    fn event_names(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.name()).collect()
    }

    fn events(&self) -> Vec<EvaluationEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EvaluationListener for RecordingListener {
    fn on_event(&self, event: &EvaluationEvent) -> anyhow::Result<()> {
        self.events.lock().unwrap().push(event.clone());
        if event.is_terminal() {
            let _ = self.terminal_tx.send(());
        }
        Ok(())
    }
}

/// 等待指定数量的终止事件
async fn wait_terminals(rx: &mut mpsc::UnboundedReceiver<()>, count: usize) {
    for _ in 0..count {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("等待终止事件超时")
            .expect("终止事件通道已关闭");
    }
}

/// 等待编排器回到空闲状态（终止事件先于状态清理分发）
async fn wait_idle(evaluator: &Evaluator) {
    for _ in 0..500 {
        if !evaluator.is_busy() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("评估器未回到空闲状态");
}

fn test_document(label: &str) -> RdfXmlDocument {
    RdfXmlDocument::new(label, "<rdf:RDF></rdf:RDF>")
}

/// 场景结果：Pizza 实体一个严重缺陷 P9
fn pizza_result() -> EvaluationResult {
    let mut findings = HashMap::new();
    findings.insert(
        "http://www.co-ode.org/ontologies/pizza/pizza.owl#Pizza".to_string(),
        vec![Pitfall::new(
            PitfallImportanceLevel::Critical,
            "P9",
            "P9 is unacceptable!",
        )],
    );
    EvaluationResult::new(findings)
}

fn single_finding_result(entity: &str, code: &str) -> EvaluationResult {
    let mut findings = HashMap::new();
    findings.insert(
        entity.to_string(),
        vec![Pitfall::new(PitfallImportanceLevel::Minor, code, "测试缺陷")],
    );
    EvaluationResult::new(findings)
}

// ========== 测试用例 ==========

#[tokio::test]
async fn test_listener_registration_semantics() {
    let transport = MockTransport::new(vec![]);
    let evaluator = Evaluator::new(transport, &Config::default());

    let (listener_a, _rx_a) = RecordingListener::new();
    let (listener_b, _rx_b) = RecordingListener::new();
    let (stranger, _rx_c) = RecordingListener::new();

    evaluator.add_listener(listener_a.clone());
    evaluator.add_listener(listener_b.clone());
    // 重复注册是无操作
    evaluator.add_listener(listener_a.clone());
    assert_eq!(evaluator.listener_count(), 2);

    // 移除未注册的监听器是无操作
    let stranger: Arc<dyn EvaluationListener> = stranger;
    evaluator.remove_listener(&stranger);
    assert_eq!(evaluator.listener_count(), 2);

    let listener_b: Arc<dyn EvaluationListener> = listener_b;
    evaluator.remove_listener(&listener_b);
    assert_eq!(evaluator.listener_count(), 1);
}

/// 场景：注册监听器 O，评估 doc1，传输层返回 Pizza 的严重缺陷 P9，
/// O 应当依次收到 started 和携带该结果的 done
#[tokio::test]
async fn test_successful_evaluation_notifies_started_then_done() {
    let transport = MockTransport::new(vec![MockReply::Ok(pizza_result())]);
    let evaluator = Evaluator::new(transport, &Config::default());

    let (listener, mut terminal_rx) = RecordingListener::new();
    evaluator.add_listener(listener.clone());

    tokio_test::assert_ok!(evaluator.evaluate(&test_document("doc1")));
    wait_terminals(&mut terminal_rx, 1).await;

    assert_eq!(listener.event_names(), vec!["started", "done"]);

    let events = listener.events();
    let EvaluationEvent::Done(result) = &events[1] else {
        panic!("第二个事件应当是 done");
    };
    assert_eq!(**result, pizza_result());

    let pizza = result
        .pitfalls_for("http://www.co-ode.org/ontologies/pizza/pizza.owl#Pizza")
        .unwrap();
    assert_eq!(pizza.len(), 1);
    assert_eq!(pizza[0].code(), "P9");
    assert_eq!(pizza[0].importance(), PitfallImportanceLevel::Critical);

    // 完成后 last_result 与通知携带的结果一致
    assert_eq!(*evaluator.last_result().unwrap(), pizza_result());
}

#[tokio::test]
async fn test_failed_evaluation_preserves_last_result() {
    let transport = MockTransport::new(vec![
        MockReply::Ok(pizza_result()),
        MockReply::Status(500),
    ]);
    let evaluator = Evaluator::new(transport, &Config::default());

    let (listener, mut terminal_rx) = RecordingListener::new();
    evaluator.add_listener(listener.clone());

    evaluator.evaluate(&test_document("doc1")).unwrap();
    wait_terminals(&mut terminal_rx, 1).await;

    evaluator.evaluate(&test_document("doc2")).unwrap();
    wait_terminals(&mut terminal_rx, 1).await;

    assert_eq!(
        listener.event_names(),
        vec!["started", "done", "started", "failed"]
    );

    let events = listener.events();
    let EvaluationEvent::Failed(error) = &events[3] else {
        panic!("第四个事件应当是 failed");
    };
    assert!(matches!(
        error.as_ref(),
        EvalError::Transport(TransportError::BadStatus { status: 500 })
    ));

    // 失败不清除上一次的成功结果
    assert_eq!(*evaluator.last_result().unwrap(), pizza_result());
}

#[tokio::test]
async fn test_back_to_back_evaluations_do_not_interleave() {
    let result_a = single_finding_result("http://example.org#A", "P08");
    let result_b = single_finding_result("http://example.org#B", "P10");
    let transport = MockTransport::new(vec![
        MockReply::DelayedOk(Duration::from_millis(100), result_a),
        MockReply::DelayedOk(Duration::from_millis(20), result_b.clone()),
    ]);
    let evaluator = Evaluator::new(transport, &Config::default());

    let (listener, mut terminal_rx) = RecordingListener::new();
    evaluator.add_listener(listener.clone());

    // 第二个请求在第一个周期还在执行时发出
    evaluator.evaluate(&test_document("doc_a")).unwrap();
    evaluator.evaluate(&test_document("doc_b")).unwrap();
    assert_eq!(evaluator.pending_count(), 1);

    wait_terminals(&mut terminal_rx, 2).await;

    // 两个周期的事件严格串行：不存在 done(A) 之前的 started(B)
    assert_eq!(
        listener.event_names(),
        vec!["started", "done", "started", "done"]
    );

    wait_idle(&evaluator).await;
    assert_eq!(evaluator.pending_count(), 0);
    assert_eq!(*evaluator.last_result().unwrap(), result_b);
}

#[tokio::test]
async fn test_queue_overflow_is_rejected_as_busy() {
    let config = Config {
        max_pending_evaluations: 1,
        ..Config::default()
    };
    let transport = MockTransport::new(vec![
        MockReply::WaitForGate(pizza_result()),
        MockReply::Ok(single_finding_result("http://example.org#B", "P10")),
    ]);
    let evaluator = Evaluator::new(transport.clone(), &config);

    let (listener, mut terminal_rx) = RecordingListener::new();
    evaluator.add_listener(listener.clone());

    evaluator.evaluate(&test_document("doc_a")).unwrap();
    evaluator.evaluate(&test_document("doc_b")).unwrap();

    // 队列已满，第三个请求被拒绝
    let error = evaluator.evaluate(&test_document("doc_c")).unwrap_err();
    assert!(error.is_busy());
    assert!(matches!(error, EvalError::Busy { pending: 1 }));

    transport.open_gate();
    wait_terminals(&mut terminal_rx, 2).await;
    wait_idle(&evaluator).await;

    // 被拒绝的请求没有产生任何事件
    assert_eq!(
        listener.event_names(),
        vec!["started", "done", "started", "done"]
    );
}

#[tokio::test]
async fn test_reset_last_result() {
    let second = single_finding_result("http://example.org#B", "P10");
    let transport = MockTransport::new(vec![
        MockReply::Ok(pizza_result()),
        MockReply::WaitForGate(second.clone()),
    ]);
    let evaluator = Evaluator::new(transport.clone(), &Config::default());

    let (listener, mut terminal_rx) = RecordingListener::new();
    evaluator.add_listener(listener.clone());

    evaluator.evaluate(&test_document("doc1")).unwrap();
    wait_terminals(&mut terminal_rx, 1).await;
    assert!(evaluator.last_result().is_some());

    evaluator.reset_last_result();
    assert!(evaluator.last_result().is_none());

    // 进行中的周期不受 reset 影响，照常产生终止通知
    evaluator.evaluate(&test_document("doc2")).unwrap();
    evaluator.reset_last_result();
    transport.open_gate();
    wait_terminals(&mut terminal_rx, 1).await;

    assert_eq!(
        listener.event_names(),
        vec!["started", "done", "started", "done"]
    );
    assert_eq!(*evaluator.last_result().unwrap(), second);
}

#[tokio::test]
async fn test_listener_error_does_not_break_cycle_or_peers() {
    /// started 事件上必定失败的监听器
    struct FlakyListener {
        names: Mutex<Vec<&'static str>>,
    }

    impl EvaluationListener for FlakyListener {
        fn on_event(&self, event: &EvaluationEvent) -> anyhow::Result<()> {
            self.names.lock().unwrap().push(event.name());
            if matches!(event, EvaluationEvent::Started) {
                anyhow::bail!("监听器内部错误");
            }
            Ok(())
        }
    }

    let transport = MockTransport::new(vec![MockReply::Ok(pizza_result())]);
    let evaluator = Evaluator::new(transport, &Config::default());

    let flaky = Arc::new(FlakyListener {
        names: Mutex::new(Vec::new()),
    });
    let (recording, mut terminal_rx) = RecordingListener::new();

    evaluator.add_listener(flaky.clone());
    evaluator.add_listener(recording.clone());

    evaluator.evaluate(&test_document("doc1")).unwrap();
    wait_terminals(&mut terminal_rx, 1).await;

    // 出错的监听器仍然收到同一周期的 done
    assert_eq!(*flaky.names.lock().unwrap(), vec!["started", "done"]);
    // 其他监听器完全不受影响
    assert_eq!(recording.event_names(), vec!["started", "done"]);
}

#[tokio::test]
async fn test_serialization_error_is_synchronous_and_silent() {
    /// 序列化必定失败的文档
    struct BrokenDocument;

    impl OntologyDocument for BrokenDocument {
        fn label(&self) -> &str {
            "broken"
        }

        fn to_rdf_xml(&self) -> EvalResult<String> {
            Err(EvalError::serialization("渲染器故障"))
        }
    }

    let transport = MockTransport::new(vec![]);
    let evaluator = Evaluator::new(transport, &Config::default());

    let (listener, _terminal_rx) = RecordingListener::new();
    evaluator.add_listener(listener.clone());

    let error = evaluator.evaluate(&BrokenDocument).unwrap_err();
    assert!(matches!(error, EvalError::Serialization { .. }));

    // 没有周期开始：无事件、不占用评估器
    assert!(listener.event_names().is_empty());
    assert!(!evaluator.is_busy());
}

#[tokio::test]
async fn test_cancel_current_cycle() {
    let transport = MockTransport::new(vec![MockReply::WaitForGate(pizza_result())]);
    let evaluator = Evaluator::new(transport, &Config::default());

    let (listener, mut terminal_rx) = RecordingListener::new();
    evaluator.add_listener(listener.clone());

    evaluator.evaluate(&test_document("doc1")).unwrap();
    assert!(evaluator.cancel_current());

    wait_terminals(&mut terminal_rx, 1).await;
    wait_idle(&evaluator).await;

    assert_eq!(listener.event_names(), vec!["started", "failed"]);

    let events = listener.events();
    let EvaluationEvent::Failed(error) = &events[1] else {
        panic!("第二个事件应当是 failed");
    };
    assert!(error.is_cancelled());

    // 取消的周期不产生结果
    assert!(evaluator.last_result().is_none());
    // 空闲时没有可取消的周期
    assert!(!evaluator.cancel_current());
}

#[tokio::test]
async fn test_session_tracking() {
    let transport = MockTransport::new(vec![
        MockReply::WaitForGate(pizza_result()),
        MockReply::Ok(single_finding_result("http://example.org#B", "P10")),
    ]);
    let evaluator = Evaluator::new(transport.clone(), &Config::default());

    let (listener, mut terminal_rx) = RecordingListener::new();
    evaluator.add_listener(listener.clone());

    assert!(evaluator.current_session().is_none());
    assert!(evaluator.last_session().is_none());

    evaluator.evaluate(&test_document("doc_a")).unwrap();
    evaluator.evaluate(&test_document("doc_b")).unwrap();

    let current = evaluator.current_session().unwrap();
    assert_eq!(current.label, "doc_a");
    assert_eq!(current.status, CycleStatus::Running);

    let pending = evaluator.pending_sessions();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].label, "doc_b");
    assert_eq!(pending[0].status, CycleStatus::Pending);

    transport.open_gate();
    wait_terminals(&mut terminal_rx, 2).await;
    wait_idle(&evaluator).await;

    let last = evaluator.last_session().unwrap();
    assert_eq!(last.label, "doc_b");
    assert_eq!(last.status, CycleStatus::Succeeded);
}
