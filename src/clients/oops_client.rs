//! OOPS! Web 服务客户端
//!
//! 封装与 OOPS! 评估服务 (oops.linkeddata.es) 的全部交互：
//! 构造请求信封、发送 POST 请求、检查状态码、解析响应。
//! 不触碰任何编排器共享状态。

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::clients::response_parser;
use crate::config::Config;
use crate::error::{EvalResult, TransportError};
use crate::model::EvaluationResult;

/// 评估传输层接口
///
/// 编排器通过本接口提交序列化后的文档，测试时注入模拟实现。
#[async_trait]
pub trait OopsTransport: Send + Sync {
    /// 提交一份 RDF/XML 文档，阻塞到响应返回或超时
    async fn submit(&self, rdf_content: &str) -> EvalResult<EvaluationResult>;
}

/// OOPS! 请求信封
///
/// 文档内容原样嵌入 CDATA 块，不做二次编码。
const OOPS_REQUEST_TEMPLATE: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
<OOPSRequest>\
<OntologyURI></OntologyURI>\
<OntologyContent><![CDATA[ {content} ]]></OntologyContent>\
<Pitfalls></Pitfalls>\
<OutputFormat>RDF/XML</OutputFormat>\
</OOPSRequest>";

/// OOPS! Web 服务客户端
pub struct OopsClient {
    endpoint: String,
    timeout_secs: u64,
    http: reqwest::Client,
}

impl OopsClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> EvalResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| TransportError::ClientInit { source: e })?;

        Ok(Self {
            endpoint: config.oops_endpoint.clone(),
            timeout_secs: config.request_timeout_secs,
            http,
        })
    }

    /// 构造请求信封
    fn build_request_body(&self, rdf_content: &str) -> String {
        OOPS_REQUEST_TEMPLATE.replace("{content}", rdf_content)
    }
}

#[async_trait]
impl OopsTransport for OopsClient {
    async fn submit(&self, rdf_content: &str) -> EvalResult<EvaluationResult> {
        let body = self.build_request_body(rdf_content);

        debug!("正在向 OOPS! 服务发送请求 ({})...", self.endpoint);
        let started = Instant::now();

        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/xml")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                TransportError::from_request_error(&self.endpoint, self.timeout_secs, e)
            })?;

        let status = response.status();
        debug!("OOPS! 服务响应状态码: {}", status.as_u16());

        if !status.is_success() {
            return Err(TransportError::BadStatus {
                status: status.as_u16(),
            }
            .into());
        }

        let text = response
            .text()
            .await
            .map_err(|e| TransportError::BodyRead { source: e })?;

        let result = response_parser::parse_response(&text)?;

        info!(
            "✓ OOPS! 评估完成，耗时 {} 秒，检测到 {} 个缺陷",
            started.elapsed().as_secs(),
            result.pitfall_count()
        );

        Ok(result)
    }
}
