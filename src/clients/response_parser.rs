//! OOPS! 响应解析
//!
//! 服务以 RDF/XML 返回检测结果（`http://oops.linkeddata.es/def#` 词汇表）。
//! 每个缺陷是一个携带 `oops:hasCode` 的 `rdf:Description` 节点，
//! 受影响的本体实体通过 `oops:hasAffectedElement` 列出
//! （文本形式或 `rdf:resource` 属性形式）。
//!
//! 解析策略是按节点提取文本，不做完整的 RDF 图解析：
//! 评估核心只需要 实体 IRI → 缺陷列表 这一个映射。

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::error::ParseError;
use crate::model::{EvaluationResult, Pitfall, PitfallImportanceLevel};

static DESCRIPTION_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<rdf:Description[^>]*>(.*?)</rdf:Description>").expect("内置正则无效")
});

static CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<oops:hasCode[^>]*>([^<]*)</oops:hasCode>").expect("内置正则无效")
});

static DESC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<oops:hasDescription[^>]*>(.*?)</oops:hasDescription>").expect("内置正则无效")
});

static IMPORTANCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<oops:hasImportanceLevel[^>]*>([^<]*)</oops:hasImportanceLevel>")
        .expect("内置正则无效")
});

static AFFECTED_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<oops:hasAffectedElement>([^<]+)</oops:hasAffectedElement>").expect("内置正则无效")
});

static AFFECTED_RESOURCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<oops:hasAffectedElement\s+rdf:resource="([^"]+)"\s*/>"#).expect("内置正则无效")
});

/// 把响应体解析为评估结果
///
/// 不携带任何缺陷节点的响应体是合法的（本体没有问题），返回空结果。
pub fn parse_response(body: &str) -> Result<EvaluationResult, ParseError> {
    let mut findings: HashMap<String, Vec<Pitfall>> = HashMap::new();

    for block in DESCRIPTION_BLOCK_RE.captures_iter(body) {
        let content = &block[1];

        // 不带 hasCode 的节点不是缺陷（资源列表、元数据等）
        let Some(code_cap) = CODE_RE.captures(content) else {
            continue;
        };
        let code = code_cap[1].trim().to_string();

        let description = DESC_RE
            .captures(content)
            .map(|c| unescape_xml(c[1].trim()))
            .ok_or_else(|| ParseError::MissingElement {
                code: code.clone(),
                element: "oops:hasDescription".to_string(),
            })?;

        let importance_raw = IMPORTANCE_RE
            .captures(content)
            .map(|c| c[1].trim().to_string())
            .ok_or_else(|| ParseError::MissingElement {
                code: code.clone(),
                element: "oops:hasImportanceLevel".to_string(),
            })?;
        let importance = PitfallImportanceLevel::parse(&importance_raw).ok_or(
            ParseError::UnknownImportance {
                value: importance_raw,
            },
        )?;

        let affected = collect_affected_elements(content);
        if affected.is_empty() {
            // 本体级缺陷没有可以挂靠的实体节点，宿主无法展示，跳过
            warn!("⚠️ 缺陷 {} 没有受影响的实体，已跳过", code);
            continue;
        }

        let pitfall = Pitfall::new(importance, code, description);
        for entity in affected {
            findings.entry(entity).or_default().push(pitfall.clone());
        }
    }

    Ok(EvaluationResult::new(findings))
}

/// 收集一个缺陷节点的所有受影响实体 IRI
fn collect_affected_elements(content: &str) -> Vec<String> {
    let mut elements: Vec<String> = AFFECTED_TEXT_RE
        .captures_iter(content)
        .map(|c| unescape_xml(c[1].trim()))
        .collect();

    elements.extend(
        AFFECTED_RESOURCE_RE
            .captures_iter(content)
            .map(|c| unescape_xml(&c[1])),
    );

    elements
}

/// 还原 XML 实体转义（&amp; 必须最后替换）
fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
