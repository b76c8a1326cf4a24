//! 文档协作方接口
//!
//! 评估核心只依赖文档的一种能力：序列化为 RDF/XML 线上格式。
//! 文档的编辑、渲染、标识管理都属于宿主应用，不在本 crate 范围内。

use crate::error::EvalResult;

/// 可评估的本体文档
pub trait OntologyDocument: Send + Sync {
    /// 文档标识（仅用于日志显示）
    fn label(&self) -> &str;

    /// 序列化为 RDF/XML 文本
    ///
    /// 失败时返回 `EvalError::Serialization`。
    fn to_rdf_xml(&self) -> EvalResult<String>;
}

/// 内存中的 RDF/XML 文档
///
/// 内容已经是线上格式，序列化即拷贝。宿主应用通常在 evaluate
/// 之前把自己的文档模型渲染成本类型。
#[derive(Debug, Clone)]
pub struct RdfXmlDocument {
    label: String,
    content: String,
}

impl RdfXmlDocument {
    /// 创建新的内存文档
    pub fn new(label: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            content: content.into(),
        }
    }

    /// 文档内容
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl OntologyDocument for RdfXmlDocument {
    fn label(&self) -> &str {
        &self.label
    }

    fn to_rdf_xml(&self) -> EvalResult<String> {
        Ok(self.content.clone())
    }
}
