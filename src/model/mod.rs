//! 模型层（Model Layer）
//!
//! 评估领域的值对象：缺陷记录、评估结果、缺陷目录，
//! 以及文档协作方接口。全部类型构造后不可变。

pub mod catalog;
pub mod document;
pub mod evaluation_result;
pub mod pitfall;

// 重新导出常用类型
pub use document::{OntologyDocument, RdfXmlDocument};
pub use evaluation_result::EvaluationResult;
pub use pitfall::{Pitfall, PitfallImportanceLevel};
