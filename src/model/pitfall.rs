use serde::{Deserialize, Serialize};

use crate::model::catalog;

/// 缺陷严重程度
///
/// 排序即严重程度：Minor < Important < Critical
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PitfallImportanceLevel {
    /// 轻微
    Minor,
    /// 重要
    Important,
    /// 严重
    Critical,
}

impl PitfallImportanceLevel {
    /// 获取标准名称（OOPS! 服务使用的写法）
    pub fn name(self) -> &'static str {
        match self {
            PitfallImportanceLevel::Minor => "Minor",
            PitfallImportanceLevel::Important => "Important",
            PitfallImportanceLevel::Critical => "Critical",
        }
    }

    /// 从字符串解析严重程度（不区分大小写）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "minor" => Some(PitfallImportanceLevel::Minor),
            "important" => Some(PitfallImportanceLevel::Important),
            "critical" => Some(PitfallImportanceLevel::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for PitfallImportanceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 单个缺陷记录
///
/// 由传输层在解析响应时创建，创建后不可变。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pitfall {
    importance: PitfallImportanceLevel,
    code: String,
    description: String,
}

impl Pitfall {
    /// 创建新的缺陷记录
    pub fn new(
        importance: PitfallImportanceLevel,
        code: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            importance,
            code: code.into(),
            description: description.into(),
        }
    }

    /// 严重程度
    pub fn importance(&self) -> PitfallImportanceLevel {
        self.importance
    }

    /// 缺陷代码（如 "P08"）
    pub fn code(&self) -> &str {
        &self.code
    }

    /// 缺陷描述
    pub fn description(&self) -> &str {
        &self.description
    }

    /// 缺陷代码对应的目录标准名称（目录中不存在时为 None）
    pub fn canonical_name(&self) -> Option<&'static str> {
        catalog::canonical_name(&self.code)
    }
}

impl std::fmt::Display for Pitfall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.canonical_name() {
            Some(name) => write!(f, "[{}] {} ({}): {}", self.importance, self.code, name, self.description),
            None => write!(f, "[{}] {}: {}", self.importance, self.code, self.description),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_importance_parse() {
        assert_eq!(
            PitfallImportanceLevel::parse("Minor"),
            Some(PitfallImportanceLevel::Minor)
        );
        assert_eq!(
            PitfallImportanceLevel::parse("IMPORTANT"),
            Some(PitfallImportanceLevel::Important)
        );
        assert_eq!(
            PitfallImportanceLevel::parse("  critical "),
            Some(PitfallImportanceLevel::Critical)
        );
        assert_eq!(PitfallImportanceLevel::parse("fatal"), None);
    }

    #[test]
    fn test_importance_ordering() {
        assert!(PitfallImportanceLevel::Minor < PitfallImportanceLevel::Important);
        assert!(PitfallImportanceLevel::Important < PitfallImportanceLevel::Critical);
    }

    #[test]
    fn test_pitfall_canonical_name() {
        let pitfall = Pitfall::new(PitfallImportanceLevel::Minor, "P08", "缺少注解");
        assert_eq!(pitfall.canonical_name(), Some("Missing annotations"));

        let unknown = Pitfall::new(PitfallImportanceLevel::Minor, "P99", "未知缺陷");
        assert_eq!(unknown.canonical_name(), None);
    }
}
