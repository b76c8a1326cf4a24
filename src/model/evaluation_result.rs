use std::collections::HashMap;

use serde::Serialize;

use crate::model::pitfall::{Pitfall, PitfallImportanceLevel};

/// 一次评估的完整结果
///
/// 本体实体 IRI → 该实体上检测到的缺陷列表（按响应顺序）。
/// 构造完成后只读；下一次成功评估会整体替换而不是修改它。
///
/// 不变量：任何键对应的缺陷列表都非空，没有缺陷的实体不出现在映射中。
/// 构造函数会丢弃空列表来保证这一点。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationResult {
    findings: HashMap<String, Vec<Pitfall>>,
}

impl EvaluationResult {
    /// 创建新的评估结果
    pub fn new(findings: HashMap<String, Vec<Pitfall>>) -> Self {
        let findings = findings
            .into_iter()
            .filter(|(_, pitfalls)| !pitfalls.is_empty())
            .collect();

        Self { findings }
    }

    /// 查询某个实体的缺陷列表（实体无缺陷时为 None）
    pub fn pitfalls_for(&self, entity: &str) -> Option<&[Pitfall]> {
        self.findings.get(entity).map(|v| v.as_slice())
    }

    /// 有缺陷的实体迭代器
    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.findings.keys().map(|k| k.as_str())
    }

    /// 有缺陷的实体数量
    pub fn entity_count(&self) -> usize {
        self.findings.len()
    }

    /// 缺陷总数（跨所有实体）
    pub fn pitfall_count(&self) -> usize {
        self.findings.values().map(|v| v.len()).sum()
    }

    /// 是否没有检测到任何缺陷
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// 某个实体上最严重的缺陷等级（用于宿主按严重程度着色）
    pub fn highest_importance_for(&self, entity: &str) -> Option<PitfallImportanceLevel> {
        self.findings
            .get(entity)
            .and_then(|pitfalls| pitfalls.iter().map(|p| p.importance()).max())
    }

    /// 整个结果中最严重的缺陷等级
    pub fn highest_importance(&self) -> Option<PitfallImportanceLevel> {
        self.findings
            .values()
            .flat_map(|pitfalls| pitfalls.iter().map(|p| p.importance()))
            .max()
    }

    /// 按严重程度统计缺陷数量：(轻微, 重要, 严重)
    pub fn count_by_importance(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for pitfall in self.findings.values().flatten() {
            match pitfall.importance() {
                PitfallImportanceLevel::Minor => counts.0 += 1,
                PitfallImportanceLevel::Important => counts.1 += 1,
                PitfallImportanceLevel::Critical => counts.2 += 1,
            }
        }
        counts
    }
}
