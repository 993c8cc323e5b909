//! 答案判分服务 - 业务能力层
//!
//! 只负责判断"一份答案对不对"，无副作用
//!
//! 判分顺序（第一个通过的规则生效）：
//! 1. 归一化后完全相等
//! 2. 选择题到此为止，任何不完全相等都判错
//! 3. 问答题：关键词覆盖率
//! 4. 问答题：编辑距离相似度

use crate::config::GradingConfig;
use crate::error::{AppResult, InputError};
use crate::models::question::{AnswerKind, QuestionItem, QuestionKind};
use crate::services::normalizer::Normalizer;
use tracing::debug;

/// 判分依据
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradeOutcome {
    /// 归一化后完全相等
    ExactMatch,
    /// 关键词覆盖率达到阈值
    KeywordOverlap(f64),
    /// 编辑距离相似度达到阈值
    EditSimilarity(f64),
    /// 所有规则都未通过
    Rejected,
}

impl GradeOutcome {
    pub fn is_correct(self) -> bool {
        !matches!(self, GradeOutcome::Rejected)
    }
}

/// 计算两个字符序列的编辑距离
pub fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// 归一化编辑距离相似度：`1 - distance / max_len`
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(&a, &b) as f64 / max_len as f64
}

/// 关键词覆盖率：标准答案的词中，有多少比例出现在提交的词里（任一方向包含即可）
pub fn keyword_overlap(canonical: &[String], submitted: &[String]) -> f64 {
    if canonical.is_empty() {
        return 0.0;
    }
    let hits = canonical
        .iter()
        .filter(|c| {
            submitted
                .iter()
                .any(|s| s.contains(c.as_str()) || c.contains(s.as_str()))
        })
        .count();
    hits as f64 / canonical.len() as f64
}

/// 答案判分服务
#[derive(Debug, Clone)]
pub struct Grader {
    normalizer: Normalizer,
    config: GradingConfig,
}

impl Grader {
    /// 创建新的判分服务
    pub fn new(config: GradingConfig) -> AppResult<Self> {
        Ok(Self {
            normalizer: Normalizer::new()?,
            config,
        })
    }

    /// 判断答案是否正确
    pub fn grade(&self, canonical: &str, submitted: &str, kind: AnswerKind) -> bool {
        self.evaluate(canonical, submitted, kind).is_correct()
    }

    /// 判分并返回生效的规则
    pub fn evaluate(&self, canonical: &str, submitted: &str, kind: AnswerKind) -> GradeOutcome {
        let canonical_norm = self.normalizer.normalize(canonical);
        let submitted_norm = self.normalizer.normalize(submitted);

        if canonical_norm == submitted_norm {
            return GradeOutcome::ExactMatch;
        }

        // 选择题不允许模糊匹配，否则相近的选项会被误判为正确
        if kind == AnswerKind::ClosedForm {
            return GradeOutcome::Rejected;
        }

        let min_chars = self.config.min_token_chars;
        let canonical_tokens = self.normalizer.tokenize(canonical, min_chars);
        if canonical_tokens.is_empty() {
            // 标准答案没有有效词时，只有空提交才算对
            return if submitted_norm.is_empty() {
                GradeOutcome::ExactMatch
            } else {
                GradeOutcome::Rejected
            };
        }

        let submitted_tokens = self.normalizer.tokenize(submitted, min_chars);
        let overlap = keyword_overlap(&canonical_tokens, &submitted_tokens);
        if overlap >= self.config.keyword_overlap_threshold {
            return GradeOutcome::KeywordOverlap(overlap);
        }

        let score = similarity(&canonical_norm, &submitted_norm);
        if score >= self.config.similarity_threshold {
            return GradeOutcome::EditSimilarity(score);
        }

        debug!(
            "判分未通过: 关键词覆盖率 {:.2}, 相似度 {:.2}",
            overlap, score
        );
        GradeOutcome::Rejected
    }

    /// 按题型判分
    ///
    /// 选择题的标准答案是 `options[correct_index]`，索引越界属于数据错误
    pub fn grade_question(&self, question: &QuestionItem, submitted: &str) -> AppResult<bool> {
        let outcome = match &question.kind {
            QuestionKind::ClosedForm {
                options,
                correct_index,
            } => {
                let canonical = options.get(*correct_index).ok_or_else(|| {
                    InputError::CorrectIndexOutOfRange {
                        question_id: question.id.to_string(),
                        index: *correct_index,
                        option_count: options.len(),
                    }
                })?;
                self.evaluate(canonical, submitted, AnswerKind::ClosedForm)
            }
            QuestionKind::OpenForm { canonical_answer } => {
                self.evaluate(canonical_answer, submitted, AnswerKind::OpenForm)
            }
        };

        debug!("题目 {} 判分结果: {:?}", question.id, outcome);
        Ok(outcome.is_correct())
    }
}

/// 使用默认阈值判分
pub fn grade(canonical: &str, submitted: &str, kind: AnswerKind) -> AppResult<bool> {
    Ok(Grader::new(GradingConfig::default())?.grade(canonical, submitted, kind))
}
