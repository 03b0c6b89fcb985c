use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, GenerationResult};

/// 选项标签，按位置对应
pub const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

/// 模型返回的原始题目，字段都不可信
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuestion {
    pub question: Option<String>,
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
}

/// 一道经过校验的选择题
///
/// 只能通过 [`QuizQuestion::from_raw`] 构造，构造后不可变：
/// - 恰好 4 个选项，第 i 个以 `"<A+i>."` 开头
/// - `correct_answer` 是 `A..=D` 之一
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    question: String,
    options: [String; 4],
    correct_answer: char,
    explanation: String,
}

impl QuizQuestion {
    /// 校验并规范化模型输出
    pub fn from_raw(raw: RawQuestion) -> GenerationResult<Self> {
        let question = required(raw.question, "question")?;
        let options = raw.options.ok_or(GenerationError::MissingField("options"))?;
        let correct_answer = required(raw.correct_answer, "correctAnswer")?;
        let explanation = required(raw.explanation, "explanation")?;

        let options: [String; 4] = options
            .try_into()
            .map_err(|v: Vec<String>| GenerationError::OptionCount(v.len()))?;

        let letter = normalize_correct_answer(&correct_answer)
            .filter(|c| OPTION_LABELS.contains(c))
            .ok_or(GenerationError::InvalidAnswerLabel(correct_answer))?;

        Ok(Self {
            question: question.trim().to_string(),
            options: normalize_options(options),
            correct_answer: letter,
            explanation: explanation.trim().to_string(),
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[String; 4] {
        &self.options
    }

    pub fn correct_answer(&self) -> char {
        self.correct_answer
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// 选项标签和文本
    pub fn labeled_options(&self) -> impl Iterator<Item = (char, &str)> + '_ {
        OPTION_LABELS
            .iter()
            .copied()
            .zip(self.options.iter().map(String::as_str))
    }
}

fn required(value: Option<String>, field: &'static str) -> GenerationResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(GenerationError::MissingField(field)),
    }
}

/// 给选项补上 `"A. "` 这样的前缀（已有则保持不变）
pub fn normalize_options(options: [String; 4]) -> [String; 4] {
    let mut i = 0;
    options.map(|opt| {
        let letter = OPTION_LABELS[i];
        i += 1;
        let opt = opt.trim();
        if opt.starts_with(&format!("{}.", letter)) {
            opt.to_string()
        } else {
            format!("{}. {}", letter, opt)
        }
    })
}

/// 取正确答案的首字符并转大写，例如 `"b) London"` → `'B'`
pub fn normalize_correct_answer(raw: &str) -> Option<char> {
    raw.trim()
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
}
