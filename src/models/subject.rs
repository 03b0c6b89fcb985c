use serde::{Deserialize, Serialize};

/// 科目枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    /// 数学
    #[serde(rename = "Math")]
    Math,
    /// 阅读与写作
    #[serde(rename = "Reading & Writing")]
    ReadingWriting,
}

impl Subject {
    /// 全部科目，按选择界面上的顺序
    pub const ALL: [Subject; 2] = [Subject::Math, Subject::ReadingWriting];

    /// 获取标准名称（也是提示词里使用的名称）
    pub fn name(self) -> &'static str {
        match self {
            Subject::Math => "Math",
            Subject::ReadingWriting => "Reading & Writing",
        }
    }

    /// 选择界面上的编号（从1开始）
    pub fn menu_number(self) -> usize {
        match self {
            Subject::Math => 1,
            Subject::ReadingWriting => 2,
        }
    }

    /// 从用户输入解析科目（忽略大小写，支持编号和简称）
    pub fn find(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "1" | "math" | "m" => Some(Subject::Math),
            "2" | "reading & writing" | "reading and writing" | "reading" | "writing" | "rw"
            | "r&w" => Some(Subject::ReadingWriting),
            _ => None,
        }
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find() {
        assert_eq!(Subject::find("1"), Some(Subject::Math));
        assert_eq!(Subject::find("  MATH "), Some(Subject::Math));
        assert_eq!(Subject::find("Reading & Writing"), Some(Subject::ReadingWriting));
        assert_eq!(Subject::find("rw"), Some(Subject::ReadingWriting));
        assert_eq!(Subject::find("history"), None);
    }

    #[test]
    fn test_menu_numbers_follow_all() {
        for (i, subject) in Subject::ALL.iter().enumerate() {
            assert_eq!(subject.menu_number(), i + 1);
            assert_eq!(Subject::find(&(i + 1).to_string()), Some(*subject));
        }
    }
}
