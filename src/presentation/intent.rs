use crate::models::Subject;

/// 用户意图
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    SelectSubject(Subject),
    SelectAnswer(char),
    Submit,
    NextQuestion,
    Reset,
    Help,
    Quit,
}

/// 把一行输入解析成意图
///
/// 单个字母 `a`-`d` 是选答案；`1`/`2` 或科目名是选科目；其余是命令
pub fn parse_intent(line: &str) -> Option<Intent> {
    let input = line.trim().to_lowercase();

    match input.as_str() {
        "" => None,
        "a" | "b" | "c" | "d" => input
            .chars()
            .next()
            .map(|c| Intent::SelectAnswer(c.to_ascii_uppercase())),
        "s" | "submit" => Some(Intent::Submit),
        "n" | "next" => Some(Intent::NextQuestion),
        "r" | "reset" | "change" | "change subject" => Some(Intent::Reset),
        "h" | "help" | "?" => Some(Intent::Help),
        "q" | "quit" | "exit" => Some(Intent::Quit),
        other => Subject::find(other).map(Intent::SelectSubject),
    }
}

/// 命令说明
pub const HELP_TEXT: &str = "\
Commands:
  1 / math            start a Math practice session
  2 / reading         start a Reading & Writing practice session
  a, b, c, d          select an answer
  s                   submit the selected answer
  n                   next question
  r                   change subject
  h                   show this help
  q                   quit";
