//! 终端视图
//!
//! 纯函数：同一个会话状态永远渲染出同样的文本，不修改任何状态

use crate::models::{Feedback, QuizQuestion, Score, Subject};
use crate::workflow::{QuizPhase, QuizSession};

const WIDTH: usize = 60;

/// 选项的显示样式（只影响外观）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionStyle {
    /// 未作答、未选中
    Plain,
    /// 未作答、当前选中
    Selected,
    /// 已作答：正确答案
    Correct,
    /// 已作答：选错的那一项
    Wrong,
    /// 已作答：其他选项
    Dimmed,
}

impl OptionStyle {
    fn marker(self) -> &'static str {
        match self {
            OptionStyle::Plain => "[ ]",
            OptionStyle::Selected => "[*]",
            OptionStyle::Correct => "[✓]",
            OptionStyle::Wrong => "[✗]",
            OptionStyle::Dimmed => " · ",
        }
    }
}

/// 计算某个选项的样式
pub fn option_style(
    letter: char,
    selected: Option<char>,
    correct: char,
    is_answered: bool,
) -> OptionStyle {
    let is_selected = selected == Some(letter);
    if is_answered {
        if letter == correct {
            OptionStyle::Correct
        } else if is_selected {
            OptionStyle::Wrong
        } else {
            OptionStyle::Dimmed
        }
    } else if is_selected {
        OptionStyle::Selected
    } else {
        OptionStyle::Plain
    }
}

/// 渲染整个界面
pub fn render(session: &QuizSession) -> String {
    let mut lines = Vec::new();

    lines.push("=".repeat(WIDTH));
    lines.push(center("SAT Genius"));
    lines.push("=".repeat(WIDTH));

    if let Some(subject) = session.subject() {
        render_scoreboard(&mut lines, subject, session.score());
    }

    if let Some(error) = session.error() {
        lines.push(String::new());
        lines.push(format!("!! {}", error));
    }

    if session.needs_subject() {
        render_subject_selector(&mut lines);
        return finish(lines);
    }

    if session.phase() == QuizPhase::LoadingQuestion {
        lines.push(String::new());
        lines.push("... Generating your next question...".to_string());
        return finish(lines);
    }

    if let Some(question) = session.question() {
        render_question(&mut lines, session, question);

        match (session.phase(), session.feedback()) {
            (QuizPhase::LoadingFeedback, _) => {
                lines.push(String::new());
                lines.push("... Analyzing your answer...".to_string());
            }
            (QuizPhase::DisplayingFeedback, Some(feedback)) => {
                render_feedback(&mut lines, feedback);
            }
            _ => {}
        }
    }

    finish(lines)
}

fn render_scoreboard(lines: &mut Vec<String>, subject: Subject, score: Score) {
    lines.push(format!("{} Practice", subject));
    lines.push(format!(
        "  Correct: {}   Incorrect: {}        [r] Change Subject",
        score.correct, score.incorrect
    ));
    lines.push("-".repeat(WIDTH));
}

fn render_subject_selector(lines: &mut Vec<String>) {
    lines.push(String::new());
    lines.push("Welcome to SAT Genius!".to_string());
    lines.push(
        "Choose a subject to start your personalized AI-powered practice session.".to_string(),
    );
    lines.push(String::new());
    for subject in Subject::ALL {
        lines.push(format!("  [{}] {}", subject.menu_number(), subject));
    }
}

fn render_question(lines: &mut Vec<String>, session: &QuizSession, question: &QuizQuestion) {
    let selected = session.selected_answer();
    let is_answered = session.is_answered();

    lines.push(String::new());
    lines.push(question.question().to_string());
    lines.push(String::new());

    for (letter, text) in question.labeled_options() {
        let style = option_style(letter, selected, question.correct_answer(), is_answered);
        lines.push(format!("  {} {}", style.marker(), text));
    }

    if !is_answered {
        lines.push(String::new());
        match selected {
            Some(letter) => lines.push(format!("[s] Submit Answer ({})", letter)),
            None => lines.push("Select an answer (a-d), then [s] Submit Answer".to_string()),
        }
    }
}

fn render_feedback(lines: &mut Vec<String>, feedback: &Feedback) {
    lines.push(String::new());
    lines.push("-".repeat(WIDTH));
    lines.push(if feedback.is_correct {
        "✓ Correct!".to_string()
    } else {
        "✗ Not Quite".to_string()
    });
    lines.push(String::new());
    lines.push("Explanation".to_string());
    lines.push(feedback.explanation.clone());

    if !feedback.is_correct {
        lines.push(String::new());
        lines.push("How to Improve".to_string());
        lines.push(feedback.improvement_tips.clone());
    }

    lines.push(String::new());
    lines.push("[n] Next Question".to_string());
}

fn center(text: &str) -> String {
    let pad = WIDTH.saturating_sub(text.chars().count()) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
