/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::{Score, Subject};

/// 初始化日志
///
/// 日志写到 stderr，避免和 stdout 上的界面混在一起。
/// `RUST_LOG` 优先；否则默认 `warn`，`verbose` 时为 `debug`
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 SAT Genius 启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🤖 LLM 服务: {:?} / 模型: {}", config.llm_provider, config.llm_model_name);
    info!("🔗 接口地址: {}", config.llm_api_base_url);
    info!("{}", "=".repeat(60));
}

/// 打印会话统计
///
/// 统计是给用户看的，和界面一样写到 stdout，不受日志级别影响
pub fn print_session_summary(subject: Option<Subject>, score: Score) {
    info!("练习结束: 正确 {} / 错误 {}", score.correct, score.incorrect);
    println!("{}", format_session_summary(subject, score));
}

/// 会话统计文本
pub fn format_session_summary(subject: Option<Subject>, score: Score) -> String {
    let mut lines = vec![
        "=".repeat(60),
        "📊 练习结束统计".to_string(),
        format!(
            "完成时间: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ),
        "=".repeat(60),
    ];
    if let Some(subject) = subject {
        lines.push(format!("📚 科目: {}", subject));
    }
    lines.push(format!("✅ 正确: {}/{}", score.correct, score.total()));
    lines.push(format!("❌ 错误: {}", score.incorrect));
    if let Some(accuracy) = score.accuracy() {
        lines.push(format!("🎯 正确率: {:.1}%", accuracy * 100.0));
    }
    lines.push("=".repeat(60));
    lines.join("\n")
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
