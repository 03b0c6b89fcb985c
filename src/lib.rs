//! # SAT Genius
//!
//! 用大模型生成 SAT 风格选择题，并在答错时给出提升建议的终端练习程序
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 只暴露"发请求、拿文本"的能力（`TextGenerator`）
//! - `GeminiClient` - Gemini 原生接口，支持结构化输出
//! - `OpenAiClient` - 兼容 OpenAI 的接口
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `QuestionGenerator` - 出题，失败上抛
//! - `TipsGenerator` - 提升建议，失败时返回固定文案
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 答题状态机 `QuizSession`，所有状态修改都在这里
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/quiz_controller` - 意图分发、任务执行、结果应用
//! - `orchestrator/terminal_app` - 终端事件循环
//!
//! ### 展示层（Presentation）
//! - `presentation/` - 状态 → 文本，输入 → 意图
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod presentation;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{CompletionRequest, LlmBackend, TextGenerator};
pub use config::Config;
pub use error::{ConfigError, GenerationError, LlmError};
pub use models::{Feedback, QuizQuestion, Score, Subject};
pub use orchestrator::{App, QuizController};
pub use presentation::{parse_intent, render, Intent};
pub use services::{QuestionGenerator, TipsGenerator};
pub use workflow::{QuizPhase, QuizSession};
