//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `quiz_controller` - 答题控制器
//! - 唯一持有 `QuizSession`
//! - 把意图转成状态转换，把需要请求模型的转换变成 `Job`
//! - 把 `Completion` 交回会话应用（过期的会被丢弃）
//!
//! ### `terminal_app` - 终端应用
//! - 创建 LLM 客户端
//! - 事件循环：用户输入 + 后台任务结果
//! - 输出会话统计
//!
//! ## 层次关系
//!
//! ```text
//! terminal_app (事件循环、后台任务)
//!     ↓
//! quiz_controller (意图 → 状态转换 / 任务)
//!     ↓
//! workflow::QuizSession (状态机)        services (出题 / 建议)
//!                                          ↓
//!                                       clients (Gemini / OpenAI 兼容接口)
//! ```

pub mod quiz_controller;
pub mod terminal_app;

// 重新导出主要类型
pub use quiz_controller::{Completion, Generators, Job, QuizController};
pub use terminal_app::App;
