//! 展示层
//!
//! 只读取会话状态并渲染，把用户输入翻译成意图交给编排层，不含业务逻辑

pub mod intent;
pub mod view;

pub use intent::{parse_intent, Intent, HELP_TEXT};
pub use view::{option_style, render, OptionStyle};
