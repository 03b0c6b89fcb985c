//! 终端应用 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：按配置创建 LLM 客户端和控制器
//! 2. **事件循环**：同时等待用户输入和后台任务结果（`tokio::select!`）
//! 3. **后台任务**：模型请求放到 `tokio::spawn` 里执行，结果通过 channel 送回
//! 4. **重绘**：每次状态变化后重新渲染界面
//!
//! 请求进行中仍然可以输入 `r` 或换科目，迟到的结果由会话的 epoch 丢弃。

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::clients::LlmBackend;
use crate::config::Config;
use crate::orchestrator::quiz_controller::{Completion, Job, QuizController};
use crate::presentation::{parse_intent, render, Intent, HELP_TEXT};
use crate::utils::logging::{log_startup, print_session_summary};

/// 应用主结构
pub struct App {
    controller: QuizController<LlmBackend>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let backend = LlmBackend::from_config(&config).context("创建 LLM 客户端失败")?;
        let controller = QuizController::new(Arc::new(backend), config.question_temperature);

        Ok(Self { controller })
    }

    /// 运行事件循环，直到用户退出或输入结束
    pub async fn run(mut self) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        self.redraw();

        loop {
            tokio::select! {
                Some(completion) = rx.recv() => {
                    if self.controller.apply(completion) {
                        self.redraw();
                    }
                }
                line = lines.next_line() => {
                    let Some(line) = line.context("读取输入失败")? else {
                        debug!("输入结束");
                        break;
                    };

                    match parse_intent(&line) {
                        Some(Intent::Quit) => break,
                        Some(Intent::Help) => {
                            println!("{}", HELP_TEXT);
                            prompt();
                        }
                        Some(intent) => {
                            if let Some(job) = self.controller.handle(intent) {
                                self.spawn_job(job, tx.clone());
                            }
                            self.redraw();
                        }
                        None => {
                            println!("Unknown command. Type h for help.");
                            prompt();
                        }
                    }
                }
            }
        }

        let session = self.controller.session();
        print_session_summary(session.subject(), session.score());
        info!("👋 再见");

        Ok(())
    }

    /// 在后台执行任务
    fn spawn_job(&self, job: Job, tx: mpsc::UnboundedSender<Completion>) {
        let generators = self.controller.generators();
        tokio::spawn(async move {
            let completion = generators.run(job).await;
            // 接收端只会在应用退出时关闭
            let _ = tx.send(completion);
        });
    }

    fn redraw(&self) {
        println!("\n{}", render(self.controller.session()));
        prompt();
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
