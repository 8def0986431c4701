use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{AssessmentPhase, Difficulty};
use crate::orchestrator::intent::{Intent, HELP_TEXT};
use crate::orchestrator::screens;
use crate::services::{LlmService, QuestionBank, QuestionSource};
use crate::utils::logging;
use crate::workflow::Assessment;

/// 处理一个意图后的去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// 应用主结构
///
/// 持有唯一的测评会话，把终端输入转交给状态机
pub struct App<S = QuestionBank<LlmService>> {
    config: Config,
    source: S,
    assessment: Assessment,
    /// 配置界面当前选中的难度
    selected: Difficulty,
    /// 待显示的提示信息
    notice: Option<String>,
}

impl App<QuestionBank<LlmService>> {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        if let Some(path) = &config.log_file {
            logging::init_log_file(path)?;
        }
        logging::log_startup(&config);

        let source = QuestionBank::from_config(&config);
        Ok(Self::with_source(config, source))
    }
}

impl<S: QuestionSource> App<S> {
    pub fn with_source(config: Config, source: S) -> Self {
        let assessment = Assessment::new(config.submit_policy());
        Self {
            config,
            source,
            assessment,
            selected: Difficulty::default(),
            notice: None,
        }
    }

    pub fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    /// 运行应用主逻辑（标准输入输出）
    pub async fn run(&mut self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        self.run_with(stdin, &mut stdout).await
    }

    /// 在给定的输入输出上运行，读到 EOF 或 quit 时结束
    pub async fn run_with<R, W>(&mut self, reader: R, writer: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        self.draw(writer).await?;

        while let Some(line) = lines.next_line().await? {
            let intent = Intent::parse(&line, self.assessment.phase());
            debug!("输入: {:?} → {:?}", line, intent);

            if let Intent::Help = intent {
                writer.write_all(format!("{}\n", HELP_TEXT).as_bytes()).await?;
                continue;
            }

            // 先画出 Loading 界面，再等待出题
            if let Intent::Start(choice) = intent {
                let difficulty = choice.unwrap_or(self.selected);
                if let Some(difficulty) = self.assessment.begin(difficulty) {
                    self.selected = difficulty;
                    self.draw(writer).await?;
                    let questions = self.source.generate(difficulty).await;
                    self.assessment.finish_loading(questions);
                    self.record_phase();
                }
                self.draw(writer).await?;
                continue;
            }

            let message = match self.handle(intent).await {
                Flow::Quit => break,
                Flow::Continue => self.take_notice(),
            };
            self.draw(writer).await?;
            if let Some(message) = message {
                writer.write_all(format!("! {}\n", message).as_bytes()).await?;
            }
        }

        info!("👋 退出测评");
        writer.flush().await?;
        Ok(())
    }

    /// 处理单个意图
    pub async fn handle(&mut self, intent: Intent) -> Flow {
        let before = self.assessment.phase();
        let result = match intent {
            Intent::ChooseDifficulty(difficulty) => {
                if self.assessment.phase() == AssessmentPhase::Idle {
                    self.selected = difficulty;
                }
                Ok(())
            }
            Intent::Start(choice) => {
                let difficulty = choice.unwrap_or(self.selected);
                if self.assessment.start(&self.source, difficulty).await {
                    self.selected = difficulty;
                }
                Ok(())
            }
            Intent::Select(option) => self.assessment.select(option),
            Intent::Next => self.assessment.next(),
            Intent::Prev => self.assessment.prev(),
            Intent::Jump(index) => self.assessment.jump(index),
            Intent::Submit => self.assessment.submit(),
            Intent::Retry => self.assessment.retry(),
            Intent::Help => Ok(()),
            Intent::Quit => return Flow::Quit,
            Intent::Unknown(line) => {
                if !line.is_empty() {
                    self.notice = Some(format!("Unknown command: {} (type `help`)", line));
                }
                Ok(())
            }
        };

        if let Err(e) = result {
            warn!("⚠️ {}", e);
            self.notice = Some(e.to_string());
        }
        if self.assessment.phase() != before {
            self.record_phase();
        }
        Flow::Continue
    }

    fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// 阶段变化写入会话日志
    fn record_phase(&self) {
        let Some(path) = &self.config.log_file else {
            return;
        };
        let mut line = format!("phase → {}", self.assessment.phase());
        if let Some(report) = self.assessment.report() {
            line.push_str(&format!(
                " | score {}/{} ({}%, {})",
                report.correct_count,
                report.total_count,
                report.percentage,
                report.grade()
            ));
        }
        if let Err(e) = logging::append_log_line(path, &line) {
            warn!("⚠️ 写入日志文件失败 ({}): {}", path, e);
        }
    }

    async fn draw<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> Result<()> {
        let screen = screens::render(&self.assessment, self.selected);
        writer.write_all(b"\n").await?;
        writer.write_all(screen.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }
}
