//! LLM 服务 - 业务能力层
//!
//! 只负责"在线出题"能力，不关心兜底和流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Gemini 的 OpenAI 兼容端点）

use std::sync::OnceLock;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use regex::Regex;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, LlmError};
use crate::models::{Difficulty, RawQuestion, OPTION_COUNT};
use crate::services::question_bank::QuestionGenerator;

const SYSTEM_MESSAGE: &str = "You are a senior technical interviewer. \
    You write precise multiple-choice questions with exactly one correct answer \
    and always reply with raw JSON only.";

/// LLM 服务
///
/// 职责：
/// - 调用 LLM API 生成题目
/// - 解析返回的 JSON
/// - 不分配题目 ID，不做兜底
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(api_key: &str, config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        }
    }

    /// 若配置了 API Key 则创建服务
    pub fn from_config(config: &Config) -> Option<Self> {
        config
            .llm_api_key
            .as_deref()
            .map(|api_key| Self::new(api_key, config))
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（已 trim）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(|e| AppError::llm_api_failed(&self.model_name, e))?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| AppError::llm_api_failed(&self.model_name, e))?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.7)
            .max_tokens(4096u32)
            .build()
            .map_err(|e| AppError::llm_api_failed(&self.model_name, e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }
}

impl QuestionGenerator for LlmService {
    async fn generate_questions(
        &self,
        difficulty: Difficulty,
        count: usize,
    ) -> AppResult<Vec<RawQuestion>> {
        let prompt = build_generation_prompt(difficulty, count);
        let response = self.send_to_llm(&prompt, Some(SYSTEM_MESSAGE)).await?;
        parse_generated_questions(&response)
    }
}

/// 题目数组的 JSON Schema
pub fn question_schema() -> serde_json::Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "questionText": { "type": "string" },
                "options": {
                    "type": "array",
                    "items": { "type": "string" },
                    "minItems": OPTION_COUNT,
                    "maxItems": OPTION_COUNT
                },
                "correctIndex": {
                    "type": "integer",
                    "description": "Index of the correct option (0-3)"
                },
                "topic": { "type": "string" }
            },
            "required": ["questionText", "options", "correctIndex", "topic"]
        }
    })
}

/// 构建出题 prompt
pub fn build_generation_prompt(difficulty: Difficulty, count: usize) -> String {
    let schema = serde_json::to_string_pretty(&question_schema()).unwrap_or_default();

    format!(
        r#"Generate {count} challenging technical interview multiple-choice questions suitable for a {difficulty} Developer role.
Mix topics including Algorithms, System Design, Database, and Modern Web Technologies.
Every question must have exactly {OPTION_COUNT} distinct options and exactly one correct answer.
Ensure strict JSON output: reply with a single JSON array that conforms to this schema and nothing else.

{schema}"#
    )
}

fn code_fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("code fence regex is valid")
    })
}

/// 解析 LLM 返回的题目数组
///
/// 兼容被 Markdown 代码块包裹的响应
pub fn parse_generated_questions(response: &str) -> AppResult<Vec<RawQuestion>> {
    let body = code_fence_regex()
        .captures(response)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(response)
        .trim();

    let questions: Vec<RawQuestion> = serde_json::from_str(body)?;
    debug!("解析到 {} 道题目", questions.len());
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[{"questionText":"Which index type suits range queries?","options":["Hash","B-Tree","Bitmap","None"],"correctIndex":1,"topic":"Database"}]"#;

    #[test]
    fn test_parse_plain_json() {
        let questions = parse_generated_questions(SAMPLE).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_index, 1);
    }

    #[test]
    fn test_parse_fenced_json() {
        let fenced = format!("Here you go:\n```json\n{}\n```", SAMPLE);
        let questions = parse_generated_questions(&fenced).unwrap();
        assert_eq!(questions[0].topic, "Database");
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let broken = r#"[{"questionText":"x","options":["a","b","c","d"],"topic":"y"}]"#;
        assert!(matches!(
            parse_generated_questions(broken),
            Err(AppError::Llm(LlmError::JsonParseFailed { .. }))
        ));
    }

    #[test]
    fn test_prompt_mentions_difficulty_and_count() {
        let prompt = build_generation_prompt(Difficulty::Senior, 5);
        assert!(prompt.contains("Generate 5 challenging"));
        assert!(prompt.contains("Senior Developer"));
        assert!(prompt.contains("\"correctIndex\""));
    }

    /// 测试在线出题（需要真实 API Key）
    ///
    /// 运行方式：
    /// ```bash
    /// API_KEY=... cargo test test_generate_live -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_generate_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env().expect("配置加载失败");
        let service = LlmService::from_config(&config).expect("未配置 API_KEY");

        let questions = service
            .generate_questions(Difficulty::Mid, 5)
            .await
            .expect("在线出题失败");

        for q in &questions {
            println!("[{}] {}", q.topic, q.question_text);
        }
        assert_eq!(questions.len(), 5);
    }
}
