//! Mapping between the kestrel content model and the Ollama wire format.
//!
//! Request construction lives at the top, projection (wire chunk to
//! content delta) below it. Projection is pure and total: anything the
//! decoder accepts maps to exactly one content item.

use kestrel_types::{
    ChatMessage, ChatMessageContent, CompletionMetadata, PromptExecutionSettings, Role,
    StreamingChatMessageContent, StreamingTextContent, TextContent, ToolCall, ToolChoice,
};

use crate::types::{
    ChatRequest, ChatResponse, GenerateRequest, GenerateResponse, OllamaRequestOptions,
    WireChatMessage, WireFunction, WireFunctionCall, WireTool, WireToolCall,
};

// ─── Request mapping ─────────────────────────────────────────────────────────

/// Build an `/api/generate` request body.
pub(crate) fn to_generate_request(
    prompt: &str,
    settings: Option<&PromptExecutionSettings>,
    model: &str,
    default_keep_alive: Option<&str>,
    stream: bool,
) -> GenerateRequest {
    GenerateRequest {
        model: model.to_string(),
        prompt: prompt.to_string(),
        system: settings.and_then(|s| s.system_prompt.clone()),
        format: settings.and_then(|s| s.format.clone()),
        stream,
        keep_alive: keep_alive(settings, default_keep_alive),
        options: settings.and_then(to_options),
    }
}

/// Build an `/api/chat` request body.
///
/// A configured system prompt is prepended as a system message, the
/// way Ollama expects it for chat.
pub(crate) fn to_chat_request(
    messages: &[ChatMessage],
    settings: Option<&PromptExecutionSettings>,
    model: &str,
    default_keep_alive: Option<&str>,
    stream: bool,
) -> ChatRequest {
    let mut wire_messages: Vec<WireChatMessage> = Vec::with_capacity(messages.len() + 1);

    if let Some(system) = settings.and_then(|s| s.system_prompt.as_deref()) {
        wire_messages.push(WireChatMessage {
            role: "system".into(),
            content: system.to_string(),
            tool_calls: None,
        });
    }

    wire_messages.extend(messages.iter().map(to_wire_message));

    ChatRequest {
        model: model.to_string(),
        messages: wire_messages,
        tools: settings.map(to_wire_tools).unwrap_or_default(),
        format: settings.and_then(|s| s.format.clone()),
        stream,
        keep_alive: keep_alive(settings, default_keep_alive),
        options: settings.and_then(to_options),
    }
}

fn keep_alive(
    settings: Option<&PromptExecutionSettings>,
    default_keep_alive: Option<&str>,
) -> Option<String> {
    settings
        .and_then(|s| s.keep_alive.clone())
        .or_else(|| default_keep_alive.map(str::to_string))
}

fn to_wire_message(message: &ChatMessage) -> WireChatMessage {
    let tool_calls = if message.tool_calls.is_empty() {
        None
    } else {
        Some(
            message
                .tool_calls
                .iter()
                .map(|tc| WireToolCall {
                    function: WireFunctionCall {
                        name: tc.name.clone(),
                        arguments: tc.arguments.clone(),
                    },
                })
                .collect(),
        )
    };

    WireChatMessage {
        role: role_to_wire(message.role).to_string(),
        content: message.content.clone(),
        tool_calls,
    }
}

/// Map configured tools to the wire format.
///
/// `ToolChoice::None` withholds the tools entirely; Ollama has no
/// `tool_choice` field, so withholding is the only way to forbid
/// tool use.
fn to_wire_tools(settings: &PromptExecutionSettings) -> Vec<WireTool> {
    if settings.tool_choice == Some(ToolChoice::None) {
        return Vec::new();
    }

    settings
        .tools
        .iter()
        .map(|t| WireTool {
            tool_type: "function".into(),
            function: WireFunction {
                name: t.name.clone(),
                description: t.description.clone(),
                parameters: t.parameters.clone(),
            },
        })
        .collect()
}

fn to_options(settings: &PromptExecutionSettings) -> Option<OllamaRequestOptions> {
    let options = OllamaRequestOptions {
        num_ctx: settings.max_tokens,
        temperature: settings.temperature,
        top_p: settings.top_p,
        top_k: settings.top_k,
        frequency_penalty: settings.frequency_penalty,
        presence_penalty: settings.presence_penalty,
        seed: settings.seed,
        stop: if settings.stop.is_empty() {
            None
        } else {
            Some(settings.stop.clone())
        },
    };

    if options == OllamaRequestOptions::default() {
        None
    } else {
        Some(options)
    }
}

fn role_to_wire(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    }
}

fn role_from_wire(role: &str) -> Option<Role> {
    match role {
        "system" => Some(Role::System),
        "user" => Some(Role::User),
        "assistant" => Some(Role::Assistant),
        "tool" => Some(Role::Tool),
        _ => None,
    }
}

// ─── Projection ──────────────────────────────────────────────────────────────

/// Project one `/api/generate` chunk into a text delta.
///
/// Stateless: text completions carry no role. One delta per chunk,
/// metadata copied verbatim.
pub(crate) fn project_generate_chunk(chunk: GenerateResponse) -> StreamingTextContent {
    let metadata = generate_metadata(&chunk);
    StreamingTextContent {
        text: chunk.response,
        model_id: Some(chunk.model),
        metadata: Some(metadata),
    }
}

/// Projects `/api/chat` chunks into chat deltas, emitting the role on
/// the first chunk that carries one and never again.
///
/// One projector per streaming call; the `role_emitted` flag is the
/// only cross-chunk state.
pub(crate) struct ChatChunkProjector {
    role_emitted: bool,
}

impl ChatChunkProjector {
    pub(crate) fn new() -> Self {
        Self {
            role_emitted: false,
        }
    }

    /// Project one chunk. Pure in (chunk, role_emitted); cannot fail.
    pub(crate) fn project(&mut self, chunk: ChatResponse) -> StreamingChatMessageContent {
        let metadata = chat_metadata(&chunk);

        let (content, wire_role, tool_calls) = match chunk.message {
            Some(message) => (
                message.content,
                role_from_wire(&message.role),
                project_tool_calls(message.tool_calls),
            ),
            None => (String::new(), None, Vec::new()),
        };

        let role = if self.role_emitted { None } else { wire_role };
        if role.is_some() {
            self.role_emitted = true;
        }

        StreamingChatMessageContent {
            role,
            content,
            tool_calls,
            model_id: Some(chunk.model),
            metadata: Some(metadata),
        }
    }
}

/// Project a non-streaming `/api/generate` response as a single
/// terminal chunk.
pub(crate) fn text_content_from_response(response: GenerateResponse) -> TextContent {
    let metadata = generate_metadata(&response);
    TextContent {
        text: response.response,
        model_id: Some(response.model),
        metadata: Some(metadata),
    }
}

/// Project a non-streaming `/api/chat` response as a single terminal
/// chunk (role included).
///
/// `ChatMessageContent.role` is not optional, so an unrecognized wire
/// role falls back to `Assistant` here. The streaming projector keeps
/// `role: None` for the same input because its role field is optional.
pub(crate) fn chat_content_from_response(response: ChatResponse) -> ChatMessageContent {
    let metadata = chat_metadata(&response);

    let (content, role, tool_calls) = match response.message {
        Some(message) => (
            message.content,
            role_from_wire(&message.role).unwrap_or(Role::Assistant),
            project_tool_calls(message.tool_calls),
        ),
        None => (String::new(), Role::Assistant, Vec::new()),
    };

    ChatMessageContent {
        role,
        content,
        tool_calls,
        model_id: Some(response.model),
        metadata: Some(metadata),
    }
}

/// Ollama sends no tool call IDs, so each projected call gets a
/// synthesized UUID.
fn project_tool_calls(tool_calls: Option<Vec<WireToolCall>>) -> Vec<ToolCall> {
    tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| ToolCall {
            id: format!("ollama_{}", uuid::Uuid::new_v4()),
            name: tc.function.name,
            arguments: tc.function.arguments,
        })
        .collect()
}

fn generate_metadata(chunk: &GenerateResponse) -> CompletionMetadata {
    CompletionMetadata {
        created_at: Some(chunk.created_at),
        done: chunk.done,
        done_reason: chunk.done_reason.clone(),
        total_duration: chunk.total_duration,
        load_duration: chunk.load_duration,
        prompt_eval_count: chunk.prompt_eval_count,
        prompt_eval_duration: chunk.prompt_eval_duration,
        eval_count: chunk.eval_count,
        eval_duration: chunk.eval_duration,
        context: chunk.context.clone(),
    }
}

fn chat_metadata(chunk: &ChatResponse) -> CompletionMetadata {
    CompletionMetadata {
        created_at: Some(chunk.created_at),
        done: chunk.done,
        done_reason: chunk.done_reason.clone(),
        total_duration: chunk.total_duration,
        load_duration: chunk.load_duration,
        prompt_eval_count: chunk.prompt_eval_count,
        prompt_eval_duration: chunk.prompt_eval_duration,
        eval_count: chunk.eval_count,
        eval_duration: chunk.eval_duration,
        context: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_types::ToolDefinition;
    use serde_json::json;

    fn full_settings() -> PromptExecutionSettings {
        PromptExecutionSettings::new()
            .with_max_tokens(100)
            .with_temperature(0.5)
            .with_top_p(0.2)
            .with_top_k(100)
            .with_frequency_penalty(1.2)
            .with_presence_penalty(1.4)
            .with_seed(110)
            .with_stop(["stop_sequence"])
            .with_keep_alive("5m")
            .with_system_prompt("You are an AI Assistant")
            .with_format(json!("json"))
    }

    fn generate_chunk(json_line: &str) -> GenerateResponse {
        serde_json::from_str(json_line).expect("valid chunk")
    }

    fn chat_chunk(json_line: &str) -> ChatResponse {
        serde_json::from_str(json_line).expect("valid chunk")
    }

    #[test]
    fn generate_request_maps_settings_to_wire_fields() {
        let settings = full_settings();
        let request = to_generate_request("Prompt", Some(&settings), "fake-model", None, false);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "fake-model");
        assert_eq!(json["prompt"], "Prompt");
        assert_eq!(json["system"], "You are an AI Assistant");
        assert_eq!(json["keep_alive"], "5m");
        assert_eq!(json["format"], "json");
        assert_eq!(json["stream"], false);

        assert_eq!(json["options"]["num_ctx"], 100);
        assert_eq!(json["options"]["temperature"], 0.5);
        assert_eq!(json["options"]["top_p"], 0.2);
        assert_eq!(json["options"]["top_k"], 100);
        assert_eq!(json["options"]["frequency_penalty"], 1.2);
        assert_eq!(json["options"]["presence_penalty"], 1.4);
        assert_eq!(json["options"]["seed"], 110);
        assert_eq!(json["options"]["stop"][0], "stop_sequence");
    }

    #[test]
    fn generate_request_without_settings_has_no_options() {
        let request = to_generate_request("Prompt", None, "fake-model", None, true);
        assert!(request.options.is_none());
        assert!(request.system.is_none());
        assert!(request.stream);
    }

    #[test]
    fn empty_settings_produce_no_options_object() {
        let settings = PromptExecutionSettings::new();
        let request = to_generate_request("Prompt", Some(&settings), "m", None, false);
        assert!(request.options.is_none());
    }

    #[test]
    fn client_default_keep_alive_applies_when_settings_leave_it_unset() {
        let request = to_generate_request("Prompt", None, "m", Some("10m"), false);
        assert_eq!(request.keep_alive.as_deref(), Some("10m"));

        let settings = PromptExecutionSettings::new().with_keep_alive("0");
        let request = to_generate_request("Prompt", Some(&settings), "m", Some("10m"), false);
        assert_eq!(request.keep_alive.as_deref(), Some("0"));
    }

    #[test]
    fn chat_request_prepends_system_prompt() {
        let settings = PromptExecutionSettings::new().with_system_prompt("Be helpful.");
        let messages = [ChatMessage::user("Hello")];
        let request = to_chat_request(&messages, Some(&settings), "m", None, false);

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[0].content, "Be helpful.");
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.messages[1].content, "Hello");
    }

    #[test]
    fn chat_request_maps_roles_and_tool_calls() {
        let mut assistant = ChatMessage::assistant("");
        assistant.tool_calls.push(ToolCall {
            id: "ollama_1".into(),
            name: "search".into(),
            arguments: json!({"query": "rust"}),
        });
        let messages = [
            ChatMessage::system("sys"),
            ChatMessage::user("hi"),
            assistant,
            ChatMessage::tool("result"),
        ];

        let request = to_chat_request(&messages, None, "m", None, true);
        let roles: Vec<&str> = request.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "tool"]);

        let tool_calls = request.messages[2].tool_calls.as_ref().unwrap();
        assert_eq!(tool_calls[0].function.name, "search");
        assert_eq!(tool_calls[0].function.arguments, json!({"query": "rust"}));
    }

    #[test]
    fn chat_request_includes_tools_unless_choice_is_none() {
        let tool = ToolDefinition {
            name: "get_weather".into(),
            description: "Get current weather".into(),
            parameters: json!({"type": "object"}),
        };

        let settings = PromptExecutionSettings::new().with_tools(vec![tool.clone()]);
        let request = to_chat_request(&[ChatMessage::user("hi")], Some(&settings), "m", None, false);
        assert_eq!(request.tools.len(), 1);
        assert_eq!(request.tools[0].function.name, "get_weather");
        assert_eq!(request.tools[0].tool_type, "function");

        let settings = settings.with_tool_choice(ToolChoice::None);
        let request = to_chat_request(&[ChatMessage::user("hi")], Some(&settings), "m", None, false);
        assert!(request.tools.is_empty());
    }

    #[test]
    fn two_chunk_stream_projects_delta_then_terminal() {
        // First chunk carries text, second is terminal with metadata.
        let delta1 = project_generate_chunk(generate_chunk(
            r#"{"model":"llama3","created_at":"2024-06-09T06:56:37.8054647+00:00","response":"Hello","done":false}"#,
        ));
        let delta2 = project_generate_chunk(generate_chunk(
            r#"{"model":"llama3","created_at":"2024-06-09T06:56:38.8054647+00:00","response":"","done":true,"done_reason":"stop","eval_count":5}"#,
        ));

        assert_eq!(delta1.text, "Hello");
        let meta1 = delta1.metadata.unwrap();
        assert_ne!(meta1.done, Some(true));
        assert!(meta1.done_reason.is_none());
        assert!(meta1.eval_count.is_none());

        assert_eq!(delta2.text, "");
        let meta2 = delta2.metadata.unwrap();
        assert_eq!(meta2.done, Some(true));
        assert_eq!(meta2.done_reason.as_deref(), Some("stop"));
        assert_eq!(meta2.eval_count, Some(5));

        assert_eq!(format!("{}{}", delta1.text, delta2.text), "Hello");
    }

    #[test]
    fn generate_terminal_chunk_carries_context() {
        let delta = project_generate_chunk(generate_chunk(
            r#"{"model":"llama3","created_at":"2024-06-09T06:56:37.8054647+00:00","response":"","done":true,"done_reason":"stop","context":[1,2,3],"total_duration":6078554632,"load_duration":1124087488,"prompt_eval_count":11,"prompt_eval_duration":480050000,"eval_count":27,"eval_duration":4431666000}"#,
        ));

        let meta = delta.metadata.unwrap();
        assert_eq!(meta.context, Some(vec![1, 2, 3]));
        assert_eq!(meta.total_duration, Some(6_078_554_632));
        assert_eq!(meta.load_duration, Some(1_124_087_488));
        assert_eq!(meta.prompt_eval_count, Some(11));
        assert_eq!(meta.prompt_eval_duration, Some(480_050_000));
        assert_eq!(meta.eval_count, Some(27));
        assert_eq!(meta.eval_duration, Some(4_431_666_000));
        assert_eq!(delta.model_id.as_deref(), Some("llama3"));
    }

    #[test]
    fn chat_projector_emits_role_exactly_once() {
        let mut projector = ChatChunkProjector::new();

        // Ollama repeats the role on every chunk; only the first projects it.
        let first = projector.project(chat_chunk(
            r#"{"model":"llama3.2","created_at":"2024-06-09T06:56:37.8054647+00:00","message":{"role":"assistant","content":"Hello"},"done":false}"#,
        ));
        let second = projector.project(chat_chunk(
            r#"{"model":"llama3.2","created_at":"2024-06-09T06:56:38.8054647+00:00","message":{"role":"assistant","content":" world"},"done":false}"#,
        ));
        let last = projector.project(chat_chunk(
            r#"{"model":"llama3.2","created_at":"2024-06-09T06:56:39.8054647+00:00","message":{"role":"assistant","content":""},"done":true,"done_reason":"stop"}"#,
        ));

        assert_eq!(first.role, Some(Role::Assistant));
        assert_eq!(second.role, None);
        assert_eq!(last.role, None);
        assert_eq!(
            format!("{}{}{}", first.content, second.content, last.content),
            "Hello world"
        );
    }

    #[test]
    fn chat_projector_state_is_per_instance() {
        let line = r#"{"model":"llama3.2","created_at":"2024-06-09T06:56:37.8054647+00:00","message":{"role":"assistant","content":"hi"},"done":false}"#;

        let mut first_call = ChatChunkProjector::new();
        let mut second_call = ChatChunkProjector::new();

        assert!(first_call.project(chat_chunk(line)).role.is_some());
        assert!(second_call.project(chat_chunk(line)).role.is_some());
    }

    #[test]
    fn chat_projector_synthesizes_unique_tool_call_ids() {
        let mut projector = ChatChunkProjector::new();
        let delta = projector.project(chat_chunk(
            r#"{"model":"llama3.2","created_at":"2024-06-09T06:56:37.8054647+00:00","message":{"role":"assistant","content":"","tool_calls":[{"function":{"name":"search","arguments":{"query":"rust"}}},{"function":{"name":"fetch","arguments":{"url":"x"}}}]},"done":true,"done_reason":"stop"}"#,
        ));

        assert_eq!(delta.tool_calls.len(), 2);
        assert_eq!(delta.tool_calls[0].name, "search");
        assert_eq!(delta.tool_calls[0].arguments, json!({"query": "rust"}));
        assert!(delta.tool_calls[0].id.starts_with("ollama_"));
        assert_ne!(delta.tool_calls[0].id, delta.tool_calls[1].id);
    }

    #[test]
    fn one_shot_text_response_projects_as_terminal_chunk() {
        let content = text_content_from_response(generate_chunk(
            r#"{"model":"llama3","created_at":"2024-06-09T02:24:37.6058572+00:00","response":"This is a test generation response","done":true,"done_reason":"stop","context":[1,2],"total_duration":4285976012,"load_duration":819378,"prompt_eval_count":10,"prompt_eval_duration":200559000,"eval_count":26,"eval_duration":4042076000}"#,
        ));

        assert_eq!(content.text, "This is a test generation response");
        assert_eq!(content.model_id.as_deref(), Some("llama3"));

        let meta = content.metadata.unwrap();
        assert_eq!(meta.done, Some(true));
        assert_eq!(meta.done_reason.as_deref(), Some("stop"));
        assert_eq!(meta.total_duration, Some(4_285_976_012));
        assert_eq!(meta.load_duration, Some(819_378));
        assert_eq!(meta.prompt_eval_count, Some(10));
        assert_eq!(meta.eval_count, Some(26));
        assert!(meta.context.is_some());
    }

    #[test]
    fn one_shot_chat_response_includes_role() {
        let content = chat_content_from_response(chat_chunk(
            r#"{"model":"llama3.2","created_at":"2024-06-09T02:24:37.6058572+00:00","message":{"role":"assistant","content":"Hello!"},"done":true,"done_reason":"stop","eval_count":5,"prompt_eval_count":10}"#,
        ));

        assert_eq!(content.role, Role::Assistant);
        assert_eq!(content.content, "Hello!");
        assert_eq!(content.metadata.unwrap().done, Some(true));
    }

    #[test]
    fn unknown_wire_role_falls_back_to_assistant_in_one_shot() {
        let content = chat_content_from_response(chat_chunk(
            r#"{"model":"llama3.2","created_at":"2024-06-09T02:24:37.6058572+00:00","message":{"role":"narrator","content":"hi"},"done":true}"#,
        ));
        assert_eq!(content.role, Role::Assistant);
    }

    #[test]
    fn unknown_wire_role_projects_no_role() {
        let mut projector = ChatChunkProjector::new();
        let delta = projector.project(chat_chunk(
            r#"{"model":"llama3.2","created_at":"2024-06-09T02:24:37.6058572+00:00","message":{"role":"narrator","content":"hi"},"done":false}"#,
        ));
        assert_eq!(delta.role, None);
    }

    #[test]
    fn created_at_is_parsed_into_metadata() {
        let delta = project_generate_chunk(generate_chunk(
            r#"{"model":"llama3","created_at":"2024-06-09T02:24:37.6058572+00:00","response":"x"}"#,
        ));
        let created_at = delta.metadata.unwrap().created_at.unwrap();
        assert_eq!(created_at.timezone(), chrono::Utc);
        assert_eq!(
            created_at,
            "2024-06-09T02:24:37.6058572+00:00"
                .parse::<chrono::DateTime<chrono::Utc>>()
                .unwrap()
        );
    }
}
