use super::prompt::Prompt;
use crate::error::{Error, Result};
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ContentBlockDelta, ConversationRole, ConverseStreamOutput,
    InferenceConfiguration, Message, SystemContentBlock,
};
use aws_sdk_bedrockruntime::Client;
use aws_smithy_types::error::display::DisplayErrorContext;
use std::io::Write;
use tracing::{debug, error, info};

pub const MAX_TOKENS: i32 = 2000;
pub const TEMPERATURE: f32 = 0.0;

// ============================================================================
// Stream Types
// ============================================================================

/// Token counts reported at the end of a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: i32,
    pub output_tokens: i32,
    pub total_tokens: i32,
}

/// The subset of Converse stream events that is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    MessageStart { role: String },
    Delta(String),
    MessageStop { stop_reason: String },
    Metadata {
        usage: Option<TokenUsage>,
        latency_ms: Option<i64>,
    },
}

impl StreamEvent {
    /// `None` for events that carry nothing to render.
    pub fn from_output(output: ConverseStreamOutput) -> Option<Self> {
        match output {
            ConverseStreamOutput::MessageStart(start) => Some(StreamEvent::MessageStart {
                role: start.role.as_str().to_string(),
            }),
            ConverseStreamOutput::ContentBlockDelta(delta) => match delta.delta {
                Some(ContentBlockDelta::Text(text)) => Some(StreamEvent::Delta(text)),
                _ => None,
            },
            ConverseStreamOutput::MessageStop(stop) => Some(StreamEvent::MessageStop {
                stop_reason: stop.stop_reason.as_str().to_string(),
            }),
            ConverseStreamOutput::Metadata(metadata) => Some(StreamEvent::Metadata {
                usage: metadata.usage.map(|u| TokenUsage {
                    input_tokens: u.input_tokens,
                    output_tokens: u.output_tokens,
                    total_tokens: u.total_tokens,
                }),
                latency_ms: metadata.metrics.map(|m| m.latency_ms),
            }),
            _ => None,
        }
    }
}

/// What a finished stream produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub role: Option<String>,
    pub text: String,
    pub stop_reason: Option<String>,
    pub usage: Option<TokenUsage>,
    pub latency_ms: Option<i64>,
}

// ============================================================================
// Rendering
// ============================================================================

/// Writes stream events to `out` as they arrive and accumulates a summary.
pub struct StreamRenderer<W: Write> {
    out: W,
    summary: StreamSummary,
}

impl<W: Write> StreamRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            summary: StreamSummary::default(),
        }
    }

    pub fn render(&mut self, event: StreamEvent) -> std::io::Result<()> {
        match event {
            StreamEvent::MessageStart { role } => {
                writeln!(self.out, "\nRole: {role}")?;
                self.summary.role = Some(role);
            }
            StreamEvent::Delta(text) => {
                write!(self.out, "{text}")?;
                self.out.flush()?;
                self.summary.text.push_str(&text);
            }
            StreamEvent::MessageStop { stop_reason } => {
                writeln!(self.out, "\n\nStop reason: {stop_reason}")?;
                self.summary.stop_reason = Some(stop_reason);
            }
            StreamEvent::Metadata { usage, latency_ms } => {
                writeln!(self.out, "=====================")?;
                if let Some(usage) = usage {
                    writeln!(self.out, "\nToken usage\n")?;
                    writeln!(self.out, "Input tokens: {}", usage.input_tokens)?;
                    writeln!(self.out, "Output tokens: {}", usage.output_tokens)?;
                    writeln!(self.out, "Total tokens: {}", usage.total_tokens)?;
                    self.summary.usage = Some(usage);
                }
                if let Some(latency) = latency_ms {
                    writeln!(self.out, "Latency: {latency} milliseconds")?;
                    self.summary.latency_ms = Some(latency);
                }
            }
        }
        Ok(())
    }

    pub fn finish(self) -> StreamSummary {
        self.summary
    }
}

// ============================================================================
// Request
// ============================================================================

/// Titan and Mistral models reject a separate system prompt, so it is sent
/// as the leading user content block instead.
pub fn folds_system_prompt(model_id: &str) -> bool {
    let lowered = model_id.to_lowercase();
    lowered.contains("titan") || lowered.contains("mistral")
}

/// System blocks and the single user message for `model_id`.
pub fn build_conversation(
    model_id: &str,
    prompt: &Prompt,
) -> Result<(Option<Vec<SystemContentBlock>>, Message)> {
    let mut content = Vec::with_capacity(2);
    let system = if folds_system_prompt(model_id) {
        content.push(ContentBlock::Text(prompt.system.clone()));
        None
    } else {
        Some(vec![SystemContentBlock::Text(prompt.system.clone())])
    };
    content.push(ContentBlock::Text(prompt.user.clone()));

    let message = Message::builder()
        .role(ConversationRole::User)
        .set_content(Some(content))
        .build()
        .map_err(|e| Error::Invocation {
            model_id: model_id.to_string(),
            message: format!("failed to build message: {e}"),
        })?;

    Ok((system, message))
}

/// Stream a completion for `prompt` from `model_id` into `out`.
pub async fn invoke_model<W: Write>(
    client: &Client,
    model_id: &str,
    prompt: &Prompt,
    out: W,
) -> Result<StreamSummary> {
    let invocation_error = |message: String| Error::Invocation {
        model_id: model_id.to_string(),
        message,
    };

    let (system, message) = build_conversation(model_id, prompt)?;
    let inference_config = InferenceConfiguration::builder()
        .max_tokens(MAX_TOKENS)
        .temperature(TEMPERATURE)
        .build();

    info!(model_id, "Invoking model");
    let output = client
        .converse_stream()
        .model_id(model_id)
        .set_system(system)
        .messages(message)
        .inference_config(inference_config)
        .send()
        .await
        .map_err(|e| {
            let detail = DisplayErrorContext(&e).to_string();
            error!(model_id, error = %detail, "Model invocation failed");
            invocation_error(detail)
        })?;

    let mut renderer = StreamRenderer::new(out);
    let mut stream = output.stream;
    loop {
        match stream.recv().await {
            Ok(Some(output)) => {
                if let Some(event) = StreamEvent::from_output(output) {
                    debug!(?event, "Stream event");
                    renderer
                        .render(event)
                        .map_err(|e| invocation_error(format!("failed to write output: {e}")))?;
                }
            }
            Ok(None) => break,
            Err(e) => {
                let detail = DisplayErrorContext(&e).to_string();
                error!(model_id, error = %detail, "Stream failed");
                return Err(invocation_error(detail));
            }
        }
    }

    let summary = renderer.finish();
    info!(
        model_id,
        stop_reason = summary.stop_reason.as_deref().unwrap_or("<none>"),
        "Invocation finished"
    );
    Ok(summary)
}
