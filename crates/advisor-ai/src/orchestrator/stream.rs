use tracing::{debug, warn};

use crate::tools::ToolContext;
use crate::{AiError, AiResponse, Part};

use super::{ChatError, ChatEvent, Completion, Conversation, EventSink, Orchestrator};

impl Orchestrator {
    /// Same loop as [`Orchestrator::run`], reporting every step to `sink`.
    ///
    /// Calls run one at a time so their events follow the model's call
    /// order. The last event is `response` on success and `error` when a
    /// model request fails.
    pub async fn run_streaming(
        &self,
        conversation: &mut Conversation,
        message: &str,
        ctx: &ToolContext,
        max_rounds: u32,
        sink: &EventSink,
    ) -> Result<Completion, ChatError> {
        sink.emit(ChatEvent::MessageStart {
            message: "Sending message...".into(),
        })
        .await?;

        let mut response =
            Self::checked(conversation.send(vec![Part::Text(message.to_string())]).await, sink)
                .await?;
        let mut completion = Completion::default();
        let mut last_text = response.text();

        loop {
            let calls = response.function_calls();
            if calls.is_empty() {
                break;
            }
            if completion.rounds >= max_rounds {
                warn!(max_rounds, pending = calls.len(), "tool round ceiling reached");
                completion.capped = true;
                sink.emit(ChatEvent::error(format!(
                    "Reached the maximum of {max_rounds} tool rounds"
                )))
                .await?;
                break;
            }

            completion.rounds += 1;
            let round = completion.rounds;
            let total = calls.len();
            let mut parts = Vec::with_capacity(total);

            for (i, call) in calls.iter().enumerate() {
                let name = call.name.clone();
                sink.emit(ChatEvent::FunctionCall {
                    function_name: name.clone(),
                    message: format!("Round {round} - running function {}/{total}: {name}", i + 1),
                })
                .await?;

                if self.registry.contains(&name) {
                    sink.emit(ChatEvent::FunctionExecuting {
                        function_name: name.clone(),
                        message: format!("Loading {name}..."),
                    })
                    .await?;
                }

                let outcome = self.registry.invoke(call, ctx).await;
                let event = match &outcome.result {
                    Ok(_) => ChatEvent::FunctionCompleted {
                        function_name: name.clone(),
                        message: format!("Function {name} completed"),
                    },
                    Err(e) => ChatEvent::error(format!("Error in {name}: {e}")),
                };
                sink.emit(event).await?;
                parts.push(Part::FunctionResponse(outcome.into_response()));
            }
            completion.tool_calls += total;

            sink.emit(ChatEvent::GeneratingResponse {
                message: format!("Processing results of round {round}..."),
            })
            .await?;
            debug!(round, calls = total, "returning tool results to model");

            response = Self::checked(conversation.send(parts).await, sink).await?;
            let text = response.text();
            if !text.is_empty() {
                last_text = text;
            }
        }

        completion.text = if completion.capped {
            last_text
        } else {
            response.text()
        };
        completion.usage = conversation.usage();

        sink.emit(ChatEvent::Response {
            content: completion.text.clone(),
            message: "Response generated".into(),
        })
        .await?;
        Ok(completion)
    }

    /// Report a failed model request to the client before propagating it.
    async fn checked(
        result: Result<AiResponse, AiError>,
        sink: &EventSink,
    ) -> Result<AiResponse, ChatError> {
        match result {
            Ok(response) => Ok(response),
            Err(e) => {
                sink.emit(ChatEvent::error(format!("Error generating response: {e}")))
                    .await?;
                Err(e.into())
            }
        }
    }
}
