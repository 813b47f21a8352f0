use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::tools::ToolContext;
use crate::Part;

use super::{ChatError, Completion, Conversation, Orchestrator};

impl Orchestrator {
    /// Run the loop for one user message and return the final text.
    ///
    /// Calls within a round run concurrently; their results go back to the
    /// model in the order the calls were proposed. Only a failed model
    /// request ends the exchange early.
    pub async fn run(
        &self,
        conversation: &mut Conversation,
        message: &str,
        ctx: &ToolContext,
        max_rounds: u32,
    ) -> Result<Completion, ChatError> {
        let mut response = conversation
            .send(vec![Part::Text(message.to_string())])
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
                break;
            }

            completion.rounds += 1;
            debug!(round = completion.rounds, calls = calls.len(), "executing tool round");

            let outcomes =
                join_all(calls.iter().map(|call| self.registry.invoke(call, ctx))).await;
            completion.tool_calls += outcomes.len();

            let parts = outcomes
                .into_iter()
                .map(|outcome| Part::FunctionResponse(outcome.into_response()))
                .collect();
            response = conversation.send(parts).await?;

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
        Ok(completion)
    }
}
