//! Bridge over any `rig` completion model.

use async_trait::async_trait;
use rig::agent::Agent;
use rig::completion::{CompletionModel, Prompt};

use crate::backend::{BackendError, GenerationBackend};

/// Backend that prompts a `rig` agent.
///
/// Build the agent with the provider client of your choice, e.g.
/// `client.agent(model).preamble(SYSTEM_PREAMBLE).build()`.
pub struct RigBackend<M: CompletionModel> {
    agent: Agent<M>,
}

impl<M: CompletionModel> RigBackend<M> {
    /// Wraps a configured agent.
    #[must_use]
    pub fn new(agent: Agent<M>) -> Self {
        Self { agent }
    }
}

#[async_trait]
impl<M> GenerationBackend for RigBackend<M>
where
    M: CompletionModel + 'static,
{
    async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        self.agent
            .prompt(prompt)
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig::agent::AgentBuilder;
    use rig::completion::{
        message::AssistantContent, CompletionError, CompletionRequest, CompletionResponse,
    };
    use rig::streaming::StreamingCompletionResponse;
    use rig::OneOrMany;

    use crate::exchange::QuestionExchange;
    use crate::question::QuestionKind;
    use crate::schema::example_for;

    /// Model that always answers with a fixed text, or fails when `reply` is `None`.
    #[derive(Clone)]
    struct CannedModel {
        reply: Option<String>,
    }

    impl CompletionModel for CannedModel {
        type Response = ();
        type StreamingResponse = ();
        type Client = ();

        fn make(_client: &Self::Client, _model: impl Into<String>) -> Self {
            Self { reply: None }
        }

        async fn completion(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse<Self::Response>, CompletionError> {
            let text = self
                .reply
                .clone()
                .ok_or_else(|| CompletionError::ProviderError("model offline".to_string()))?;
            Ok(CompletionResponse {
                choice: OneOrMany::one(AssistantContent::text(text)),
                usage: Default::default(),
                raw_response: (),
            })
        }

        async fn stream(
            &self,
            _request: CompletionRequest,
        ) -> Result<StreamingCompletionResponse<Self::StreamingResponse>, CompletionError> {
            Err(CompletionError::ProviderError("streaming unsupported".to_string()))
        }
    }

    fn backend(reply: Option<String>) -> RigBackend<CannedModel> {
        RigBackend::new(AgentBuilder::new(CannedModel { reply }).build())
    }

    #[tokio::test]
    async fn test_agent_reply_drives_the_exchange() {
        let reply = example_for(QuestionKind::MultipleChoice).to_string();
        let exchange = QuestionExchange::new(backend(Some(reply)));

        let question = exchange
            .generate(QuestionKind::MultipleChoice, None, 1)
            .await
            .unwrap();
        assert_eq!(question.kind(), QuestionKind::MultipleChoice);
    }

    #[tokio::test]
    async fn test_prompt_errors_become_unavailable() {
        let err = backend(None).complete("hello").await.unwrap_err();
        assert!(matches!(err, BackendError::Unavailable(m) if m.contains("model offline")));
    }
}
