//! Scoring Invoker: one schema-constrained model call per aspect.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm_client::prompts::with_json_only;
use crate::llm_client::{LlmError, ObjectRequest, StructuredModel, Usage};
use crate::scoring::breakdown::{AspectOutcome, FailureKind};
use crate::scoring::mapper::AspectPayload;
use crate::scoring::registry::AspectDefinition;
use crate::scoring::schema::SchemaViolation;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("model call failed: {0}")]
    Provider(#[from] LlmError),

    #[error("model call timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("{0}")]
    SchemaValidation(#[from] SchemaViolation),

    #[error("payload could not be serialized: {0}")]
    Payload(serde_json::Error),
}

impl ScoringError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ScoringError::Provider(_) | ScoringError::Payload(_) => FailureKind::Provider,
            ScoringError::Timeout(_) => FailureKind::Timeout,
            ScoringError::SchemaValidation(_) => FailureKind::SchemaValidation,
        }
    }
}

/// A validated result for one aspect.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredAspect {
    pub result: Value,
    pub usage: Usage,
}

impl From<Result<ScoredAspect, ScoringError>> for AspectOutcome {
    fn from(outcome: Result<ScoredAspect, ScoringError>) -> Self {
        match outcome {
            Ok(scored) => AspectOutcome::Scored {
                result: scored.result,
                usage: scored.usage,
            },
            Err(e) => AspectOutcome::Failed {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }
}

/// Sends rubric + payload + schema to the model and validates what comes back.
/// Retry policy for transient provider errors lives in the model client.
pub struct ScoringInvoker {
    model: Arc<dyn StructuredModel>,
    aspect_timeout: Duration,
}

impl ScoringInvoker {
    pub fn new(model: Arc<dyn StructuredModel>, aspect_timeout: Duration) -> Self {
        Self {
            model,
            aspect_timeout,
        }
    }

    pub async fn score(
        &self,
        definition: &AspectDefinition,
        payload: &AspectPayload,
    ) -> Result<ScoredAspect, ScoringError> {
        let aspect = definition.aspect;
        let prompt = serde_json::to_string(payload).map_err(ScoringError::Payload)?;
        let system = with_json_only(definition.rubric);

        debug!("Scoring {aspect}: {} byte payload", prompt.len());

        let request = ObjectRequest {
            schema_name: aspect.as_str(),
            system: &system,
            prompt: &prompt,
            schema: definition.output_schema(),
        };

        let response = tokio::time::timeout(self.aspect_timeout, self.model.generate_object(request))
            .await
            .map_err(|_| ScoringError::Timeout(self.aspect_timeout))?
            .map_err(|e| match e {
                // Non-JSON output is a schema failure, not a provider one.
                LlmError::Parse(err) => {
                    ScoringError::SchemaValidation(SchemaViolation::Malformed(err.to_string()))
                }
                other => ScoringError::Provider(other),
            })?;

        if let Err(violation) = definition.validate(&response.object) {
            warn!("{aspect} output rejected: {violation}");
            return Err(violation.into());
        }

        info!(
            "Scored {aspect}: prompt_tokens={}, completion_tokens={}",
            response.usage.prompt_tokens, response.usage.completion_tokens
        );

        Ok(ScoredAspect {
            result: response.object,
            usage: response.usage,
        })
    }
}
