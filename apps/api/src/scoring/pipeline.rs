//! Scoring pipeline: fans out one task per aspect and joins them into a breakdown.
//!
//! Flow: registry → mapper (skip or payload) → invoker (per aspect, concurrent)
//!       → barrier → Breakdown::assemble.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::models::resume::ResumeRecord;
use crate::scoring::breakdown::{AspectOutcome, Breakdown, SkipReason};
use crate::scoring::invoker::ScoringInvoker;
use crate::scoring::mapper::Projection;
use crate::scoring::registry::registry;

/// Scores every registry aspect of `record`.
///
/// Aspects are independent: each runs on its own task and a failure in one
/// is recorded in that aspect's slot without touching the others. The call
/// returns only once every aspect has reached a terminal state.
///
/// `reference` fixes "today" for date-relative projections and stamps the
/// breakdown. Dropping the returned future aborts any in-flight model calls.
pub async fn score_resume(
    record: &ResumeRecord,
    invoker: Arc<ScoringInvoker>,
    reference: DateTime<Utc>,
) -> Breakdown {
    let today = reference.date_naive();
    let mut outcomes = BTreeMap::new();
    let mut tasks = JoinSet::new();

    for definition in registry() {
        match definition.project(record, today) {
            Projection::NoRelevantData => {
                info!("Skipping {}: no relevant data", definition.aspect);
                outcomes.insert(
                    definition.aspect,
                    AspectOutcome::Skipped {
                        reason: SkipReason::NoRelevantData,
                    },
                );
            }
            Projection::Payload(payload) => {
                let invoker = invoker.clone();
                tasks.spawn(async move {
                    let outcome = invoker.score(definition, &payload).await;
                    (definition.aspect, outcome)
                });
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((aspect, outcome)) => {
                if let Err(e) = &outcome {
                    warn!("Scoring {aspect} failed: {e}");
                }
                outcomes.insert(aspect, AspectOutcome::from(outcome));
            }
            // The aspect is filled in as failed by `Breakdown::assemble`.
            Err(e) => error!("Scoring task panicked or was cancelled: {e}"),
        }
    }

    let breakdown = Breakdown::assemble(outcomes, reference);

    info!(
        "Scoring run complete: {}/{} aspects scored, overall_score={:?}, total_tokens={}",
        breakdown.aspects.values().filter(|o| o.is_scored()).count(),
        breakdown.aspects.len(),
        breakdown.overall_score,
        breakdown.usage.total_tokens
    );

    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::scoring::breakdown::FailureKind;
    use crate::scoring::registry::Aspect;
    use crate::scoring::test_support::{
        all_valid, education_reply, experience_reply, licensure_reply, record_fixture,
        reference_time, technical_skills_reply, StubModel, StubReply,
    };

    fn invoker(stub: &Arc<StubModel>) -> Arc<ScoringInvoker> {
        Arc::new(ScoringInvoker::new(stub.clone(), Duration::from_secs(60)))
    }

    #[tokio::test]
    async fn test_all_aspects_scored_verbatim() {
        let stub = Arc::new(all_valid());
        let breakdown = score_resume(&record_fixture(), invoker(&stub), reference_time()).await;

        let expected = [
            (Aspect::EducationAndCertifications, education_reply()),
            (Aspect::Licensure, licensure_reply(10.0, 5.0)),
            (Aspect::Experience, experience_reply()),
            (Aspect::TechnicalSkills, technical_skills_reply()),
        ];
        for (aspect, reply) in expected {
            match breakdown.outcome(aspect) {
                Some(AspectOutcome::Scored { result, usage }) => {
                    assert_eq!(result, &reply, "{aspect} result was altered");
                    assert_eq!(*usage, StubModel::USAGE);
                }
                other => panic!("{aspect}: expected scored, got {other:?}"),
            }
        }

        assert_eq!(stub.calls().len(), 4);
        assert_eq!(breakdown.usage.total_tokens, 4 * StubModel::USAGE.total_tokens);
        // (7+6+5) + (10+5) + (7+4+5+5) + (5+4+1) = 64 of 25+15+25+13 = 78
        assert_eq!(breakdown.overall_score, Some(82));
        assert_eq!(breakdown.scored_at, reference_time());
    }

    #[tokio::test]
    async fn test_record_without_licenses_skips_licensure_without_calling_model() {
        let mut record = record_fixture();
        record.licenses.clear();
        let stub = Arc::new(all_valid());

        let breakdown = score_resume(&record, invoker(&stub), reference_time()).await;

        assert_eq!(
            breakdown.outcome(Aspect::Licensure),
            Some(&AspectOutcome::Skipped {
                reason: SkipReason::NoRelevantData
            })
        );
        assert!(!stub.called(Aspect::Licensure));
        assert_eq!(stub.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_licensure_failure_does_not_block_siblings() {
        let stub = Arc::new(all_valid().with(
            Aspect::Licensure,
            StubReply::ApiError(503, "overloaded".to_string()),
        ));

        let breakdown = score_resume(&record_fixture(), invoker(&stub), reference_time()).await;

        assert!(matches!(
            breakdown.outcome(Aspect::Licensure),
            Some(AspectOutcome::Failed {
                kind: FailureKind::Provider,
                ..
            })
        ));
        for aspect in [
            Aspect::EducationAndCertifications,
            Aspect::Experience,
            Aspect::TechnicalSkills,
        ] {
            assert!(breakdown.outcome(aspect).unwrap().is_scored(), "{aspect}");
        }
    }

    #[tokio::test]
    async fn test_invalid_reply_is_failed_not_scored() {
        let mut reply = experience_reply();
        reply["leadership_roles"]
            .as_object_mut()
            .unwrap()
            .remove("rating");
        let stub = Arc::new(all_valid().with(Aspect::Experience, StubReply::Object(reply)));

        let breakdown = score_resume(&record_fixture(), invoker(&stub), reference_time()).await;

        match breakdown.outcome(Aspect::Experience) {
            Some(AspectOutcome::Failed { kind, .. }) => {
                assert_eq!(*kind, FailureKind::SchemaValidation)
            }
            other => panic!("expected failed experience, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_same_input_twice_yields_identical_breakdown() {
        let record = record_fixture();
        let stub = Arc::new(all_valid());

        let first = score_resume(&record, invoker(&stub), reference_time()).await;
        let second = score_resume(&record, invoker(&stub), reference_time()).await;

        assert_eq!(first, second);
        let calls = stub.calls();
        let prompts_for = |aspect: Aspect| -> Vec<String> {
            calls
                .iter()
                .filter(|c| c.schema_name == aspect.as_str())
                .map(|c| c.prompt.clone())
                .collect()
        };
        for aspect in Aspect::ALL {
            let prompts = prompts_for(aspect);
            assert_eq!(prompts.len(), 2);
            assert_eq!(prompts[0], prompts[1], "{aspect} payload changed between runs");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_aspect_times_out_while_others_finish() {
        let stub = Arc::new(all_valid().with(Aspect::TechnicalSkills, StubReply::Hang));

        let breakdown = score_resume(&record_fixture(), invoker(&stub), reference_time()).await;

        assert!(matches!(
            breakdown.outcome(Aspect::TechnicalSkills),
            Some(AspectOutcome::Failed {
                kind: FailureKind::Timeout,
                ..
            })
        ));
        assert!(breakdown.outcome(Aspect::Experience).unwrap().is_scored());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_run_abandons_in_flight_calls() {
        let stub = Arc::new(
            StubModel::new()
                .with(Aspect::EducationAndCertifications, StubReply::Hang)
                .with(Aspect::Licensure, StubReply::Hang)
                .with(Aspect::Experience, StubReply::Hang)
                .with(Aspect::TechnicalSkills, StubReply::Hang),
        );
        let invoker = Arc::new(ScoringInvoker::new(stub.clone(), Duration::from_secs(7200)));
        let record = record_fixture();

        let run = tokio::time::timeout(
            Duration::from_secs(5),
            score_resume(&record, invoker, reference_time()),
        )
        .await;
        assert!(run.is_err());

        tokio::time::sleep(Duration::from_secs(7200)).await;
        assert_eq!(stub.calls().len(), 4);
        assert_eq!(stub.completed(), 0);
    }
}
