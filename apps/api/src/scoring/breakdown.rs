use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm_client::Usage;
use crate::scoring::registry::{lookup, Aspect};
use crate::scoring::schema::rating_totals;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoRelevantData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Provider,
    Timeout,
    SchemaValidation,
}

/// Terminal state of one aspect in one scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AspectOutcome {
    Scored { result: Value, usage: Usage },
    Skipped { reason: SkipReason },
    Failed { kind: FailureKind, message: String },
}

impl AspectOutcome {
    pub fn is_scored(&self) -> bool {
        matches!(self, AspectOutcome::Scored { .. })
    }
}

/// Per-aspect scoring outcome for one resume. Recomputed wholesale on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub aspects: BTreeMap<Aspect, AspectOutcome>,
    /// Percentage of available rating points earned across scored aspects.
    /// `None` when nothing was scored.
    pub overall_score: Option<u32>,
    /// The `feedback` of each scored aspect, in registry order.
    #[serde(default)]
    pub summary: Option<String>,
    pub usage: Usage,
    pub scored_at: DateTime<Utc>,
}

impl Breakdown {
    /// Assembles a breakdown from finished outcomes. Aspects with no outcome
    /// are recorded as failed so every aspect appears exactly once.
    pub fn assemble(mut outcomes: BTreeMap<Aspect, AspectOutcome>, scored_at: DateTime<Utc>) -> Self {
        for aspect in Aspect::ALL {
            outcomes
                .entry(aspect)
                .or_insert_with(|| AspectOutcome::Failed {
                    kind: FailureKind::Provider,
                    message: "scoring task did not complete".to_string(),
                });
        }

        let mut usage = Usage::default();
        let mut achieved = 0.0;
        let mut available = 0.0;

        for (aspect, outcome) in &outcomes {
            if let AspectOutcome::Scored {
                result,
                usage: aspect_usage,
            } = outcome
            {
                usage.add(aspect_usage);
                let (earned, max) = rating_totals(result, lookup(*aspect).scales);
                achieved += earned;
                available += max;
            }
        }

        let overall_score = (available > 0.0)
            .then(|| ((achieved / available) * 100.0).round().clamp(0.0, 100.0) as u32);
        let summary = summarize(&outcomes);

        Self {
            aspects: outcomes,
            overall_score,
            summary,
            usage,
            scored_at,
        }
    }

    #[cfg(test)]
    pub fn outcome(&self, aspect: Aspect) -> Option<&AspectOutcome> {
        self.aspects.get(&aspect)
    }
}

fn summarize(outcomes: &BTreeMap<Aspect, AspectOutcome>) -> Option<String> {
    let parts: Vec<&str> = outcomes
        .values()
        .filter_map(|outcome| match outcome {
            AspectOutcome::Scored { result, .. } => result.get("feedback")?.as_str(),
            _ => None,
        })
        .map(str::trim)
        .filter(|feedback| !feedback.is_empty())
        .collect();

    (!parts.is_empty()).then(|| parts.join(" "))
}
