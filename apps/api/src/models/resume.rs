use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Row in the `resumes` table. `structured_resume` holds the extracted
/// [`ResumeRecord`]; `resume_feedback` holds the last scoring breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub campaign_id: Option<Uuid>,
    pub file_name: Option<String>,
    pub structured_resume: Option<Value>,
    pub resume_feedback: Option<Value>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Canonical Resume Record
// ────────────────────────────────────────────────────────────────────────────

/// Normalized extraction of a single resume. Produced once by the extraction
/// step and treated as read-only by scoring.
///
/// Wire names are camelCase to match what the extractor writes into
/// `resumes.structured_resume`. Every field except the candidate's name may be
/// missing or `null`; collections and strings then read as empty so partially
/// extracted documents still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub basics: Basics,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub specializations: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub positions: Vec<Position>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub clinical_experience: Vec<ClinicalExperience>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub volunteer_work: Vec<VolunteerWork>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub achievements: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub schools: Vec<School>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub licenses: Vec<License>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub certificates: Vec<Certificate>,
}

/// Candidate identity and headline facts. Names are the only required fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Basics {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub current_job_title: Option<String>,
    #[serde(default)]
    pub current_company: Option<String>,
    #[serde(default)]
    pub professional_summary: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linked_in: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub social: Vec<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default, deserialize_with = "whole_number")]
    pub total_experience_in_months: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
}

/// Year/month pair as extracted. Either half may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearMonth {
    #[serde(default, deserialize_with = "whole_number")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "whole_number")]
    pub month: Option<u32>,
}

impl YearMonth {
    #[cfg(test)]
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year: Some(year),
            month: Some(month),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeniorityLevel {
    #[serde(rename = "Fresher-level")]
    Fresher,
    #[serde(rename = "Associate-level")]
    Associate,
    #[serde(rename = "Mid-level")]
    Mid,
    #[serde(rename = "Senior-level")]
    Senior,
    #[serde(rename = "Executive-level")]
    Executive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default, deserialize_with = "null_as_default")]
    pub org: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start: YearMonth,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end: YearMonth,
    #[serde(default)]
    pub level: Option<SeniorityLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    #[serde(default, deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub field: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start: YearMonth,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end: YearMonth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    #[serde(default, deserialize_with = "null_as_default")]
    pub license_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub issuing_authority: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default)]
    pub issue_date: Option<YearMonth>,
    #[serde(default)]
    pub expiration_date: Option<YearMonth>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub issuing_authority: String,
    #[serde(default)]
    pub date_obtained: Option<YearMonth>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalExperience {
    #[serde(default, deserialize_with = "null_as_default")]
    pub department: String,
    #[serde(default, deserialize_with = "whole_number")]
    pub duration_in_months: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerWork {
    #[serde(default, deserialize_with = "null_as_default")]
    pub organization: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "whole_number")]
    pub duration_in_months: Option<u32>,
}

/// Reads `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Months and years can come back fractional (`18.5`). Rounds to the nearest
/// whole number; a value that does not fit the target type reads as missing.
fn whole_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| v.is_finite())
        .and_then(|v| T::try_from(v.round() as i64).ok()))
}
