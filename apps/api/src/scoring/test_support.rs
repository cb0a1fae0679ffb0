//! Fixtures and a deterministic model stub shared by the scoring tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{LlmError, ObjectRequest, ObjectResponse, StructuredModel, Usage};
use crate::models::resume::{
    Basics, Certificate, ClinicalExperience, License, Position, ResumeRecord, ResumeRow, School,
    SeniorityLevel, YearMonth,
};
use crate::scoring::breakdown::Breakdown;
use crate::scoring::registry::Aspect;
use crate::scoring::store::ResumeStore;

pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap()
}

pub fn position(title: &str, start: YearMonth, end: YearMonth) -> Position {
    Position {
        org: "Mercy General Hospital".to_string(),
        title: title.to_string(),
        description: format!("{title} on a 24-bed medical-surgical unit using Epic EHR"),
        location: "Sacramento, CA".to_string(),
        start,
        end,
        level: Some(SeniorityLevel::Mid),
    }
}

/// A registered nurse with data for every aspect.
pub fn record_fixture() -> ResumeRecord {
    ResumeRecord {
        basics: Basics {
            first_name: "Maria".to_string(),
            last_name: "Santos".to_string(),
            current_job_title: Some("Charge Nurse".to_string()),
            current_company: Some("Mercy General Hospital".to_string()),
            total_experience_in_months: Some(72),
            ..Basics::default()
        },
        skills: vec![
            "Epic EHR".to_string(),
            "IV Therapy".to_string(),
            "Ventilator management".to_string(),
        ],
        specializations: vec!["ICU".to_string()],
        positions: vec![
            position("Staff Nurse", YearMonth::new(2019, 1), YearMonth::new(2022, 6)),
            position("Charge Nurse", YearMonth::new(2022, 6), YearMonth::default()),
        ],
        clinical_experience: vec![ClinicalExperience {
            department: "ICU".to_string(),
            duration_in_months: Some(40),
        }],
        volunteer_work: vec![],
        achievements: vec!["Nurse of the Year 2023".to_string()],
        schools: vec![School {
            institution: "Sacramento State".to_string(),
            degree: "BSN".to_string(),
            gpa: Some(3.7),
            field: "Nursing".to_string(),
            start: YearMonth::new(2014, 9),
            end: YearMonth::new(2018, 5),
        }],
        licenses: vec![License {
            license_type: "RN".to_string(),
            issuing_authority: "California Board of Registered Nursing".to_string(),
            state: "CA".to_string(),
            issue_date: Some(YearMonth::new(2018, 8)),
            expiration_date: Some(YearMonth::new(2028, 8)),
        }],
        languages: vec!["English".to_string(), "Tagalog".to_string()],
        certificates: vec![Certificate {
            title: "BLS".to_string(),
            issuing_authority: "American Heart Association".to_string(),
            date_obtained: Some(YearMonth::new(2024, 2)),
        }],
    }
}

fn rated(rating: f64, comments: &str) -> Value {
    json!({ "rating": rating, "comments": comments })
}

pub fn education_reply() -> Value {
    json!({
        "degree": rated(7.0, "BSN"),
        "certifications": rated(6.0, "BLS only"),
        "specializations": rated(5.0, "ICU"),
        "feedback": "Solid foundation.",
        "suggestions": "Add ACLS."
    })
}

pub fn licensure_reply(active: f64, expiration: f64) -> Value {
    json!({
        "active_license": rated(active, "Active RN license in CA"),
        "expiration_date": rated(expiration, "Expires August 2028"),
        "feedback": "License is current.",
        "suggestions": "Mention compact licensure if held."
    })
}

pub fn experience_reply() -> Value {
    json!({
        "years_of_experience": rated(7.0, "Six years"),
        "healthcare_settings": rated(4.0, "Acute care hospital"),
        "specialties": rated(5.0, "ICU"),
        "leadership_roles": rated(5.0, "Charge nurse"),
        "feedback": "Strong acute-care background.",
        "suggestions": "Quantify patient ratios."
    })
}

pub fn technical_skills_reply() -> Value {
    json!({
        "software": rated(5.0, "Epic"),
        "equipment": rated(4.0, "Ventilators"),
        "telemedicine": rated(1.0, "None listed"),
        "feedback": "Good clinical tooling.",
        "suggestions": "Add any telehealth exposure."
    })
}

/// Valid replies for every aspect.
pub fn all_valid() -> StubModel {
    StubModel::new()
        .with(
            Aspect::EducationAndCertifications,
            StubReply::Object(education_reply()),
        )
        .with(Aspect::Licensure, StubReply::Object(licensure_reply(10.0, 5.0)))
        .with(Aspect::Experience, StubReply::Object(experience_reply()))
        .with(
            Aspect::TechnicalSkills,
            StubReply::Object(technical_skills_reply()),
        )
}

#[derive(Debug, Clone)]
pub enum StubReply {
    Object(Value),
    ApiError(u16, String),
    NotJson,
    /// Sleeps for an hour before answering.
    Hang,
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub schema_name: String,
    pub system: String,
    pub prompt: String,
    pub schema: Value,
}

/// Deterministic model keyed by schema name (the aspect name).
#[derive(Default)]
pub struct StubModel {
    replies: HashMap<String, StubReply>,
    calls: Mutex<Vec<RecordedCall>>,
    completed: AtomicUsize,
}

impl StubModel {
    pub const USAGE: Usage = Usage {
        prompt_tokens: 400,
        completion_tokens: 120,
        total_tokens: 520,
    };

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, aspect: Aspect, reply: StubReply) -> Self {
        self.replies.insert(aspect.as_str().to_string(), reply);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, aspect: Aspect) -> bool {
        self.calls()
            .iter()
            .any(|c| c.schema_name == aspect.as_str())
    }

    /// Number of calls that ran to completion (including errors).
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StructuredModel for StubModel {
    async fn generate_object(&self, request: ObjectRequest<'_>) -> Result<ObjectResponse, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            schema_name: request.schema_name.to_string(),
            system: request.system.to_string(),
            prompt: request.prompt.to_string(),
            schema: request.schema.clone(),
        });

        let reply = self
            .replies
            .get(request.schema_name)
            .cloned()
            .unwrap_or(StubReply::ApiError(404, "no stubbed reply".to_string()));

        if let StubReply::Hang = reply {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }

        self.completed.fetch_add(1, Ordering::SeqCst);

        match reply {
            StubReply::Object(object) => Ok(ObjectResponse {
                object,
                usage: Self::USAGE,
            }),
            StubReply::ApiError(status, message) => Err(LlmError::Api { status, message }),
            StubReply::NotJson => Err(LlmError::Parse(
                serde_json::from_str::<Value>("Great nurse!").unwrap_err(),
            )),
            StubReply::Hang => Err(LlmError::EmptyContent),
        }
    }
}

/// In-memory resumes table that counts feedback writes.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<Uuid, ResumeRow>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resume(self, resume_id: Uuid, structured_resume: Option<Value>) -> Self {
        self.rows.lock().unwrap().insert(
            resume_id,
            ResumeRow {
                id: resume_id,
                user_id: Uuid::new_v4(),
                campaign_id: None,
                file_name: Some("resume.pdf".to_string()),
                structured_resume,
                resume_feedback: None,
                created_at: Some(reference_time()),
                updated_at: Some(reference_time()),
            },
        );
        self
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn feedback(&self, resume_id: Uuid) -> Option<Value> {
        self.rows
            .lock()
            .unwrap()
            .get(&resume_id)
            .and_then(|row| row.resume_feedback.clone())
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn load_resume(&self, resume_id: Uuid) -> Result<ResumeRow, AppError> {
        self.rows
            .lock()
            .unwrap()
            .get(&resume_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))
    }

    async fn save_feedback(&self, resume_id: Uuid, breakdown: &Breakdown) -> Result<(), AppError> {
        let feedback = serde_json::to_value(breakdown).unwrap();
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .get_mut(&resume_id)
            .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;
        row.resume_feedback = Some(feedback);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
