//! Aspect Mapper: decides whether a resume carries enough data for an aspect
//! and projects it into the minimal payload that aspect's rubric evaluates.
//!
//! Policy: an aspect is skipped only when every field it evaluates is absent.
//! Any relevant field being present is enough to score it.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::resume::{Position, ResumeRecord, YearMonth};

/// Title fragments that indicate a leadership position.
const LEADERSHIP_MARKERS: &[&str] = &[
    "charge",
    "head",
    "lead",
    "manager",
    "supervisor",
    "director",
    "chief",
    "coordinator",
    "preceptor",
    "educator",
];

/// Result of projecting a resume for one aspect.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Payload(AspectPayload),
    NoRelevantData,
}

/// Per-aspect payload sent to the model as the user message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AspectPayload {
    EducationAndCertifications(EducationPayload),
    Licensure(LicensurePayload),
    Experience(ExperiencePayload),
    TechnicalSkills(TechnicalSkillsPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EducationPayload {
    pub degree: Vec<DegreeSummary>,
    pub certifications: Vec<String>,
    pub specializations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegreeSummary {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub gpa: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicensurePayload {
    pub today_date: String,
    pub license: Vec<LicenseSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseSummary {
    pub license_type: String,
    pub issuing_authority: String,
    pub state: String,
    pub issue_date: Option<YearMonth>,
    pub expiration_date: Option<YearMonth>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperiencePayload {
    pub total_experience_months: u32,
    pub healthcare_settings: Vec<SettingSummary>,
    pub specialties: Vec<String>,
    pub leadership_roles: Vec<String>,
    pub clinical_experience: Vec<ClinicalSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingSummary {
    pub title: String,
    pub org: String,
    pub location: String,
    pub start: YearMonth,
    pub end: YearMonth,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalSummary {
    pub department: String,
    pub duration_in_months: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalSkillsPayload {
    pub skills: Vec<String>,
    pub experience: Vec<String>,
}

pub fn project_education_and_certifications(
    record: &ResumeRecord,
    _today: NaiveDate,
) -> Projection {
    if record.schools.is_empty()
        && record.certificates.is_empty()
        && record.specializations.is_empty()
    {
        return Projection::NoRelevantData;
    }

    Projection::Payload(AspectPayload::EducationAndCertifications(
        EducationPayload {
            degree: record
                .schools
                .iter()
                .map(|school| DegreeSummary {
                    institution: school.institution.clone(),
                    degree: school.degree.clone(),
                    field: school.field.clone(),
                    gpa: school.gpa,
                })
                .collect(),
            certifications: record.certificates.iter().map(|c| c.title.clone()).collect(),
            specializations: record.specializations.clone(),
        },
    ))
}

pub fn project_licensure(record: &ResumeRecord, today: NaiveDate) -> Projection {
    if record.licenses.is_empty() {
        return Projection::NoRelevantData;
    }

    Projection::Payload(AspectPayload::Licensure(LicensurePayload {
        today_date: today.format("%Y-%m-%d").to_string(),
        license: record
            .licenses
            .iter()
            .map(|license| LicenseSummary {
                license_type: license.license_type.clone(),
                issuing_authority: license.issuing_authority.clone(),
                state: license.state.clone(),
                issue_date: license.issue_date,
                expiration_date: license.expiration_date,
            })
            .collect(),
    }))
}

pub fn project_experience(record: &ResumeRecord, today: NaiveDate) -> Projection {
    if record.positions.is_empty()
        && record.specializations.is_empty()
        && record.clinical_experience.is_empty()
        && record.basics.total_experience_in_months.is_none()
    {
        return Projection::NoRelevantData;
    }

    let total_experience_months = record
        .basics
        .total_experience_in_months
        .unwrap_or_else(|| total_position_months(&record.positions, today));

    Projection::Payload(AspectPayload::Experience(ExperiencePayload {
        total_experience_months,
        healthcare_settings: record
            .positions
            .iter()
            .map(|pos| SettingSummary {
                title: pos.title.clone(),
                org: pos.org.clone(),
                location: pos.location.clone(),
                start: pos.start,
                end: pos.end,
            })
            .collect(),
        specialties: record.specializations.clone(),
        leadership_roles: record
            .positions
            .iter()
            .filter(|pos| is_leadership_title(&pos.title))
            .map(|pos| pos.title.clone())
            .collect(),
        clinical_experience: record
            .clinical_experience
            .iter()
            .map(|c| ClinicalSummary {
                department: c.department.clone(),
                duration_in_months: c.duration_in_months,
            })
            .collect(),
    }))
}

pub fn project_technical_skills(record: &ResumeRecord, _today: NaiveDate) -> Projection {
    let descriptions: Vec<String> = record
        .positions
        .iter()
        .map(|pos| pos.description.trim())
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect();

    if record.skills.is_empty() && descriptions.is_empty() {
        return Projection::NoRelevantData;
    }

    Projection::Payload(AspectPayload::TechnicalSkills(TechnicalSkillsPayload {
        skills: record.skills.clone(),
        experience: descriptions,
    }))
}

fn is_leadership_title(title: &str) -> bool {
    let title = title.to_lowercase();
    title.split(|c: char| !c.is_alphanumeric()).any(|word| {
        LEADERSHIP_MARKERS
            .iter()
            .any(|marker| word == *marker || word.strip_suffix('s') == Some(*marker))
    })
}

/// Sums position spans in months. Open-ended positions run to `today`.
fn total_position_months(positions: &[Position], today: NaiveDate) -> u32 {
    positions
        .iter()
        .map(|pos| position_months(pos, today))
        .fold(0, u32::saturating_add)
}

fn position_months(position: &Position, today: NaiveDate) -> u32 {
    let Some(start_year) = position.start.year else {
        return 0;
    };
    let start = month_index(start_year, position.start.month, 1);

    let end = match position.end.year {
        Some(year) => month_index(year, position.end.month, 12),
        None => month_index(today.year(), Some(today.month()), 12),
    };

    u32::try_from((end - start).max(0)).unwrap_or(u32::MAX)
}

/// Months since year 0. Out-of-range months are clamped into 1..=12.
fn month_index(year: i32, month: Option<u32>, default_month: u32) -> i64 {
    let month = month.map_or(default_month, |m| m.clamp(1, 12));
    i64::from(year) * 12 + i64::from(month)
}
