//! Schema Registry: the closed table binding each scoring aspect to its
//! rubric, output schema, rating scales and resume projection.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::resume::ResumeRecord;
use crate::scoring::mapper::{self, Projection};
use crate::scoring::prompts::{
    EDUCATION_AND_CERTIFICATIONS_RUBRIC, EXPERIENCE_RUBRIC, LICENSURE_RUBRIC,
    TECHNICAL_SKILLS_RUBRIC,
};
use crate::scoring::schema::{
    self, AspectScore, EducationScore, ExperienceScore, LicensureScore, RatingScale,
    SchemaViolation, TechnicalSkillsScore,
};

/// One of the four independent scoring categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aspect {
    EducationAndCertifications,
    Licensure,
    Experience,
    TechnicalSkills,
}

impl Aspect {
    pub const ALL: [Aspect; 4] = [
        Aspect::EducationAndCertifications,
        Aspect::Licensure,
        Aspect::Experience,
        Aspect::TechnicalSkills,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Aspect::EducationAndCertifications => "education_and_certifications",
            Aspect::Licensure => "licensure",
            Aspect::Experience => "experience",
            Aspect::TechnicalSkills => "technical_skills",
        }
    }

    fn index(&self) -> usize {
        match self {
            Aspect::EducationAndCertifications => 0,
            Aspect::Licensure => 1,
            Aspect::Experience => 2,
            Aspect::TechnicalSkills => 3,
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown scoring aspect `{0}`")]
pub struct UnknownAspect(pub String);

impl FromStr for Aspect {
    type Err = UnknownAspect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Aspect::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| UnknownAspect(s.to_string()))
    }
}

/// Everything needed to score one aspect.
pub struct AspectDefinition {
    pub aspect: Aspect,
    pub rubric: &'static str,
    pub scales: &'static [RatingScale],
    projection: fn(&ResumeRecord, NaiveDate) -> Projection,
    validator: fn(&Value) -> Result<(), SchemaViolation>,
    schema_builder: fn() -> Value,
}

impl AspectDefinition {
    const fn new<T: AspectScore>(
        aspect: Aspect,
        rubric: &'static str,
        projection: fn(&ResumeRecord, NaiveDate) -> Projection,
    ) -> Self {
        Self {
            aspect,
            rubric,
            scales: T::SCALES,
            projection,
            validator: schema::validate::<T>,
            schema_builder: schema::output_schema::<T>,
        }
    }

    /// Projects the record into this aspect's payload, or reports that the
    /// record carries nothing this aspect evaluates.
    pub fn project(&self, record: &ResumeRecord, today: NaiveDate) -> Projection {
        (self.projection)(record, today)
    }

    pub fn validate(&self, object: &Value) -> Result<(), SchemaViolation> {
        (self.validator)(object)
    }

    /// JSON Schema of this aspect's output object. Built once per process.
    pub fn output_schema(&self) -> &'static Value {
        static SCHEMAS: OnceLock<Vec<Value>> = OnceLock::new();
        let schemas =
            SCHEMAS.get_or_init(|| REGISTRY.iter().map(|d| (d.schema_builder)()).collect());
        &schemas[self.aspect.index()]
    }
}

static REGISTRY: [AspectDefinition; 4] = [
    AspectDefinition::new::<EducationScore>(
        Aspect::EducationAndCertifications,
        EDUCATION_AND_CERTIFICATIONS_RUBRIC,
        mapper::project_education_and_certifications,
    ),
    AspectDefinition::new::<LicensureScore>(
        Aspect::Licensure,
        LICENSURE_RUBRIC,
        mapper::project_licensure,
    ),
    AspectDefinition::new::<ExperienceScore>(
        Aspect::Experience,
        EXPERIENCE_RUBRIC,
        mapper::project_experience,
    ),
    AspectDefinition::new::<TechnicalSkillsScore>(
        Aspect::TechnicalSkills,
        TECHNICAL_SKILLS_RUBRIC,
        mapper::project_technical_skills,
    ),
];

/// All aspect definitions, in registry order.
pub fn registry() -> &'static [AspectDefinition] {
    &REGISTRY
}

/// Looks up the definition for an aspect. Total over the closed enum.
pub fn lookup(aspect: Aspect) -> &'static AspectDefinition {
    &REGISTRY[aspect.index()]
}
