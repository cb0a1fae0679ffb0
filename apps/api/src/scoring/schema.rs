//! Output schemas for each scoring aspect.
//!
//! The Rust types here are the single definition of what a scored aspect looks
//! like: the JSON Schema sent to the model is generated from them, and model
//! output is validated by deserializing into them. Unknown fields are rejected
//! and every field is required, so an object either matches exactly or fails.

use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Inclusive rating range for one rated sub-criterion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingScale {
    pub criterion: &'static str,
    pub min: f64,
    pub max: f64,
}

impl RatingScale {
    const fn new(criterion: &'static str, min: f64, max: f64) -> Self {
        Self { criterion, min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SchemaViolation {
    #[error("model output is not valid JSON: {0}")]
    Malformed(String),

    #[error("model output does not match schema: {0}")]
    Shape(String),

    #[error("rating for `{criterion}` is {value}, expected {min}..={max}")]
    OutOfRange {
        criterion: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// A numeric rating with a short justification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Rating {
    pub rating: f64,
    pub comments: String,
}

/// Implemented by every per-aspect output object.
pub trait AspectScore: DeserializeOwned + JsonSchema {
    const SCALES: &'static [RatingScale];

    /// Rated sub-criteria, keyed by the names used in `SCALES`.
    fn ratings(&self) -> Vec<(&'static str, &Rating)>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EducationScore {
    /// Nursing degree level, rated 1-10.
    pub degree: Rating,
    /// Relevant certifications, rated 1-10.
    pub certifications: Rating,
    /// Clinical specializations, rated 1-5.
    pub specializations: Rating,
    pub feedback: String,
    pub suggestions: String,
}

impl AspectScore for EducationScore {
    const SCALES: &'static [RatingScale] = &[
        RatingScale::new("degree", 1.0, 10.0),
        RatingScale::new("certifications", 1.0, 10.0),
        RatingScale::new("specializations", 1.0, 5.0),
    ];

    fn ratings(&self) -> Vec<(&'static str, &Rating)> {
        vec![
            ("degree", &self.degree),
            ("certifications", &self.certifications),
            ("specializations", &self.specializations),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LicensureScore {
    /// Whether an active nursing license is held, rated 1-10.
    pub active_license: Rating,
    /// Time remaining until expiration, rated 1-5.
    pub expiration_date: Rating,
    pub feedback: String,
    pub suggestions: String,
}

impl AspectScore for LicensureScore {
    const SCALES: &'static [RatingScale] = &[
        RatingScale::new("active_license", 1.0, 10.0),
        RatingScale::new("expiration_date", 1.0, 5.0),
    ];

    fn ratings(&self) -> Vec<(&'static str, &Rating)> {
        vec![
            ("active_license", &self.active_license),
            ("expiration_date", &self.expiration_date),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ExperienceScore {
    /// Total relevant experience, rated 1-10.
    pub years_of_experience: Rating,
    /// Relevance and variety of care settings, rated 1-5.
    pub healthcare_settings: Rating,
    /// Relevance of specialties, rated 1-5.
    pub specialties: Rating,
    /// Leadership positions held, rated 1-5.
    pub leadership_roles: Rating,
    pub feedback: String,
    pub suggestions: String,
}

impl AspectScore for ExperienceScore {
    const SCALES: &'static [RatingScale] = &[
        RatingScale::new("years_of_experience", 1.0, 10.0),
        RatingScale::new("healthcare_settings", 1.0, 5.0),
        RatingScale::new("specialties", 1.0, 5.0),
        RatingScale::new("leadership_roles", 1.0, 5.0),
    ];

    fn ratings(&self) -> Vec<(&'static str, &Rating)> {
        vec![
            ("years_of_experience", &self.years_of_experience),
            ("healthcare_settings", &self.healthcare_settings),
            ("specialties", &self.specialties),
            ("leadership_roles", &self.leadership_roles),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TechnicalSkillsScore {
    /// EHR and other healthcare software, rated 1-5.
    pub software: Rating,
    /// Medical equipment handling, rated 1-5.
    pub equipment: Rating,
    /// Telemedicine experience, rated 1-3.
    pub telemedicine: Rating,
    pub feedback: String,
    pub suggestions: String,
}

impl AspectScore for TechnicalSkillsScore {
    const SCALES: &'static [RatingScale] = &[
        RatingScale::new("software", 1.0, 5.0),
        RatingScale::new("equipment", 1.0, 5.0),
        RatingScale::new("telemedicine", 1.0, 3.0),
    ];

    fn ratings(&self) -> Vec<(&'static str, &Rating)> {
        vec![
            ("software", &self.software),
            ("equipment", &self.equipment),
            ("telemedicine", &self.telemedicine),
        ]
    }
}

/// Validates a raw model object against `T`. The object itself is left
/// untouched so an accepted result is stored exactly as the model produced it.
pub fn validate<T: AspectScore>(object: &Value) -> Result<(), SchemaViolation> {
    let typed = T::deserialize(object).map_err(|e| SchemaViolation::Shape(e.to_string()))?;

    for (criterion, rating) in typed.ratings() {
        let Some(scale) = T::SCALES.iter().find(|s| s.criterion == criterion) else {
            continue;
        };
        if !scale.contains(rating.rating) {
            return Err(SchemaViolation::OutOfRange {
                criterion,
                value: rating.rating,
                min: scale.min,
                max: scale.max,
            });
        }
    }

    Ok(())
}

/// Generates the JSON Schema for `T` with nested objects inlined and the
/// rating bounds of each sub-criterion attached as `minimum`/`maximum`.
pub fn output_schema<T: AspectScore>() -> Value {
    let generator = SchemaSettings::draft07()
        .with(|s| {
            s.inline_subschemas = true;
            s.meta_schema = None;
        })
        .into_generator();
    let root = generator.into_root_schema_for::<T>();

    let mut schema = serde_json::to_value(root).unwrap_or(Value::Null);

    for scale in T::SCALES {
        let pointer = format!("/properties/{}/properties/rating", scale.criterion);
        if let Some(Value::Object(rating)) = schema.pointer_mut(&pointer) {
            rating.insert("minimum".to_string(), scale.min.into());
            rating.insert("maximum".to_string(), scale.max.into());
        }
    }

    schema
}

/// Reads the ratings of an already-validated object as `(achieved, max)`.
pub fn rating_totals(object: &Value, scales: &[RatingScale]) -> (f64, f64) {
    scales.iter().fold((0.0, 0.0), |(achieved, max), scale| {
        let rating = object
            .get(scale.criterion)
            .and_then(|c| c.get("rating"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        (achieved + rating, max + scale.max)
    })
}
