use std::fmt;

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::warn;

use super::lenient;

pub const DEFAULT_WEIGHT: u8 = 5;
pub const MIN_WEIGHT: u8 = 1;
pub const MAX_WEIGHT: u8 = 10;

/// Requirement categories understood by the scorers.
///
/// The set is open: any other name is carried through as `Unrecognized` and scores zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequirementKind {
    Experience,
    Skills,
    Education,
    Languages,
    Age,
    Salary,
    Location,
    Availability,
    Unrecognized(String),
}

impl RequirementKind {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "EXPERIENCE" => Self::Experience,
            "SKILLS" => Self::Skills,
            "EDUCATION" => Self::Education,
            "LANGUAGES" => Self::Languages,
            "AGE" => Self::Age,
            "SALARY" => Self::Salary,
            "LOCATION" => Self::Location,
            "AVAILABILITY" => Self::Availability,
            _ => Self::Unrecognized(trimmed.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Experience => "EXPERIENCE",
            Self::Skills => "SKILLS",
            Self::Education => "EDUCATION",
            Self::Languages => "LANGUAGES",
            Self::Age => "AGE",
            Self::Salary => "SALARY",
            Self::Location => "LOCATION",
            Self::Availability => "AVAILABILITY",
            Self::Unrecognized(name) => name,
        }
    }
}

impl Default for RequirementKind {
    fn default() -> Self {
        Self::Unrecognized(String::new())
    }
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for RequirementKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for RequirementKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Employer-defined scoring criterion attached to a job.
///
/// Decoding accepts both the record naming (`kind`, `criteria`, `mandatory`) and
/// the job-column literal naming (`type`, `data`, `isMandatory`). An unreadable
/// field falls back to its default so the requirement and its weight are kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    pub kind: RequirementKind,
    pub weight: u8,
    pub mandatory: bool,
    pub criteria: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Requirement {
    pub fn new(kind: RequirementKind, weight: i64, criteria: Value) -> Self {
        Self {
            kind,
            weight: clamp_weight(weight),
            mandatory: false,
            criteria,
            description: None,
        }
    }

    pub fn mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    /// Reads one requirement object field by field.
    pub fn from_object(fields: &Map<String, Value>) -> Self {
        let lookup = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| fields.get(*name))
                .filter(|value| !value.is_null())
        };

        let kind = match lookup(&["kind", "type"]) {
            None => RequirementKind::default(),
            Some(Value::String(raw)) => RequirementKind::parse(raw),
            Some(other) => {
                warn!(
                    category = "degraded",
                    found = json_type(other),
                    "requirement kind is not a string; treating as unrecognized"
                );
                RequirementKind::Unrecognized(other.to_string())
            }
        };

        let weight = match lookup(&["weight"]) {
            None => DEFAULT_WEIGHT,
            Some(raw) => match lenient::integer(raw) {
                Some(weight) => clamp_weight(weight),
                None => {
                    warn!(
                        category = "degraded",
                        kind = %kind,
                        weight = %raw,
                        "requirement weight unreadable; using default"
                    );
                    DEFAULT_WEIGHT
                }
            },
        };

        let mandatory = match lookup(&["mandatory", "isMandatory"]) {
            None => false,
            Some(raw) => lenient::flag(raw).unwrap_or_else(|| {
                warn!(
                    category = "degraded",
                    kind = %kind,
                    mandatory = %raw,
                    "requirement mandatory flag unreadable; treating as optional"
                );
                false
            }),
        };

        let description = match lookup(&["description"]) {
            None => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(other) => {
                warn!(
                    category = "degraded",
                    kind = %kind,
                    found = json_type(other),
                    "requirement description is not a string; ignoring it"
                );
                None
            }
        };

        let criteria = lookup(&["criteria", "data", "criteriaData"])
            .cloned()
            .unwrap_or(Value::Null);

        Self {
            kind,
            weight,
            mandatory,
            criteria,
            description,
        }
    }
}

impl<'de> Deserialize<'de> for Requirement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = Map::deserialize(deserializer)?;
        Ok(Self::from_object(&fields))
    }
}

/// Pins a weight into `MIN_WEIGHT..=MAX_WEIGHT`.
pub fn clamp_weight(raw: i64) -> u8 {
    let clamped = raw.clamp(i64::from(MIN_WEIGHT), i64::from(MAX_WEIGHT));
    if clamped != raw {
        warn!(
            category = "degraded",
            weight = raw,
            clamped,
            "requirement weight outside 1..=10; clamping"
        );
    }
    clamped as u8
}

/// Requirement data as handed over by the requirement source.
#[derive(Debug, Clone, PartialEq)]
pub enum RequirementFeed {
    /// Already-typed requirement records.
    Records(Vec<Requirement>),
    /// Raw JSON array literal stored on the job; `None` when the column is empty.
    Json(Option<String>),
}

impl Default for RequirementFeed {
    fn default() -> Self {
        Self::Json(None)
    }
}

/// Ordered, immutable requirement list for one ranking computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequirementSet(Vec<Requirement>);

impl RequirementSet {
    /// Builds a set, pinning every weight into `MIN_WEIGHT..=MAX_WEIGHT`.
    pub fn new(requirements: Vec<Requirement>) -> Self {
        Self(
            requirements
                .into_iter()
                .map(|requirement| Requirement {
                    weight: clamp_weight(i64::from(requirement.weight)),
                    ..requirement
                })
                .collect(),
        )
    }

    pub fn from_feed(feed: &RequirementFeed) -> Self {
        match feed {
            RequirementFeed::Records(records) => Self::new(records.clone()),
            RequirementFeed::Json(None) => Self::default(),
            RequirementFeed::Json(Some(raw)) => Self::parse_json(raw),
        }
    }

    /// Decodes a JSON array literal; anything unreadable degrades to an empty set.
    pub fn parse_json(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }

        let items = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => items,
            Ok(other) => {
                warn!(
                    category = "degraded",
                    found = json_type(&other),
                    "requirement list is not a JSON array; ranking without requirements"
                );
                return Self::default();
            }
            Err(err) => {
                warn!(
                    category = "degraded",
                    error = %err,
                    "requirement list is not valid JSON; ranking without requirements"
                );
                return Self::default();
            }
        };

        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match item.as_object() {
                Some(fields) => Some(Requirement::from_object(fields)),
                None => {
                    warn!(
                        category = "degraded",
                        index,
                        found = json_type(&item),
                        "dropping requirement entry that is not an object"
                    );
                    None
                }
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Requirement> {
        self.0.iter()
    }

    pub fn total_weight(&self) -> u32 {
        self.0
            .iter()
            .map(|requirement| u32::from(requirement.weight))
            .sum()
    }
}

impl FromIterator<Requirement> for RequirementSet {
    fn from_iter<I: IntoIterator<Item = Requirement>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceCriteria {
    #[serde(deserialize_with = "lenient::deserialize_text")]
    pub min_experience: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkillsCriteria {
    #[serde(deserialize_with = "lenient::deserialize_text_list")]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationCriteria {
    #[serde(deserialize_with = "lenient::deserialize_text")]
    pub min_education: String,
}

/// A language paired with a proficiency level, on either side of the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    #[serde(deserialize_with = "lenient::deserialize_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::deserialize_text")]
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LanguagesCriteria {
    pub languages: Vec<LanguageEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeCriteria {
    #[serde(deserialize_with = "lenient::deserialize_integer")]
    pub min_age: i64,
    #[serde(deserialize_with = "lenient::deserialize_integer")]
    pub max_age: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryCriteria {
    #[serde(deserialize_with = "lenient::deserialize_number")]
    pub min_salary: f64,
    #[serde(deserialize_with = "lenient::deserialize_number")]
    pub max_salary: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocationCriteria {
    #[serde(deserialize_with = "lenient::deserialize_text")]
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AvailabilityCriteria {
    #[serde(deserialize_with = "lenient::deserialize_text")]
    pub availability: String,
}

/// Typed criteria payload, one variant per requirement kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Criteria {
    Experience(ExperienceCriteria),
    Skills(SkillsCriteria),
    Education(EducationCriteria),
    Languages(LanguagesCriteria),
    Age(AgeCriteria),
    Salary(SalaryCriteria),
    Location(LocationCriteria),
    Availability(AvailabilityCriteria),
    Unrecognized(String),
}

/// Criteria payload that does not fit its kind's shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CriteriaError {
    #[error("{kind} requirement carries no criteria")]
    Missing { kind: String },
    #[error("{kind} criteria text is not valid JSON: {message}")]
    Encoding { kind: String, message: String },
    #[error("{kind} criteria do not match the expected shape: {message}")]
    Shape { kind: String, message: String },
    #[error("{kind} criteria list is empty")]
    EmptyList { kind: String },
}

impl Criteria {
    /// Decodes `payload` into the criteria shape of `kind`.
    ///
    /// The payload may be the object itself or a JSON string holding it.
    pub fn decode(kind: &RequirementKind, payload: &Value) -> Result<Self, CriteriaError> {
        match kind {
            RequirementKind::Experience => shape(kind, payload).map(Criteria::Experience),
            RequirementKind::Skills => {
                let criteria: SkillsCriteria = shape(kind, payload)?;
                non_empty(kind, criteria.skills.len())?;
                Ok(Criteria::Skills(criteria))
            }
            RequirementKind::Education => shape(kind, payload).map(Criteria::Education),
            RequirementKind::Languages => {
                let criteria: LanguagesCriteria = shape(kind, payload)?;
                non_empty(kind, criteria.languages.len())?;
                Ok(Criteria::Languages(criteria))
            }
            RequirementKind::Age => shape(kind, payload).map(Criteria::Age),
            RequirementKind::Salary => shape(kind, payload).map(Criteria::Salary),
            RequirementKind::Location => shape(kind, payload).map(Criteria::Location),
            RequirementKind::Availability => shape(kind, payload).map(Criteria::Availability),
            RequirementKind::Unrecognized(name) => Ok(Criteria::Unrecognized(name.clone())),
        }
    }
}

fn shape<T>(kind: &RequirementKind, payload: &Value) -> Result<T, CriteriaError>
where
    T: DeserializeOwned,
{
    let shape_error = |err: serde_json::Error| CriteriaError::Shape {
        kind: kind.label().to_string(),
        message: err.to_string(),
    };

    match payload {
        Value::Null => Err(CriteriaError::Missing {
            kind: kind.label().to_string(),
        }),
        Value::String(encoded) => {
            let decoded: Value =
                serde_json::from_str(encoded).map_err(|err| CriteriaError::Encoding {
                    kind: kind.label().to_string(),
                    message: err.to_string(),
                })?;
            T::deserialize(&decoded).map_err(shape_error)
        }
        other => T::deserialize(other).map_err(shape_error),
    }
}

fn non_empty(kind: &RequirementKind, len: usize) -> Result<(), CriteriaError> {
    if len == 0 {
        Err(CriteriaError::EmptyList {
            kind: kind.label().to_string(),
        })
    } else {
        Ok(())
    }
}
