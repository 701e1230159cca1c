use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use serde_json::Value;

use super::super::catalog::{
    AgeCriteria, AvailabilityCriteria, EducationCriteria, ExperienceCriteria, LanguageEntry,
    LanguagesCriteria, LocationCriteria, SalaryCriteria, SkillsCriteria,
};
use super::super::domain::CandidateProfile;
use super::super::lenient;
use super::levels::{education_rank, language_rank};
use super::ScoreError;

pub(crate) const FULL: f64 = 10.0;
pub(crate) const NEAR: f64 = 7.0;
pub(crate) const PARTIAL: f64 = 5.0;
pub(crate) const WEAK: f64 = 3.0;

pub(crate) fn experience(
    profile: &CandidateProfile,
    criteria: &ExperienceCriteria,
) -> Result<f64, ScoreError> {
    let candidate_raw = text_field(profile, "experience")?;
    let candidate_years = parse_years(&candidate_raw)
        .ok_or_else(|| ScoreError::UnreadableExperience(candidate_raw.clone()))?;
    let required_years = parse_years(&criteria.min_experience)
        .ok_or_else(|| ScoreError::UnreadableExperience(criteria.min_experience.clone()))?;

    let score = if candidate_years >= required_years {
        FULL
    } else if candidate_years >= required_years * 0.7 {
        NEAR
    } else if candidate_years >= required_years * 0.5 {
        PARTIAL
    } else {
        WEAK
    };
    Ok(score)
}

pub(crate) fn skills(
    profile: &CandidateProfile,
    criteria: &SkillsCriteria,
) -> Result<f64, ScoreError> {
    let owned: HashSet<String> = text_list(profile, "skills")?
        .iter()
        .map(|skill| skill.to_lowercase())
        .collect();

    let matched = criteria
        .skills
        .iter()
        .filter(|skill| owned.contains(&skill.to_lowercase()))
        .count();

    Ok(coverage(matched, criteria.skills.len()))
}

pub(crate) fn education(
    profile: &CandidateProfile,
    criteria: &EducationCriteria,
) -> Result<f64, ScoreError> {
    let candidate_level = education_rank(&text_field(profile, "education")?);
    let required_level = education_rank(&criteria.min_education);

    let score = if candidate_level >= required_level {
        FULL
    } else if candidate_level + 1 >= required_level {
        NEAR
    } else {
        WEAK
    };
    Ok(score)
}

pub(crate) fn languages(
    profile: &CandidateProfile,
    criteria: &LanguagesCriteria,
) -> Result<f64, ScoreError> {
    let value = required(profile, "languages")?;
    let entries =
        Vec::<LanguageEntry>::deserialize(value).map_err(|_| ScoreError::InvalidField {
            field: "languages",
            expected: "a list of {name, level} entries",
        })?;

    let held: HashMap<String, u8> = entries
        .iter()
        .map(|entry| (entry.name.to_lowercase(), language_rank(&entry.level)))
        .collect();

    let satisfied = criteria
        .languages
        .iter()
        .filter(|wanted| {
            held.get(&wanted.name.to_lowercase())
                .is_some_and(|rank| *rank >= language_rank(&wanted.level))
        })
        .count();

    Ok(coverage(satisfied, criteria.languages.len()))
}

pub(crate) fn age(profile: &CandidateProfile, criteria: &AgeCriteria) -> Result<f64, ScoreError> {
    let age = integer_field(profile, "age")?;

    let score = if (criteria.min_age..=criteria.max_age).contains(&age) {
        FULL
    } else if (criteria.min_age.saturating_sub(2)..=criteria.max_age.saturating_add(2))
        .contains(&age)
    {
        NEAR
    } else {
        WEAK
    };
    Ok(score)
}

pub(crate) fn salary(
    profile: &CandidateProfile,
    criteria: &SalaryCriteria,
) -> Result<f64, ScoreError> {
    let expected = number_field(profile, "expectedSalary")?;

    let score = if expected >= criteria.min_salary && expected <= criteria.max_salary {
        FULL
    } else if expected >= criteria.min_salary * 0.9 && expected <= criteria.max_salary * 1.1 {
        NEAR
    } else {
        WEAK
    };
    Ok(score)
}

pub(crate) fn location(
    profile: &CandidateProfile,
    criteria: &LocationCriteria,
) -> Result<f64, ScoreError> {
    let candidate = text_field(profile, "location")?.to_lowercase();
    let wanted = criteria.location.to_lowercase();

    let score = if candidate == wanted {
        FULL
    } else if candidate.contains(&wanted) || wanted.contains(&candidate) {
        NEAR
    } else {
        WEAK
    };
    Ok(score)
}

pub(crate) fn availability(
    profile: &CandidateProfile,
    criteria: &AvailabilityCriteria,
) -> Result<f64, ScoreError> {
    let candidate = text_field(profile, "availability")?.to_lowercase();
    let wanted = criteria.availability.to_lowercase();

    let score = if candidate == wanted {
        FULL
    } else if candidate.contains("immediate") || wanted.contains("immediate") {
        NEAR
    } else {
        PARTIAL
    };
    Ok(score)
}

/// Years of experience from `"5"`, `"5 years"`, `"10+"` or the midpoint of `"3-5"`.
pub(crate) fn parse_years(raw: &str) -> Option<f64> {
    let mut bounds = raw.split('-');
    let low = years_value(bounds.next()?)?;
    match bounds.next() {
        Some(high) => Some((low + years_value(high)?) / 2.0),
        None => Some(low),
    }
}

fn years_value(raw: &str) -> Option<f64> {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse::<f64>().ok().filter(|years| years.is_finite())
}

fn coverage(matched: usize, required: usize) -> f64 {
    if required == 0 {
        return 0.0;
    }
    matched as f64 / required as f64 * FULL
}

fn required<'a>(profile: &'a CandidateProfile, field: &'static str) -> Result<&'a Value, ScoreError> {
    profile.field(field).ok_or(ScoreError::MissingField(field))
}

fn text_field(profile: &CandidateProfile, field: &'static str) -> Result<String, ScoreError> {
    lenient::text(required(profile, field)?).ok_or(ScoreError::InvalidField {
        field,
        expected: "text",
    })
}

fn integer_field(profile: &CandidateProfile, field: &'static str) -> Result<i64, ScoreError> {
    lenient::integer(required(profile, field)?).ok_or(ScoreError::InvalidField {
        field,
        expected: "an integer",
    })
}

fn number_field(profile: &CandidateProfile, field: &'static str) -> Result<f64, ScoreError> {
    lenient::number(required(profile, field)?).ok_or(ScoreError::InvalidField {
        field,
        expected: "a number",
    })
}

fn text_list(profile: &CandidateProfile, field: &'static str) -> Result<Vec<String>, ScoreError> {
    let invalid = ScoreError::InvalidField {
        field,
        expected: "a list of strings",
    };
    let items = required(profile, field)?
        .as_array()
        .ok_or_else(|| invalid.clone())?;
    items
        .iter()
        .map(|item| lenient::text(item).ok_or_else(|| invalid.clone()))
        .collect()
}
