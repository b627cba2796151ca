//! Resource name inference.
//!
//! A resource's name is derived from the last literal segment of its absolute path:
//! `/products/{id}` and `/products` both name the `Product` model.

use crate::error::{Result, ScaffoldError};
use crate::model::PathSegment;

/// Words that are the same in singular and plural form.
const UNCOUNTABLE: &[&str] = &[
    "data",
    "equipment",
    "feedback",
    "fish",
    "information",
    "metadata",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "species",
];

/// Plural forms the suffix rules get wrong.
const IRREGULAR: &[(&str, &str)] = &[
    ("aliases", "alias"),
    ("analyses", "analysis"),
    ("buses", "bus"),
    ("children", "child"),
    ("criteria", "criterion"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("indices", "index"),
    ("knives", "knife"),
    ("lives", "life"),
    ("matrices", "matrix"),
    ("men", "man"),
    ("mice", "mouse"),
    ("movies", "movie"),
    ("oxen", "ox"),
    ("people", "person"),
    ("quizzes", "quiz"),
    ("shoes", "shoe"),
    ("statuses", "status"),
    ("teeth", "tooth"),
    ("toes", "toe"),
    ("vertices", "vertex"),
    ("viruses", "virus"),
    ("wives", "wife"),
    ("women", "woman"),
];

/// Infers the model name for a resource from its absolute path segments.
///
/// Path parameters are discarded, the last remaining literal is capitalized and
/// singularized: `["products", "{id}"]` yields `Product`.
///
/// # Errors
///
/// Returns [`ScaffoldError::UnnamedResource`] when the path has no literal segment.
pub fn infer_resource_name(segments: &[PathSegment]) -> Result<String> {
    let literal = segments
        .iter()
        .rev()
        .find_map(|segment| match segment {
            PathSegment::Literal(name) => Some(name.as_str()),
            PathSegment::Parameter(_) => None,
        })
        .ok_or_else(|| ScaffoldError::UnnamedResource {
            path: display_path(segments),
        })?;

    Ok(capitalize(&singularize(&literal.to_lowercase())))
}

/// Uppercases the first character and lowercases the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Returns the singular form of a lowercase English noun.
pub fn singularize(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }

    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == word) {
        return singular.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies").filter(|s| !s.is_empty()) {
        return format!("{}y", stem);
    }

    if let Some(stem) = word.strip_suffix("ves") {
        if stem.ends_with('l') || stem.ends_with('r') {
            return format!("{}f", stem);
        }
        return format!("{}ve", stem);
    }

    for suffix in ["sses", "xes", "zzes", "ches", "shes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }

    if let Some(stem) = word.strip_suffix("oes") {
        return format!("{}o", stem);
    }

    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }

    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

fn display_path(segments: &[PathSegment]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }
    segments.iter().map(|s| format!("/{}", s)).collect()
}
