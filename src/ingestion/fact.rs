//! Fact (triplet) model shared by extraction, graph storage and enrichment.

use std::fmt;

/// Closed entity label set. Blank or unrecognized labels fall back to
/// [`EntityLabel::Entity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityLabel {
    Person,
    Organization,
    Role,
    Project,
    Location,
    Date,
    Document,
    Entity,
}

impl EntityLabel {
    /// Parse a label emitted by the model; matching is case-insensitive and
    /// ignores surrounding whitespace.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "PERSON" => EntityLabel::Person,
            "ORGANIZATION" => EntityLabel::Organization,
            "ROLE" => EntityLabel::Role,
            "PROJECT" => EntityLabel::Project,
            "LOCATION" => EntityLabel::Location,
            "DATE" => EntityLabel::Date,
            "DOCUMENT" => EntityLabel::Document,
            _ => EntityLabel::Entity,
        }
    }

    /// Cypher-safe node label. Always uppercase alphanumeric.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityLabel::Person => "PERSON",
            EntityLabel::Organization => "ORGANIZATION",
            EntityLabel::Role => "ROLE",
            EntityLabel::Project => "PROJECT",
            EntityLabel::Location => "LOCATION",
            EntityLabel::Date => "DATE",
            EntityLabel::Document => "DOCUMENT",
            EntityLabel::Entity => "ENTITY",
        }
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extracted statement: subject, relation and object with entity labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    pub subject: String,
    pub subject_label: EntityLabel,
    /// Relation as emitted by the model; normalized via [`sanitize_relation`]
    /// when written to the graph or rendered into an enrichment block.
    pub relation: String,
    pub object: String,
    pub object_label: EntityLabel,
}

impl Fact {
    pub fn new(
        subject: impl Into<String>,
        subject_label: EntityLabel,
        relation: impl Into<String>,
        object: impl Into<String>,
        object_label: EntityLabel,
    ) -> Self {
        Self {
            subject: subject.into(),
            subject_label,
            relation: relation.into(),
            object: object.into(),
            object_label,
        }
    }
}

/// Normalize a relation into an uppercase alphanumeric-plus-underscore token.
/// Returns `None` when nothing survives sanitization.
pub fn sanitize_relation(raw: &str) -> Option<String> {
    let token: String = raw
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    if token.trim_matches('_').is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Render a sanitized relation token for human-readable fact lines,
/// e.g. `WORKS_AT` becomes `Works At`.
pub fn relation_title_case(token: &str) -> String {
    token
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
