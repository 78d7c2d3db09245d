use regex::Regex;
use std::sync::OnceLock;

/// Tables owned by the registry, longest first so prefix matching on
/// constraint names never stops early.
const KNOWN_TABLES: [(&str, &str); 3] = [
    ("enrollments", "enrollment"),
    ("accounts", "account"),
    ("courses", "course"),
];

/// Parses PostgreSQL constraint violation messages into entity/field/value triples.
pub struct ConstraintParser;

struct Patterns {
    key_value: Regex,
    column_name: Regex,
    table_name: Regex,
}

static PATTERNS: OnceLock<Option<Patterns>> = OnceLock::new();

fn patterns() -> Option<&'static Patterns> {
    PATTERNS
        .get_or_init(|| {
            Some(Patterns {
                key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").ok()?,
                column_name: Regex::new(r#"column "([^"]+)""#).ok()?,
                table_name: Regex::new(r#"(?:table|relation) "([^"]+)""#).ok()?,
            })
        })
        .as_ref()
}

impl ConstraintParser {
    /// Parses a unique violation such as `accounts_email_key`.
    ///
    /// # Returns
    /// `(entity, field, value)` where entity is the singular record name
    pub fn parse_unique_violation(
        text: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let value = Self::extract_key_value(text).map(|(_, v)| v);

        if let Some((entity, field)) = constraint_name.and_then(Self::split_constraint_name) {
            let value = value.unwrap_or_else(|| "duplicate_value".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = Self::extract_key_value(text)?;
        let entity = Self::extract_table(text)
            .map(|t| Self::entity_for_table(&t))
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Parses a foreign key violation such as `enrollments_course_id_fkey`.
    ///
    /// # Returns
    /// `(referenced_entity, field, value)`. The referenced entity is derived
    /// from the column name (`course_id` -> `course`).
    pub fn parse_foreign_key_violation(
        text: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let field = constraint_name
            .and_then(Self::split_constraint_name)
            .map(|(_, field)| field)
            .or_else(|| Self::extract_key_value(text).map(|(f, _)| f))?;
        let value = Self::extract_key_value(text)
            .map(|(_, v)| v)
            .unwrap_or_else(|| "invalid_reference".to_string());
        let referenced = field.strip_suffix("_id").unwrap_or(&field).to_string();
        Some((referenced, "id".to_string(), value))
    }

    /// Parses a not-null violation into `(entity, field)`.
    pub fn parse_not_null_violation(text: &str) -> Option<(String, String)> {
        let p = patterns()?;
        let field = p.column_name.captures(text)?.get(1)?.as_str().to_string();
        let entity = Self::extract_table(text)
            .map(|t| Self::entity_for_table(&t))
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Splits `<table>_<field>_<suffix>` into `(entity, field)`.
    ///
    /// Field names may themselves contain underscores (`account_id`), so the
    /// table prefix is matched against the known tables before falling back
    /// to the first segment.
    pub fn split_constraint_name(constraint_name: &str) -> Option<(String, String)> {
        let body = ["_key", "_fkey", "_check", "_idx"]
            .iter()
            .find_map(|suffix| constraint_name.strip_suffix(suffix))?;

        for (table, entity) in KNOWN_TABLES {
            if let Some(field) = body.strip_prefix(table).and_then(|r| r.strip_prefix('_')) {
                if !field.is_empty() {
                    return Some((entity.to_string(), field.to_string()));
                }
            }
        }

        let (table, field) = body.split_once('_')?;
        if table.is_empty() || field.is_empty() {
            return None;
        }
        Some((Self::entity_for_table(table), field.to_string()))
    }

    pub fn extract_key_value(text: &str) -> Option<(String, String)> {
        let caps = patterns()?.key_value.captures(text)?;
        Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string()))
    }

    pub fn extract_table(text: &str) -> Option<String> {
        let caps = patterns()?.table_name.captures(text)?;
        Some(caps.get(1)?.as_str().to_string())
    }

    fn entity_for_table(table: &str) -> String {
        KNOWN_TABLES
            .iter()
            .find(|(t, _)| *t == table)
            .map(|(_, e)| e.to_string())
            .unwrap_or_else(|| table.to_string())
    }
}
