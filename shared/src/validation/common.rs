//! Field validators shared by every model kind: name, tags, comment and id.

use crate::error::{ErrorKind, ModelError, ModelResult, ObjectKind};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Maximum length of an object name, in characters.
pub const OBJECT_NAME_MAX_LENGTH: usize = 128;
/// Maximum length of a comment, in characters.
pub const COMMENT_MAX_LENGTH: usize = 1024;
/// Maximum number of tags on an object.
pub const TAGS_MAX_NUMBER: usize = 20;
/// Maximum length of a single tag, in characters.
pub const TAG_MAX_LENGTH: usize = 40;
/// Maximum length of a model id, in characters.
pub const MODEL_ID_MAX_LENGTH: usize = 40;

/// Characters a tag may not contain.
pub const TAG_INVALID_CHARACTERS: &str = "/:?\\\"<>|*#";

#[allow(clippy::expect_used)]
static MODEL_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_-]+$").expect("Invalid model id regex"));

/// Validates an object name and returns it trimmed.
///
/// # Errors
///
/// `NullParameter.Name` if the trimmed name is empty, `LengthExceeded.Name`
/// if it is longer than [`OBJECT_NAME_MAX_LENGTH`] characters.
pub fn validate_object_name(name: &str, object: ObjectKind) -> ModelResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ModelError::new(ErrorKind::NullParameter, object, "Name")
            .with_details(format!("The {} name is null", object.label())));
    }

    if name.chars().count() > OBJECT_NAME_MAX_LENGTH {
        return Err(ModelError::new(ErrorKind::LengthExceeded, object, "Name")
            .with_details(format!(
                "The length of the {} name {name:?} exceeds {OBJECT_NAME_MAX_LENGTH}",
                object.label()
            )));
    }

    Ok(name.to_string())
}

/// Validates a tag list and returns it normalized: trimmed, with duplicates
/// removed and first occurrences kept in order.
///
/// # Errors
///
/// `CountExceeded.Tags`, `NullParameter.Tag`, `LengthExceeded.Tag` or
/// `InvalidParameter.Tag`.
///
/// # Example
///
/// ```
/// use shared::error::ObjectKind;
/// use shared::validation::common::validate_tags;
///
/// let tags = vec![" prod ".to_string(), "api".to_string(), "prod".to_string()];
/// let tags = validate_tags(&tags, ObjectKind::TraceModel).unwrap();
/// assert_eq!(tags, vec!["prod", "api"]);
/// ```
pub fn validate_tags(tags: &[String], object: ObjectKind) -> ModelResult<Vec<String>> {
    if tags.len() > TAGS_MAX_NUMBER {
        return Err(ModelError::new(ErrorKind::CountExceeded, object, "Tags")
            .with_details(format!(
                "The number of tags cannot exceed {TAGS_MAX_NUMBER}, actual is {}",
                tags.len()
            )));
    }

    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(ModelError::new(ErrorKind::NullParameter, object, "Tag")
                .with_details("A tag cannot be empty"));
        }

        if tag.chars().count() > TAG_MAX_LENGTH {
            return Err(ModelError::new(ErrorKind::LengthExceeded, object, "Tag")
                .with_details(format!(
                    "The length of tag {tag:?} exceeds {TAG_MAX_LENGTH}"
                )));
        }

        if tag.chars().any(|c| TAG_INVALID_CHARACTERS.contains(c)) {
            return Err(ModelError::new(ErrorKind::InvalidParameter, object, "Tag")
                .with_details(format!(
                    "Tag {tag:?} contains special characters, such as {TAG_INVALID_CHARACTERS}"
                )));
        }

        if seen.insert(tag) {
            normalized.push(tag.to_string());
        }
    }

    Ok(normalized)
}

/// Validates a comment length.
///
/// # Errors
///
/// `LengthExceeded.Comment` if longer than [`COMMENT_MAX_LENGTH`] characters.
pub fn validate_comment(comment: &str, object: ObjectKind) -> ModelResult<()> {
    if comment.chars().count() > COMMENT_MAX_LENGTH {
        return Err(ModelError::new(ErrorKind::LengthExceeded, object, "Comment")
            .with_details(format!(
                "The length of the comment exceeds {COMMENT_MAX_LENGTH}"
            )));
    }
    Ok(())
}

/// Validates a model id. An empty id is accepted; the store generates one.
///
/// Ids use lowercase letters, digits, `_` and `-`. Only builtin models may
/// use an id starting with `_`.
///
/// # Errors
///
/// `InvalidParameter.ID` if the id breaks any of the rules above.
pub fn validate_model_id(id: &str, builtin: bool, object: ObjectKind) -> ModelResult<()> {
    if id.is_empty() {
        return Ok(());
    }

    let invalid = |details: String| {
        ModelError::new(ErrorKind::InvalidParameter, object, "ID").with_details(details)
    };

    if id.chars().count() > MODEL_ID_MAX_LENGTH {
        return Err(invalid(format!(
            "The length of id {id:?} exceeds {MODEL_ID_MAX_LENGTH}"
        )));
    }

    if !MODEL_ID_PATTERN.is_match(id) {
        return Err(invalid(format!(
            "Id {id:?} may only contain lowercase letters, digits, '_' and '-'"
        )));
    }

    if !builtin && id.starts_with('_') {
        return Err(invalid(format!(
            "Id {id:?} cannot start with '_' unless the model is builtin"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBJ: ObjectKind = ObjectKind::ObjectiveModel;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_name_is_trimmed() {
        assert_eq!(validate_object_name("  orders ", OBJ).unwrap(), "orders");
    }

    #[test]
    fn test_name_empty_and_too_long() {
        let err = validate_object_name("   ", OBJ).unwrap_err();
        assert_eq!(err.code, "DataModel.ObjectiveModel.NullParameter.Name");

        let long = "a".repeat(OBJECT_NAME_MAX_LENGTH + 1);
        let err = validate_object_name(&long, OBJ).unwrap_err();
        assert_eq!(err.code, "DataModel.ObjectiveModel.LengthExceeded.Name");

        // length counts characters, not bytes
        let wide = "名".repeat(OBJECT_NAME_MAX_LENGTH);
        assert!(validate_object_name(&wide, OBJ).is_ok());
    }

    #[test]
    fn test_name_scoped_to_object() {
        let err = validate_object_name("", ObjectKind::DataView).unwrap_err();
        assert_eq!(err.code, "DataModel.DataView.NullParameter.Name");
    }

    #[test]
    fn test_tags_normalized() {
        let tags = strings(&["b", " a", "b ", "c", "a"]);
        assert_eq!(validate_tags(&tags, OBJ).unwrap(), strings(&["b", "a", "c"]));
    }

    #[test]
    fn test_tags_count_exceeded() {
        let tags: Vec<String> = (0..=TAGS_MAX_NUMBER).map(|i| format!("t{i}")).collect();
        let err = validate_tags(&tags, OBJ).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CountExceeded);
        assert_eq!(err.code, "DataModel.ObjectiveModel.CountExceeded.Tags");

        let tags: Vec<String> = (0..TAGS_MAX_NUMBER).map(|i| format!("t{i}")).collect();
        assert!(validate_tags(&tags, OBJ).is_ok());
    }

    #[test]
    fn test_tag_rules() {
        let err = validate_tags(&strings(&["ok", "  "]), OBJ).unwrap_err();
        assert_eq!(err.code, "DataModel.ObjectiveModel.NullParameter.Tag");

        let err = validate_tags(&["x".repeat(TAG_MAX_LENGTH + 1)], OBJ).unwrap_err();
        assert_eq!(err.code, "DataModel.ObjectiveModel.LengthExceeded.Tag");

        for bad in ["a/b", "a:b", "a?", "a\\b", "\"a\"", "<a>", "a|b", "a*", "#a"] {
            let err = validate_tags(&strings(&[bad]), OBJ).unwrap_err();
            assert_eq!(err.code, "DataModel.ObjectiveModel.InvalidParameter.Tag");
        }
    }

    #[test]
    fn test_comment_length() {
        assert!(validate_comment(&"c".repeat(COMMENT_MAX_LENGTH), OBJ).is_ok());
        let err = validate_comment(&"c".repeat(COMMENT_MAX_LENGTH + 1), OBJ).unwrap_err();
        assert_eq!(err.code, "DataModel.ObjectiveModel.LengthExceeded.Comment");
    }

    #[test]
    fn test_model_id_patterns() {
        assert!(validate_model_id("", false, OBJ).is_ok());
        assert!(validate_model_id("slo-01_a", false, OBJ).is_ok());
        assert!(validate_model_id("_builtin", true, OBJ).is_ok());

        for bad in ["Upper", "has space", "dot.ted", "ü"] {
            let err = validate_model_id(bad, true, OBJ).unwrap_err();
            assert_eq!(err.code, "DataModel.ObjectiveModel.InvalidParameter.ID");
        }

        assert!(validate_model_id("_hidden", false, OBJ).is_err());
        assert!(validate_model_id(&"a".repeat(MODEL_ID_MAX_LENGTH), false, OBJ).is_ok());
        assert!(validate_model_id(&"a".repeat(MODEL_ID_MAX_LENGTH + 1), false, OBJ).is_err());
    }
}
