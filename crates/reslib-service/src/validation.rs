//! Request validation shared by the catalog services.

use std::collections::HashSet;

use reslib_core::error::AppError;
use reslib_core::result::AppResult;
use reslib_core::types::ProjectId;
use reslib_entity::{Field, FieldSchema, FieldValue, TemplateInput};

pub const TEMPLATE_INVALID: &str =
    "template name and fields cannot be blank, field keys have to be unique, field type cannot be empty";
pub const PROJECT_NAME_BLANK: &str = "project name cannot be blank";
pub const RESOURCE_NAME_BLANK: &str = "resource name cannot be blank";
pub const PROJECTS_REQUIRED: &str = "at least one project id is required";
pub const PROJECT_ID_DUPLICATE: &str = "duplicate project ids not allowed";
pub const TEMPLATE_MISMATCH: &str =
    "mismatched base template, cannot validate resource structure";
pub const TEMPLATE_MISMATCH_REQUIRED: &str = "mismatched base template, cannot validate resource structure; make sure that required fields are not empty and subresource-type Fields have integers in Value";

/// Check a template definition: non-empty name, at least one field,
/// unique keys, non-empty kinds.
pub fn validate_template(input: &TemplateInput) -> AppResult<()> {
    if input.name.trim().is_empty() || input.fields.is_empty() {
        return Err(AppError::validation(TEMPLATE_INVALID));
    }

    let mut keys = HashSet::new();
    for schema in &input.fields {
        if schema.kind.is_empty() || !keys.insert(schema.key.as_str()) {
            return Err(AppError::validation(TEMPLATE_INVALID));
        }
    }
    Ok(())
}

pub fn require_name(name: &str, message: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation(message));
    }
    Ok(())
}

/// Parse a resource's project id list.
///
/// The list must be non-empty, every id well formed and no id repeated.
pub fn parse_project_ids(raw: &[String]) -> AppResult<Vec<ProjectId>> {
    if raw.is_empty() {
        return Err(AppError::validation(PROJECTS_REQUIRED));
    }

    let ids = raw
        .iter()
        .map(|s| ProjectId::parse(s))
        .collect::<AppResult<Vec<_>>>()?;

    let mut seen = HashSet::new();
    if !ids.iter().all(|id| seen.insert(*id)) {
        return Err(AppError::validation(PROJECT_ID_DUPLICATE));
    }
    Ok(ids)
}

/// Match `fields` element by element against `expected` and normalise
/// subresource quantities to integers.
///
/// Keys, kinds, required flags and order must agree. Subresource values
/// must be non-negative integers (integral floats are accepted) and
/// required plain fields must not be empty.
pub fn match_structure(expected: &[FieldSchema], fields: &mut [Field]) -> AppResult<()> {
    if expected.len() != fields.len() {
        return Err(AppError::validation(TEMPLATE_MISMATCH));
    }

    for (schema, field) in expected.iter().zip(fields.iter_mut()) {
        if !field.matches_schema(schema) {
            return Err(AppError::validation(TEMPLATE_MISMATCH_REQUIRED));
        }

        if field.is_subresource() {
            let quantity = field
                .value
                .as_quantity()
                .ok_or_else(|| AppError::validation(TEMPLATE_MISMATCH_REQUIRED))?;
            field.value = FieldValue::Integer(quantity);
        } else if field.required && field.value.is_empty() {
            return Err(AppError::validation(TEMPLATE_MISMATCH_REQUIRED));
        }
    }
    Ok(())
}
