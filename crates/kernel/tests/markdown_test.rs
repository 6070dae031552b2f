#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Markdown form compiler and structural validator tests.

use modulo_kernel::form::{FieldType, parse_markdown, validate_form_structure};

/// A full-grammar intake document: title, document description, prefixed
/// and bare section headings, required markers, placeholders, and every
/// choice type.
const INTAKE_DOC: &str = r#"# Project Intake

Tell us what you need; we respond within two business days.

## Section: Contact

How to reach you.

- text* | full_name | Full Name | Jane Doe
- email* | email | Email Address
- text | website | Company Website

## Section: Project

- textarea* | summary | What are you building?
- number | budget | Budget (USD)
- date | deadline | Target Date

## Preferences

- select | engagement | Engagement Model
  - Fixed bid
  - Retainer
  - Hourly
- checkbox | channels | Preferred Channels
  - Email
  - Phone
  - Chat
- radio* | priority | Priority
  - Speed
  - Cost
  - Quality
"#;

#[test]
fn test_round_trip_structural_completeness() {
    let form = parse_markdown(INTAKE_DOC);
    let result = validate_form_structure(&form);

    assert!(result.valid, "unexpected errors: {:?}", result.errors);
    assert!(result.errors.is_empty());

    assert_eq!(form.title, "Project Intake");
    assert_eq!(
        form.description.as_deref(),
        Some("Tell us what you need; we respond within two business days.")
    );
    assert_eq!(form.sections.len(), 3);
    assert_eq!(form.sections[0].title, "Contact");
    assert_eq!(form.sections[1].title, "Project");
    assert_eq!(form.sections[2].title, "Preferences");

    let field_count: usize = form.sections.iter().map(|s| s.fields.len()).sum();
    assert_eq!(field_count, 9);

    // Placeholder only where a fourth segment exists.
    assert_eq!(
        form.sections[0].fields[0].placeholder.as_deref(),
        Some("Jane Doe")
    );
    assert_eq!(form.sections[0].fields[1].placeholder, None);

    // Choice fields collected their options.
    let prefs = &form.sections[2];
    assert_eq!(prefs.fields[0].options.as_ref().unwrap().len(), 3);
    assert_eq!(prefs.fields[1].options.as_ref().unwrap().len(), 3);
    assert_eq!(prefs.fields[2].options.as_ref().unwrap().len(), 3);
    assert!(prefs.fields[2].required);
}

#[test]
fn test_parse_is_pure_and_idempotent() {
    let first = parse_markdown(INTAKE_DOC);
    let second = parse_markdown(INTAKE_DOC);
    assert_eq!(first, second);
}

#[test]
fn test_monotonic_error_accumulation() {
    let valid = "# T\n\n## S\n- select | c | C\n  - A\n";
    assert!(validate_form_structure(&parse_markdown(valid)).valid);

    // Each removal of a required structural element costs at least one error.
    let no_title = "## S\n- select | c | C\n  - A\n";
    let errors = validate_form_structure(&parse_markdown(no_title)).errors;
    assert_eq!(errors, vec!["Form must have a title".to_string()]);

    let no_options = "# T\n\n## S\n- select | c | C\n";
    let errors = validate_form_structure(&parse_markdown(no_options)).errors;
    assert_eq!(
        errors,
        vec!["Field \"C\" must have at least one option".to_string()]
    );

    let no_fields = "# T\n\n## S\n";
    let errors = validate_form_structure(&parse_markdown(no_fields)).errors;
    assert_eq!(
        errors,
        vec!["Section \"S\" must have at least one field".to_string()]
    );

    let no_sections = "# T\n";
    let errors = validate_form_structure(&parse_markdown(no_sections)).errors;
    assert_eq!(
        errors,
        vec!["Form must have at least one section".to_string()]
    );

    // Degradations combine; nothing is masked.
    let no_title_no_options = "## S\n- select | c | C\n";
    let errors = validate_form_structure(&parse_markdown(no_title_no_options)).errors;
    assert_eq!(
        errors,
        vec![
            "Form must have a title".to_string(),
            "Field \"C\" must have at least one option".to_string(),
        ]
    );

    let empty = validate_form_structure(&parse_markdown("")).errors;
    assert_eq!(
        empty,
        vec![
            "Form must have a title".to_string(),
            "Form must have at least one section".to_string(),
        ]
    );
}

#[test]
fn test_unknown_type_falls_back_to_text() {
    let form = parse_markdown("# T\n## S\n- foo | a | A\n- foo* | b | B\n");
    let fields = &form.sections[0].fields;

    assert_eq!(fields[0].field_type, FieldType::Text);
    assert!(!fields[0].required);

    // The required flag is independent of the fallback.
    assert_eq!(fields[1].field_type, FieldType::Text);
    assert!(fields[1].required);
}

#[test]
fn test_option_lines_disambiguated_from_field_lines() {
    let content = r#"## Section: Prefs
- select | color | Favorite Color
  - Red
  - Blue
- text | notes | Notes
"#;
    let form = parse_markdown(content);

    assert_eq!(form.sections.len(), 1);
    let section = &form.sections[0];
    assert_eq!(section.title, "Prefs");
    assert_eq!(section.fields.len(), 2);
    assert_eq!(
        section.fields[0].options,
        Some(vec!["Red".to_string(), "Blue".to_string()])
    );
    assert_eq!(section.fields[1].options, None);

    // The notes field serializes without an options key at all.
    let json = serde_json::to_value(&section.fields[1]).unwrap();
    assert!(json.get("options").is_none());
}

#[test]
fn test_document_description_ends_at_first_paragraph_break() {
    let content = "# T\n\nFirst paragraph.\n\nSecond paragraph is ignored.\n\n## S\n- text | a | A\n";
    let form = parse_markdown(content);

    assert_eq!(form.description.as_deref(), Some("First paragraph."));
    assert!(validate_form_structure(&form).valid);
}

#[test]
fn test_extra_segments_beyond_placeholder_are_ignored() {
    let form = parse_markdown("# T\n## S\n- text | a | A | hint | surplus\n");
    let field = &form.sections[0].fields[0];

    assert_eq!(field.name, "a");
    assert_eq!(field.label, "A");
    assert_eq!(field.placeholder.as_deref(), Some("hint"));
}
