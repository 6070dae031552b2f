//! Markdown form compiler.
//!
//! Compiles the constrained markdown dialect used for intake form
//! definitions into a [`FormDefinition`]. A `#` heading is the form title,
//! `##` headings open sections, `- type | name | label | placeholder`
//! lines declare fields, and two-space-indented `- ` items attach options
//! to the current choice field. Free text under a heading accumulates into
//! the description of the nearest enclosing scope.
//!
//! The compiler is a five-state line machine and is total: malformed input
//! degrades (lines are ignored, unknown types become `text`) instead of
//! producing an error. Structural acceptability is judged afterwards by
//! [`crate::form::validate::validate_form_structure`].

use crate::form::types::{Field, FieldType, FormDefinition, Section};

/// Compiler states. Each input line drives exactly one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No capture in progress and no section current.
    AwaitingTitle,

    /// Free text buffers toward the document description.
    InDocumentDescription,

    /// Inside a section whose description is already settled.
    InSection,

    /// Directly after a `##` heading; free text buffers toward the
    /// section description.
    InSectionDescription,

    /// Directly after a field line; indented items attach to that field.
    InField,
}

/// Compile a markdown form definition.
///
/// Best-effort and total: this never fails, and an empty input yields an
/// empty definition. Callers are expected to run the result through
/// [`crate::form::validate::validate_form_structure`] before persisting.
pub fn parse_markdown(text: &str) -> FormDefinition {
    let mut compiler = Compiler::new();
    for line in text.lines() {
        compiler.step(line);
    }
    compiler.finish()
}

struct Compiler {
    state: State,
    form: FormDefinition,
    /// Pending description lines, already trimmed, joined on flush.
    buffer: Vec<String>,
}

impl Compiler {
    fn new() -> Self {
        Self {
            state: State::AwaitingTitle,
            form: FormDefinition::default(),
            buffer: Vec::new(),
        }
    }

    /// Consume one line.
    ///
    /// The rule order is part of the grammar: option items are matched on
    /// the raw line and ahead of the field rule, because after trimming
    /// the two patterns are identical.
    fn step(&mut self, raw: &str) {
        let line = raw.trim();

        if line.is_empty() {
            self.blank_line();
            return;
        }

        if let Some(text) = heading(line, "##") {
            self.section_line(text);
            return;
        }

        if let Some(text) = heading(line, "#") {
            self.title_line(text);
            return;
        }

        if self.state == State::InField
            && let Some(rest) = raw.strip_prefix("  - ")
            && let Some(options) = self.current_options_mut()
        {
            options.push(rest.trim().to_string());
            return;
        }

        if let Some(rest) = line.strip_prefix("- ")
            && self.section_open()
        {
            self.field_line(rest);
            return;
        }

        self.text_line(line);
    }

    /// Flush the last pending description and return the definition.
    fn finish(mut self) -> FormDefinition {
        self.flush();
        self.form
    }

    /// A `#` heading: overwrite the title and restart document capture.
    ///
    /// Pending buffered text is carried, not flushed; with the section
    /// context cleared it will land on the document description. Inputs
    /// with more than one title are degenerate but must not panic.
    fn title_line(&mut self, text: &str) {
        self.form.title = text.to_string();
        self.state = State::InDocumentDescription;
    }

    /// A `##` heading: settle the pending description, open a section.
    fn section_line(&mut self, text: &str) {
        self.flush();
        let title = match text.strip_prefix("Section:") {
            Some(rest) => rest.trim(),
            None => text,
        };
        self.form.sections.push(Section::new(title));
        self.state = State::InSectionDescription;
    }

    /// A `- ` item inside a section: settle the description, parse the
    /// field. Lines with fewer than three segments are dropped, but the
    /// description capture still closes.
    fn field_line(&mut self, rest: &str) {
        self.flush();
        if self.state == State::InSectionDescription {
            self.state = State::InSection;
        }
        if let Some(field) = parse_field(rest)
            && let Some(section) = self.form.sections.last_mut()
        {
            section.fields.push(field);
            self.state = State::InField;
        }
    }

    /// A blank line ends a non-empty capture; an empty capture stays open
    /// so a blank line may separate a heading from its description. Blank
    /// lines never end a field: options may follow them.
    fn blank_line(&mut self) {
        match self.state {
            State::InDocumentDescription => {
                if !self.buffer.is_empty() {
                    self.flush();
                    self.state = State::AwaitingTitle;
                }
            }
            State::InSectionDescription => {
                if !self.buffer.is_empty() {
                    self.flush();
                    self.state = State::InSection;
                }
            }
            State::AwaitingTitle | State::InSection | State::InField => {}
        }
    }

    /// Any other non-blank line: description text when capturing,
    /// otherwise ignored. A `- ` item before the first section is not a
    /// field and ends up here.
    fn text_line(&mut self, line: &str) {
        match self.state {
            State::InDocumentDescription | State::InSectionDescription => {
                self.buffer.push(line.to_string());
            }
            State::AwaitingTitle | State::InSection | State::InField => {}
        }
    }

    /// Assign the buffered description to the current target: the open
    /// section when one is current, otherwise the document.
    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = self.buffer.join("\n").trim().to_string();
        self.buffer.clear();
        if self.section_open()
            && let Some(section) = self.form.sections.last_mut()
        {
            section.description = Some(text);
        } else {
            self.form.description = Some(text);
        }
    }

    /// Whether a section is current. Decided by state, not by the section
    /// list: a later title line clears the section context while keeping
    /// already-compiled sections.
    fn section_open(&self) -> bool {
        matches!(
            self.state,
            State::InSection | State::InSectionDescription | State::InField
        )
    }

    /// Option list of the current field, when it has one. In `InField`
    /// the current field is always the last field of the last section.
    fn current_options_mut(&mut self) -> Option<&mut Vec<String>> {
        self.form
            .sections
            .last_mut()?
            .fields
            .last_mut()?
            .options
            .as_mut()
    }
}

/// Match an ATX heading of exactly the given marker depth.
///
/// Requires whitespace after the marker, so `##` lines do not read as `#`
/// headings and `###` matches neither.
fn heading<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(marker)?;
    let first = rest.chars().next()?;
    if first.is_whitespace() {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Parse the pipe segments of a field line (text after the `- ` marker).
///
/// Returns `None` for fewer than three segments. The placeholder is
/// present exactly when a fourth segment exists; choice types start with
/// an empty option list for indented items to fill.
fn parse_field(rest: &str) -> Option<Field> {
    let segments: Vec<&str> = rest.split('|').map(str::trim).collect();
    if segments.len() < 3 {
        return None;
    }

    let (field_type, required) = FieldType::parse_token(segments[0]);

    Some(Field {
        field_type,
        name: segments[1].to_string(),
        label: segments[2].to_string(),
        required,
        placeholder: segments.get(3).map(|s| (*s).to_string()),
        options: field_type.is_choice().then(Vec::new),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_document() {
        let content = r#"# Client Intake

Tell us about your project.

## Section: Contact

How to reach you.

- text* | full_name | Full Name | Jane Doe
- email* | email | Email Address

## Preferences

- select | color | Favorite Color
  - Red
  - Blue
- textarea | notes | Anything else?
"#;
        let form = parse_markdown(content);

        assert_eq!(form.title, "Client Intake");
        assert_eq!(form.description.as_deref(), Some("Tell us about your project."));
        assert_eq!(form.sections.len(), 2);

        let contact = &form.sections[0];
        assert_eq!(contact.title, "Contact");
        assert_eq!(contact.description.as_deref(), Some("How to reach you."));
        assert_eq!(contact.fields.len(), 2);
        assert_eq!(contact.fields[0].field_type, FieldType::Text);
        assert_eq!(contact.fields[0].name, "full_name");
        assert_eq!(contact.fields[0].label, "Full Name");
        assert!(contact.fields[0].required);
        assert_eq!(contact.fields[0].placeholder.as_deref(), Some("Jane Doe"));
        assert_eq!(contact.fields[1].field_type, FieldType::Email);
        assert_eq!(contact.fields[1].placeholder, None);

        let prefs = &form.sections[1];
        assert_eq!(prefs.title, "Preferences");
        assert_eq!(prefs.description, None);
        assert_eq!(prefs.fields.len(), 2);
        assert_eq!(
            prefs.fields[0].options,
            Some(vec!["Red".to_string(), "Blue".to_string()])
        );
        assert!(!prefs.fields[0].required);
        assert_eq!(prefs.fields[1].options, None);
    }

    #[test]
    fn parse_empty_input() {
        let form = parse_markdown("");
        assert_eq!(form, FormDefinition::default());
        assert_eq!(form.title, "");
        assert!(form.sections.is_empty());
    }

    #[test]
    fn parse_blank_line_between_title_and_description() {
        let content = "# Survey\n\nWe value your feedback.\n\n## Q\n- text | a | A\n";
        let form = parse_markdown(content);
        assert_eq!(form.description.as_deref(), Some("We value your feedback."));
    }

    #[test]
    fn parse_multiline_descriptions_join_with_newline() {
        let content = "# T\nFirst line.\nSecond line.\n";
        let form = parse_markdown(content);
        assert_eq!(form.description.as_deref(), Some("First line.\nSecond line."));
    }

    #[test]
    fn parse_options_survive_blank_lines() {
        let content = "## P\n- radio | size | Size\n\n  - Small\n\n  - Large\n";
        let form = parse_markdown(content);
        let field = &form.sections[0].fields[0];
        assert_eq!(
            field.options,
            Some(vec!["Small".to_string(), "Large".to_string()])
        );
    }

    #[test]
    fn parse_indented_item_under_plain_field_is_dropped() {
        let content = "## S\n- text | notes | Notes\n  - stray item\n";
        let form = parse_markdown(content);
        let section = &form.sections[0];
        assert_eq!(section.fields.len(), 1);
        assert_eq!(section.fields[0].options, None);
    }

    #[test]
    fn parse_field_line_before_any_section_is_description_text() {
        let content = "# T\n- text | orphan | Orphan\n## S\n- text | a | A\n";
        let form = parse_markdown(content);
        assert_eq!(form.description.as_deref(), Some("- text | orphan | Orphan"));
        assert_eq!(form.sections[0].fields.len(), 1);
        assert_eq!(form.sections[0].fields[0].name, "a");
    }

    #[test]
    fn parse_short_field_line_is_dropped_but_closes_description() {
        let content = "## S\nIntro text.\n- text | broken\n- text | ok | OK\nIgnored tail.\n";
        let form = parse_markdown(content);
        let section = &form.sections[0];
        assert_eq!(section.description.as_deref(), Some("Intro text."));
        assert_eq!(section.fields.len(), 1);
        assert_eq!(section.fields[0].name, "ok");
    }

    #[test]
    fn parse_second_title_overwrites_and_clears_section_context() {
        let content = "# First\n## S\n- text | a | A\n# Second\nNew intro.\n";
        let form = parse_markdown(content);
        assert_eq!(form.title, "Second");
        assert_eq!(form.description.as_deref(), Some("New intro."));
        // The compiled section survives the retitle.
        assert_eq!(form.sections.len(), 1);
        assert_eq!(form.sections[0].fields.len(), 1);
    }

    #[test]
    fn parse_section_prefix_is_case_sensitive() {
        let form = parse_markdown("## section: Raw Title\n- text | a | A\n");
        assert_eq!(form.sections[0].title, "section: Raw Title");
    }
}
