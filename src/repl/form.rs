//! Follow-up forms for agents that ask for structured input.

use super::reader::{LineReader, ReadOutcome};
use crate::stream::{InputField, InputMetadata};
use serde_json::{Map, Value};
use std::io::Write;

/// Word that abandons the current field.
pub const CANCEL_WORD: &str = "cancel";

/// Collects values for a follow-up request.
///
/// Returns `None` when the user abandons the form.
pub trait FormFiller {
    fn fill(&mut self, metadata: &InputMetadata) -> Option<Map<String, Value>>;
}

/// How a typed answer maps onto a choice list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceResolution {
    Selected(String),
    /// Several options contain the input.
    Ambiguous(Vec<String>),
    /// A number outside `1..=len`.
    OutOfRange,
    NoMatch,
}

/// Resolve `input` against `options`: a 1-based number, an exact value
/// (case-insensitive), or a unique case-insensitive substring.
pub fn resolve_choice(input: &str, options: &[String]) -> ChoiceResolution {
    let input = input.trim();
    if let Ok(index) = input.parse::<usize>() {
        return match index.checked_sub(1).and_then(|i| options.get(i)) {
            Some(option) => ChoiceResolution::Selected(option.clone()),
            None => ChoiceResolution::OutOfRange,
        };
    }
    let needle = input.to_lowercase();
    if let Some(exact) = options.iter().find(|o| o.to_lowercase() == needle) {
        return ChoiceResolution::Selected(exact.clone());
    }
    let matches = options
        .iter()
        .filter(|o| o.to_lowercase().contains(&needle))
        .cloned()
        .collect::<Vec<_>>();
    match matches.len() {
        0 => ChoiceResolution::NoMatch,
        1 => ChoiceResolution::Selected(matches.into_iter().next().unwrap_or_default()),
        _ => ChoiceResolution::Ambiguous(matches),
    }
}

/// Interactive form on the terminal prompt.
pub struct TerminalForm<'a, W: Write> {
    reader: &'a mut dyn LineReader,
    out: W,
}

impl<'a, W: Write> TerminalForm<'a, W> {
    pub fn new(reader: &'a mut dyn LineReader, out: W) -> Self {
        Self { reader, out }
    }

    fn say(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }

    /// Read one answer; `None` on cancel, Ctrl-C or end of input.
    fn ask(&mut self, prompt: &str) -> Option<String> {
        match self.reader.read_line(prompt) {
            ReadOutcome::Line(line) if line.trim().eq_ignore_ascii_case(CANCEL_WORD) => None,
            ReadOutcome::Line(line) => Some(line.trim().to_string()),
            ReadOutcome::Interrupted | ReadOutcome::Eof => None,
        }
    }

    fn ask_field(&mut self, field: &InputField) -> Option<String> {
        self.say(&format!(
            "{} {}",
            title_case(&field.field_name),
            field.field_description
        ));
        match field.field_values.as_deref() {
            Some(options) => self.ask_choice(options),
            None => self.ask_text(&field.field_name),
        }
    }

    fn ask_text(&mut self, name: &str) -> Option<String> {
        let prompt = format!("{}: ", title_case(name));
        loop {
            let value = self.ask(&prompt)?;
            if value.is_empty() {
                self.say("⚠️  No input provided. Please try again.");
                continue;
            }
            self.say(&format!("✓ Entered: {value}"));
            return Some(value);
        }
    }

    fn ask_choice(&mut self, options: &[String]) -> Option<String> {
        for (idx, option) in options.iter().enumerate() {
            self.say(&format!("  {}. {option}", idx + 1));
        }
        let prompt = format!(
            "Choose 1-{}, type a value, or '{CANCEL_WORD}': ",
            options.len()
        );
        loop {
            let input = self.ask(&prompt)?;
            if input.is_empty() {
                self.say("⚠️  No input provided. Please try again.");
                continue;
            }
            match resolve_choice(&input, options) {
                ChoiceResolution::Selected(value) => {
                    self.say(&format!("✓ Selected: {value}"));
                    return Some(value);
                }
                ChoiceResolution::Ambiguous(matches) => {
                    self.say("⚠️  Ambiguous input. Multiple matches:");
                    for candidate in matches {
                        self.say(&format!("  - {candidate}"));
                    }
                    self.say("Please be more specific.");
                }
                ChoiceResolution::OutOfRange => {
                    self.say(&format!(
                        "❌ Invalid number. Please choose 1-{}",
                        options.len()
                    ));
                }
                ChoiceResolution::NoMatch => {
                    self.say(&format!("❌ '{input}' not found in options. Please try again."));
                }
            }
        }
    }

    fn confirm_cancel_form(&mut self) -> bool {
        match self.reader.read_line("Cancel entire form? [y/N]: ") {
            ReadOutcome::Line(line) => {
                matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
            }
            ReadOutcome::Interrupted | ReadOutcome::Eof => true,
        }
    }
}

impl<W: Write> FormFiller for TerminalForm<'_, W> {
    fn fill(&mut self, metadata: &InputMetadata) -> Option<Map<String, Value>> {
        let total = metadata.input_fields.len();
        self.say("");
        self.say("📋 Form Input: please provide the following information.");
        let mut values = Map::new();
        for (idx, field) in metadata.input_fields.iter().enumerate() {
            self.say(&format!("Field {} of {total}", idx + 1));
            match self.ask_field(field) {
                Some(value) => {
                    values.insert(field.field_name.clone(), Value::String(value));
                }
                None => {
                    if self.confirm_cancel_form() {
                        self.say("❌ Form cancelled");
                        return None;
                    }
                    self.say("⏭️  Skipped field");
                }
            }
        }
        self.say("✓ Form completed");
        for (name, value) in &values {
            self.say(&format!(
                "  • {name}: {}",
                value.as_str().unwrap_or_default()
            ));
        }
        Some(values)
    }
}

/// `branch_name` -> `Branch Name`.
fn title_case(name: &str) -> String {
    name.split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::ScriptedReader;

    fn options() -> Vec<String> {
        vec!["production".into(), "staging".into(), "stage-eu".into()]
    }

    fn field(name: &str, values: Option<&[&str]>) -> InputField {
        InputField {
            field_name: name.into(),
            field_description: format!("Describe {name}"),
            field_values: values.map(|v| v.iter().map(|s| s.to_string()).collect()),
        }
    }

    #[test]
    fn resolve_choice_by_number_exact_and_substring() {
        let opts = options();
        assert_eq!(
            resolve_choice("1", &opts),
            ChoiceResolution::Selected("production".into())
        );
        assert_eq!(resolve_choice("0", &opts), ChoiceResolution::OutOfRange);
        assert_eq!(resolve_choice("4", &opts), ChoiceResolution::OutOfRange);
        assert_eq!(
            resolve_choice("STAGING", &opts),
            ChoiceResolution::Selected("staging".into())
        );
        assert_eq!(
            resolve_choice("prod", &opts),
            ChoiceResolution::Selected("production".into())
        );
        assert_eq!(
            resolve_choice("stag", &opts),
            ChoiceResolution::Ambiguous(vec!["staging".into(), "stage-eu".into()])
        );
        assert_eq!(resolve_choice("qa", &opts), ChoiceResolution::NoMatch);
    }

    #[test]
    fn exact_match_beats_substring_ambiguity() {
        let opts = vec!["stage".to_string(), "stage-eu".to_string()];
        assert_eq!(
            resolve_choice("stage", &opts),
            ChoiceResolution::Selected("stage".into())
        );
    }

    #[test]
    fn form_collects_text_and_choice_values() {
        let mut reader = ScriptedReader::new(["", "feature/login", "stag", "eu"]);
        let mut out = Vec::new();
        let metadata = InputMetadata {
            input_fields: vec![
                field("branch_name", None),
                field("environment", Some(&["staging", "stage-eu"])),
            ],
        };
        let values = TerminalForm::new(&mut reader, &mut out)
            .fill(&metadata)
            .expect("form completes");
        assert_eq!(values["branch_name"], "feature/login");
        assert_eq!(values["environment"], "stage-eu");

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Field 1 of 2"));
        assert!(text.contains("No input provided"));
        assert!(text.contains("Ambiguous input"));
        assert!(text.contains("• branch_name: feature/login"));
        assert_eq!(reader.prompts()[0], "Branch Name: ");
    }

    #[test]
    fn cancel_then_decline_skips_the_field() {
        let mut reader = ScriptedReader::new(["cancel", "n", "value"]);
        let mut out = Vec::new();
        let metadata = InputMetadata {
            input_fields: vec![field("first", None), field("second", None)],
        };
        let values = TerminalForm::new(&mut reader, &mut out)
            .fill(&metadata)
            .expect("form completes");
        assert!(!values.contains_key("first"));
        assert_eq!(values["second"], "value");
        assert!(String::from_utf8(out).unwrap().contains("Skipped field"));
    }

    #[test]
    fn cancel_then_confirm_abandons_the_form() {
        let mut reader = ScriptedReader::new(["CANCEL", "yes"]);
        let mut out = Vec::new();
        let metadata = InputMetadata {
            input_fields: vec![field("first", None), field("second", None)],
        };
        assert!(TerminalForm::new(&mut reader, &mut out)
            .fill(&metadata)
            .is_none());
        assert!(String::from_utf8(out).unwrap().contains("Form cancelled"));
    }

    #[test]
    fn end_of_input_abandons_the_form() {
        let mut reader = ScriptedReader::new(Vec::<String>::new());
        let metadata = InputMetadata {
            input_fields: vec![field("only", None)],
        };
        assert!(TerminalForm::new(&mut reader, Vec::new())
            .fill(&metadata)
            .is_none());
    }

    #[test]
    fn title_case_splits_underscores() {
        assert_eq!(title_case("pr_title"), "Pr Title");
        assert_eq!(title_case("x"), "X");
    }
}
