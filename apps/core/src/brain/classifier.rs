//! Intent Classification.
//!
//! Decides, for one utterance, whether it switches mode, invokes a command,
//! or falls through to general chat. Rules are kept in an explicit ordered
//! list and the first rule that fires wins.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use super::commands::{CommandGrammar, MatchedCommand};
use super::mode::Mode;
use super::patterns::PatternLibrary;
use crate::error::AppError;

/// Outcome of classifying one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Classification {
    ModeSwitch { mode: Mode },
    Command(MatchedCommand),
    Chat,
}

/// Classification plus the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub classification: Classification,
    /// Name of the rule that fired, `"fallback"` for chat.
    pub rule: &'static str,
    /// Mode that was active while classifying.
    pub mode: Mode,
}

impl ClassificationResult {
    pub fn matched_mode_switch(&self) -> Option<Mode> {
        match &self.classification {
            Classification::ModeSwitch { mode } => Some(*mode),
            _ => None,
        }
    }

    pub fn matched_command(&self) -> Option<&MatchedCommand> {
        match &self.classification {
            Classification::Command(cmd) => Some(cmd),
            _ => None,
        }
    }

    pub fn fallback_to_chat(&self) -> bool {
        matches!(self.classification, Classification::Chat)
    }
}

/// Which command table wins when an utterance matches both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandPrecedence {
    #[default]
    ModeFirst,
    CrossFirst,
}

impl FromStr for CommandPrecedence {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mode-first" | "mode" => Ok(CommandPrecedence::ModeFirst),
            "cross-first" | "cross" => Ok(CommandPrecedence::CrossFirst),
            other => Err(AppError::Config(format!(
                "unknown command precedence '{}', expected mode-first or cross-first",
                other
            ))),
        }
    }
}

/// One step of the classification pipeline.
pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, text: &str, mode: Mode) -> Option<Classification>;
}

/// Explicit mode-switch trigger phrases.
pub struct ModeSwitchRule {
    library: &'static PatternLibrary,
}

impl Rule for ModeSwitchRule {
    fn name(&self) -> &'static str {
        "mode_switch"
    }

    fn evaluate(&self, text: &str, _mode: Mode) -> Option<Classification> {
        self.library
            .match_mode_switches(text)
            .first()
            .map(|mode| Classification::ModeSwitch { mode: *mode })
    }
}

/// Command grammar of the active mode.
pub struct ModeCommandRule {
    grammar: &'static CommandGrammar,
}

impl Rule for ModeCommandRule {
    fn name(&self) -> &'static str {
        "mode_command"
    }

    fn evaluate(&self, text: &str, mode: Mode) -> Option<Classification> {
        self.grammar.match_mode(mode, text).map(Classification::Command)
    }
}

/// Commands valid in every mode.
pub struct CrossCuttingRule {
    grammar: &'static CommandGrammar,
}

impl Rule for CrossCuttingRule {
    fn name(&self) -> &'static str {
        "cross_cutting"
    }

    fn evaluate(&self, text: &str, _mode: Mode) -> Option<Classification> {
        self.grammar.match_cross_cutting(text).map(Classification::Command)
    }
}

/// Ordered rule list; chat is the implicit last rule.
pub struct IntentClassifier {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Mode switch, then mode commands, then cross-cutting commands.
    pub fn new() -> Self {
        Self::with_precedence(CommandPrecedence::default())
    }

    pub fn with_precedence(precedence: CommandPrecedence) -> Self {
        let library = PatternLibrary::global();
        let grammar = CommandGrammar::global();

        let mode_rule: Box<dyn Rule> = Box::new(ModeCommandRule { grammar });
        let cross_rule: Box<dyn Rule> = Box::new(CrossCuttingRule { grammar });
        let (second, third) = match precedence {
            CommandPrecedence::ModeFirst => (mode_rule, cross_rule),
            CommandPrecedence::CrossFirst => (cross_rule, mode_rule),
        };

        Self::from_rules(vec![Box::new(ModeSwitchRule { library }), second, third])
    }

    /// Builds a classifier from an arbitrary rule list.
    pub fn from_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn classify(&self, text: &str, mode: Mode) -> ClassificationResult {
        let text = text.trim();

        if !text.is_empty() {
            for rule in &self.rules {
                if let Some(classification) = rule.evaluate(text, mode) {
                    debug!(rule = rule.name(), %mode, "Rule matched");
                    return ClassificationResult {
                        classification,
                        rule: rule.name(),
                        mode,
                    };
                }
            }
        }

        ClassificationResult {
            classification: Classification::Chat,
            rule: "fallback",
            mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::commands::CommandKind;

    #[test]
    fn test_mode_switch_short_circuits() {
        let classifier = IntentClassifier::new();

        // "push" would match the project grammar, but the switch wins.
        let result = classifier.classify("push this and go to stock mode", Mode::Project);
        assert_eq!(result.matched_mode_switch(), Some(Mode::Stock));
        assert_eq!(result.rule, "mode_switch");
    }

    #[test]
    fn test_mode_command() {
        let classifier = IntentClassifier::new();

        let result = classifier.classify("git status", Mode::Project);
        assert_eq!(result.matched_command().unwrap().kind, CommandKind::GitStatus);

        let result = classifier.classify("git status", Mode::General);
        assert!(result.fallback_to_chat());
    }

    #[test]
    fn test_cross_cutting_in_any_mode() {
        let classifier = IntentClassifier::new();

        for mode in Mode::ALL {
            let result = classifier.classify("detect projects", mode);
            assert_eq!(
                result.matched_command().unwrap().kind,
                CommandKind::DetectProjects,
                "mode {}",
                mode
            );
        }
    }

    #[test]
    fn test_precedence_is_configurable() {
        // Matches Project's Push and the cross-cutting generator.
        let text = "build the app and push";

        let mode_first = IntentClassifier::with_precedence(CommandPrecedence::ModeFirst);
        assert_eq!(
            mode_first.classify(text, Mode::Project).matched_command().unwrap().kind,
            CommandKind::Push
        );

        let cross_first = IntentClassifier::with_precedence(CommandPrecedence::CrossFirst);
        assert_eq!(
            cross_first.classify(text, Mode::Project).matched_command().unwrap().kind,
            CommandKind::GenerateProject
        );
        assert_eq!(
            cross_first.rule_names(),
            vec!["mode_switch", "cross_cutting", "mode_command"]
        );
    }

    #[test]
    fn test_empty_is_chat() {
        let classifier = IntentClassifier::new();
        assert!(classifier.classify("   ", Mode::Stock).fallback_to_chat());
    }

    #[test]
    fn test_precedence_parsing() {
        assert_eq!("cross-first".parse::<CommandPrecedence>().unwrap(), CommandPrecedence::CrossFirst);
        assert_eq!("Mode-First".parse::<CommandPrecedence>().unwrap(), CommandPrecedence::ModeFirst);
        assert!("random".parse::<CommandPrecedence>().is_err());
    }
}
