//! Command grammars.
//!
//! Each mode owns an ordered list of command rules; a separate list holds
//! commands that are valid in every mode. Arguments are taken from the named
//! capture groups of the matching regex.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::LazyLock;

use super::mode::Mode;

/// Every command the classifier can recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    // Project
    SetProjectPath,
    Commit,
    QuickSave,
    Push,
    Sync,
    GitInit,
    GitStatus,
    LogWork,
    ShowProjects,
    ProjectDashboard,
    // Stock
    TechnicalAnalysis,
    Recommendation,
    PortfolioSummary,
    Portfolio,
    StockPrice,
    // Coding practice
    SetupPlatforms,
    StudyGuide,
    DailyProblem,
    PracticeProgress,
    // Personal assistant
    AddTask,
    CompleteTask,
    ShowTasks,
    AddExpense,
    ShowExpenses,
    Schedule,
    ShowCalendar,
    AddContact,
    FindContact,
    // Any mode
    ModeInfo,
    CreateProject,
    DetectProjects,
    SetupGithub,
    GenerateProject,
}

/// Where a recognized command is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandRoute {
    /// The external handler of the given mode.
    Handler(Mode),
    /// Answered by the dispatcher itself.
    ModeInfo,
    /// Requirement analysis followed by template generation.
    ProjectGeneration,
}

impl CommandKind {
    pub fn route(&self) -> CommandRoute {
        use CommandKind::*;
        match self {
            SetProjectPath | Commit | QuickSave | Push | Sync | GitInit | GitStatus | LogWork
            | ShowProjects | ProjectDashboard | CreateProject | DetectProjects | SetupGithub => {
                CommandRoute::Handler(Mode::Project)
            }
            TechnicalAnalysis | Recommendation | PortfolioSummary | Portfolio | StockPrice => {
                CommandRoute::Handler(Mode::Stock)
            }
            SetupPlatforms | StudyGuide | DailyProblem | PracticeProgress => {
                CommandRoute::Handler(Mode::CodingPractice)
            }
            AddTask | CompleteTask | ShowTasks | AddExpense | ShowExpenses | Schedule
            | ShowCalendar | AddContact | FindContact => {
                CommandRoute::Handler(Mode::PersonalAssistant)
            }
            ModeInfo => CommandRoute::ModeInfo,
            GenerateProject => CommandRoute::ProjectGeneration,
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Reuse the serde name so logs and wire payloads agree.
        let name = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| format!("{:?}", self));
        write!(f, "{}", name)
    }
}

/// Named arguments captured from an utterance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandArgs(BTreeMap<String, String>);

impl CommandArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Missing arguments read as the empty string; validation is the handler's job.
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A command recognized in an utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedCommand {
    pub kind: CommandKind,
    pub args: CommandArgs,
}

struct CommandRule {
    kind: CommandKind,
    pattern: Regex,
}

impl CommandRule {
    fn new(kind: CommandKind, pattern: &str) -> Self {
        // NOTE: expect() is acceptable here: grammars are static and covered by tests.
        let pattern = Regex::new(&format!("(?i){}", pattern)).expect("Invalid regex: command grammar");
        Self { kind, pattern }
    }

    fn apply(&self, text: &str) -> Option<MatchedCommand> {
        let caps = self.pattern.captures(text)?;
        let mut args = CommandArgs::new();
        for name in self.pattern.capture_names().flatten() {
            if let Some(m) = caps.name(name) {
                let value = m
                    .as_str()
                    .trim()
                    .trim_matches(|c| c == '"' || c == '\'')
                    .trim();
                if !value.is_empty() {
                    args.insert(name, value);
                }
            }
        }
        Some(MatchedCommand {
            kind: self.kind,
            args,
        })
    }
}

fn project_rules() -> Vec<CommandRule> {
    use CommandKind::*;
    vec![
        CommandRule::new(
            SetProjectPath,
            r"\b(?:set\s+(?:project\s+)?path|link\s+project)\b(?:\s+to\b)?\s*(?P<path>.*)$",
        ),
        CommandRule::new(
            Commit,
            r#"\bcommit\b(?:\s+with\b)?(?:\s+(?:message|msg)\b)?\s*:?\s*(?P<message>.*)$"#,
        ),
        CommandRule::new(QuickSave, r"^\s*(?:quick\s+)?save\b|\bbackup\b"),
        CommandRule::new(Push, r"\bpush\b"),
        CommandRule::new(Sync, r"\bsync\b"),
        CommandRule::new(GitInit, r"\bgit\s+init\b"),
        CommandRule::new(GitStatus, r"\bgit\s+status\b|^\s*status\s*$"),
        CommandRule::new(
            LogWork,
            r"\b(?:log(?:\s+work)?|worked)\b(?:\D*?(?P<hours>\d+(?:\.\d+)?)\s*(?:hours?|hrs?|h)\b)?(?:.*?\bon\s+(?P<target>.+))?",
        ),
        CommandRule::new(ShowProjects, r"\b(?:show|list)\b.*\bprojects?\b"),
        CommandRule::new(ProjectDashboard, r"\bdashboard\b|\bprogress\b"),
    ]
}

fn stock_rules() -> Vec<CommandRule> {
    use CommandKind::*;
    vec![
        CommandRule::new(
            TechnicalAnalysis,
            r"\b(?:technical|chart)\s+analysis\b(?:\s+(?:of|for|on)\s+(?P<symbol>[\w.]+))?",
        ),
        CommandRule::new(
            Recommendation,
            r"\bshould\s+i\s+(?P<action>buy|sell)\b(?:\s+(?P<symbol>[\w.]+))?|\brecommend\w*\b",
        ),
        CommandRule::new(
            PortfolioSummary,
            r"\bsummar(?:ize|ise|y)\b.*?\bportfolio\b(?:.*?\b(?P<period>week(?:ly)?|month(?:ly)?|quarter(?:ly)?|annual(?:ly)?|year(?:ly)?)\b)?",
        ),
        CommandRule::new(Portfolio, r"\bportfolio\b|\bholdings\b"),
        CommandRule::new(
            StockPrice,
            r"\b(?:stock\s+)?(?:price|quote)\b(?:\s+(?:of|for))?(?:\s+(?P<symbol>[\w.]+))?",
        ),
    ]
}

fn coding_rules() -> Vec<CommandRule> {
    use CommandKind::*;
    vec![
        CommandRule::new(
            SetupPlatforms,
            r"\bset\s*up\s+(?:dsa|platforms?|usernames?)\b|\bconfigure\s+(?:leetcode|platforms?)\b",
        ),
        CommandRule::new(
            StudyGuide,
            r"\b(?P<topic>arrays?|trees?|strings?|graphs?|dynamic\s+programming|dp|dsa|prep|study|linked\s+lists?|recursion|sorting)\s+guide\b",
        ),
        CommandRule::new(
            DailyProblem,
            r"\b(?:daily|random|next)\s+(?:problem|challenge|question)\b|\bgive\s+me\s+a\s+problem\b",
        ),
        CommandRule::new(
            PracticeProgress,
            r"\b(?:progress|stats|statistics)\b|\bhow\s+many\s+problems\b",
        ),
    ]
}

fn personal_rules() -> Vec<CommandRule> {
    use CommandKind::*;
    vec![
        CommandRule::new(AddTask, r"\b(?:add|create)\s+(?:a\s+)?task\b\s*:?\s*(?P<task>.*)$"),
        CommandRule::new(CompleteTask, r"\b(?:complete|finish)\s+task\b\s*:?\s*(?P<task>.*)$"),
        CommandRule::new(ShowTasks, r"\b(?:show|list)\s+(?:my\s+)?tasks\b|\bpriority\s+tasks\b"),
        CommandRule::new(AddExpense, r"\b(?:add\s+(?:an\s+)?expense|spent)\b\s*:?\s*(?P<details>.*)$"),
        CommandRule::new(ShowExpenses, r"\b(?:show\s+(?:my\s+)?expenses|spending\s+summary)\b"),
        CommandRule::new(
            Schedule,
            r"\b(?:add\s+(?:an\s+)?appointment|schedule\s+(?:a\s+)?meeting)\b\s*:?\s*(?P<details>.*)$",
        ),
        CommandRule::new(ShowCalendar, r"\b(?:show\s+(?:my\s+)?calendar|view\s+appointments)\b"),
        CommandRule::new(AddContact, r"\badd\s+(?:a\s+)?contact\b\s*:?\s*(?P<details>.*)$"),
        CommandRule::new(FindContact, r"\b(?:find|search)\s+contacts?\b\s*(?:for\s+)?(?P<name>.*)$"),
    ]
}

fn cross_cutting_rules() -> Vec<CommandRule> {
    use CommandKind::*;
    vec![
        CommandRule::new(
            ModeInfo,
            r"\bmode\s+info\b|\b(?:which|what)\s+mode\b|\b(?:list|available|show)\s+modes\b",
        ),
        CommandRule::new(
            CreateProject,
            r#"\b(?:create|new)\s+project\b(?:\s+(?P<name>"[^"]+"|'[^']+'|\w+))?(?:\s+with\s+description\s+(?P<description>"[^"]+"|'[^']+'))?(?:\s+deadline\s+(?P<deadline>\d{4}-\d{2}-\d{2}))?(?:\s+type\s+(?P<kind>\w+))?"#,
        ),
        CommandRule::new(
            DetectProjects,
            r"\b(?:detect|scan\s+for|find)\s+(?:my\s+)?(?:existing\s+)?projects\b",
        ),
        CommandRule::new(SetupGithub, r"\bset\s*up\s+github\b|\bgithub\s+setup\b"),
        CommandRule::new(
            GenerateProject,
            r"\b(?:create|build|make|generate|scaffold)\b.*?\b(?:app|application|website|site|webapp|platform|frontend|backend|api)\b",
        ),
    ]
}

static GRAMMAR: LazyLock<CommandGrammar> = LazyLock::new(CommandGrammar::build);

/// Per-mode and cross-cutting command tables.
pub struct CommandGrammar {
    by_mode: HashMap<Mode, Vec<CommandRule>>,
    cross_cutting: Vec<CommandRule>,
}

impl CommandGrammar {
    pub fn global() -> &'static CommandGrammar {
        &GRAMMAR
    }

    fn build() -> Self {
        let mut by_mode = HashMap::new();
        by_mode.insert(Mode::General, Vec::new());
        by_mode.insert(Mode::Project, project_rules());
        by_mode.insert(Mode::Stock, stock_rules());
        by_mode.insert(Mode::CodingPractice, coding_rules());
        by_mode.insert(Mode::PersonalAssistant, personal_rules());

        Self {
            by_mode,
            cross_cutting: cross_cutting_rules(),
        }
    }

    /// First matching command of `mode`'s own grammar.
    pub fn match_mode(&self, mode: Mode, text: &str) -> Option<MatchedCommand> {
        self.by_mode
            .get(&mode)
            .and_then(|rules| rules.iter().find_map(|r| r.apply(text)))
    }

    /// First matching command valid in any mode.
    pub fn match_cross_cutting(&self, text: &str) -> Option<MatchedCommand> {
        self.cross_cutting.iter().find_map(|r| r.apply(text))
    }

    /// Commands registered for `mode`, in precedence order.
    pub fn commands_for(&self, mode: Mode) -> Vec<CommandKind> {
        self.by_mode
            .get(&mode)
            .map(|rules| rules.iter().map(|r| r.kind).collect())
            .unwrap_or_default()
    }
}
