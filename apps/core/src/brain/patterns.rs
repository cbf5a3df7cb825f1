//! Pattern Library.
//!
//! Closed vocabularies of tags (tech stack, feature, project type, mode
//! switch) with the surface phrases that trigger them. Every phrase is
//! compiled into a case-insensitive, word-boundary anchored regex once, on
//! first use; the library is read-only afterwards and safe to share.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use super::mode::Mode;

/// Architectural layer a technology belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Frontend,
    Backend,
    Database,
    Mobile,
}

/// Technology tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TechStack {
    #[serde(rename = "react-native")]
    ReactNative,
    Flutter,
    Ionic,
    React,
    Vue,
    Angular,
    Svelte,
    NextJs,
    Nuxt,
    NodeJs,
    Python,
    Java,
    Php,
    Ruby,
    MongoDb,
    PostgreSql,
    MySql,
    Sqlite,
    Firebase,
}

impl TechStack {
    pub fn label(&self) -> &'static str {
        match self {
            TechStack::ReactNative => "react-native",
            TechStack::Flutter => "flutter",
            TechStack::Ionic => "ionic",
            TechStack::React => "react",
            TechStack::Vue => "vue",
            TechStack::Angular => "angular",
            TechStack::Svelte => "svelte",
            TechStack::NextJs => "nextjs",
            TechStack::Nuxt => "nuxt",
            TechStack::NodeJs => "nodejs",
            TechStack::Python => "python",
            TechStack::Java => "java",
            TechStack::Php => "php",
            TechStack::Ruby => "ruby",
            TechStack::MongoDb => "mongodb",
            TechStack::PostgreSql => "postgresql",
            TechStack::MySql => "mysql",
            TechStack::Sqlite => "sqlite",
            TechStack::Firebase => "firebase",
        }
    }

    /// Name fragment used when building project names.
    pub fn display_name(&self) -> &'static str {
        match self {
            TechStack::ReactNative => "ReactNative",
            TechStack::Flutter => "Flutter",
            TechStack::Ionic => "Ionic",
            TechStack::React => "React",
            TechStack::Vue => "Vue",
            TechStack::Angular => "Angular",
            TechStack::Svelte => "Svelte",
            TechStack::NextJs => "Next",
            TechStack::Nuxt => "Nuxt",
            TechStack::NodeJs => "Node",
            TechStack::Python => "Python",
            TechStack::Java => "Java",
            TechStack::Php => "Php",
            TechStack::Ruby => "Ruby",
            TechStack::MongoDb => "Mongo",
            TechStack::PostgreSql => "Postgres",
            TechStack::MySql => "MySql",
            TechStack::Sqlite => "Sqlite",
            TechStack::Firebase => "Firebase",
        }
    }

    /// Static layer assignment; every technology lives in exactly one layer.
    pub fn layer(&self) -> Layer {
        match self {
            TechStack::React
            | TechStack::Vue
            | TechStack::Angular
            | TechStack::Svelte
            | TechStack::NextJs
            | TechStack::Nuxt => Layer::Frontend,
            TechStack::NodeJs
            | TechStack::Python
            | TechStack::Java
            | TechStack::Php
            | TechStack::Ruby => Layer::Backend,
            TechStack::MongoDb
            | TechStack::PostgreSql
            | TechStack::MySql
            | TechStack::Sqlite
            | TechStack::Firebase => Layer::Database,
            TechStack::ReactNative | TechStack::Flutter | TechStack::Ionic => Layer::Mobile,
        }
    }
}

impl fmt::Display for TechStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Feature tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    Authentication,
    Payment,
    RealTime,
    FileUpload,
    Notifications,
    Search,
    Dashboard,
    Crud,
    DragDrop,
    Responsive,
    DarkMode,
    Social,
    Api,
    Cms,
    Ecommerce,
    Blog,
    Portfolio,
    Charts,
    Map,
}

impl Feature {
    pub fn label(&self) -> &'static str {
        match self {
            Feature::Authentication => "authentication",
            Feature::Payment => "payment",
            Feature::RealTime => "real-time",
            Feature::FileUpload => "file-upload",
            Feature::Notifications => "notifications",
            Feature::Search => "search",
            Feature::Dashboard => "dashboard",
            Feature::Crud => "crud",
            Feature::DragDrop => "drag-drop",
            Feature::Responsive => "responsive",
            Feature::DarkMode => "dark-mode",
            Feature::Social => "social",
            Feature::Api => "api",
            Feature::Cms => "cms",
            Feature::Ecommerce => "ecommerce",
            Feature::Blog => "blog",
            Feature::Portfolio => "portfolio",
            Feature::Charts => "charts",
            Feature::Map => "map",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Kind of project being requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    Fullstack,
    MobileApp,
    DesktopApp,
    WebApp,
    Api,
    Frontend,
    Backend,
}

impl Default for ProjectType {
    fn default() -> Self {
        ProjectType::WebApp
    }
}

impl ProjectType {
    pub fn label(&self) -> &'static str {
        match self {
            ProjectType::Fullstack => "fullstack",
            ProjectType::MobileApp => "mobile-app",
            ProjectType::DesktopApp => "desktop-app",
            ProjectType::WebApp => "web-app",
            ProjectType::Api => "api",
            ProjectType::Frontend => "frontend",
            ProjectType::Backend => "backend",
        }
    }
}

/// Which closed vocabulary a lookup scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vocabulary {
    TechStack,
    Feature,
    ProjectType,
    ModeSwitch,
}

/// A canonical label attached by pattern matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Tech(TechStack),
    Feature(Feature),
    ProjectType(ProjectType),
    Mode(Mode),
}

impl Tag {
    pub fn as_tech(&self) -> Option<TechStack> {
        match self {
            Tag::Tech(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_feature(&self) -> Option<Feature> {
        match self {
            Tag::Feature(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_project_type(&self) -> Option<ProjectType> {
        match self {
            Tag::ProjectType(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_mode(&self) -> Option<Mode> {
        match self {
            Tag::Mode(m) => Some(*m),
            _ => None,
        }
    }
}

// Declaration order is precedence order within each table.

const TECH_TABLE: &[(TechStack, &[&str])] = &[
    // Mobile
    (TechStack::ReactNative, &["react native", "react-native"]),
    (TechStack::Flutter, &["flutter"]),
    (TechStack::Ionic, &["ionic"]),
    // Frontend
    (TechStack::React, &["react", "react.js", "reactjs"]),
    (TechStack::Vue, &["vue", "vue.js", "vuejs"]),
    (TechStack::Angular, &["angular", "angular.js", "angularjs"]),
    (TechStack::Svelte, &["svelte", "sveltekit"]),
    (TechStack::NextJs, &["next.js", "nextjs"]),
    (TechStack::Nuxt, &["nuxt", "nuxt.js", "nuxtjs"]),
    // Backend
    (TechStack::NodeJs, &["node", "node.js", "nodejs", "express", "express.js"]),
    (TechStack::Python, &["python", "flask", "django", "fastapi"]),
    (TechStack::Java, &["java", "spring", "spring boot"]),
    (TechStack::Php, &["php", "laravel", "symfony"]),
    (TechStack::Ruby, &["ruby", "rails", "ruby on rails"]),
    // Databases
    (TechStack::MongoDb, &["mongodb", "mongo"]),
    (TechStack::PostgreSql, &["postgresql", "postgres"]),
    (TechStack::MySql, &["mysql"]),
    (TechStack::Sqlite, &["sqlite"]),
    (TechStack::Firebase, &["firebase", "firestore"]),
];

const FEATURE_TABLE: &[(Feature, &[&str])] = &[
    (
        Feature::Authentication,
        &[
            "auth",
            "authentication",
            "authorization",
            "login",
            "log in",
            "signup",
            "sign up",
            "sign-up",
            "register",
            "registration",
            "user management",
        ],
    ),
    (
        Feature::Payment,
        &["payment", "payments", "stripe", "paypal", "checkout", "billing"],
    ),
    (
        Feature::RealTime,
        &["real-time", "realtime", "real time", "websocket", "websockets", "live updates", "chat"],
    ),
    (
        Feature::FileUpload,
        &["file upload", "file uploads", "image upload", "upload", "uploads", "file handling"],
    ),
    (
        Feature::Notifications,
        &["notification", "notifications", "push notifications", "alerts"],
    ),
    (Feature::Search, &["search", "filtering", "search functionality"]),
    (Feature::Dashboard, &["dashboard", "admin panel", "analytics"]),
    (Feature::Crud, &["crud", "todo", "to-do", "to do list"]),
    (
        Feature::DragDrop,
        &["drag and drop", "drag-and-drop", "drag & drop", "draggable"],
    ),
    (
        Feature::Responsive,
        &["responsive", "mobile-friendly", "mobile friendly", "mobile responsive"],
    ),
    (
        Feature::DarkMode,
        &["dark mode", "dark-mode", "dark theme", "theme switching"],
    ),
    (Feature::Social, &["social", "share", "sharing", "social media"]),
    (Feature::Api, &["api", "rest api", "graphql", "endpoints"]),
    (Feature::Cms, &["cms", "content management", "admin"]),
    (
        Feature::Ecommerce,
        &["ecommerce", "e-commerce", "shopping cart", "online store"],
    ),
    (Feature::Blog, &["blog", "blogging", "articles", "posts"]),
    (Feature::Portfolio, &["portfolio", "showcase"]),
    (
        Feature::Charts,
        &["chart", "charts", "graphs", "data visualization", "analytics"],
    ),
    (
        Feature::Map,
        &["map", "maps", "google maps", "location", "geolocation"],
    ),
];

const PROJECT_TYPE_TABLE: &[(ProjectType, &[&str])] = &[
    (ProjectType::Fullstack, &["fullstack", "full-stack", "full stack"]),
    (
        ProjectType::MobileApp,
        &["mobile app", "mobile application", "ios app", "android app"],
    ),
    (ProjectType::DesktopApp, &["desktop app", "desktop application"]),
    (
        ProjectType::WebApp,
        &["web app", "webapp", "web application", "website", "web site", "site"],
    ),
    (ProjectType::Api, &["api", "rest api", "microservice", "server"]),
    (ProjectType::Frontend, &["frontend", "front-end", "client-side"]),
    (ProjectType::Backend, &["backend", "back-end", "server-side"]),
];

const MODE_SWITCH_TABLE: &[(Mode, &[&str])] = &[
    (
        Mode::General,
        &["general mode", "normal mode", "exit mode", "leave mode"],
    ),
    (Mode::Stock, &["stock mode", "stocks mode"]),
    (
        Mode::CodingPractice,
        &["dsa mode", "coding mode", "coding practice mode"],
    ),
    (Mode::Project, &["project mode"]),
    (
        Mode::PersonalAssistant,
        &["personal mode", "assistant mode", "personal assistant mode"],
    ),
];

/// Verbs that turn any non-General trigger phrase into a General switch.
const EXIT_VERBS: &[&str] = &["exit", "leave"];

/// Compiled (tag, matcher) record.
struct PatternEntry {
    tag: Tag,
    matcher: Regex,
}

/// Builds a single anchored regex out of literal phrases.
///
/// Longer phrases come first so the leftmost-first alternation consumes
/// `vue.js` whole instead of stopping at `vue`. Any run of whitespace in a
/// phrase matches any run of whitespace in the text.
fn phrase_regex<S: AsRef<str>>(phrases: &[S]) -> Regex {
    let mut sorted: Vec<&str> = phrases.iter().map(AsRef::as_ref).collect();
    sorted.sort_by_key(|p| std::cmp::Reverse(p.len()));

    let alternatives: Vec<String> = sorted
        .iter()
        .map(|p| {
            p.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect();

    let pattern = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
    // NOTE: expect() is acceptable here: the tables are static and covered by tests.
    Regex::new(&pattern).expect("Invalid regex: pattern table entry")
}

fn compile<T: Copy>(table: &[(T, &[&str])], wrap: fn(T) -> Tag) -> Vec<PatternEntry> {
    table
        .iter()
        .map(|(tag, phrases)| PatternEntry {
            tag: wrap(*tag),
            matcher: phrase_regex(&phrases[..]),
        })
        .collect()
}

/// Mode switch entries. General also answers to `exit <phrase>` and
/// `leave <phrase>` for every trigger phrase of every other mode, so the
/// longer General match suppresses the mode being left.
fn compile_mode_switches() -> Vec<PatternEntry> {
    let exits: Vec<String> = MODE_SWITCH_TABLE
        .iter()
        .filter(|(mode, _)| *mode != Mode::General)
        .flat_map(|(_, phrases)| phrases.iter())
        .flat_map(|phrase| EXIT_VERBS.iter().map(move |verb| format!("{} {}", verb, phrase)))
        .collect();

    MODE_SWITCH_TABLE
        .iter()
        .map(|(mode, phrases)| {
            let mut all: Vec<String> = phrases.iter().map(|p| p.to_string()).collect();
            if *mode == Mode::General {
                all.extend(exits.iter().cloned());
            }
            PatternEntry {
                tag: Tag::Mode(*mode),
                matcher: phrase_regex(all.as_slice()),
            }
        })
        .collect()
}

static LIBRARY: LazyLock<PatternLibrary> = LazyLock::new(PatternLibrary::build);

/// Read-only lookup table from surface text to tags.
pub struct PatternLibrary {
    tech: Vec<PatternEntry>,
    features: Vec<PatternEntry>,
    project_types: Vec<PatternEntry>,
    mode_switches: Vec<PatternEntry>,
}

impl PatternLibrary {
    /// Shared, lazily compiled instance.
    pub fn global() -> &'static PatternLibrary {
        &LIBRARY
    }

    fn build() -> Self {
        Self {
            tech: compile(TECH_TABLE, Tag::Tech),
            features: compile(FEATURE_TABLE, Tag::Feature),
            project_types: compile(PROJECT_TYPE_TABLE, Tag::ProjectType),
            mode_switches: compile_mode_switches(),
        }
    }

    fn entries(&self, vocabulary: Vocabulary) -> &[PatternEntry] {
        match vocabulary {
            Vocabulary::TechStack => &self.tech,
            Vocabulary::Feature => &self.features,
            Vocabulary::ProjectType => &self.project_types,
            Vocabulary::ModeSwitch => &self.mode_switches,
        }
    }

    /// Returns every tag of `vocabulary` whose matcher fires on `text`, in
    /// declaration order, without duplicates.
    ///
    /// A match lying strictly inside a longer match of a different tag does
    /// not count (`react` inside `react native`). No further ranking is done.
    pub fn match_all(&self, text: &str, vocabulary: Vocabulary) -> Vec<Tag> {
        let entries = self.entries(vocabulary);
        let spans: Vec<Vec<Range<usize>>> = entries
            .iter()
            .map(|e| e.matcher.find_iter(text).map(|m| m.range()).collect())
            .collect();

        let mut tags: Vec<Tag> = Vec::new();
        for (i, entry) in entries.iter().enumerate() {
            let fires = spans[i].iter().any(|own| {
                !spans.iter().enumerate().any(|(j, others)| {
                    j != i
                        && others.iter().any(|other| {
                            other.start <= own.start
                                && own.end <= other.end
                                && other.len() > own.len()
                        })
                })
            });
            if fires && !tags.contains(&entry.tag) {
                tags.push(entry.tag);
            }
        }
        tags
    }

    /// Removes every tag match of `vocabulary` from `text`.
    pub fn strip(&self, text: &str, vocabulary: Vocabulary) -> String {
        self.entries(vocabulary)
            .iter()
            .fold(text.to_string(), |acc, entry| {
                entry.matcher.replace_all(&acc, " ").into_owned()
            })
    }

    pub fn match_tech(&self, text: &str) -> Vec<TechStack> {
        self.match_all(text, Vocabulary::TechStack)
            .iter()
            .filter_map(Tag::as_tech)
            .collect()
    }

    pub fn match_features(&self, text: &str) -> Vec<Feature> {
        self.match_all(text, Vocabulary::Feature)
            .iter()
            .filter_map(Tag::as_feature)
            .collect()
    }

    pub fn match_project_types(&self, text: &str) -> Vec<ProjectType> {
        self.match_all(text, Vocabulary::ProjectType)
            .iter()
            .filter_map(Tag::as_project_type)
            .collect()
    }

    pub fn match_mode_switches(&self, text: &str) -> Vec<Mode> {
        self.match_all(text, Vocabulary::ModeSwitch)
            .iter()
            .filter_map(Tag::as_mode)
            .collect()
    }
}
