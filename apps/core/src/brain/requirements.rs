//! Requirement Analyzer.
//!
//! Turns a "build me an app" utterance into tech-by-layer assignments, a
//! feature set, a project type and a best-effort project name.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use super::patterns::{Feature, Layer, PatternLibrary, ProjectType, TechStack, Vocabulary};

/// Structured requirements extracted from one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementExtraction {
    /// The utterance the requirements were read from.
    pub description: String,
    pub frontend: Option<TechStack>,
    pub backend: Option<TechStack>,
    pub database: Option<TechStack>,
    pub mobile: Option<TechStack>,
    pub features: BTreeSet<Feature>,
    pub project_type: ProjectType,
    pub inferred_project_name: String,
}

impl RequirementExtraction {
    pub fn layer(&self, layer: Layer) -> Option<TechStack> {
        match layer {
            Layer::Frontend => self.frontend,
            Layer::Backend => self.backend,
            Layer::Database => self.database,
            Layer::Mobile => self.mobile,
        }
    }

    /// Assigned layers only.
    pub fn tech_stack(&self) -> BTreeMap<Layer, TechStack> {
        [Layer::Frontend, Layer::Backend, Layer::Database, Layer::Mobile]
            .into_iter()
            .filter_map(|layer| self.layer(layer).map(|tech| (layer, tech)))
            .collect()
    }

    /// No technology and no feature was recognized.
    pub fn is_empty(&self) -> bool {
        self.tech_stack().is_empty() && self.features.is_empty()
    }

    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }
}

// NOTE: expect() is acceptable here: static patterns covered by tests.
// Single quotes only delimit a name at word edges, so apostrophes never pair up.
static QUOTED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"]{2,})"|(?:^|\W)'([^']{2,})'(?:\W|$)"#).expect("Invalid regex: quoted project name")
});

static TRIGGER_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:create|build|make|generate)\b\s+(?:me\s+)?(?:(?:a|an|the|my|new|simple|basic)\s+)*(?P<phrase>[\w.\- ]+?)\s+(?P<kind>app|application|website|site|webapp|project|platform|tool|dashboard|api|service)\b",
    )
    .expect("Invalid regex: project trigger phrase")
});

/// Words that never make it into a project name.
const NAME_STOPWORDS: &[&str] = &[
    "a", "an", "the", "my", "new", "simple", "basic", "with", "and", "using", "in", "for", "of",
    "full", "stack",
];

/// Uppercases the first character of each alphanumeric run and joins them.
fn pascal_case(words: &str) -> String {
    words
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Pattern-driven requirement extraction
pub struct RequirementAnalyzer {
    library: &'static PatternLibrary,
}

impl Default for RequirementAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl RequirementAnalyzer {
    pub fn new() -> Self {
        Self {
            library: PatternLibrary::global(),
        }
    }

    pub fn analyze(&self, text: &str) -> RequirementExtraction {
        let mut layers: BTreeMap<Layer, TechStack> = BTreeMap::new();
        // Declaration order decides: the first tag per layer wins.
        for tech in self.library.match_tech(text) {
            layers.entry(tech.layer()).or_insert(tech);
        }

        let features: BTreeSet<Feature> = self.library.match_features(text).into_iter().collect();

        let project_type = self
            .library
            .match_project_types(text)
            .first()
            .copied()
            .unwrap_or_else(|| self.infer_project_type(&layers));

        let primary = layers
            .get(&Layer::Frontend)
            .or_else(|| layers.get(&Layer::Backend))
            .or_else(|| layers.get(&Layer::Mobile))
            .copied();

        RequirementExtraction {
            description: text.trim().to_string(),
            frontend: layers.get(&Layer::Frontend).copied(),
            backend: layers.get(&Layer::Backend).copied(),
            database: layers.get(&Layer::Database).copied(),
            mobile: layers.get(&Layer::Mobile).copied(),
            features,
            project_type,
            inferred_project_name: self.infer_name(text, primary),
        }
    }

    fn infer_project_type(&self, layers: &BTreeMap<Layer, TechStack>) -> ProjectType {
        let has = |layer| layers.contains_key(&layer);
        if has(Layer::Mobile) {
            ProjectType::MobileApp
        } else if has(Layer::Frontend) && has(Layer::Backend) {
            ProjectType::Fullstack
        } else if has(Layer::Backend) && !has(Layer::Frontend) {
            ProjectType::Api
        } else {
            ProjectType::default()
        }
    }

    /// Quoted name, else `<Tech><Noun phrase><Kind>`, else `<Tech>Project`.
    fn infer_name(&self, text: &str, primary: Option<TechStack>) -> String {
        if let Some(caps) = QUOTED_NAME.captures(text) {
            if let Some(name) = caps.get(1).or_else(|| caps.get(2)) {
                let name = name.as_str().trim();
                if !name.is_empty() {
                    return name.to_string();
                }
            }
        }

        let tech = primary.map(|t| t.display_name()).unwrap_or("");

        if let Some(caps) = TRIGGER_PHRASE.captures(text) {
            let phrase = caps.name("phrase").map(|m| m.as_str()).unwrap_or("");
            let kind = caps.name("kind").map(|m| m.as_str()).unwrap_or("");

            let stripped = self.library.strip(phrase, Vocabulary::TechStack);
            let noun: Vec<&str> = stripped
                .split_whitespace()
                .filter(|w| !NAME_STOPWORDS.contains(&w.to_lowercase().as_str()))
                .collect();

            if !noun.is_empty() {
                return format!("{}{}{}", tech, pascal_case(&noun.join(" ")), pascal_case(kind));
            }
        }

        if tech.is_empty() {
            "NewProject".to_string()
        } else {
            format!("{}Project", tech)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_react_todo_with_auth_and_dark_mode() {
        let analyzer = RequirementAnalyzer::new();
        let req = analyzer.analyze("create react todo app with authentication and dark mode");

        assert_eq!(req.frontend, Some(TechStack::React));
        assert!(req.has_feature(Feature::Authentication));
        assert!(req.has_feature(Feature::DarkMode));
        assert_eq!(req.inferred_project_name, "ReactTodoApp");
    }

    #[test]
    fn test_vue_ecommerce_with_stripe() {
        let analyzer = RequirementAnalyzer::new();
        let req = analyzer.analyze("build vue.js ecommerce site with stripe payments");

        assert_eq!(req.frontend, Some(TechStack::Vue));
        assert!(req.has_feature(Feature::Payment));
        assert!(req.has_feature(Feature::Ecommerce));
        assert_eq!(req.project_type, ProjectType::WebApp);
        assert_eq!(req.inferred_project_name, "VueEcommerceSite");
    }

    #[test]
    fn test_one_tech_per_layer_first_declared_wins() {
        let analyzer = RequirementAnalyzer::new();
        let req = analyzer.analyze("make an app with vue or react, postgres and mongodb");

        assert_eq!(req.frontend, Some(TechStack::React));
        assert_eq!(req.database, Some(TechStack::MongoDb));
    }

    #[test]
    fn test_fullstack_layers() {
        let analyzer = RequirementAnalyzer::new();
        let req = analyzer.analyze("build an angular frontend with django and postgresql");

        assert_eq!(req.frontend, Some(TechStack::Angular));
        assert_eq!(req.backend, Some(TechStack::Python));
        assert_eq!(req.database, Some(TechStack::PostgreSql));
        assert_eq!(req.tech_stack().len(), 3);
    }

    #[test]
    fn test_empty_extraction_still_succeeds() {
        let analyzer = RequirementAnalyzer::new();
        let req = analyzer.analyze("make something nice");

        assert!(req.is_empty());
        assert_eq!(req.frontend, None);
        assert_eq!(req.inferred_project_name, "NewProject");
    }

    #[test]
    fn test_fallback_name_uses_primary_tech() {
        let analyzer = RequirementAnalyzer::new();
        let req = analyzer.analyze("create a react app");
        assert_eq!(req.inferred_project_name, "ReactProject");
    }

    #[test]
    fn test_quoted_name_wins() {
        let analyzer = RequirementAnalyzer::new();
        let req = analyzer.analyze("build a react app called \"Recipe Box\" with search");
        assert_eq!(req.inferred_project_name, "Recipe Box");
        assert!(req.has_feature(Feature::Search));
    }

    #[test]
    fn test_single_quoted_name() {
        let analyzer = RequirementAnalyzer::new();
        let req = analyzer.analyze("build a react app called 'Recipe Box' with search");
        assert_eq!(req.inferred_project_name, "Recipe Box");
    }

    #[test]
    fn test_apostrophes_are_not_quotes() {
        let analyzer = RequirementAnalyzer::new();
        let req = analyzer.analyze("build an app for mom's bakery and dad's shop");
        assert_ne!(req.inferred_project_name, "s bakery and dad");
        assert_eq!(req.inferred_project_name, "NewProject");
    }

    #[test]
    fn test_mobile_layer() {
        let analyzer = RequirementAnalyzer::new();
        let req = analyzer.analyze("generate a react native fitness app with maps");

        assert_eq!(req.mobile, Some(TechStack::ReactNative));
        assert_eq!(req.frontend, None);
        assert_eq!(req.project_type, ProjectType::MobileApp);
        assert!(req.has_feature(Feature::Map));
        assert_eq!(req.inferred_project_name, "ReactNativeFitnessApp");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("todo list"), "TodoList");
        assert_eq!(pascal_case("e-commerce"), "ECommerce");
        assert_eq!(pascal_case(""), "");
    }
}
