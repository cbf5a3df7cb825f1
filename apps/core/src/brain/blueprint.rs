//! Project blueprint derived from a [`RequirementExtraction`].
//!
//! Static lookup tables keyed by feature and technology; every list is
//! deduplicated and sorted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::patterns::{Feature, TechStack};
use super::requirements::RequirementExtraction;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blueprint {
    pub components: Vec<String>,
    pub pages: Vec<String>,
    pub dependencies: Vec<String>,
    pub api_endpoints: Vec<String>,
}

fn feature_components(feature: Feature) -> &'static [&'static str] {
    match feature {
        Feature::Authentication => &["LoginForm", "RegisterForm", "AuthProvider", "ProtectedRoute"],
        Feature::Dashboard => &["Dashboard", "Sidebar", "Header", "StatsCard"],
        Feature::Crud => &["DataTable", "CreateForm", "EditForm", "DeleteModal"],
        Feature::Search => &["SearchBar", "SearchResults", "FilterPanel"],
        Feature::Notifications => &["NotificationCenter", "NotificationItem"],
        Feature::FileUpload => &["FileUploader", "ImagePreview", "UploadProgress"],
        Feature::Charts => &["Chart", "LineChart", "BarChart", "PieChart"],
        Feature::Payment => &["PaymentForm", "CheckoutSummary", "PaymentSuccess"],
        Feature::RealTime => &["ChatRoom", "MessageList", "MessageInput"],
        Feature::Blog => &["BlogPost", "BlogList", "BlogEditor"],
        Feature::Ecommerce => &["ProductCard", "ShoppingCart", "ProductDetail"],
        Feature::DarkMode => &["ThemeToggle"],
        _ => &[],
    }
}

fn feature_pages(feature: Feature) -> &'static [&'static str] {
    match feature {
        Feature::Authentication => &["Login", "Register", "Profile"],
        Feature::Dashboard => &["Dashboard", "Analytics"],
        Feature::Blog => &["BlogHome", "BlogPost", "CreatePost"],
        Feature::Ecommerce => &["Products", "ProductDetail", "Cart", "Checkout"],
        Feature::Portfolio => &["About", "Projects", "Contact"],
        Feature::Cms => &["AdminPanel", "ContentManager"],
        _ => &[],
    }
}

fn feature_dependencies(feature: Feature) -> &'static [&'static str] {
    match feature {
        Feature::Authentication => &["jsonwebtoken", "bcryptjs", "passport"],
        Feature::Payment => &["stripe", "@stripe/stripe-js"],
        Feature::DragDrop => &["react-beautiful-dnd", "react-dnd"],
        Feature::Charts => &["chart.js", "react-chartjs-2"],
        Feature::Api => &["axios"],
        Feature::RealTime => &["socket.io"],
        _ => &[],
    }
}

fn tech_dependencies(tech: TechStack) -> &'static [&'static str] {
    match tech {
        TechStack::React => &["react", "react-dom", "react-router-dom"],
        TechStack::Vue => &["vue", "vue-router", "vuex"],
        TechStack::Angular => &["@angular/core", "@angular/common", "@angular/router"],
        TechStack::NodeJs => &["express", "cors", "dotenv"],
        TechStack::Python => &["flask", "requests", "python-dotenv"],
        TechStack::MongoDb => &["mongoose"],
        TechStack::PostgreSql => &["pg"],
        TechStack::Firebase => &["firebase"],
        _ => &[],
    }
}

fn feature_endpoints(feature: Feature) -> &'static [&'static str] {
    match feature {
        Feature::Authentication => &[
            "/api/auth/login",
            "/api/auth/register",
            "/api/auth/logout",
            "/api/user/profile",
        ],
        Feature::Crud => &["/api/items", "/api/items/:id"],
        Feature::Payment => &["/api/payment/create-intent", "/api/payment/confirm"],
        Feature::FileUpload => &["/api/upload", "/api/files/:id"],
        Feature::Blog => &["/api/posts", "/api/posts/:id", "/api/posts/:id/comments"],
        Feature::Ecommerce => &["/api/products", "/api/products/:id", "/api/cart", "/api/orders"],
        _ => &[],
    }
}

fn sorted(items: impl IntoIterator<Item = &'static str>) -> Vec<String> {
    items
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl Blueprint {
    pub fn from_requirements(req: &RequirementExtraction) -> Self {
        let features = || req.features.iter().copied();

        let components = sorted(
            std::iter::once("App").chain(features().flat_map(|f| feature_components(f).iter().copied())),
        );
        let pages = sorted(
            std::iter::once("Home").chain(features().flat_map(|f| feature_pages(f).iter().copied())),
        );

        let mut deps: Vec<&'static str> = req
            .tech_stack()
            .values()
            .flat_map(|t| tech_dependencies(*t).iter().copied())
            .collect();
        deps.extend(features().flat_map(|f| feature_dependencies(f).iter().copied()));
        if req.frontend == Some(TechStack::React) {
            deps.extend(["axios", "styled-components"]);
        }

        Self {
            components,
            pages,
            dependencies: sorted(deps),
            api_endpoints: sorted(features().flat_map(|f| feature_endpoints(f).iter().copied())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::requirements::RequirementAnalyzer;

    #[test]
    fn test_blueprint_for_react_auth_app() {
        let req = RequirementAnalyzer::new()
            .analyze("create react todo app with authentication and dark mode");
        let bp = Blueprint::from_requirements(&req);

        assert!(bp.components.contains(&"App".to_string()));
        assert!(bp.components.contains(&"LoginForm".to_string()));
        assert!(bp.components.contains(&"DataTable".to_string()));
        assert!(bp.pages.contains(&"Login".to_string()));
        assert!(bp.dependencies.contains(&"react-dom".to_string()));
        assert!(bp.dependencies.contains(&"axios".to_string()));
        assert!(bp.api_endpoints.contains(&"/api/auth/login".to_string()));
    }

    #[test]
    fn test_blueprint_lists_are_sorted_and_unique() {
        let req = RequirementAnalyzer::new()
            .analyze("build a react dashboard app with analytics charts and an api");
        let bp = Blueprint::from_requirements(&req);

        for list in [&bp.components, &bp.pages, &bp.dependencies, &bp.api_endpoints] {
            let mut expected = list.clone();
            expected.sort();
            expected.dedup();
            assert_eq!(list, &expected);
        }
        // "axios" comes from both React and the api feature.
        assert_eq!(bp.dependencies.iter().filter(|d| *d == "axios").count(), 1);
    }

    #[test]
    fn test_empty_requirements_still_have_app_and_home() {
        let req = RequirementAnalyzer::new().analyze("make something");
        let bp = Blueprint::from_requirements(&req);

        assert_eq!(bp.components, vec!["App".to_string()]);
        assert_eq!(bp.pages, vec!["Home".to_string()]);
        assert!(bp.dependencies.is_empty());
        assert!(bp.api_endpoints.is_empty());
    }
}
