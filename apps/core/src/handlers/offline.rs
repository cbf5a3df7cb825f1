//! Deterministic stand-ins for the external collaborators.
//!
//! They let the `nexus` binary run end to end without any real mode
//! backend, LLM or code generator attached.

use async_trait::async_trait;
use serde_json::json;
use std::path::PathBuf;
use tokio::fs;
use tracing::info;

use crate::brain::{Blueprint, Mode, RequirementExtraction};
use crate::handlers::messages::{AppError, GeneratedFile, GeneratedProject, HandlerRequest};
use crate::handlers::traits::{ChatHandler, ModeHandler, TemplateGenerator};

/// Echoes back which command was routed and with which arguments.
pub struct OfflineModeHandler {
    owner: Mode,
}

impl OfflineModeHandler {
    pub fn new(owner: Mode) -> Self {
        Self { owner }
    }
}

#[async_trait]
impl ModeHandler for OfflineModeHandler {
    async fn handle(&self, request: HandlerRequest) -> Result<String, AppError> {
        let command = request
            .kind
            .map(|k| k.to_string())
            .unwrap_or_else(|| "message".to_string());

        let args: Vec<String> = request
            .args
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();

        if args.is_empty() {
            Ok(format!("[{}] {} received (no handler attached).", self.owner, command))
        } else {
            Ok(format!(
                "[{}] {} received with {} (no handler attached).",
                self.owner,
                command,
                args.join(", ")
            ))
        }
    }
}

pub struct OfflineChat {
    assistant_name: String,
}

impl OfflineChat {
    pub fn new(assistant_name: impl Into<String>) -> Self {
        Self {
            assistant_name: assistant_name.into(),
        }
    }
}

#[async_trait]
impl ChatHandler for OfflineChat {
    async fn chat(&self, mode: Mode, utterance: String) -> Result<String, AppError> {
        Ok(format!(
            "{} ({} mode): I have no chat model attached, but I heard \"{}\". Try \"mode info\" for what I can do.",
            self.assistant_name,
            mode,
            utterance.trim()
        ))
    }
}

/// Emits a README and a JSON manifest; optionally writes them to disk.
#[derive(Default)]
pub struct OfflineGenerator {
    output_dir: Option<PathBuf>,
}

impl OfflineGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files are also written under `<dir>/<project name>/`.
    pub fn with_output_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: Some(dir.into()),
        }
    }

    fn readme(req: &RequirementExtraction, blueprint: &Blueprint) -> String {
        let mut out = format!("# {}\n\n{}\n\n", req.inferred_project_name, req.description);

        out.push_str(&format!("Project type: {}\n\n## Tech stack\n\n", req.project_type.label()));
        let stack = req.tech_stack();
        if stack.is_empty() {
            out.push_str("- (not specified)\n");
        }
        for (layer, tech) in &stack {
            out.push_str(&format!("- {:?}: {}\n", layer, tech));
        }

        out.push_str("\n## Features\n\n");
        if req.features.is_empty() {
            out.push_str("- (none detected)\n");
        }
        for feature in &req.features {
            out.push_str(&format!("- {}\n", feature));
        }

        for (title, items) in [
            ("Components", &blueprint.components),
            ("Pages", &blueprint.pages),
            ("API endpoints", &blueprint.api_endpoints),
        ] {
            if !items.is_empty() {
                out.push_str(&format!("\n## {}\n\n", title));
                for item in items {
                    out.push_str(&format!("- {}\n", item));
                }
            }
        }
        out
    }

    async fn write_to_disk(&self, project: &GeneratedProject) -> Result<(), AppError> {
        let Some(root) = &self.output_dir else {
            return Ok(());
        };
        let dir = root.join(directory_name(&project.display_name));
        fs::create_dir_all(&dir).await?;
        for file in &project.files {
            fs::write(dir.join(&file.path), &file.content).await?;
        }
        info!("Wrote {} files to {:?}", project.files.len(), dir);
        Ok(())
    }
}

/// Turns a display name into a single path component.
///
/// Keeps ASCII alphanumerics, `-` and `_`; whitespace runs become `-` and
/// everything else (separators, dots) is dropped.
fn directory_name(display_name: &str) -> String {
    let mut out = String::new();
    for word in display_name.split_whitespace() {
        let cleaned: String = word
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if cleaned.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('-');
        }
        out.push_str(&cleaned);
    }
    if out.is_empty() {
        "NewProject".to_string()
    } else {
        out
    }
}

#[async_trait]
impl TemplateGenerator for OfflineGenerator {
    async fn generate(&self, requirements: RequirementExtraction) -> Result<GeneratedProject, AppError> {
        let blueprint = Blueprint::from_requirements(&requirements);

        let manifest = json!({
            "name": requirements.inferred_project_name,
            "requirements": requirements,
            "blueprint": blueprint,
        });

        let project = GeneratedProject {
            display_name: requirements.inferred_project_name.clone(),
            files: vec![
                GeneratedFile {
                    path: "README.md".to_string(),
                    content: Self::readme(&requirements, &blueprint),
                },
                GeneratedFile {
                    path: "requirements.json".to_string(),
                    content: serde_json::to_string_pretty(&manifest)?,
                },
            ],
        };

        self.write_to_disk(&project).await?;
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::{CommandArgs, CommandKind, RequirementAnalyzer};

    #[tokio::test]
    async fn test_offline_handler_lists_arguments() {
        let handler = OfflineModeHandler::new(Mode::Project);
        let mut args = CommandArgs::new();
        args.insert("message", "fix bug");

        let reply = handler
            .handle(HandlerRequest::command(Mode::Project, CommandKind::Commit, args, "commit fix bug"))
            .await
            .unwrap();
        assert!(reply.contains("commit"));
        assert!(reply.contains("message=fix bug"));
    }

    #[tokio::test]
    async fn test_offline_generator_emits_readme_and_manifest() {
        let req = RequirementAnalyzer::new().analyze("create react todo app with authentication");
        let project = OfflineGenerator::new().generate(req).await.unwrap();

        assert_eq!(project.display_name, "ReactTodoApp");
        let paths: Vec<&str> = project.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["README.md", "requirements.json"]);

        let manifest: serde_json::Value = serde_json::from_str(&project.files[1].content).unwrap();
        assert_eq!(manifest["requirements"]["frontend"], "react");
        assert!(project.files[0].content.contains("- authentication"));
    }

    #[tokio::test]
    async fn test_offline_generator_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let generator = OfflineGenerator::with_output_dir(dir.path());
        let req = RequirementAnalyzer::new().analyze("build vue.js ecommerce site with stripe payments");

        let project = generator.generate(req).await.unwrap();
        let readme = dir.path().join(&project.display_name).join("README.md");
        assert!(readme.exists());
    }

    #[test]
    fn test_directory_name_is_a_single_component() {
        assert_eq!(directory_name("ReactTodoApp"), "ReactTodoApp");
        assert_eq!(directory_name("Recipe Box"), "Recipe-Box");
        assert_eq!(directory_name("../../escaped"), "escaped");
        assert_eq!(directory_name("/tmp/x"), "tmpx");
        assert_eq!(directory_name(".."), "NewProject");
        assert_eq!(directory_name("C:\\Windows"), "CWindows");
    }

    #[tokio::test]
    async fn test_quoted_name_cannot_escape_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("data").join("projects");
        let generator = OfflineGenerator::with_output_dir(&root);
        let req = RequirementAnalyzer::new().analyze(r#"build a react app called "../../escaped""#);
        assert_eq!(req.inferred_project_name, "../../escaped");

        let project = generator.generate(req).await.unwrap();
        assert_eq!(project.display_name, "../../escaped");

        assert!(root.join("escaped").join("README.md").exists());
        assert!(!dir.path().join("escaped").exists());
        assert!(!dir.path().join("data").join("escaped").exists());
    }
}
