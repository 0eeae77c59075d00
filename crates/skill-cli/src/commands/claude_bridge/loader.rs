//! Skill Loader - Load skills from manifest and discover tools
//!
//! This module loads skills from the .skill-engine.toml manifest and
//! introspects them to discover available tools and parameters.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use skill_runtime::{find_skill_md, parse_skill_md, SkillManifest, SkillMdContent};

use super::types::{RawSkill, RawTool, RawToolParameter, SkillRuntimeType};

/// Loads skills from manifest and discovers their tools
#[derive(Debug)]
pub struct Loader {
    manifest: Option<SkillManifest>,
}

impl Loader {
    /// Create a new loader, optionally with a specific manifest path
    pub fn new(manifest_path: Option<&Path>) -> Result<Self> {
        let manifest = crate::commands::manifest::load_manifest(manifest_path)?;
        Ok(Self { manifest })
    }

    /// Load all skills from the manifest
    pub async fn load_all_skills(&self) -> Result<Vec<RawSkill>> {
        let manifest = self
            .manifest
            .as_ref()
            .context("No manifest found. Create a .skill-engine.toml file.")?;

        let mut skills = Vec::new();

        for (name, _definition) in &manifest.skills {
            match self.load_skill(name, manifest).await {
                Ok(skill) => skills.push(skill),
                Err(e) => {
                    tracing::warn!(skill = %name, error = %e, "Failed to load skill, skipping");
                }
            }
        }

        Ok(skills)
    }

    /// Load a single skill by name
    async fn load_skill(&self, name: &str, manifest: &SkillManifest) -> Result<RawSkill> {
        let definition = manifest
            .skills
            .get(name)
            .context(format!("Skill '{}' not found in manifest", name))?;

        // Determine runtime type
        let runtime = match definition.runtime {
            skill_runtime::manifest::SkillRuntime::Wasm => SkillRuntimeType::Wasm,
            skill_runtime::manifest::SkillRuntime::Native => SkillRuntimeType::Native,
            skill_runtime::manifest::SkillRuntime::Docker => SkillRuntimeType::Docker,
        };

        // Resolve skill path (relative to manifest base_dir)
        let skill_path = if definition.source.starts_with("./") || definition.source.starts_with("../") {
            manifest.base_dir.join(&definition.source)
        } else {
            PathBuf::from(&definition.source)
        };

        // Try to load SKILL.md for tool discovery
        let (tools, skill_md_content, description) = if let Some(skill_md_path) = find_skill_md(&skill_path) {
            match parse_skill_md(&skill_md_path) {
                Ok(md) => {
                    let tools = self.extract_tools_from_skill_md(&md);
                    let content = std::fs::read_to_string(&skill_md_path).ok();
                    let desc = if !md.frontmatter.description.is_empty() {
                        Some(md.frontmatter.description.clone())
                    } else {
                        definition.description.clone()
                    };
                    (tools, content, desc)
                }
                Err(e) => {
                    tracing::warn!(skill = %name, error = %e, "Failed to parse SKILL.md");
                    (Vec::new(), None, definition.description.clone())
                }
            }
        } else {
            // No SKILL.md found - use definition description only
            (Vec::new(), None, definition.description.clone())
        };

        Ok(RawSkill {
            name: name.to_string(),
            description,
            source: definition.source.clone(),
            runtime,
            tools,
            skill_md_content,
        })
    }

    /// Extract tools from parsed SKILL.md content
    fn extract_tools_from_skill_md(&self, md: &SkillMdContent) -> Vec<RawTool> {
        md.tool_docs
            .iter()
            .map(|(name, tool_doc)| {
                // Try to extract parameters from tool documentation
                let parameters = tool_doc
                    .parameters
                    .iter()
                    .map(|param| RawToolParameter {
                        name: param.name.clone(),
                        param_type: param.param_type.to_string(),
                        description: param.description.clone(),
                        required: param.required,
                        default_value: param.default.clone(),
                    })
                    .collect();

                RawTool {
                    name: name.clone(),
                    description: tool_doc.description.clone(),
                    parameters,
                    streaming: false,
                }
            })
            .collect()
    }
}
