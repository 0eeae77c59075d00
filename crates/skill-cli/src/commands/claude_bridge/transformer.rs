//! Transformer - Transform validated skills to Claude Agent Skills format
//!
//! This module transforms validated skills into the final ClaudeSkill format,
//! including categorization, example generation, and "when to use" triggers.

use anyhow::Result;
use std::collections::HashMap;

use super::types::{
    ClaudeSkill, ClaudeTool, ClaudeToolParameter, SkillRuntimeType, ToolExample, ValidatedSkill,
};

/// Transforms validated skills into Claude Agent Skills format
pub struct Transformer {
    /// Custom category mappings
    category_patterns: HashMap<String, Vec<String>>,
}

impl Transformer {
    /// Create a new transformer with default category patterns
    pub fn new() -> Self {
        Self {
            category_patterns: default_category_patterns(),
        }
    }

    /// Transform a validated skill into a ClaudeSkill
    pub fn transform(&self, skill: ValidatedSkill) -> Result<ClaudeSkill> {
        // Transform tools
        let tools: Vec<ClaudeTool> = skill
            .tools
            .into_iter()
            .map(|t| {
                let category = self.categorize_tool(&t.name, &skill.name);
                ClaudeTool {
                    name: t.name.clone(),
                    description: t.description,
                    parameters: t
                        .parameters
                        .into_iter()
                        .map(|p| ClaudeToolParameter {
                            name: p.name,
                            param_type: p.param_type,
                            description: p.description,
                            required: p.required,
                            default_value: p.default_value,
                            enum_values: None,
                        })
                        .collect(),
                    examples: self.generate_examples(&t.name, &skill.name),
                    category: Some(category),
                    streaming: t.streaming,
                }
            })
            .collect();

        // Build categories map
        let categories = self.build_categories(&tools);

        // Generate "when to use" triggers
        let when_to_use = self.generate_when_to_use(&skill.name, &skill.runtime);

        Ok(ClaudeSkill {
            name: skill.name,
            description: skill.description,
            tools,
            categories,
            when_to_use,
            runtime: skill.runtime,
        })
    }

    /// Categorize a tool based on its name
    fn categorize_tool(&self, tool_name: &str, _skill_name: &str) -> String {
        // Check custom patterns first
        for (category, patterns) in &self.category_patterns {
            for pattern in patterns {
                if tool_name.contains(pattern) {
                    return category.clone();
                }
            }
        }

        // Default categorization based on common prefixes
        let prefixes = [
            ("get", "Read Operations"),
            ("list", "Read Operations"),
            ("describe", "Read Operations"),
            ("show", "Read Operations"),
            ("create", "Write Operations"),
            ("update", "Write Operations"),
            ("delete", "Write Operations"),
            ("remove", "Write Operations"),
            ("apply", "Write Operations"),
            ("logs", "Debugging"),
            ("exec", "Debugging"),
            ("debug", "Debugging"),
            ("scale", "Scaling"),
            ("rollout", "Deployment"),
            ("deploy", "Deployment"),
        ];

        for (prefix, category) in prefixes {
            if tool_name.starts_with(prefix) {
                return category.to_string();
            }
        }

        // Default category
        "General".to_string()
    }

    /// Build a categories map from tools
    fn build_categories(&self, tools: &[ClaudeTool]) -> HashMap<String, Vec<String>> {
        let mut categories: HashMap<String, Vec<String>> = HashMap::new();

        for tool in tools {
            let category = tool.category.clone().unwrap_or_else(|| "General".to_string());
            categories
                .entry(category)
                .or_default()
                .push(tool.name.clone());
        }

        categories
    }

    /// Generate example calls for a tool
    fn generate_examples(&self, tool_name: &str, skill_name: &str) -> Vec<ToolExample> {
        // Generate a basic example
        let mcp_call = format!(
            "execute(skill='{}', tool='{}', args={{...}})",
            skill_name, tool_name
        );

        let script_call = format!("./scripts/{}.sh arg1=value1", tool_name);

        vec![ToolExample {
            description: format!("Basic {} usage", tool_name),
            mcp_call,
            script_call,
        }]
    }

    /// Generate "when to use" triggers for a skill
    fn generate_when_to_use(&self, skill_name: &str, _runtime: &SkillRuntimeType) -> Vec<String> {
        // Skill-specific triggers
        match skill_name {
            "kubernetes" | "k8s" => vec![
                "User mentions pods, deployments, services, or namespaces".to_string(),
                "User wants to check cluster status or logs".to_string(),
                "User needs to scale or restart workloads".to_string(),
                "User asks about Kubernetes resources".to_string(),
            ],
            "docker" => vec![
                "User mentions containers, images, or Docker".to_string(),
                "User wants to run or manage containers".to_string(),
                "User needs to build or push images".to_string(),
            ],
            "aws" => vec![
                "User mentions AWS services (S3, EC2, Lambda, etc.)".to_string(),
                "User wants to manage cloud resources".to_string(),
                "User needs to deploy to AWS".to_string(),
            ],
            "git" | "github" => vec![
                "User mentions repositories, branches, or commits".to_string(),
                "User wants to check git status or history".to_string(),
                "User needs to manage pull requests or issues".to_string(),
            ],
            "terraform" => vec![
                "User mentions infrastructure as code".to_string(),
                "User wants to plan or apply Terraform changes".to_string(),
                "User needs to manage cloud infrastructure".to_string(),
            ],
            _ => vec![
                format!("User needs to work with {}", skill_name),
                format!("User mentions {} operations", skill_name),
            ],
        }
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}

/// Default category patterns for tool classification
fn default_category_patterns() -> HashMap<String, Vec<String>> {
    let mut patterns = HashMap::new();

    patterns.insert(
        "Read Operations".to_string(),
        vec![
            "get".to_string(),
            "list".to_string(),
            "describe".to_string(),
            "show".to_string(),
            "fetch".to_string(),
            "read".to_string(),
        ],
    );

    patterns.insert(
        "Write Operations".to_string(),
        vec![
            "create".to_string(),
            "update".to_string(),
            "delete".to_string(),
            "remove".to_string(),
            "apply".to_string(),
            "patch".to_string(),
            "put".to_string(),
        ],
    );

    patterns.insert(
        "Debugging".to_string(),
        vec![
            "logs".to_string(),
            "exec".to_string(),
            "debug".to_string(),
            "trace".to_string(),
            "inspect".to_string(),
        ],
    );

    patterns
}
