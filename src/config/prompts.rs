//! Agent and task templates for the ops crew.
//!
//! Templates can be customized by placing TOML files in the data directory.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Role definition for one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentTemplate {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

impl Default for AgentTemplate {
    fn default() -> Self {
        Self {
            role: String::new(),
            goal: String::new(),
            backstory: String::new(),
        }
    }
}

/// Description and expected output for one task.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TaskTemplate {
    /// Task description; `{{user_input}}` is substituted at kickoff.
    pub description: String,
    pub expected_output: String,
}

/// Collection of all agent and task templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    pub k8s_expert: AgentTemplate,
    pub web_researcher: AgentTemplate,
    pub k8s_analysis_task: TaskTemplate,
    pub web_fetch_task: TaskTemplate,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            k8s_expert: AgentTemplate {
                role: "Kubernetes Operations Expert".to_string(),
                goal: "Provide accurate and helpful information about Kubernetes clusters and operations".to_string(),
                backstory: "You are a senior Kubernetes operations expert with deep knowledge of \
                    cluster management, troubleshooting, and best practices. You have access to real \
                    cluster information and can provide detailed insights about cluster status, \
                    resources, and recommendations.".to_string(),
            },
            web_researcher: AgentTemplate {
                role: "Web Research Specialist".to_string(),
                goal: "Fetch and summarize relevant information from the web using the available remote tools".to_string(),
                backstory: "You are a meticulous research specialist. You use remote tools to \
                    retrieve web content and distill it into concise, accurate summaries that \
                    complement cluster analysis.".to_string(),
            },
            k8s_analysis_task: TaskTemplate {
                description: "Process the user's request: \"{{user_input}}\"\n\n\
                    Use the available tools to gather relevant cluster information if needed. \
                    Provide a comprehensive and helpful response that addresses the user's question or request.\n\n\
                    If the request is about cluster information, use the get_cluster_info tool to retrieve \
                    current data and provide detailed insights.\n\n\
                    Format your response in a clear, professional manner suitable for a DevOps engineer.".to_string(),
                expected_output: "A detailed, professional response that addresses the user's request \
                    with relevant cluster information, insights, and actionable recommendations where appropriate.".to_string(),
            },
            web_fetch_task: TaskTemplate {
                description: "If the user's request (\"{{user_input}}\") references external web \
                    content or requires up-to-date information, use the remote tools to fetch and \
                    summarize it. Otherwise, state that no web research was needed.".to_string(),
                expected_output: "A concise summary of any fetched web content relevant to the \
                    user's request, or a short note that web research was not required.".to_string(),
            },
        }
    }
}

impl Prompts {
    /// Load templates, applying overrides from `prompts.toml` in the data
    /// directory when present.
    pub fn load(data_dir: &Path) -> crate::error::Result<Self> {
        let path = data_dir.join("prompts.toml");
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Prompts::default())
        }
    }

    /// Render a template, substituting `{{user_input}}`.
    pub fn render(template: &str, user_input: &str) -> String {
        template.replace("{{user_input}}", user_input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_templates_nonempty() {
        let prompts = Prompts::default();
        assert!(!prompts.k8s_expert.role.is_empty());
        assert!(!prompts.k8s_analysis_task.description.is_empty());
    }

    #[test]
    fn test_render_user_input() {
        let rendered = Prompts::render("Request: \"{{user_input}}\"", "show pods");
        assert_eq!(rendered, "Request: \"show pods\"");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prompts = Prompts::load(dir.path()).unwrap();
        assert_eq!(prompts.k8s_expert.role, "Kubernetes Operations Expert");
    }
}
