//! Crew orchestration: agents, tasks, and the sequential kickoff loop.

use super::tools::ToolContext;
use crate::config::{AgentTemplate, Prompts, Settings, TaskTemplate};
use crate::error::{OpsError, Result};
use crate::mcp::{discovery, McpClient};
use crate::memory::MemoryStore;
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use std::sync::Arc;
use tracing::{debug, info};

/// An agent: a role definition plus the tools it may use.
pub struct Agent {
    template: AgentTemplate,
    tools: ToolContext,
    max_iterations: usize,
}

impl Agent {
    /// Create an agent from its template and tool context.
    pub fn new(template: AgentTemplate, tools: ToolContext) -> Self {
        Self {
            template,
            tools,
            max_iterations: 15,
        }
    }

    /// Set maximum iterations for the tool loop.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    fn system_prompt(&self) -> String {
        format!(
            "You are {role}.\n\nYour goal: {goal}\n\n{backstory}\n\n\
            Use the available tools when they help you answer. When you have \
            gathered enough information, provide your final response.",
            role = self.template.role,
            goal = self.template.goal,
            backstory = self.template.backstory,
        )
    }

    /// Run one task through the tool-calling loop.
    pub async fn run(
        &self,
        client: &async_openai::Client<async_openai::config::OpenAIConfig>,
        model: &str,
        temperature: f32,
        task: &str,
        context: Option<&str>,
    ) -> Result<AgentResponse> {
        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_prompt())
                .build()
                .map_err(|e| OpsError::Agent(e.to_string()))?
                .into(),
        ];

        let user_message = match context {
            Some(ctx) => format!("Context from previous tasks:\n{}\n\nTask: {}", ctx, task),
            None => task.to_string(),
        };

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()
                .map_err(|e| OpsError::Agent(e.to_string()))?
                .into(),
        );

        let mut iterations = 0;
        let mut tool_calls_made = Vec::new();

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(OpsError::Agent(format!(
                    "Agent '{}' exceeded maximum iterations ({})",
                    self.template.role, self.max_iterations
                )));
            }

            debug!("Agent '{}' iteration {}", self.template.role, iterations);

            let request = CreateChatCompletionRequestArgs::default()
                .model(model)
                .temperature(temperature)
                .messages(messages.clone())
                .tools(self.tools.tool_definitions())
                .build()
                .map_err(|e| OpsError::Agent(e.to_string()))?;

            let response = client
                .chat()
                .create(request)
                .await
                .map_err(|e| OpsError::OpenAI(format!("Agent API error: {}", e)))?;

            let choice = response
                .choices
                .first()
                .ok_or_else(|| OpsError::Agent("No response from model".to_string()))?;

            if let Some(ref tool_calls) = choice.message.tool_calls {
                if tool_calls.is_empty() {
                    return build_response(&choice.message.content, tool_calls_made, iterations);
                }

                let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                    .tool_calls(tool_calls.clone())
                    .build()
                    .map_err(|e| OpsError::Agent(e.to_string()))?;
                messages.push(assistant_msg.into());

                for tool_call in tool_calls {
                    let record = self.execute_tool_call(tool_call).await;

                    let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                        .tool_call_id(&tool_call.id)
                        .content(record.result.clone())
                        .build()
                        .map_err(|e| OpsError::Agent(e.to_string()))?;
                    messages.push(tool_msg.into());

                    tool_calls_made.push(record);
                }
            } else {
                return build_response(&choice.message.content, tool_calls_made, iterations);
            }
        }
    }

    /// Execute a single tool call and return a record of it.
    async fn execute_tool_call(&self, tool_call: &ChatCompletionMessageToolCall) -> ToolCallRecord {
        let name = &tool_call.function.name;
        let arguments = &tool_call.function.arguments;

        info!("Agent calling tool: {} with args: {}", name, arguments);

        let result = match self.tools.parse_tool_call(name, arguments) {
            Ok(tool) => match self.tools.execute(&tool).await {
                Ok(output) => output,
                Err(e) => format!("Tool error: {}", e),
            },
            Err(e) => format!("Failed to parse tool call: {}", e),
        };

        ToolCallRecord {
            name: name.clone(),
            arguments: arguments.clone(),
            result,
        }
    }
}

fn build_response(
    content: &Option<String>,
    tool_calls: Vec<ToolCallRecord>,
    iterations: usize,
) -> Result<AgentResponse> {
    Ok(AgentResponse {
        content: content.clone().unwrap_or_default(),
        tool_calls,
        iterations,
    })
}

/// Response from one agent task run.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final response content from the agent.
    pub content: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of iterations (LLM calls) used.
    pub iterations: usize,
}

/// Record of a tool call made by an agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    pub name: String,
    pub arguments: String,
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

/// A crew: agents plus the tasks they run in sequence.
pub struct Crew {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    agents: Vec<Agent>,
    /// (agent index, task template) pairs, executed in order.
    tasks: Vec<(usize, TaskTemplate)>,
    memory: MemoryStore,
}

impl Crew {
    /// Build the ops crew: a Kubernetes expert with the built-in cluster tool
    /// and a web researcher with the cached MCP tools.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let prompts = Prompts::load(&settings.data_dir())?;

        let remote_tools = discovery::ensure_tools(settings).await?;
        info!("Crew has {} remote tools available", remote_tools.len());

        let mcp = Arc::new(McpClient::new(&settings.mcp.server_url)?);

        let k8s_expert = Agent::new(prompts.k8s_expert.clone(), ToolContext::local_only());
        let web_researcher = Agent::new(
            prompts.web_researcher.clone(),
            ToolContext::with_remote(mcp, remote_tools),
        );

        let memory = MemoryStore::new(settings.storage_dir(), settings.memory.enabled);

        Ok(Self {
            client: create_client(&settings.llm),
            model: settings.llm.model.clone(),
            temperature: settings.llm.temperature,
            agents: vec![k8s_expert, web_researcher],
            tasks: vec![
                (0, prompts.k8s_analysis_task.clone()),
                (1, prompts.web_fetch_task.clone()),
            ],
            memory,
        })
    }

    /// Run all tasks sequentially for one user request and return the
    /// combined result. Each task sees the outputs of the tasks before it.
    pub async fn kickoff(&self, user_input: &str) -> Result<String> {
        if self.memory.enabled() {
            self.memory.ensure_dir()?;
        }

        let mut outputs: Vec<String> = Vec::new();

        for (agent_idx, template) in &self.tasks {
            let agent = self
                .agents
                .get(*agent_idx)
                .ok_or_else(|| OpsError::Crew(format!("No agent at index {}", agent_idx)))?;

            let description = Prompts::render(&template.description, user_input);
            let task = format!(
                "{}\n\nExpected output: {}",
                description, template.expected_output
            );
            let context = if outputs.is_empty() {
                None
            } else {
                Some(outputs.join("\n\n---\n\n"))
            };

            let response = agent
                .run(
                    &self.client,
                    &self.model,
                    self.temperature,
                    &task,
                    context.as_deref(),
                )
                .await?;

            debug!(
                "Task completed in {} iterations with {} tool calls",
                response.iterations,
                response.tool_calls.len()
            );

            outputs.push(response.content);
        }

        Ok(outputs.join("\n\n"))
    }
}
