use crate::internal::common::ids::{AgentId, ExecutorId, FrameworkId, TaskId, Uuid};
use crate::internal::common::resources::Resources;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandInfo {
    pub value: Option<String>,
    /// When set, `value` is executed via `/bin/sh -c` and `arguments` are ignored.
    pub shell: bool,
    pub arguments: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExecutorInfo {
    pub executor_id: ExecutorId,
    pub name: Option<String>,
    pub framework_id: Option<FrameworkId>,
    pub command: CommandInfo,
    pub resources: Resources,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Builder)]
#[builder(pattern = "owned")]
pub struct TaskInfo {
    #[builder(setter(into))]
    pub name: String,
    #[builder(setter(into))]
    pub task_id: TaskId,
    #[builder(default, setter(into, strip_option))]
    pub agent_id: Option<AgentId>,
    #[builder(default)]
    pub resources: Resources,
    #[builder(default, setter(strip_option))]
    pub command: Option<CommandInfo>,
    #[builder(default, setter(strip_option))]
    pub executor: Option<ExecutorInfo>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskGroupInfo {
    pub tasks: Vec<TaskInfo>,
}

/// Creates a command. Without arguments the command runs through the shell.
pub fn create_command_info(value: Option<&str>, arguments: Vec<String>) -> CommandInfo {
    CommandInfo {
        value: value.map(|v| v.to_string()),
        shell: arguments.is_empty(),
        arguments,
    }
}

pub fn create_executor_info(
    executor_id: impl Into<ExecutorId>,
    command: Option<&str>,
    resources: Resources,
) -> ExecutorInfo {
    ExecutorInfo {
        executor_id: executor_id.into(),
        name: None,
        framework_id: None,
        command: create_command_info(command, Vec::new()),
        resources,
    }
}

/// Creates a shell task with a random id.
pub fn create_task(agent_id: Option<AgentId>, resources: Resources, command: &str) -> TaskInfo {
    TaskInfo {
        name: "test-task".to_string(),
        task_id: TaskId::new(Uuid::random().to_string()),
        agent_id,
        resources,
        command: Some(create_command_info(Some(command), Vec::new())),
        executor: None,
    }
}

pub fn create_task_group_info(tasks: Vec<TaskInfo>) -> TaskGroupInfo {
    TaskGroupInfo { tasks }
}
