//! Task commands: RunTask, StopTask, DescribeTasks, ListTasks.

use crate::params::{self, *};
use crate::shapes::{
    append_list, network_configuration, tags_from_map, CapacityProviderStrategyItem,
    ContainerOverride, Failure, NetworkConfiguration, PlacementConstraint, PlacementStrategy, Tag,
    Task, DESIRED_STATUSES,
};
use ecsctl_binding::{
    nested, projection, BindError, CommandDescriptor, ConfirmSpec, Context, Operation, ParamSpec,
    ParamType,
};
use serde::{Deserialize, Serialize};

// ── new-task ────────────────────────────────────────────────────────────

pub static NEW_TASK: CommandDescriptor = CommandDescriptor {
    name: "new-task",
    legacy_name: "New-ECSTask",
    operation: "RunTask",
    about: "Starts a new task from a task definition",
    params: &[
        CLUSTER,
        ParamSpec::new("TaskDefinition", ParamType::String)
            .required()
            .pipeline(),
        ParamSpec::new("Count", ParamType::Integer).help("1 to 10 tasks"),
        LAUNCH_TYPE,
        CAPACITY_PROVIDER_STRATEGY,
        ParamSpec::new("Group", ParamType::String),
        AWSVPC_SUBNET,
        AWSVPC_SECURITY_GROUP,
        AWSVPC_ASSIGN_PUBLIC_IP,
        ParamSpec::new("Overrides_ContainerOverride", ParamType::StructList)
            .aliases(&["ContainerOverride", "ContainerOverrides"])
            .help("JSON {\"name\":..,\"command\":[..],\"environment\":[..]}"),
        ParamSpec::new("Overrides_Cpu", ParamType::String),
        ParamSpec::new("Overrides_Memory", ParamType::String),
        ParamSpec::new("Overrides_TaskRoleArn", ParamType::String),
        ParamSpec::new("Overrides_ExecutionRoleArn", ParamType::String),
        PLACEMENT_CONSTRAINT,
        PLACEMENT_STRATEGY,
        PLATFORM_VERSION,
        PROPAGATE_TAG,
        ParamSpec::new("ReferenceId", ParamType::String),
        ParamSpec::new("StartedBy", ParamType::String),
        params::TAG,
        ENABLE_ECS_MANAGED_TAG,
        ENABLE_EXECUTE_COMMAND,
        ParamSpec::new("ClientToken", ParamType::String),
    ],
    default_select: "*",
    confirm: Some(ConfirmSpec {
        targets: &["TaskDefinition"],
    }),
};

#[derive(Debug, Default, Serialize)]
pub struct RunTaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(rename = "taskDefinition", skip_serializing_if = "Option::is_none")]
    pub task_definition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i32>,
    #[serde(rename = "launchType", skip_serializing_if = "Option::is_none")]
    pub launch_type: Option<String>,
    #[serde(rename = "capacityProviderStrategy", skip_serializing_if = "Option::is_none")]
    pub capacity_provider_strategy: Option<Vec<CapacityProviderStrategyItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(rename = "networkConfiguration", skip_serializing_if = "Option::is_none")]
    pub network_configuration: Option<NetworkConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<TaskOverride>,
    #[serde(rename = "placementConstraints", skip_serializing_if = "Option::is_none")]
    pub placement_constraints: Option<Vec<PlacementConstraint>>,
    #[serde(rename = "placementStrategy", skip_serializing_if = "Option::is_none")]
    pub placement_strategy: Option<Vec<PlacementStrategy>>,
    #[serde(rename = "platformVersion", skip_serializing_if = "Option::is_none")]
    pub platform_version: Option<String>,
    #[serde(rename = "propagateTags", skip_serializing_if = "Option::is_none")]
    pub propagate_tags: Option<String>,
    #[serde(rename = "referenceId", skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    #[serde(rename = "startedBy", skip_serializing_if = "Option::is_none")]
    pub started_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(rename = "enableECSManagedTags", skip_serializing_if = "Option::is_none")]
    pub enable_ecs_managed_tags: Option<bool>,
    #[serde(rename = "enableExecuteCommand", skip_serializing_if = "Option::is_none")]
    pub enable_execute_command: Option<bool>,
    #[serde(rename = "clientToken", skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct TaskOverride {
    #[serde(rename = "containerOverrides", skip_serializing_if = "Option::is_none")]
    pub container_overrides: Option<Vec<ContainerOverride>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(rename = "taskRoleArn", skip_serializing_if = "Option::is_none")]
    pub task_role_arn: Option<String>,
    #[serde(rename = "executionRoleArn", skip_serializing_if = "Option::is_none")]
    pub execution_role_arn: Option<String>,
}

/// Reply of RunTask and DescribeTasks.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TasksResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failures: Option<Vec<Failure>>,
}

projection! {
    pub enum TasksField for TasksResponse {
        Tasks => tasks,
        Failures => failures,
    }
}

pub struct RunTask;

impl Operation for RunTask {
    type Request = RunTaskRequest;
    type Response = TasksResponse;
    type Field = TasksField;

    fn descriptor() -> &'static CommandDescriptor {
        &NEW_TASK
    }

    fn assemble(ctx: &Context) -> Result<RunTaskRequest, BindError> {
        let container_overrides =
            ctx.structs::<ContainerOverride>("Overrides_ContainerOverride")?;
        Ok(RunTaskRequest {
            cluster: ctx.string("Cluster"),
            task_definition: ctx.string("TaskDefinition"),
            count: ctx.int("Count"),
            launch_type: ctx.string("LaunchType"),
            capacity_provider_strategy: ctx.structs("CapacityProviderStrategy")?,
            group: ctx.string("Group"),
            network_configuration: network_configuration(ctx),
            overrides: nested::<TaskOverride>(|o| {
                o.set(container_overrides, |o, v| o.container_overrides = Some(v))
                    .set(ctx.string("Overrides_Cpu"), |o, v| o.cpu = Some(v))
                    .set(ctx.string("Overrides_Memory"), |o, v| o.memory = Some(v))
                    .set(ctx.string("Overrides_TaskRoleArn"), |o, v| o.task_role_arn = Some(v))
                    .set(ctx.string("Overrides_ExecutionRoleArn"), |o, v| {
                        o.execution_role_arn = Some(v)
                    });
            }),
            placement_constraints: ctx.structs("PlacementConstraint")?,
            placement_strategy: ctx.structs("PlacementStrategy")?,
            platform_version: ctx.string("PlatformVersion"),
            propagate_tags: ctx.string("PropagateTag"),
            reference_id: ctx.string("ReferenceId"),
            started_by: ctx.string("StartedBy"),
            tags: ctx.map("Tag").map(tags_from_map),
            enable_ecs_managed_tags: ctx.boolean("EnableECSManagedTag"),
            enable_execute_command: ctx.boolean("EnableExecuteCommand"),
            client_token: ctx.string("ClientToken"),
        })
    }
}

// ── stop-task ───────────────────────────────────────────────────────────

pub static STOP_TASK: CommandDescriptor = CommandDescriptor {
    name: "stop-task",
    legacy_name: "Stop-ECSTask",
    operation: "StopTask",
    about: "Stops a running task",
    params: &[
        CLUSTER,
        ParamSpec::new("Task", ParamType::String).required().pipeline(),
        ParamSpec::new("Reason", ParamType::String)
            .help("Shown as stoppedReason in later DescribeTasks output"),
    ],
    default_select: "Task",
    confirm: Some(ConfirmSpec {
        targets: &["Task"],
    }),
};

#[derive(Debug, Default, Serialize)]
pub struct StopTaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StopTaskResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
}

projection! {
    pub enum StopTaskField for StopTaskResponse {
        Task => task,
    }
}

pub struct StopTask;

impl Operation for StopTask {
    type Request = StopTaskRequest;
    type Response = StopTaskResponse;
    type Field = StopTaskField;

    fn descriptor() -> &'static CommandDescriptor {
        &STOP_TASK
    }

    fn assemble(ctx: &Context) -> Result<StopTaskRequest, BindError> {
        Ok(StopTaskRequest {
            cluster: ctx.string("Cluster"),
            task: ctx.string("Task"),
            reason: ctx.string("Reason"),
        })
    }
}

// ── get-task-detail ─────────────────────────────────────────────────────

pub static GET_TASK_DETAIL: CommandDescriptor = CommandDescriptor {
    name: "get-task-detail",
    legacy_name: "Get-ECSTaskDetail",
    operation: "DescribeTasks",
    about: "Describes the specified tasks in a cluster",
    params: &[
        CLUSTER,
        ParamSpec::new("Task", ParamType::StringList)
            .required()
            .aliases(&["Tasks"])
            .pipeline(),
        ParamSpec::new("Include", ParamType::StringList).help("TAGS"),
    ],
    default_select: "*",
    confirm: None,
};

#[derive(Debug, Default, Serialize)]
pub struct DescribeTasksRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
}

pub struct DescribeTasks;

impl Operation for DescribeTasks {
    type Request = DescribeTasksRequest;
    type Response = TasksResponse;
    type Field = TasksField;

    fn descriptor() -> &'static CommandDescriptor {
        &GET_TASK_DETAIL
    }

    fn assemble(ctx: &Context) -> Result<DescribeTasksRequest, BindError> {
        Ok(DescribeTasksRequest {
            cluster: ctx.string("Cluster"),
            tasks: ctx.strings("Task"),
            include: ctx.strings("Include"),
        })
    }
}

// ── get-task-list ───────────────────────────────────────────────────────

pub static GET_TASK_LIST: CommandDescriptor = CommandDescriptor {
    name: "get-task-list",
    legacy_name: "Get-ECSTaskList",
    operation: "ListTasks",
    about: "Returns a list of tasks",
    params: &[
        CLUSTER.pipeline(),
        ParamSpec::new("ContainerInstance", ParamType::String),
        ParamSpec::new("Family", ParamType::String),
        ParamSpec::new("StartedBy", ParamType::String),
        ParamSpec::new("ServiceName", ParamType::String),
        ParamSpec::new("DesiredStatus", ParamType::Enum(DESIRED_STATUSES)),
        LAUNCH_TYPE,
        MAX_RESULT,
        params::NEXT_TOKEN,
    ],
    default_select: "TaskArns",
    confirm: None,
};

#[derive(Debug, Default, Serialize)]
pub struct ListTasksRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(rename = "containerInstance", skip_serializing_if = "Option::is_none")]
    pub container_instance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(rename = "startedBy", skip_serializing_if = "Option::is_none")]
    pub started_by: Option<String>,
    #[serde(rename = "serviceName", skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(rename = "desiredStatus", skip_serializing_if = "Option::is_none")]
    pub desired_status: Option<String>,
    #[serde(rename = "launchType", skip_serializing_if = "Option::is_none")]
    pub launch_type: Option<String>,
    #[serde(rename = "nextToken", skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(rename = "maxResults", skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListTasksResponse {
    #[serde(rename = "taskArns", skip_serializing_if = "Option::is_none")]
    pub task_arns: Option<Vec<String>>,
    #[serde(rename = "nextToken", skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

projection! {
    pub enum ListTasksField for ListTasksResponse {
        TaskArns => task_arns,
        NextToken => next_token,
    }
}

pub struct ListTasks;

impl Operation for ListTasks {
    type Request = ListTasksRequest;
    type Response = ListTasksResponse;
    type Field = ListTasksField;

    fn descriptor() -> &'static CommandDescriptor {
        &GET_TASK_LIST
    }

    fn assemble(ctx: &Context) -> Result<ListTasksRequest, BindError> {
        Ok(ListTasksRequest {
            cluster: ctx.string("Cluster"),
            container_instance: ctx.string("ContainerInstance"),
            family: ctx.string("Family"),
            started_by: ctx.string("StartedBy"),
            service_name: ctx.string("ServiceName"),
            desired_status: ctx.string("DesiredStatus"),
            launch_type: ctx.string("LaunchType"),
            next_token: ctx.string("NextToken"),
            max_results: ctx.int("MaxResult"),
        })
    }

    fn next_token(response: &ListTasksResponse) -> Option<&str> {
        response.next_token.as_deref()
    }

    fn set_next_token(request: &mut ListTasksRequest, token: String) {
        request.next_token = Some(token);
    }

    fn append_page(into: &mut ListTasksResponse, page: ListTasksResponse) {
        append_list(&mut into.task_arns, page.task_arns);
        into.next_token = page.next_token;
    }
}
