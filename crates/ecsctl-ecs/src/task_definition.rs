//! Task definition commands: RegisterTaskDefinition,
//! DeregisterTaskDefinition, DescribeTaskDefinition, ListTaskDefinitions.

use crate::params::{self, PLACEMENT_CONSTRAINT};
use crate::shapes::{
    append_list, tags_from_map, ContainerDefinition, PlacementConstraint, Tag, TaskDefinition,
    Volume, CPU_ARCHITECTURES, IPC_MODES, NETWORK_MODES, PID_MODES, SORT_ORDERS,
    TASK_DEFINITION_STATUSES,
};
use ecsctl_binding::{
    nested, projection, BindError, CommandDescriptor, ConfirmSpec, Context, Operation, ParamSpec,
    ParamType,
};
use serde::{Deserialize, Serialize};

// ── register-task-definition ────────────────────────────────────────────

pub static REGISTER_TASK_DEFINITION: CommandDescriptor = CommandDescriptor {
    name: "register-task-definition",
    legacy_name: "Register-ECSTaskDefinition",
    operation: "RegisterTaskDefinition",
    about: "Registers a new task definition revision",
    params: &[
        ParamSpec::new("Family", ParamType::String).required().pipeline(),
        ParamSpec::new("TaskRoleArn", ParamType::String),
        ParamSpec::new("ExecutionRoleArn", ParamType::String),
        ParamSpec::new("NetworkMode", ParamType::Enum(NETWORK_MODES)),
        ParamSpec::new("ContainerDefinition", ParamType::StructList)
            .aliases(&["ContainerDefinitions"])
            .help("JSON container definition, repeatable"),
        ParamSpec::new("Volume", ParamType::StructList).aliases(&["Volumes"]),
        PLACEMENT_CONSTRAINT,
        ParamSpec::new("RequiresCompatibility", ParamType::StringList)
            .aliases(&["RequiresCompatibilities"]),
        ParamSpec::new("Cpu", ParamType::String).help("CPU units, e.g. 256 or 1 vCPU"),
        ParamSpec::new("Memory", ParamType::String).help("MiB, e.g. 512 or 1 GB"),
        params::TAG,
        ParamSpec::new("PidMode", ParamType::Enum(PID_MODES)),
        ParamSpec::new("IpcMode", ParamType::Enum(IPC_MODES)),
        ParamSpec::new("EphemeralStorage_SizeInGiB", ParamType::Integer),
        ParamSpec::new("RuntimePlatform_CpuArchitecture", ParamType::Enum(CPU_ARCHITECTURES)),
        ParamSpec::new("RuntimePlatform_OperatingSystemFamily", ParamType::String),
    ],
    default_select: "*",
    confirm: Some(ConfirmSpec {
        targets: &["Family"],
    }),
};

#[derive(Debug, Default, Serialize)]
pub struct RegisterTaskDefinitionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(rename = "taskRoleArn", skip_serializing_if = "Option::is_none")]
    pub task_role_arn: Option<String>,
    #[serde(rename = "executionRoleArn", skip_serializing_if = "Option::is_none")]
    pub execution_role_arn: Option<String>,
    #[serde(rename = "networkMode", skip_serializing_if = "Option::is_none")]
    pub network_mode: Option<String>,
    #[serde(rename = "containerDefinitions", skip_serializing_if = "Option::is_none")]
    pub container_definitions: Option<Vec<ContainerDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<Volume>>,
    #[serde(rename = "placementConstraints", skip_serializing_if = "Option::is_none")]
    pub placement_constraints: Option<Vec<PlacementConstraint>>,
    #[serde(rename = "requiresCompatibilities", skip_serializing_if = "Option::is_none")]
    pub requires_compatibilities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(rename = "pidMode", skip_serializing_if = "Option::is_none")]
    pub pid_mode: Option<String>,
    #[serde(rename = "ipcMode", skip_serializing_if = "Option::is_none")]
    pub ipc_mode: Option<String>,
    #[serde(rename = "ephemeralStorage", skip_serializing_if = "Option::is_none")]
    pub ephemeral_storage: Option<EphemeralStorage>,
    #[serde(rename = "runtimePlatform", skip_serializing_if = "Option::is_none")]
    pub runtime_platform: Option<RuntimePlatform>,
}

#[derive(Debug, Default, Serialize)]
pub struct EphemeralStorage {
    #[serde(rename = "sizeInGiB", skip_serializing_if = "Option::is_none")]
    pub size_in_gib: Option<i32>,
}

#[derive(Debug, Default, Serialize)]
pub struct RuntimePlatform {
    #[serde(rename = "cpuArchitecture", skip_serializing_if = "Option::is_none")]
    pub cpu_architecture: Option<String>,
    #[serde(rename = "operatingSystemFamily", skip_serializing_if = "Option::is_none")]
    pub operating_system_family: Option<String>,
}

/// Reply of RegisterTaskDefinition and DeregisterTaskDefinition.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskDefinitionResponse {
    #[serde(rename = "taskDefinition", skip_serializing_if = "Option::is_none")]
    pub task_definition: Option<TaskDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

projection! {
    pub enum TaskDefinitionField for TaskDefinitionResponse {
        TaskDefinition => task_definition,
        Tags => tags,
    }
}

pub struct RegisterTaskDefinition;

impl Operation for RegisterTaskDefinition {
    type Request = RegisterTaskDefinitionRequest;
    type Response = TaskDefinitionResponse;
    type Field = TaskDefinitionField;

    fn descriptor() -> &'static CommandDescriptor {
        &REGISTER_TASK_DEFINITION
    }

    fn assemble(ctx: &Context) -> Result<RegisterTaskDefinitionRequest, BindError> {
        Ok(RegisterTaskDefinitionRequest {
            family: ctx.string("Family"),
            task_role_arn: ctx.string("TaskRoleArn"),
            execution_role_arn: ctx.string("ExecutionRoleArn"),
            network_mode: ctx.string("NetworkMode"),
            container_definitions: ctx.structs("ContainerDefinition")?,
            volumes: ctx.structs("Volume")?,
            placement_constraints: ctx.structs("PlacementConstraint")?,
            requires_compatibilities: ctx.strings("RequiresCompatibility"),
            cpu: ctx.string("Cpu"),
            memory: ctx.string("Memory"),
            tags: ctx.map("Tag").map(tags_from_map),
            pid_mode: ctx.string("PidMode"),
            ipc_mode: ctx.string("IpcMode"),
            ephemeral_storage: nested::<EphemeralStorage>(|e| {
                e.set(ctx.int("EphemeralStorage_SizeInGiB"), |e, v| e.size_in_gib = Some(v));
            }),
            runtime_platform: nested::<RuntimePlatform>(|r| {
                r.set(ctx.string("RuntimePlatform_CpuArchitecture"), |r, v| {
                    r.cpu_architecture = Some(v)
                })
                .set(ctx.string("RuntimePlatform_OperatingSystemFamily"), |r, v| {
                    r.operating_system_family = Some(v)
                });
            }),
        })
    }
}

// ── unregister-task-definition ──────────────────────────────────────────

pub static UNREGISTER_TASK_DEFINITION: CommandDescriptor = CommandDescriptor {
    name: "unregister-task-definition",
    legacy_name: "Unregister-ECSTaskDefinition",
    operation: "DeregisterTaskDefinition",
    about: "Marks a task definition revision INACTIVE",
    params: &[ParamSpec::new("TaskDefinition", ParamType::String)
        .required()
        .pipeline()
        .help("family:revision or full ARN")],
    default_select: "TaskDefinition",
    confirm: Some(ConfirmSpec {
        targets: &["TaskDefinition"],
    }),
};

#[derive(Debug, Default, Serialize)]
pub struct TaskDefinitionRefRequest {
    #[serde(rename = "taskDefinition", skip_serializing_if = "Option::is_none")]
    pub task_definition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
}

pub struct DeregisterTaskDefinition;

impl Operation for DeregisterTaskDefinition {
    type Request = TaskDefinitionRefRequest;
    type Response = TaskDefinitionResponse;
    type Field = TaskDefinitionField;

    fn descriptor() -> &'static CommandDescriptor {
        &UNREGISTER_TASK_DEFINITION
    }

    fn assemble(ctx: &Context) -> Result<TaskDefinitionRefRequest, BindError> {
        Ok(TaskDefinitionRefRequest {
            task_definition: ctx.string("TaskDefinition"),
            include: None,
        })
    }
}

// ── get-task-definition-detail ──────────────────────────────────────────

pub static GET_TASK_DEFINITION_DETAIL: CommandDescriptor = CommandDescriptor {
    name: "get-task-definition-detail",
    legacy_name: "Get-ECSTaskDefinitionDetail",
    operation: "DescribeTaskDefinition",
    about: "Describes a task definition",
    params: &[
        ParamSpec::new("TaskDefinition", ParamType::String)
            .required()
            .pipeline(),
        ParamSpec::new("Include", ParamType::StringList).help("TAGS"),
    ],
    default_select: "*",
    confirm: None,
};

pub struct DescribeTaskDefinition;

impl Operation for DescribeTaskDefinition {
    type Request = TaskDefinitionRefRequest;
    type Response = TaskDefinitionResponse;
    type Field = TaskDefinitionField;

    fn descriptor() -> &'static CommandDescriptor {
        &GET_TASK_DEFINITION_DETAIL
    }

    fn assemble(ctx: &Context) -> Result<TaskDefinitionRefRequest, BindError> {
        Ok(TaskDefinitionRefRequest {
            task_definition: ctx.string("TaskDefinition"),
            include: ctx.strings("Include"),
        })
    }
}

// ── get-task-definition-list ────────────────────────────────────────────

pub static GET_TASK_DEFINITION_LIST: CommandDescriptor = CommandDescriptor {
    name: "get-task-definition-list",
    legacy_name: "Get-ECSTaskDefinitionList",
    operation: "ListTaskDefinitions",
    about: "Lists registered task definition ARNs",
    params: &[
        ParamSpec::new("FamilyPrefix", ParamType::String).pipeline(),
        ParamSpec::new("Status", ParamType::Enum(TASK_DEFINITION_STATUSES)),
        ParamSpec::new("Sort", ParamType::Enum(SORT_ORDERS)),
        params::MAX_RESULT,
        params::NEXT_TOKEN,
    ],
    default_select: "TaskDefinitionArns",
    confirm: None,
};

#[derive(Debug, Default, Serialize)]
pub struct ListTaskDefinitionsRequest {
    #[serde(rename = "familyPrefix", skip_serializing_if = "Option::is_none")]
    pub family_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(rename = "nextToken", skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(rename = "maxResults", skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListTaskDefinitionsResponse {
    #[serde(rename = "taskDefinitionArns", skip_serializing_if = "Option::is_none")]
    pub task_definition_arns: Option<Vec<String>>,
    #[serde(rename = "nextToken", skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

projection! {
    pub enum ListTaskDefinitionsField for ListTaskDefinitionsResponse {
        TaskDefinitionArns => task_definition_arns,
        NextToken => next_token,
    }
}

pub struct ListTaskDefinitions;

impl Operation for ListTaskDefinitions {
    type Request = ListTaskDefinitionsRequest;
    type Response = ListTaskDefinitionsResponse;
    type Field = ListTaskDefinitionsField;

    fn descriptor() -> &'static CommandDescriptor {
        &GET_TASK_DEFINITION_LIST
    }

    fn assemble(ctx: &Context) -> Result<ListTaskDefinitionsRequest, BindError> {
        Ok(ListTaskDefinitionsRequest {
            family_prefix: ctx.string("FamilyPrefix"),
            status: ctx.string("Status"),
            sort: ctx.string("Sort"),
            next_token: ctx.string("NextToken"),
            max_results: ctx.int("MaxResult"),
        })
    }

    fn next_token(response: &ListTaskDefinitionsResponse) -> Option<&str> {
        response.next_token.as_deref()
    }

    fn set_next_token(request: &mut ListTaskDefinitionsRequest, token: String) {
        request.next_token = Some(token);
    }

    fn append_page(into: &mut ListTaskDefinitionsResponse, page: ListTaskDefinitionsResponse) {
        append_list(&mut into.task_definition_arns, page.task_definition_arns);
        into.next_token = page.next_token;
    }
}
