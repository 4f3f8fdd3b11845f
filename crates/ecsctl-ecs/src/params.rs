//! Parameter declarations reused across command descriptors.
//!
//! The flattened names must match what the assembly helpers in
//! [`crate::shapes`] read.

use crate::shapes::{
    ASSIGN_PUBLIC_IP, DEPLOYMENT_CONTROLLERS, LAUNCH_TYPES, PROPAGATE_TAGS, SCHEDULING_STRATEGIES,
};
use ecsctl_binding::{ParamSpec, ParamType};

pub const CLUSTER: ParamSpec = ParamSpec::new("Cluster", ParamType::String)
    .help("Short name or ARN of the cluster; the default cluster when omitted");
pub const TAG: ParamSpec = ParamSpec::new("Tag", ParamType::Map)
    .aliases(&["Tags"])
    .help("key=value, repeatable");
pub const LAUNCH_TYPE: ParamSpec = ParamSpec::new("LaunchType", ParamType::Enum(LAUNCH_TYPES));
pub const SCHEDULING_STRATEGY: ParamSpec =
    ParamSpec::new("SchedulingStrategy", ParamType::Enum(SCHEDULING_STRATEGIES));
pub const PROPAGATE_TAG: ParamSpec =
    ParamSpec::new("PropagateTag", ParamType::Enum(PROPAGATE_TAGS)).aliases(&["PropagateTags"]);
pub const ENABLE_ECS_MANAGED_TAG: ParamSpec =
    ParamSpec::new("EnableECSManagedTag", ParamType::Boolean).aliases(&["EnableECSManagedTags"]);
pub const ENABLE_EXECUTE_COMMAND: ParamSpec =
    ParamSpec::new("EnableExecuteCommand", ParamType::Boolean);
pub const PLATFORM_VERSION: ParamSpec = ParamSpec::new("PlatformVersion", ParamType::String);
pub const CAPACITY_PROVIDER_STRATEGY: ParamSpec =
    ParamSpec::new("CapacityProviderStrategy", ParamType::StructList)
        .help("JSON {\"capacityProvider\":..,\"weight\":..,\"base\":..}");
pub const PLACEMENT_CONSTRAINT: ParamSpec =
    ParamSpec::new("PlacementConstraint", ParamType::StructList)
        .aliases(&["PlacementConstraints"])
        .help("JSON {\"type\":..,\"expression\":..}");
pub const PLACEMENT_STRATEGY: ParamSpec = ParamSpec::new("PlacementStrategy", ParamType::StructList)
    .help("JSON {\"type\":..,\"field\":..}");
pub const LOAD_BALANCER: ParamSpec = ParamSpec::new("LoadBalancer", ParamType::StructList)
    .aliases(&["LoadBalancers"])
    .help("JSON {\"targetGroupArn\":..,\"containerName\":..,\"containerPort\":..}");
pub const SERVICE_REGISTRY: ParamSpec = ParamSpec::new("ServiceRegistry", ParamType::StructList)
    .aliases(&["ServiceRegistries"])
    .help("JSON {\"registryArn\":..,\"port\":..}");
pub const HEALTH_CHECK_GRACE_PERIOD: ParamSpec =
    ParamSpec::new("HealthCheckGracePeriodSecond", ParamType::Integer)
        .aliases(&["HealthCheckGracePeriodSeconds"]);
pub const MAX_RESULT: ParamSpec = ParamSpec::new("MaxResult", ParamType::Integer)
    .aliases(&["MaxItems", "MaxResults"])
    .help("Page size requested from the service");
pub const NEXT_TOKEN: ParamSpec = ParamSpec::new("NextToken", ParamType::String)
    .help("Resume from this token; turns off automatic paging");

// networkConfiguration.awsvpcConfiguration
pub const AWSVPC_SUBNET: ParamSpec =
    ParamSpec::new("AwsvpcConfiguration_Subnet", ParamType::StringList).aliases(&["Subnet", "Subnets"]);
pub const AWSVPC_SECURITY_GROUP: ParamSpec =
    ParamSpec::new("AwsvpcConfiguration_SecurityGroup", ParamType::StringList)
        .aliases(&["SecurityGroup", "SecurityGroups"]);
pub const AWSVPC_ASSIGN_PUBLIC_IP: ParamSpec = ParamSpec::new(
    "AwsvpcConfiguration_AssignPublicIp",
    ParamType::Enum(ASSIGN_PUBLIC_IP),
)
.aliases(&["AssignPublicIp"]);

// deploymentConfiguration
pub const DEPLOYMENT_MAXIMUM_PERCENT: ParamSpec =
    ParamSpec::new("DeploymentConfiguration_MaximumPercent", ParamType::Integer);
pub const DEPLOYMENT_MINIMUM_HEALTHY_PERCENT: ParamSpec =
    ParamSpec::new("DeploymentConfiguration_MinimumHealthyPercent", ParamType::Integer);
pub const CIRCUIT_BREAKER_ENABLE: ParamSpec =
    ParamSpec::new("DeploymentCircuitBreaker_Enable", ParamType::Boolean);
pub const CIRCUIT_BREAKER_ROLLBACK: ParamSpec =
    ParamSpec::new("DeploymentCircuitBreaker_Rollback", ParamType::Boolean);
pub const ALARMS_ALARM_NAME: ParamSpec = ParamSpec::new("Alarms_AlarmName", ParamType::StringList);
pub const ALARMS_ENABLE: ParamSpec = ParamSpec::new("Alarms_Enable", ParamType::Boolean);
pub const ALARMS_ROLLBACK: ParamSpec = ParamSpec::new("Alarms_Rollback", ParamType::Boolean);
pub const DEPLOYMENT_CONTROLLER_TYPE: ParamSpec = ParamSpec::new(
    "DeploymentController_Type",
    ParamType::Enum(DEPLOYMENT_CONTROLLERS),
);

// serviceConnectConfiguration
pub const SERVICE_CONNECT_ENABLED: ParamSpec =
    ParamSpec::new("ServiceConnectConfiguration_Enabled", ParamType::Boolean);
pub const SERVICE_CONNECT_NAMESPACE: ParamSpec =
    ParamSpec::new("ServiceConnectConfiguration_Namespace", ParamType::String);
pub const SERVICE_CONNECT_SERVICE: ParamSpec =
    ParamSpec::new("ServiceConnectConfiguration_Service", ParamType::StructList)
        .help("JSON {\"portName\":..,\"discoveryName\":..,\"clientAliases\":[..]}");
pub const LOG_DRIVER: ParamSpec = ParamSpec::new("LogConfiguration_LogDriver", ParamType::String);
pub const LOG_OPTION: ParamSpec = ParamSpec::new("LogConfiguration_Option", ParamType::Map);
pub const LOG_SECRET_OPTION: ParamSpec =
    ParamSpec::new("LogConfiguration_SecretOption", ParamType::StructList)
        .help("JSON {\"name\":..,\"valueFrom\":..}");
