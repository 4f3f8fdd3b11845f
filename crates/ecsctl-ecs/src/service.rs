//! Service commands: CreateService, UpdateService, DeleteService,
//! DescribeServices, ListServices.

use crate::params::{self, *};
use crate::shapes::{
    append_list, deployment_configuration, network_configuration, service_connect_configuration,
    tags_from_map, CapacityProviderStrategyItem, DeploymentConfiguration, DeploymentController,
    Failure, LoadBalancer, NetworkConfiguration, PlacementConstraint, PlacementStrategy, Service,
    ServiceConnectConfiguration, ServiceRegistry, Tag,
};
use ecsctl_binding::{
    nested, projection, BindError, CommandDescriptor, ConfirmSpec, Context, Operation, ParamSpec,
    ParamType,
};
use serde::{Deserialize, Serialize};

// ── new-service ─────────────────────────────────────────────────────────

pub static NEW_SERVICE: CommandDescriptor = CommandDescriptor {
    name: "new-service",
    legacy_name: "New-ECSService",
    operation: "CreateService",
    about: "Runs and maintains a desired number of tasks from a task definition",
    params: &[
        CLUSTER,
        ParamSpec::new("ServiceName", ParamType::String)
            .required()
            .pipeline()
            .help("Name of the service, unique within the cluster"),
        ParamSpec::new("TaskDefinition", ParamType::String)
            .help("family:revision or full ARN of the task definition"),
        ParamSpec::new("DesiredCount", ParamType::Integer),
        ParamSpec::new("ClientToken", ParamType::String),
        LAUNCH_TYPE,
        CAPACITY_PROVIDER_STRATEGY,
        PLATFORM_VERSION,
        ParamSpec::new("Role", ParamType::String),
        LOAD_BALANCER,
        SERVICE_REGISTRY,
        PLACEMENT_CONSTRAINT,
        PLACEMENT_STRATEGY,
        HEALTH_CHECK_GRACE_PERIOD,
        SCHEDULING_STRATEGY,
        DEPLOYMENT_CONTROLLER_TYPE,
        params::TAG,
        ENABLE_ECS_MANAGED_TAG,
        PROPAGATE_TAG,
        ENABLE_EXECUTE_COMMAND,
        DEPLOYMENT_MAXIMUM_PERCENT,
        DEPLOYMENT_MINIMUM_HEALTHY_PERCENT,
        CIRCUIT_BREAKER_ENABLE,
        CIRCUIT_BREAKER_ROLLBACK,
        ALARMS_ALARM_NAME,
        ALARMS_ENABLE,
        ALARMS_ROLLBACK,
        AWSVPC_SUBNET,
        AWSVPC_SECURITY_GROUP,
        AWSVPC_ASSIGN_PUBLIC_IP,
        SERVICE_CONNECT_ENABLED,
        SERVICE_CONNECT_NAMESPACE,
        SERVICE_CONNECT_SERVICE,
        LOG_DRIVER,
        LOG_OPTION,
        LOG_SECRET_OPTION,
    ],
    default_select: "Service",
    confirm: Some(ConfirmSpec {
        targets: &["ServiceName"],
    }),
};

#[derive(Debug, Default, Serialize)]
pub struct CreateServiceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(rename = "serviceName", skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(rename = "taskDefinition", skip_serializing_if = "Option::is_none")]
    pub task_definition: Option<String>,
    #[serde(rename = "loadBalancers", skip_serializing_if = "Option::is_none")]
    pub load_balancers: Option<Vec<LoadBalancer>>,
    #[serde(rename = "serviceRegistries", skip_serializing_if = "Option::is_none")]
    pub service_registries: Option<Vec<ServiceRegistry>>,
    #[serde(rename = "desiredCount", skip_serializing_if = "Option::is_none")]
    pub desired_count: Option<i32>,
    #[serde(rename = "clientToken", skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
    #[serde(rename = "launchType", skip_serializing_if = "Option::is_none")]
    pub launch_type: Option<String>,
    #[serde(rename = "capacityProviderStrategy", skip_serializing_if = "Option::is_none")]
    pub capacity_provider_strategy: Option<Vec<CapacityProviderStrategyItem>>,
    #[serde(rename = "platformVersion", skip_serializing_if = "Option::is_none")]
    pub platform_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "deploymentConfiguration", skip_serializing_if = "Option::is_none")]
    pub deployment_configuration: Option<DeploymentConfiguration>,
    #[serde(rename = "placementConstraints", skip_serializing_if = "Option::is_none")]
    pub placement_constraints: Option<Vec<PlacementConstraint>>,
    #[serde(rename = "placementStrategy", skip_serializing_if = "Option::is_none")]
    pub placement_strategy: Option<Vec<PlacementStrategy>>,
    #[serde(rename = "networkConfiguration", skip_serializing_if = "Option::is_none")]
    pub network_configuration: Option<NetworkConfiguration>,
    #[serde(
        rename = "healthCheckGracePeriodSeconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub health_check_grace_period_seconds: Option<i32>,
    #[serde(rename = "schedulingStrategy", skip_serializing_if = "Option::is_none")]
    pub scheduling_strategy: Option<String>,
    #[serde(rename = "deploymentController", skip_serializing_if = "Option::is_none")]
    pub deployment_controller: Option<DeploymentController>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(rename = "enableECSManagedTags", skip_serializing_if = "Option::is_none")]
    pub enable_ecs_managed_tags: Option<bool>,
    #[serde(rename = "propagateTags", skip_serializing_if = "Option::is_none")]
    pub propagate_tags: Option<String>,
    #[serde(rename = "enableExecuteCommand", skip_serializing_if = "Option::is_none")]
    pub enable_execute_command: Option<bool>,
    #[serde(
        rename = "serviceConnectConfiguration",
        skip_serializing_if = "Option::is_none"
    )]
    pub service_connect_configuration: Option<ServiceConnectConfiguration>,
}

/// Reply of CreateService, UpdateService and DeleteService.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ServiceResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<Service>,
}

projection! {
    pub enum ServiceField for ServiceResponse {
        Service => service,
    }
}

pub struct CreateService;

impl Operation for CreateService {
    type Request = CreateServiceRequest;
    type Response = ServiceResponse;
    type Field = ServiceField;

    fn descriptor() -> &'static CommandDescriptor {
        &NEW_SERVICE
    }

    fn assemble(ctx: &Context) -> Result<CreateServiceRequest, BindError> {
        Ok(CreateServiceRequest {
            cluster: ctx.string("Cluster"),
            service_name: ctx.string("ServiceName"),
            task_definition: ctx.string("TaskDefinition"),
            load_balancers: ctx.structs("LoadBalancer")?,
            service_registries: ctx.structs("ServiceRegistry")?,
            desired_count: ctx.int("DesiredCount"),
            client_token: ctx.string("ClientToken"),
            launch_type: ctx.string("LaunchType"),
            capacity_provider_strategy: ctx.structs("CapacityProviderStrategy")?,
            platform_version: ctx.string("PlatformVersion"),
            role: ctx.string("Role"),
            deployment_configuration: deployment_configuration(ctx),
            placement_constraints: ctx.structs("PlacementConstraint")?,
            placement_strategy: ctx.structs("PlacementStrategy")?,
            network_configuration: network_configuration(ctx),
            health_check_grace_period_seconds: ctx.int("HealthCheckGracePeriodSecond"),
            scheduling_strategy: ctx.string("SchedulingStrategy"),
            deployment_controller: nested::<DeploymentController>(|d| {
                d.set(ctx.string("DeploymentController_Type"), |d, v| d.kind = Some(v));
            }),
            tags: ctx.map("Tag").map(tags_from_map),
            enable_ecs_managed_tags: ctx.boolean("EnableECSManagedTag"),
            propagate_tags: ctx.string("PropagateTag"),
            enable_execute_command: ctx.boolean("EnableExecuteCommand"),
            service_connect_configuration: service_connect_configuration(ctx)?,
        })
    }
}

// ── update-service ──────────────────────────────────────────────────────

pub static UPDATE_SERVICE: CommandDescriptor = CommandDescriptor {
    name: "update-service",
    legacy_name: "Update-ECSService",
    operation: "UpdateService",
    about: "Modifies the parameters of a service",
    params: &[
        CLUSTER,
        ParamSpec::new("Service", ParamType::String)
            .required()
            .pipeline()
            .help("Name or ARN of the service to update"),
        ParamSpec::new("DesiredCount", ParamType::Integer),
        ParamSpec::new("TaskDefinition", ParamType::String),
        CAPACITY_PROVIDER_STRATEGY,
        PLATFORM_VERSION,
        ParamSpec::new("ForceNewDeployment", ParamType::Boolean),
        HEALTH_CHECK_GRACE_PERIOD,
        ENABLE_EXECUTE_COMMAND,
        ENABLE_ECS_MANAGED_TAG,
        PROPAGATE_TAG,
        LOAD_BALANCER,
        SERVICE_REGISTRY,
        PLACEMENT_CONSTRAINT,
        PLACEMENT_STRATEGY,
        DEPLOYMENT_MAXIMUM_PERCENT,
        DEPLOYMENT_MINIMUM_HEALTHY_PERCENT,
        CIRCUIT_BREAKER_ENABLE,
        CIRCUIT_BREAKER_ROLLBACK,
        ALARMS_ALARM_NAME,
        ALARMS_ENABLE,
        ALARMS_ROLLBACK,
        AWSVPC_SUBNET,
        AWSVPC_SECURITY_GROUP,
        AWSVPC_ASSIGN_PUBLIC_IP,
        SERVICE_CONNECT_ENABLED,
        SERVICE_CONNECT_NAMESPACE,
        SERVICE_CONNECT_SERVICE,
        LOG_DRIVER,
        LOG_OPTION,
        LOG_SECRET_OPTION,
    ],
    default_select: "Service",
    confirm: Some(ConfirmSpec {
        targets: &["Service"],
    }),
};

#[derive(Debug, Default, Serialize)]
pub struct UpdateServiceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(rename = "desiredCount", skip_serializing_if = "Option::is_none")]
    pub desired_count: Option<i32>,
    #[serde(rename = "taskDefinition", skip_serializing_if = "Option::is_none")]
    pub task_definition: Option<String>,
    #[serde(rename = "capacityProviderStrategy", skip_serializing_if = "Option::is_none")]
    pub capacity_provider_strategy: Option<Vec<CapacityProviderStrategyItem>>,
    #[serde(rename = "deploymentConfiguration", skip_serializing_if = "Option::is_none")]
    pub deployment_configuration: Option<DeploymentConfiguration>,
    #[serde(rename = "networkConfiguration", skip_serializing_if = "Option::is_none")]
    pub network_configuration: Option<NetworkConfiguration>,
    #[serde(rename = "placementConstraints", skip_serializing_if = "Option::is_none")]
    pub placement_constraints: Option<Vec<PlacementConstraint>>,
    #[serde(rename = "placementStrategy", skip_serializing_if = "Option::is_none")]
    pub placement_strategy: Option<Vec<PlacementStrategy>>,
    #[serde(rename = "platformVersion", skip_serializing_if = "Option::is_none")]
    pub platform_version: Option<String>,
    #[serde(rename = "forceNewDeployment", skip_serializing_if = "Option::is_none")]
    pub force_new_deployment: Option<bool>,
    #[serde(
        rename = "healthCheckGracePeriodSeconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub health_check_grace_period_seconds: Option<i32>,
    #[serde(rename = "enableExecuteCommand", skip_serializing_if = "Option::is_none")]
    pub enable_execute_command: Option<bool>,
    #[serde(rename = "enableECSManagedTags", skip_serializing_if = "Option::is_none")]
    pub enable_ecs_managed_tags: Option<bool>,
    #[serde(rename = "loadBalancers", skip_serializing_if = "Option::is_none")]
    pub load_balancers: Option<Vec<LoadBalancer>>,
    #[serde(rename = "propagateTags", skip_serializing_if = "Option::is_none")]
    pub propagate_tags: Option<String>,
    #[serde(rename = "serviceRegistries", skip_serializing_if = "Option::is_none")]
    pub service_registries: Option<Vec<ServiceRegistry>>,
    #[serde(
        rename = "serviceConnectConfiguration",
        skip_serializing_if = "Option::is_none"
    )]
    pub service_connect_configuration: Option<ServiceConnectConfiguration>,
}

pub struct UpdateService;

impl Operation for UpdateService {
    type Request = UpdateServiceRequest;
    type Response = ServiceResponse;
    type Field = ServiceField;

    fn descriptor() -> &'static CommandDescriptor {
        &UPDATE_SERVICE
    }

    fn assemble(ctx: &Context) -> Result<UpdateServiceRequest, BindError> {
        Ok(UpdateServiceRequest {
            cluster: ctx.string("Cluster"),
            service: ctx.string("Service"),
            desired_count: ctx.int("DesiredCount"),
            task_definition: ctx.string("TaskDefinition"),
            capacity_provider_strategy: ctx.structs("CapacityProviderStrategy")?,
            deployment_configuration: deployment_configuration(ctx),
            network_configuration: network_configuration(ctx),
            placement_constraints: ctx.structs("PlacementConstraint")?,
            placement_strategy: ctx.structs("PlacementStrategy")?,
            platform_version: ctx.string("PlatformVersion"),
            force_new_deployment: ctx.boolean("ForceNewDeployment"),
            health_check_grace_period_seconds: ctx.int("HealthCheckGracePeriodSecond"),
            enable_execute_command: ctx.boolean("EnableExecuteCommand"),
            enable_ecs_managed_tags: ctx.boolean("EnableECSManagedTag"),
            load_balancers: ctx.structs("LoadBalancer")?,
            propagate_tags: ctx.string("PropagateTag"),
            service_registries: ctx.structs("ServiceRegistry")?,
            service_connect_configuration: service_connect_configuration(ctx)?,
        })
    }
}

// ── remove-service ──────────────────────────────────────────────────────

pub static REMOVE_SERVICE: CommandDescriptor = CommandDescriptor {
    name: "remove-service",
    legacy_name: "Remove-ECSService",
    operation: "DeleteService",
    about: "Deletes a service within a cluster",
    params: &[
        CLUSTER,
        ParamSpec::new("Service", ParamType::String).required().pipeline(),
        ParamSpec::new("Enforce", ParamType::Boolean)
            .help("Delete even if the service has not been scaled down to zero tasks"),
    ],
    default_select: "Service",
    confirm: Some(ConfirmSpec {
        targets: &["Service"],
    }),
};

#[derive(Debug, Default, Serialize)]
pub struct DeleteServiceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

pub struct DeleteService;

impl Operation for DeleteService {
    type Request = DeleteServiceRequest;
    type Response = ServiceResponse;
    type Field = ServiceField;

    fn descriptor() -> &'static CommandDescriptor {
        &REMOVE_SERVICE
    }

    fn assemble(ctx: &Context) -> Result<DeleteServiceRequest, BindError> {
        Ok(DeleteServiceRequest {
            cluster: ctx.string("Cluster"),
            service: ctx.string("Service"),
            force: ctx.boolean("Enforce"),
        })
    }
}

// ── get-service ─────────────────────────────────────────────────────────

pub static GET_SERVICE: CommandDescriptor = CommandDescriptor {
    name: "get-service",
    legacy_name: "Get-ECSService",
    operation: "DescribeServices",
    about: "Describes the specified services running in a cluster",
    params: &[
        CLUSTER,
        ParamSpec::new("Service", ParamType::StringList)
            .required()
            .aliases(&["Services"])
            .pipeline(),
        ParamSpec::new("Include", ParamType::StringList).help("TAGS"),
    ],
    default_select: "*",
    confirm: None,
};

#[derive(Debug, Default, Serialize)]
pub struct DescribeServicesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DescribeServicesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<Service>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failures: Option<Vec<Failure>>,
}

projection! {
    pub enum DescribeServicesField for DescribeServicesResponse {
        Services => services,
        Failures => failures,
    }
}

pub struct DescribeServices;

impl Operation for DescribeServices {
    type Request = DescribeServicesRequest;
    type Response = DescribeServicesResponse;
    type Field = DescribeServicesField;

    fn descriptor() -> &'static CommandDescriptor {
        &GET_SERVICE
    }

    fn assemble(ctx: &Context) -> Result<DescribeServicesRequest, BindError> {
        Ok(DescribeServicesRequest {
            cluster: ctx.string("Cluster"),
            services: ctx.strings("Service"),
            include: ctx.strings("Include"),
        })
    }
}

// ── get-cluster-service ─────────────────────────────────────────────────

pub static GET_CLUSTER_SERVICE: CommandDescriptor = CommandDescriptor {
    name: "get-cluster-service",
    legacy_name: "Get-ECSClusterService",
    operation: "ListServices",
    about: "Returns a list of services in a cluster",
    params: &[
        CLUSTER.pipeline(),
        LAUNCH_TYPE,
        SCHEDULING_STRATEGY,
        MAX_RESULT,
        params::NEXT_TOKEN,
    ],
    default_select: "ServiceArns",
    confirm: None,
};

#[derive(Debug, Default, Serialize)]
pub struct ListServicesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(rename = "launchType", skip_serializing_if = "Option::is_none")]
    pub launch_type: Option<String>,
    #[serde(rename = "schedulingStrategy", skip_serializing_if = "Option::is_none")]
    pub scheduling_strategy: Option<String>,
    #[serde(rename = "nextToken", skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(rename = "maxResults", skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListServicesResponse {
    #[serde(rename = "serviceArns", skip_serializing_if = "Option::is_none")]
    pub service_arns: Option<Vec<String>>,
    #[serde(rename = "nextToken", skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

projection! {
    pub enum ListServicesField for ListServicesResponse {
        ServiceArns => service_arns,
        NextToken => next_token,
    }
}

pub struct ListServices;

impl Operation for ListServices {
    type Request = ListServicesRequest;
    type Response = ListServicesResponse;
    type Field = ListServicesField;

    fn descriptor() -> &'static CommandDescriptor {
        &GET_CLUSTER_SERVICE
    }

    fn assemble(ctx: &Context) -> Result<ListServicesRequest, BindError> {
        Ok(ListServicesRequest {
            cluster: ctx.string("Cluster"),
            launch_type: ctx.string("LaunchType"),
            scheduling_strategy: ctx.string("SchedulingStrategy"),
            next_token: ctx.string("NextToken"),
            max_results: ctx.int("MaxResult"),
        })
    }

    fn next_token(response: &ListServicesResponse) -> Option<&str> {
        response.next_token.as_deref()
    }

    fn set_next_token(request: &mut ListServicesRequest, token: String) {
        request.next_token = Some(token);
    }

    fn append_page(into: &mut ListServicesResponse, page: ListServicesResponse) {
        append_list(&mut into.service_arns, page.service_arns);
        into.next_token = page.next_token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assembled, context, run, Recorder};
    use ecsctl_binding::{CommandError, ContextBuilder};
    use serde_json::json;

    const SVC1: &[(&str, &str)] = &[
        ("ServiceName", "svc1"),
        ("Cluster", "default"),
        ("DesiredCount", "2"),
    ];

    fn create_reply() -> serde_json::Value {
        json!({
            "service": {
                "serviceArn": "arn:aws:ecs:us-east-1:123456789012:service/default/svc1",
                "serviceName": "svc1",
                "clusterArn": "arn:aws:ecs:us-east-1:123456789012:cluster/default",
                "status": "ACTIVE",
                "desiredCount": 2,
                "runningCount": 0,
                "createdAt": 1_700_000_000.123,
                "deployments": [{"id": "ecs-svc/1", "status": "PRIMARY"}],
            }
        })
    }

    #[test]
    fn minimal_request_has_only_bound_members() {
        let ctx = context::<CreateService>(SVC1);
        let request = CreateService::assemble(&ctx).unwrap();
        assert!(request.deployment_configuration.is_none());
        assert!(request.network_configuration.is_none());
        assert!(request.service_connect_configuration.is_none());
        assert!(request.deployment_controller.is_none());

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({"serviceName": "svc1", "cluster": "default", "desiredCount": 2})
        );
        assert_eq!(body.as_object().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn whole_response_and_service_projection() {
        let t = Recorder::replying(&[create_reply(), create_reply()]);

        let whole = run::<CreateService>(&t, SVC1, Some("*")).await.unwrap();
        assert_eq!(whole, create_reply());

        let service = run::<CreateService>(&t, SVC1, None).await.unwrap();
        assert_eq!(service, create_reply()["service"]);

        let sent = t.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, "CreateService");
        assert_eq!(
            sent[0].1,
            json!({"serviceName": "svc1", "cluster": "default", "desiredCount": 2})
        );
    }

    #[tokio::test]
    async fn select_echoes_bound_parameter() {
        let t = Recorder::replying(&[create_reply()]);
        let out = run::<CreateService>(&t, SVC1, Some("^ServiceName")).await.unwrap();
        assert_eq!(out, json!("svc1"));
    }

    #[test]
    fn partial_deployment_configuration_is_sent_as_is() {
        let body = assembled::<CreateService>(&[
            ("ServiceName", "svc1"),
            ("DeploymentConfiguration_MaximumPercent", "200"),
            ("DeploymentCircuitBreaker_Enable", "true"),
        ]);
        assert_eq!(
            body["deploymentConfiguration"],
            json!({"maximumPercent": 200, "deploymentCircuitBreaker": {"enable": true}})
        );
        assert!(body.get("networkConfiguration").is_none());
    }

    #[test]
    fn struct_list_elements_use_wire_member_names() {
        let body = assembled::<CreateService>(&[
            ("ServiceName", "svc1"),
            (
                "LoadBalancer",
                r#"{"targetGroupArn":"arn:tg","containerName":"web","containerPort":80}"#,
            ),
            ("PlacementConstraint", r#"{"type":"memberOf","expression":"attribute:ecs.az == us-east-1a"}"#),
        ]);
        assert_eq!(
            body["loadBalancers"],
            json!([{"targetGroupArn": "arn:tg", "containerName": "web", "containerPort": 80}])
        );
        assert_eq!(
            body["placementConstraints"],
            json!([{"type": "memberOf", "expression": "attribute:ecs.az == us-east-1a"}])
        );
    }

    #[tokio::test]
    async fn mistyped_struct_keys_fail_before_sending() {
        let t = Recorder::replying(&[create_reply()]);
        let err = run::<CreateService>(
            &t,
            &[
                ("ServiceName", "svc1"),
                (
                    "LoadBalancer",
                    r#"{"TargetGroupArn":"arn:tg","ContainerName":"web","ContainerPort":80}"#,
                ),
            ],
            None,
        )
        .await
        .unwrap_err();

        match err {
            CommandError::Bind(BindError::MalformedStruct { param, source }) => {
                assert_eq!(param, "LoadBalancer");
                assert!(source.to_string().contains("TargetGroupArn"), "{source}");
            }
            other => panic!("expected a malformed struct, got {other:?}"),
        }
        assert!(t.sent().is_empty());

        let ctx = context::<CreateService>(&[("PlacementConstraint", r#"{"Type":"memberOf"}"#)]);
        assert!(matches!(
            CreateService::assemble(&ctx),
            Err(BindError::MalformedStruct { .. })
        ));
    }

    #[test]
    fn alarms_sibling_stays_absent() {
        let body = assembled::<CreateService>(&[("Alarms_AlarmName", "cpu-high,mem-high")]);
        assert_eq!(
            body["deploymentConfiguration"],
            json!({"alarms": {"alarmNames": ["cpu-high", "mem-high"]}})
        );
    }

    #[test]
    fn legacy_network_aliases_fill_awsvpc() {
        let body = assembled::<CreateService>(&[
            ("Subnet", "subnet-1"),
            ("Subnet", "subnet-2"),
            ("AssignPublicIp", "enabled"),
            ("LaunchType", "fargate"),
        ]);
        assert_eq!(
            body["networkConfiguration"],
            json!({"awsvpcConfiguration": {"subnets": ["subnet-1", "subnet-2"], "assignPublicIp": "ENABLED"}})
        );
        assert_eq!(body["launchType"], "FARGATE");
    }

    #[test]
    fn service_connect_with_log_options() {
        let body = assembled::<CreateService>(&[
            ("ServiceConnectConfiguration_Enabled", "true"),
            ("LogConfiguration_LogDriver", "awslogs"),
            ("LogConfiguration_Option", "awslogs-group=/ecs/svc"),
            (
                "ServiceConnectConfiguration_Service",
                r#"{"portName":"http","clientAliases":[{"port":80}]}"#,
            ),
        ]);
        assert_eq!(
            body["serviceConnectConfiguration"],
            json!({
                "enabled": true,
                "services": [{"portName": "http", "clientAliases": [{"port": 80}]}],
                "logConfiguration": {"logDriver": "awslogs", "options": {"awslogs-group": "/ecs/svc"}},
            })
        );
    }

    #[test]
    fn managed_tags_use_service_casing() {
        let body = assembled::<CreateService>(&[
            ("EnableECSManagedTags", "yes"),
            ("Tag", "team=core"),
            ("PropagateTags", "service"),
        ]);
        assert_eq!(body["enableECSManagedTags"], true);
        assert_eq!(body["tags"], json!([{"key": "team", "value": "core"}]));
        assert_eq!(body["propagateTags"], "SERVICE");
    }

    #[test]
    fn caller_collections_are_copied() {
        let mut subnets = vec!["subnet-a".to_string()];
        let mut builder = ContextBuilder::new(&NEW_SERVICE);
        builder.bind_strings("Subnet", &subnets).unwrap();
        let ctx = builder.finish();
        subnets.push("subnet-b".to_string());
        subnets[0] = "changed".to_string();

        let request = CreateService::assemble(&ctx).unwrap();
        let vpc = request
            .network_configuration
            .and_then(|n| n.awsvpc_configuration)
            .unwrap();
        assert_eq!(vpc.subnets, Some(vec!["subnet-a".to_string()]));
    }

    #[test]
    fn missing_service_name_only_warns() {
        let ctx = context::<CreateService>(&[("Cluster", "default")]);
        assert!(ctx.warnings().iter().any(|w| w.contains("ServiceName")));
        let body = serde_json::to_value(CreateService::assemble(&ctx).unwrap()).unwrap();
        assert_eq!(body, json!({"cluster": "default"}));
    }

    #[test]
    fn update_reuses_nested_groups() {
        let body = assembled::<UpdateService>(&[
            ("Service", "svc1"),
            ("ForceNewDeployment", "true"),
            ("SecurityGroup", "sg-1"),
        ]);
        assert_eq!(
            body,
            json!({
                "service": "svc1",
                "forceNewDeployment": true,
                "networkConfiguration": {"awsvpcConfiguration": {"securityGroups": ["sg-1"]}},
            })
        );
    }

    #[tokio::test]
    async fn list_services_pages() {
        let t = Recorder::replying(&[
            json!({"serviceArns": ["s1", "s2"], "nextToken": "p2"}),
            json!({"serviceArns": ["s3"]}),
        ]);
        let out = run::<ListServices>(&t, &[("Cluster", "prod")], None).await.unwrap();
        assert_eq!(out, json!(["s1", "s2", "s3"]));
        assert_eq!(t.sent()[1].1, json!({"cluster": "prod", "nextToken": "p2"}));
    }
}
