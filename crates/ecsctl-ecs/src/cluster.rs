//! Cluster commands: CreateCluster, DeleteCluster, DescribeClusters, ListClusters.

use crate::params;
use crate::shapes::{
    append_list, tags_from_map, CapacityProviderStrategyItem, Cluster, Failure, KeyValuePair, Tag,
    EXECUTE_COMMAND_LOGGING,
};
use ecsctl_binding::{
    nested, projection, BindError, CommandDescriptor, ConfirmSpec, Context, Operation, ParamSpec,
    ParamType,
};
use serde::{Deserialize, Serialize};

// ── new-cluster ─────────────────────────────────────────────────────────

pub static NEW_CLUSTER: CommandDescriptor = CommandDescriptor {
    name: "new-cluster",
    legacy_name: "New-ECSCluster",
    operation: "CreateCluster",
    about: "Creates a new Amazon ECS cluster",
    params: &[
        ParamSpec::new("ClusterName", ParamType::String)
            .pipeline()
            .help("Name of the cluster; ECS uses 'default' when omitted"),
        ParamSpec::new("CapacityProvider", ParamType::StringList).aliases(&["CapacityProviders"]),
        ParamSpec::new("DefaultCapacityProviderStrategy", ParamType::StructList)
            .help("JSON {\"capacityProvider\":..,\"weight\":..,\"base\":..}"),
        ParamSpec::new("Setting", ParamType::StructList)
            .aliases(&["Settings"])
            .help("JSON {\"name\":\"containerInsights\",\"value\":\"enabled\"}"),
        params::TAG,
        ParamSpec::new("Configuration_ExecuteCommandConfiguration_KmsKeyId", ParamType::String)
            .aliases(&["ExecuteCommandConfiguration_KmsKeyId"]),
        ParamSpec::new(
            "Configuration_ExecuteCommandConfiguration_Logging",
            ParamType::Enum(EXECUTE_COMMAND_LOGGING),
        )
        .aliases(&["ExecuteCommandConfiguration_Logging"]),
        ParamSpec::new("LogConfiguration_CloudWatchEncryptionEnabled", ParamType::Boolean),
        ParamSpec::new("LogConfiguration_CloudWatchLogGroupName", ParamType::String),
        ParamSpec::new("LogConfiguration_S3BucketName", ParamType::String),
        ParamSpec::new("LogConfiguration_S3EncryptionEnabled", ParamType::Boolean),
        ParamSpec::new("LogConfiguration_S3KeyPrefix", ParamType::String),
        ParamSpec::new("ServiceConnectDefaults_Namespace", ParamType::String),
    ],
    default_select: "Cluster",
    confirm: Some(ConfirmSpec {
        targets: &["ClusterName"],
    }),
};

#[derive(Debug, Default, Serialize)]
pub struct CreateClusterRequest {
    #[serde(rename = "clusterName", skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Vec<KeyValuePair>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<ClusterConfiguration>,
    #[serde(rename = "capacityProviders", skip_serializing_if = "Option::is_none")]
    pub capacity_providers: Option<Vec<String>>,
    #[serde(
        rename = "defaultCapacityProviderStrategy",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_capacity_provider_strategy: Option<Vec<CapacityProviderStrategyItem>>,
    #[serde(rename = "serviceConnectDefaults", skip_serializing_if = "Option::is_none")]
    pub service_connect_defaults: Option<ServiceConnectDefaults>,
}

#[derive(Debug, Default, Serialize)]
pub struct ClusterConfiguration {
    #[serde(rename = "executeCommandConfiguration", skip_serializing_if = "Option::is_none")]
    pub execute_command_configuration: Option<ExecuteCommandConfiguration>,
}

#[derive(Debug, Default, Serialize)]
pub struct ExecuteCommandConfiguration {
    #[serde(rename = "kmsKeyId", skip_serializing_if = "Option::is_none")]
    pub kms_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<String>,
    #[serde(rename = "logConfiguration", skip_serializing_if = "Option::is_none")]
    pub log_configuration: Option<ExecuteCommandLogConfiguration>,
}

#[derive(Debug, Default, Serialize)]
pub struct ExecuteCommandLogConfiguration {
    #[serde(rename = "cloudWatchLogGroupName", skip_serializing_if = "Option::is_none")]
    pub cloud_watch_log_group_name: Option<String>,
    #[serde(rename = "cloudWatchEncryptionEnabled", skip_serializing_if = "Option::is_none")]
    pub cloud_watch_encryption_enabled: Option<bool>,
    #[serde(rename = "s3BucketName", skip_serializing_if = "Option::is_none")]
    pub s3_bucket_name: Option<String>,
    #[serde(rename = "s3EncryptionEnabled", skip_serializing_if = "Option::is_none")]
    pub s3_encryption_enabled: Option<bool>,
    #[serde(rename = "s3KeyPrefix", skip_serializing_if = "Option::is_none")]
    pub s3_key_prefix: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct ServiceConnectDefaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Reply of CreateCluster and DeleteCluster.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ClusterResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<Cluster>,
}

projection! {
    pub enum ClusterField for ClusterResponse {
        Cluster => cluster,
    }
}

pub struct CreateCluster;

impl Operation for CreateCluster {
    type Request = CreateClusterRequest;
    type Response = ClusterResponse;
    type Field = ClusterField;

    fn descriptor() -> &'static CommandDescriptor {
        &NEW_CLUSTER
    }

    fn assemble(ctx: &Context) -> Result<CreateClusterRequest, BindError> {
        let configuration = nested::<ClusterConfiguration>(|config| {
            let exec = nested::<ExecuteCommandConfiguration>(|exec| {
                let logs = nested::<ExecuteCommandLogConfiguration>(|logs| {
                    logs.set(ctx.string("LogConfiguration_CloudWatchLogGroupName"), |l, v| {
                        l.cloud_watch_log_group_name = Some(v)
                    })
                    .set(ctx.boolean("LogConfiguration_CloudWatchEncryptionEnabled"), |l, v| {
                        l.cloud_watch_encryption_enabled = Some(v)
                    })
                    .set(ctx.string("LogConfiguration_S3BucketName"), |l, v| {
                        l.s3_bucket_name = Some(v)
                    })
                    .set(ctx.boolean("LogConfiguration_S3EncryptionEnabled"), |l, v| {
                        l.s3_encryption_enabled = Some(v)
                    })
                    .set(ctx.string("LogConfiguration_S3KeyPrefix"), |l, v| {
                        l.s3_key_prefix = Some(v)
                    });
                });
                exec.set(
                    ctx.string("Configuration_ExecuteCommandConfiguration_KmsKeyId"),
                    |e, v| e.kms_key_id = Some(v),
                )
                .set(
                    ctx.string("Configuration_ExecuteCommandConfiguration_Logging"),
                    |e, v| e.logging = Some(v),
                )
                .set(logs, |e, v| e.log_configuration = Some(v));
            });
            config.set(exec, |c, v| c.execute_command_configuration = Some(v));
        });

        Ok(CreateClusterRequest {
            cluster_name: ctx.string("ClusterName"),
            tags: ctx.map("Tag").map(tags_from_map),
            settings: ctx.structs("Setting")?,
            configuration,
            capacity_providers: ctx.strings("CapacityProvider"),
            default_capacity_provider_strategy: ctx.structs("DefaultCapacityProviderStrategy")?,
            service_connect_defaults: nested::<ServiceConnectDefaults>(|d| {
                d.set(ctx.string("ServiceConnectDefaults_Namespace"), |d, v| {
                    d.namespace = Some(v)
                });
            }),
        })
    }
}

// ── remove-cluster ──────────────────────────────────────────────────────

pub static REMOVE_CLUSTER: CommandDescriptor = CommandDescriptor {
    name: "remove-cluster",
    legacy_name: "Remove-ECSCluster",
    operation: "DeleteCluster",
    about: "Deletes the specified cluster",
    params: &[ParamSpec::new("Cluster", ParamType::String)
        .required()
        .pipeline()
        .help("Short name or ARN of the cluster to delete")],
    default_select: "Cluster",
    confirm: Some(ConfirmSpec {
        targets: &["Cluster"],
    }),
};

#[derive(Debug, Default, Serialize)]
pub struct DeleteClusterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
}

pub struct DeleteCluster;

impl Operation for DeleteCluster {
    type Request = DeleteClusterRequest;
    type Response = ClusterResponse;
    type Field = ClusterField;

    fn descriptor() -> &'static CommandDescriptor {
        &REMOVE_CLUSTER
    }

    fn assemble(ctx: &Context) -> Result<DeleteClusterRequest, BindError> {
        Ok(DeleteClusterRequest {
            cluster: ctx.string("Cluster"),
        })
    }
}

// ── get-cluster-detail ──────────────────────────────────────────────────

pub static GET_CLUSTER_DETAIL: CommandDescriptor = CommandDescriptor {
    name: "get-cluster-detail",
    legacy_name: "Get-ECSClusterDetail",
    operation: "DescribeClusters",
    about: "Describes one or more clusters",
    params: &[
        ParamSpec::new("Cluster", ParamType::StringList)
            .aliases(&["Clusters"])
            .pipeline(),
        ParamSpec::new("Include", ParamType::StringList)
            .help("ATTACHMENTS, CONFIGURATIONS, SETTINGS, STATISTICS or TAGS"),
    ],
    default_select: "*",
    confirm: None,
};

#[derive(Debug, Default, Serialize)]
pub struct DescribeClustersRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clusters: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DescribeClustersResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clusters: Option<Vec<Cluster>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failures: Option<Vec<Failure>>,
}

projection! {
    pub enum DescribeClustersField for DescribeClustersResponse {
        Clusters => clusters,
        Failures => failures,
    }
}

pub struct DescribeClusters;

impl Operation for DescribeClusters {
    type Request = DescribeClustersRequest;
    type Response = DescribeClustersResponse;
    type Field = DescribeClustersField;

    fn descriptor() -> &'static CommandDescriptor {
        &GET_CLUSTER_DETAIL
    }

    fn assemble(ctx: &Context) -> Result<DescribeClustersRequest, BindError> {
        Ok(DescribeClustersRequest {
            clusters: ctx.strings("Cluster"),
            include: ctx.strings("Include"),
        })
    }
}

// ── get-cluster-list ────────────────────────────────────────────────────

pub static GET_CLUSTER_LIST: CommandDescriptor = CommandDescriptor {
    name: "get-cluster-list",
    legacy_name: "Get-ECSClusterList",
    operation: "ListClusters",
    about: "Returns a list of existing clusters",
    params: &[params::MAX_RESULT, params::NEXT_TOKEN],
    default_select: "ClusterArns",
    confirm: None,
};

#[derive(Debug, Default, Serialize)]
pub struct ListClustersRequest {
    #[serde(rename = "nextToken", skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(rename = "maxResults", skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListClustersResponse {
    #[serde(rename = "clusterArns", skip_serializing_if = "Option::is_none")]
    pub cluster_arns: Option<Vec<String>>,
    #[serde(rename = "nextToken", skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

projection! {
    pub enum ListClustersField for ListClustersResponse {
        ClusterArns => cluster_arns,
        NextToken => next_token,
    }
}

pub struct ListClusters;

impl Operation for ListClusters {
    type Request = ListClustersRequest;
    type Response = ListClustersResponse;
    type Field = ListClustersField;

    fn descriptor() -> &'static CommandDescriptor {
        &GET_CLUSTER_LIST
    }

    fn assemble(ctx: &Context) -> Result<ListClustersRequest, BindError> {
        Ok(ListClustersRequest {
            next_token: ctx.string("NextToken"),
            max_results: ctx.int("MaxResult"),
        })
    }

    fn next_token(response: &ListClustersResponse) -> Option<&str> {
        response.next_token.as_deref()
    }

    fn set_next_token(request: &mut ListClustersRequest, token: String) {
        request.next_token = Some(token);
    }

    fn append_page(into: &mut ListClustersResponse, page: ListClustersResponse) {
        append_list(&mut into.cluster_arns, page.cluster_arns);
        into.next_token = page.next_token;
    }
}
