//! The signed JSON transport against a local HTTP endpoint.

mod common;

use axum::http::StatusCode;
use common::{FakeEcs, REQUEST_ID};
use ecsctl_aws::{AwsCredentials, AwsError, AwsRegion, EcsTransport, SdkConfig};
use ecsctl_binding::{
    execute, invoke, AssumeYes, ContextBuilder, InvokeError, InvokeOptions, Outcome, Session,
    StopSignal, Transport, TransportError,
};
use ecsctl_ecs::service::CreateService;
use serde_json::json;
use std::time::{Duration, Instant};

fn transport(endpoint: &str) -> EcsTransport {
    let mut config = SdkConfig::new(
        AwsRegion::new("us-east-1"),
        AwsCredentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY", None, "test"),
    );
    config.endpoint_url = Some(endpoint.to_string());
    EcsTransport::new(&config).unwrap()
}

#[tokio::test]
async fn posts_signed_json_with_target() {
    let server = FakeEcs::start(|_, _| (StatusCode::OK, json!({"clusterArns": ["arn:c/1"]}))).await;
    let t = transport(&server.url);

    let raw = t.send("ListClusters", r#"{"maxResults":5}"#.into()).await.unwrap();
    assert_eq!(serde_json::from_str::<serde_json::Value>(&raw).unwrap()["clusterArns"][0], "arn:c/1");

    let calls = server.calls();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.target, "AmazonEC2ContainerServiceV20141113.ListClusters");
    assert_eq!(call.content_type, "application/x-amz-json-1.1");
    assert!(call
        .authorization
        .starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
    assert!(call.authorization.contains("/us-east-1/ecs/aws4_request"));
    assert!(call.authorization.contains("SignedHeaders=content-type;host;x-amz-date;x-amz-target"));
    assert_eq!(call.host, server.url.trim_start_matches("http://"));
    assert_eq!(call.body, json!({"maxResults": 5}));
}

#[tokio::test]
async fn error_reply_becomes_aws_error() {
    let server = FakeEcs::start(|_, _| {
        (
            StatusCode::BAD_REQUEST,
            json!({
                "__type": "com.amazonaws.ecs#ClusterNotFoundException",
                "message": "Cluster not found.",
            }),
        )
    })
    .await;
    let t = transport(&server.url);

    let err = t.send("DescribeServices", "{}".into()).await.unwrap_err();
    let source = match err {
        TransportError::Remote(source) => source,
        other => panic!("expected a remote error, got {other:?}"),
    };
    let aws = source.downcast_ref::<AwsError>().unwrap();
    assert_eq!(aws.code, "ClusterNotFoundException");
    assert_eq!(aws.message, "Cluster not found.");
    assert_eq!(aws.status_code, 400);
    assert_eq!(aws.request_id.as_deref(), Some(REQUEST_ID));
}

#[tokio::test]
async fn new_service_end_to_end_over_http() {
    let server = FakeEcs::start(|_, body| {
        (
            StatusCode::OK,
            json!({"service": {
                "serviceName": body["serviceName"],
                "desiredCount": body["desiredCount"],
                "status": "ACTIVE",
                "loadBalancers": [],
            }}),
        )
    })
    .await;
    let t = transport(&server.url);
    let stop = StopSignal::new();

    let mut bindings = ContextBuilder::new(&ecsctl_ecs::service::NEW_SERVICE);
    bindings
        .bind_text("ServiceName", "svc1")
        .unwrap()
        .bind_text("Cluster", "default")
        .unwrap()
        .bind_text("DesiredCount", "2")
        .unwrap();
    let options = InvokeOptions {
        force: true,
        ..Default::default()
    };
    let session = Session {
        transport: &t,
        confirmer: &AssumeYes,
        stop: &stop,
    };
    let out = execute::<CreateService>(bindings, &options, session).await.unwrap();

    assert_eq!(
        out,
        Outcome::Output(json!({
            "serviceName": "svc1",
            "desiredCount": 2,
            "status": "ACTIVE",
            "loadBalancers": [],
        }))
    );
    assert_eq!(
        server.calls()[0].body,
        json!({"serviceName": "svc1", "cluster": "default", "desiredCount": 2})
    );
}

#[tokio::test]
async fn stop_abandons_a_slow_call() {
    let server = FakeEcs::slow(Duration::from_secs(30)).await;
    let t = transport(&server.url);
    let stop = StopSignal::new();

    let trigger = stop.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.stop();
    });

    let started = Instant::now();
    let err = invoke(&t, "ListClusters", "{}".into(), &stop).await.unwrap_err();
    assert!(matches!(err, InvokeError::Cancelled { .. }));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(!stop.stop());
}

#[tokio::test]
async fn unresolvable_host_is_a_name_resolution_failure() {
    let endpoint = "http://no-such-host.invalid";
    let t = transport(endpoint);
    let stop = StopSignal::new();

    let err = invoke(&t, "ListClusters", "{}".into(), &stop).await.unwrap_err();
    let source = match &err {
        InvokeError::NameResolution { endpoint: named, source } => {
            assert_eq!(named, endpoint);
            source
        }
        other => panic!("expected a name resolution failure, got {other:?}"),
    };
    assert!(err.to_string().contains(endpoint));
    let aws = source.downcast_ref::<AwsError>().unwrap();
    assert!(aws.is_name_resolution());
    assert_eq!(aws.action.as_deref(), Some("ListClusters"));
}
