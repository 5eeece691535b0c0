//! Compute manager tests against the in-memory cloud.
//!
//! Covers the instance type allow-list, the instance quota, mandatory
//! tagging, creator filtering and the owner check on termination.

mod common;

use common::*;
use platform_cli::compute::{MAX_INSTANCES, IMAGE_PARAMETER};
use platform_cli::error::Error;
use platform_cli::provider::InstanceState;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_create_rejects_type_before_any_remote_call() {
    let cloud = FakeCloud::new();
    let platform = platform(&cloud);

    let err = platform
        .compute
        .create("web", "my-key", "t3.large")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InstanceTypeNotAllowed { .. }));
    assert!(err.to_string().contains("t3.micro, t3.small"));
    assert_eq!(cloud.call_count(), 0);
}

#[tokio::test]
async fn test_create_attaches_governance_tags() {
    let cloud = FakeCloud::new();
    let platform = platform(&cloud);

    let launched = platform
        .compute
        .create("web", "my-key", "t3.small")
        .await
        .unwrap();

    assert_eq!(launched.image_id, FAKE_IMAGE_ID);
    let instance = cloud.instance(&launched.instance_id).unwrap();
    assert_eq!(instance.instance_type, "t3.small");
    assert_eq!(instance.tags.get("Name"), Some("web"));
    assert_eq!(instance.tags.get("CreatedBy"), Some("platform-cli"));
    assert_eq!(instance.tags.get("Owner"), Some("student"));
    assert_eq!(cloud.count_calls("RunInstances"), 1);
}

#[tokio::test]
async fn test_create_without_image_fails() {
    let cloud = FakeCloud::new();
    *cloud.image_id.write() = None;
    let platform = platform(&cloud);

    let err = platform
        .compute
        .create("web", "my-key", "t3.micro")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ImageNotFound(ref p) if p == IMAGE_PARAMETER));
    assert_eq!(cloud.count_calls("RunInstances"), 0);
}

#[tokio::test]
async fn test_quota_refuses_third_instance() {
    let cloud = FakeCloud::new();
    let platform = platform(&cloud);

    for name in ["one", "two"] {
        platform.compute.create(name, "k", "t3.micro").await.unwrap();
    }

    let err = platform
        .compute
        .create("three", "k", "t3.micro")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::QuotaExceeded { limit, current } if limit == MAX_INSTANCES && current == 2
    ));
    assert_eq!(cloud.count_calls("RunInstances"), 2);
}

#[tokio::test]
async fn test_quota_ignores_terminated_and_foreign_instances() {
    let cloud = FakeCloud::new();
    cloud.seed_instance("i-old", InstanceState::Terminated, managed_tags());
    cloud.seed_instance("i-gone", InstanceState::ShuttingDown, managed_tags());
    cloud.seed_instance("i-ops1", InstanceState::Running, foreign_tags());
    cloud.seed_instance("i-ops2", InstanceState::Running, foreign_tags());
    cloud.seed_instance("i-mine", InstanceState::Stopped, managed_tags());
    let platform = platform(&cloud);

    assert!(platform.compute.create("web", "k", "t3.micro").await.is_ok());
}

#[tokio::test]
async fn test_list_shows_only_managed_live_instances() {
    let cloud = FakeCloud::new();
    cloud.seed_instance("i-mine", InstanceState::Running, managed_tags());
    cloud.seed_instance("i-done", InstanceState::Terminated, managed_tags());
    cloud.seed_instance("i-ops", InstanceState::Running, foreign_tags());
    let platform = platform(&cloud);

    let ids: Vec<String> = platform
        .compute
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.instance_id)
        .collect();

    assert_eq!(ids, vec!["i-mine".to_string()]);
}

#[tokio::test]
async fn test_stop_and_start_managed_instance() {
    let cloud = FakeCloud::new();
    cloud.seed_instance("i-mine", InstanceState::Running, managed_tags());
    let platform = platform(&cloud);

    platform.compute.stop("i-mine").await.unwrap();
    assert_eq!(cloud.instance("i-mine").unwrap().state, InstanceState::Stopped);

    platform.compute.start("i-mine").await.unwrap();
    assert_eq!(cloud.instance("i-mine").unwrap().state, InstanceState::Running);
}

#[tokio::test]
async fn test_lifecycle_refuses_unmanaged_instance() {
    let cloud = FakeCloud::new();
    cloud.seed_instance("i-ops", InstanceState::Running, foreign_tags());
    let platform = platform(&cloud);

    let stop = platform.compute.stop("i-ops").await.unwrap_err();
    let start = platform.compute.start("i-ops").await.unwrap_err();
    let terminate = platform.compute.terminate("i-ops").await.unwrap_err();

    for err in [stop, start, terminate] {
        assert!(matches!(err, Error::NotManaged { .. }), "{:?}", err);
    }
    assert_eq!(cloud.instance("i-ops").unwrap().state, InstanceState::Running);
    assert_eq!(cloud.count_calls("StopInstances"), 0);
    assert_eq!(cloud.count_calls("StartInstances"), 0);
    assert_eq!(cloud.count_calls("TerminateInstances"), 0);
}

#[tokio::test]
async fn test_missing_instance_is_not_found() {
    let cloud = FakeCloud::new();
    let platform = platform(&cloud);

    let err = platform.compute.stop("i-missing").await.unwrap_err();
    assert!(matches!(err, Error::InstanceNotFound(ref id) if id == "i-missing"));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_terminate_owned_instance() {
    let cloud = FakeCloud::new();
    let platform = platform(&cloud);
    let launched = platform.compute.create("web", "k", "t3.micro").await.unwrap();

    platform.compute.terminate(&launched.instance_id).await.unwrap();

    assert_eq!(
        cloud.instance(&launched.instance_id).unwrap().state,
        InstanceState::Terminated
    );
    assert!(platform.compute.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_terminate_refuses_other_owner() {
    let cloud = FakeCloud::new();
    cloud.seed_instance(
        "i-alice",
        InstanceState::Running,
        platform_cli::governance::ResourceTags::from_pairs([
            ("CreatedBy", "platform-cli"),
            ("Owner", "alice"),
        ]),
    );
    let platform = platform(&cloud);

    let err = platform.compute.terminate("i-alice").await.unwrap_err();

    match err {
        Error::OwnershipMismatch { expected, actual, .. } => {
            assert_eq!(expected, "student");
            assert_eq!(actual, "alice");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(cloud.count_calls("TerminateInstances"), 0);

    // stop is not owner-restricted
    assert!(platform.compute.stop("i-alice").await.is_ok());
}

#[tokio::test]
async fn test_owner_comes_from_config() {
    let cloud = FakeCloud::new();
    let mut config = platform_cli::config::Config::default();
    config.tags.owner = "alice".to_string();
    let platform = platform_with(&cloud, &config);

    let launched = platform.compute.create("web", "k", "t3.micro").await.unwrap();

    let instance = cloud.instance(&launched.instance_id).unwrap();
    assert_eq!(instance.tags.owner(), Some("alice"));
}
