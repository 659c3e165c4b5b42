mod common;

use chrono::{TimeZone, Utc};
use common::*;
use scan_transfer::core::handler::ALERT_SUBJECT;
use scan_transfer::core::CopyAcl;
use scan_transfer::{HandlerConfig, Outcome, Plan, ScanEvent};

fn landing_time() -> chrono::DateTime<Utc> {
    Utc.timestamp_opt(1_718_000_000, 0).unwrap()
}

#[tokio::test]
async fn clean_file_is_copied_to_supplier_target() {
    let h = harness(
        MapSecrets::with(&[("ingestion/sftp/acme/target-bucket", "acme-landing/raw/inbound")]),
        test_config(),
    );

    let response = h
        .handler
        .handle_value(
            scan_event("COMPLETED", Some("NO_THREATS_FOUND"), "ingestion-upload", "acme/2024/06/sales.csv"),
            landing_time(),
        )
        .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.body,
        "\"Successfully processed scan status: COMPLETED, result: NO_THREATS_FOUND\""
    );
    assert_eq!(
        h.store.calls(),
        vec![StoreCall::Copy {
            from: ("ingestion-upload".to_string(), "acme/2024/06/sales.csv".to_string()),
            to: ("acme-landing".to_string(), "raw/inbound/sales.csv".to_string()),
            acl: CopyAcl::BucketOwnerFullControl,
        }]
    );
    assert!(h.notifier.published().is_empty());
}

#[tokio::test]
async fn target_without_prefix_keeps_original_key() {
    let h = harness(
        MapSecrets::with(&[("ingestion/sftp/acme/target-bucket", "acme-landing")]),
        test_config(),
    );
    let event = ScanEvent::from_value(scan_event(
        "COMPLETED",
        Some("NO_THREATS_FOUND"),
        "ingestion-upload",
        "acme/nested/sales.csv",
    ))
    .unwrap();

    let outcome = h.handler.handle(&event, landing_time()).await.unwrap();

    assert_eq!(
        outcome,
        Outcome::Transferred {
            source_bucket: "ingestion-upload".to_string(),
            source_key: "acme/nested/sales.csv".to_string(),
            target_bucket: "acme-landing".to_string(),
            target_key: "acme/nested/sales.csv".to_string(),
        }
    );
}

#[tokio::test]
async fn timestamped_supplier_gets_landing_partition() {
    let h = harness(
        MapSecrets::with(&[("ingestion/sftp/essex-police/target-bucket", "police-landing/essex")]),
        test_config(),
    );
    let event = ScanEvent::from_value(scan_event(
        "COMPLETED",
        Some("NO_THREATS_FOUND"),
        "ingestion-upload",
        "essex-police/uploads/incidents.json",
    ))
    .unwrap();

    let outcome = h.handler.handle(&event, landing_time()).await.unwrap();

    match outcome {
        Outcome::Transferred { target_key, .. } => assert_eq!(
            target_key,
            "essex/file_land_timestamp=1718000000/incidents.json"
        ),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn source_is_deleted_when_configured() {
    let config = HandlerConfig {
        delete_source_after_transfer: true,
        ..test_config()
    };
    let h = harness(
        MapSecrets::with(&[("ingestion/sftp/acme/target-bucket", "acme-landing/raw")]),
        config,
    );
    let event = ScanEvent::from_value(scan_event(
        "COMPLETED",
        Some("NO_THREATS_FOUND"),
        "ingestion-upload",
        "acme/sales.csv",
    ))
    .unwrap();

    h.handler.handle(&event, landing_time()).await.unwrap();

    let calls = h.store.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[1],
        StoreCall::Delete {
            bucket: "ingestion-upload".to_string(),
            key: "acme/sales.csv".to_string(),
        }
    );
}

#[tokio::test]
async fn infected_file_is_quarantined_and_reported() {
    let h = harness(MapSecrets::default(), test_config());

    let response = h
        .handler
        .handle_value(
            scan_event("COMPLETED", Some("THREATS_FOUND"), "ingestion-upload", "acme/invoice.pdf"),
            landing_time(),
        )
        .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(
        h.store.calls(),
        vec![
            StoreCall::Copy {
                from: ("ingestion-upload".to_string(), "acme/invoice.pdf".to_string()),
                to: ("ingestion-quarantine".to_string(), "acme/invoice.pdf".to_string()),
                acl: CopyAcl::Inherit,
            },
            StoreCall::Delete {
                bucket: "ingestion-upload".to_string(),
                key: "acme/invoice.pdf".to_string(),
            },
        ]
    );

    let published = h.notifier.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].topic, TOPIC_ARN);
    assert_eq!(published[0].subject, ALERT_SUBJECT);
    assert!(published[0].message.contains("'acme/invoice.pdf'"));
    assert!(published[0]
        .message
        .contains("https://github.com/ministryofjustice/data-platform-support/issues"));
}

#[tokio::test]
async fn quarantine_without_bucket_moves_nothing() {
    let config = HandlerConfig {
        quarantine_bucket: None,
        ..test_config()
    };
    let h = harness(MapSecrets::default(), config);

    let response = h
        .handler
        .handle_value(
            scan_event("COMPLETED", Some("THREATS_FOUND"), "ingestion-upload", "acme/invoice.pdf"),
            landing_time(),
        )
        .await;

    assert_eq!(response.status_code, 500);
    assert!(response.body.contains("QUARANTINE_BUCKET"));
    assert!(h.store.calls().is_empty());
    assert!(h.notifier.published().is_empty());
}

#[tokio::test]
async fn unscanned_statuses_leave_object_in_place() {
    for status in ["ACCESS_DENIED", "FAILED", "UNSUPPORTED"] {
        let h = harness(MapSecrets::default(), test_config());
        let event =
            ScanEvent::from_value(scan_event(status, None, "ingestion-upload", "acme/big.iso"))
                .unwrap();

        let outcome = h.handler.handle(&event, landing_time()).await.unwrap();

        assert_eq!(
            outcome,
            Outcome::Unscanned {
                status: status.to_string(),
                bucket: Some("ingestion-upload".to_string()),
                key: Some("acme/big.iso".to_string()),
            }
        );
        assert!(h.store.calls().is_empty());
    }
}

#[tokio::test]
async fn unknown_result_status_is_ignored() {
    let h = harness(MapSecrets::default(), test_config());

    let response = h
        .handler
        .handle_value(
            scan_event("COMPLETED", Some("SOMETHING_NEW"), "ingestion-upload", "acme/a.csv"),
            landing_time(),
        )
        .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.body,
        "\"Successfully processed scan status: COMPLETED, result: SOMETHING_NEW\""
    );
    assert!(h.store.calls().is_empty());
}

#[tokio::test]
async fn key_without_supplier_is_an_error_response() {
    let h = harness(MapSecrets::default(), test_config());

    let response = h
        .handler
        .handle_value(
            scan_event("COMPLETED", Some("NO_THREATS_FOUND"), "ingestion-upload", "loose-file.csv"),
            landing_time(),
        )
        .await;

    assert_eq!(response.status_code, 500);
    assert!(response.body.starts_with("\"Error processing event: "));
    assert!(response.body.contains("loose-file.csv"));
}

#[tokio::test]
async fn missing_target_secret_is_an_error_response() {
    let h = harness(MapSecrets::default(), test_config());

    let response = h
        .handler
        .handle_value(
            scan_event("COMPLETED", Some("NO_THREATS_FOUND"), "ingestion-upload", "acme/a.csv"),
            landing_time(),
        )
        .await;

    assert_eq!(response.status_code, 500);
    assert!(response.body.contains("ingestion/sftp/acme/target-bucket"));
    assert!(h.store.calls().is_empty());
}

#[tokio::test]
async fn failing_copy_is_an_error_response() {
    let store = RecordingStore {
        fail_copies: true,
        ..RecordingStore::default()
    };
    let h = harness_with_store(
        store,
        MapSecrets::with(&[("ingestion/sftp/acme/target-bucket", "acme-landing")]),
        test_config(),
    );

    let response = h
        .handler
        .handle_value(
            scan_event("COMPLETED", Some("NO_THREATS_FOUND"), "ingestion-upload", "acme/a.csv"),
            landing_time(),
        )
        .await;

    assert_eq!(response.status_code, 500);
    assert!(response.body.contains("AccessDenied"));
}

#[tokio::test]
async fn non_object_payload_is_an_error_response() {
    let h = harness(MapSecrets::default(), test_config());

    let response = h
        .handler
        .handle_value(serde_json::json!(["not", "an", "event"]), landing_time())
        .await;

    assert_eq!(response.status_code, 500);
    assert!(h.store.calls().is_empty());
}

#[tokio::test]
async fn plan_resolves_destination_without_moving() {
    let h = harness(
        MapSecrets::with(&[("ingestion/sftp/acme/target-bucket", "acme-landing/raw")]),
        test_config(),
    );
    let clean = ScanEvent::from_value(scan_event(
        "COMPLETED",
        Some("NO_THREATS_FOUND"),
        "ingestion-upload",
        "acme/deep/a.csv",
    ))
    .unwrap();
    let infected = ScanEvent::from_value(scan_event(
        "COMPLETED",
        Some("THREATS_FOUND"),
        "ingestion-upload",
        "acme/b.exe",
    ))
    .unwrap();
    let failed =
        ScanEvent::from_value(scan_event("FAILED", None, "ingestion-upload", "acme/c")).unwrap();

    assert_eq!(
        h.handler.plan(&clean, landing_time()).await.unwrap(),
        Plan::Transfer {
            source_bucket: "ingestion-upload".to_string(),
            source_key: "acme/deep/a.csv".to_string(),
            target_bucket: "acme-landing".to_string(),
            target_key: "raw/a.csv".to_string(),
            delete_source: false,
        }
    );
    assert!(matches!(
        h.handler.plan(&infected, landing_time()).await.unwrap(),
        Plan::Quarantine { ref quarantine_bucket, .. } if quarantine_bucket == "ingestion-quarantine"
    ));
    assert!(matches!(
        h.handler.plan(&failed, landing_time()).await.unwrap(),
        Plan::Nothing { .. }
    ));
    assert!(h.store.calls().is_empty());
    assert!(h.notifier.published().is_empty());
}

fn event_without_object(field: &str, result_status: &str) -> serde_json::Value {
    let mut event = scan_event("COMPLETED", Some(result_status), "ingestion-upload", "acme/a.csv");
    event["detail"]["s3ObjectDetails"]
        .as_object_mut()
        .unwrap()
        .remove(field);
    event
}

#[tokio::test]
async fn clean_event_without_location_is_an_error_response() {
    for field in ["bucketName", "objectKey"] {
        let h = harness(
            MapSecrets::with(&[("ingestion/sftp/acme/target-bucket", "acme-landing")]),
            test_config(),
        );

        let response = h
            .handler
            .handle_value(event_without_object(field, "NO_THREATS_FOUND"), landing_time())
            .await;

        assert_eq!(response.status_code, 500);
        assert!(response.body.contains("Invalid scan event"));
        assert!(response.body.contains(field));
        assert!(h.store.calls().is_empty());
    }
}

#[tokio::test]
async fn infected_event_without_key_moves_nothing() {
    let h = harness(MapSecrets::default(), test_config());

    let response = h
        .handler
        .handle_value(event_without_object("objectKey", "THREATS_FOUND"), landing_time())
        .await;

    assert_eq!(response.status_code, 500);
    assert!(response.body.contains("s3ObjectDetails.objectKey"));
    assert!(h.store.calls().is_empty());
    assert!(h.notifier.published().is_empty());
}

#[tokio::test]
async fn quarantine_without_topic_moves_nothing() {
    let config = HandlerConfig {
        notification_topic_arn: None,
        ..test_config()
    };
    let h = harness(MapSecrets::default(), config);

    let response = h
        .handler
        .handle_value(
            scan_event("COMPLETED", Some("THREATS_FOUND"), "ingestion-upload", "acme/invoice.pdf"),
            landing_time(),
        )
        .await;

    assert_eq!(response.status_code, 500);
    assert!(response.body.contains("Missing configuration: NOTIFICATION_TOPIC_ARN"));
    assert!(h.store.calls().is_empty());
    assert!(h.notifier.published().is_empty());
}

#[tokio::test]
async fn quarantine_into_scanned_bucket_is_refused() {
    let config = HandlerConfig {
        quarantine_bucket: Some("ingestion-upload".to_string()),
        ..test_config()
    };
    let h = harness(MapSecrets::default(), config);

    let response = h
        .handler
        .handle_value(
            scan_event("COMPLETED", Some("THREATS_FOUND"), "ingestion-upload", "acme/invoice.pdf"),
            landing_time(),
        )
        .await;

    assert_eq!(response.status_code, 500);
    assert!(response.body.contains("QUARANTINE_BUCKET"));
    assert!(h.store.calls().is_empty());
    assert!(h.notifier.published().is_empty());
}

#[tokio::test]
async fn transfer_onto_source_object_is_refused() {
    let config = HandlerConfig {
        delete_source_after_transfer: true,
        ..test_config()
    };
    let h = harness(
        MapSecrets::with(&[("ingestion/sftp/acme/target-bucket", "ingestion-upload")]),
        config,
    );

    let response = h
        .handler
        .handle_value(
            scan_event("COMPLETED", Some("NO_THREATS_FOUND"), "ingestion-upload", "acme/a.csv"),
            landing_time(),
        )
        .await;

    assert_eq!(response.status_code, 500);
    assert!(response.body.contains("ingestion/sftp/acme/target-bucket"));
    assert!(h.store.calls().is_empty());
}

#[tokio::test]
async fn unknown_or_missing_scan_status_is_ignored() {
    let h = harness(MapSecrets::default(), test_config());
    let skipped =
        ScanEvent::from_value(scan_event("SKIPPED", None, "ingestion-upload", "acme/a.csv"))
            .unwrap();
    let empty = ScanEvent::from_value(serde_json::json!({})).unwrap();

    assert_eq!(
        h.handler.handle(&skipped, landing_time()).await.unwrap(),
        Outcome::Ignored {
            scan_status: "SKIPPED".to_string(),
            scan_result_status: "None".to_string(),
        }
    );
    assert_eq!(
        h.handler.handle(&empty, landing_time()).await.unwrap(),
        Outcome::Ignored {
            scan_status: "None".to_string(),
            scan_result_status: "None".to_string(),
        }
    );
    assert!(h.store.calls().is_empty());
    assert!(h.notifier.published().is_empty());
}

#[tokio::test]
async fn completed_without_result_status_is_ignored() {
    let h = harness(MapSecrets::default(), test_config());
    let event =
        ScanEvent::from_value(scan_event("COMPLETED", None, "ingestion-upload", "acme/a.csv"))
            .unwrap();

    let outcome = h.handler.handle(&event, landing_time()).await.unwrap();

    assert_eq!(
        outcome,
        Outcome::Ignored {
            scan_status: "COMPLETED".to_string(),
            scan_result_status: "None".to_string(),
        }
    );
    assert!(h.store.calls().is_empty());
}
