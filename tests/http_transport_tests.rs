//! Integration tests for HttpTransport against a mockito server.
//!
//! Verifies the method, path and JSON body of each exchange, decoding of
//! server records, and the mapping of non-2xx statuses, malformed bodies
//! and unreachable hosts onto TransportError.

#![cfg(feature = "http-client")]

use std::sync::Arc;

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

use todo_sync::transport::http::HttpTransport;
use todo_sync::{Record, RecordId, RecordTransport, SyncConfig, SyncController, TransportError};

fn transport_for(server: &ServerGuard) -> HttpTransport {
    let config = SyncConfig {
        base_url: server.url(),
        ..SyncConfig::default()
    };
    HttpTransport::from_config(&config).unwrap()
}

mod exchange_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_list_decodes_document_store_ids() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/todos")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([
                    {"_id": "65f1", "task": "buy milk", "completed": false, "__v": 0},
                    {"_id": "65f2", "task": "walk dog", "completed": true, "__v": 0}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let records = transport_for(&server).list().await.unwrap();
        mock.assert_async().await;
        assert_eq!(
            records,
            vec![
                Record::new("65f1", "buy milk", false),
                Record::new("65f2", "walk dog", true),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_accepts_records_with_both_id_spellings() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/todos")
            .with_status(200)
            .with_body(
                json!([
                    {"_id": "65f1", "id": "65f1", "task": "buy milk", "completed": false},
                    {"_id": "65f2", "task": "walk dog", "completed": true}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let controller = SyncController::new(Arc::new(transport_for(&server)));
        assert!(controller.load().await.is_applied());
        assert_eq!(
            controller.records(),
            vec![
                Record::new("65f1", "buy milk", false),
                Record::new("65f2", "walk dog", true),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_posts_task_as_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/todos")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"task": "walk dog"})))
            .with_status(201)
            .with_body(json!({"id": "9", "task": "walk dog", "completed": false}).to_string())
            .create_async()
            .await;

        let record = transport_for(&server).create("walk dog").await.unwrap();
        mock.assert_async().await;
        assert_eq!(record, Record::new("9", "walk dog", false));
    }

    #[tokio::test]
    async fn test_update_puts_to_item_path() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/todos/1")
            .match_body(Matcher::Json(json!({"task": "buy milk", "completed": true})))
            .with_status(200)
            .with_body(json!({"id": "1", "task": "buy milk", "completed": true}).to_string())
            .create_async()
            .await;

        let record = transport_for(&server)
            .update(&RecordId::from("1"), "buy milk", true)
            .await
            .unwrap();
        mock.assert_async().await;
        assert!(record.completed);
    }

    #[tokio::test]
    async fn test_remove_ignores_response_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/todos/1")
            .with_status(200)
            .with_body("Todo deleted")
            .create_async()
            .await;

        transport_for(&server)
            .remove(&RecordId::from("1"))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_remove_accepts_empty_204() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/todos/abc")
            .with_status(204)
            .create_async()
            .await;

        assert!(transport_for(&server)
            .remove(&RecordId::from("abc"))
            .await
            .is_ok());
        mock.assert_async().await;
    }
}

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let mut server = Server::new_async().await;
        server
            .mock("PUT", "/api/todos/1")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let err = transport_for(&server)
            .update(&RecordId::from("1"), "x", false)
            .await
            .unwrap_err();
        match err {
            TransportError::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected HTTP error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_not_found_delete_is_error() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", "/api/todos/1")
            .with_status(404)
            .create_async()
            .await;

        let err = transport_for(&server)
            .remove(&RecordId::from("1"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/todos")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = transport_for(&server).list().await.unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/todos")
            .with_status(200)
            .with_body(json!({"message": "created"}).to_string())
            .create_async()
            .await;

        let err = transport_for(&server).create("x").await.unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_error() {
        let config = SyncConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..SyncConfig::default()
        };
        let transport = HttpTransport::from_config(&config).unwrap();

        let err = transport.list().await.unwrap_err();
        assert!(matches!(err, TransportError::Connection { .. }));
    }
}

mod end_to_end_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_toggle_scenario_over_http() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/todos")
            .with_status(200)
            .with_body(json!([{"id": "1", "task": "buy milk", "completed": false}]).to_string())
            .create_async()
            .await;
        let update = server
            .mock("PUT", "/api/todos/1")
            .match_body(Matcher::Json(json!({"task": "buy milk", "completed": true})))
            .with_status(200)
            .with_body(json!({"id": "1", "task": "buy milk", "completed": true}).to_string())
            .create_async()
            .await;

        let controller = SyncController::new(Arc::new(transport_for(&server)));
        assert!(controller.load().await.is_applied());
        assert!(controller
            .toggle_completed(&RecordId::from("1"))
            .await
            .is_applied());

        update.assert_async().await;
        assert_eq!(
            controller.records(),
            vec![Record::new("1", "buy milk", true)]
        );
    }

    #[tokio::test]
    async fn test_failed_save_over_http_keeps_draft() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/todos")
            .with_status(200)
            .with_body(json!([{"id": "1", "task": "buy milk", "completed": false}]).to_string())
            .create_async()
            .await;
        server
            .mock("PUT", "/api/todos/1")
            .with_status(503)
            .create_async()
            .await;

        let controller = SyncController::new(Arc::new(transport_for(&server)));
        let _ = controller.load().await;
        let one = RecordId::from("1");
        let _ = controller.begin_edit(&one);
        let _ = controller.update_edit_draft("buy bread");

        assert!(controller.save_edit().await.is_failed());
        let session = controller.edit_session().unwrap();
        assert_eq!(session.target, one);
        assert_eq!(session.draft, "buy bread");
        assert_eq!(
            controller.records(),
            vec![Record::new("1", "buy milk", false)]
        );
    }
}
