// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the session, the reads and command dispatch using
//! wiremock.

mod common;

use std::time::Duration;

use common::{
    POOL_ID, api_config, api_error, client, form_field, mount_login, mount_wait_ok, ok, post,
    request_count,
};
use klereo_lib::command::{CommandId, CommandRequest};
use klereo_lib::protocol::Endpoint;
use klereo_lib::{Credentials, Error, KlereoClient, TransportError};
use serde_json::json;
use tokio::time::Instant;
use wiremock::matchers::{body_string_contains, header};
use wiremock::{MockServer, ResponseTemplate};

// ============================================================================
// Session
// ============================================================================

mod session {
    use super::*;

    #[tokio::test]
    async fn authenticate_stores_token_for_55_minutes() {
        let server = MockServer::start().await;
        mount_login(&server, "T1").await;
        let client = client(&server);

        assert!(client.session().needs_refresh());

        client.session().authenticate().await.unwrap();
        let now = Instant::now();

        assert!(!client.session().needs_refresh());
        assert_eq!(client.session().token().as_deref(), Some("T1"));
        assert!(!client.session().needs_refresh_at(now + Duration::from_secs(54 * 60)));
        assert!(client.session().needs_refresh_at(now + Duration::from_secs(55 * 60)));
    }

    #[tokio::test]
    async fn login_posts_hashed_password_anonymously() {
        let server = MockServer::start().await;
        post("GetJWT.php")
            .and(body_string_contains(form_field("login", "user@example.com")))
            .and(body_string_contains(form_field(
                "password",
                "5baa61e4c9b93f3f0682250b6cf8331b7ee68fd8",
            )))
            .and(body_string_contains(form_field("version", "324-w")))
            .and(body_string_contains(form_field("lang", "en")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "jwt": "T1"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        client.session().authenticate().await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn rejected_login_is_authentication_error() {
        let server = MockServer::start().await;
        post("GetJWT.php")
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": "error"})),
            )
            .mount(&server)
            .await;

        let client = client(&server);
        let err = client.session().authenticate().await.unwrap_err();

        assert!(matches!(err, Error::Authentication));
        assert!(client.session().needs_refresh());
    }

    #[tokio::test]
    async fn login_http_failure_is_transport_error() {
        let server = MockServer::start().await;
        post("GetJWT.php")
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client(&server);
        let err = client.session().authenticate().await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn ensure_authenticated_logs_in_once() {
        let server = MockServer::start().await;
        post("GetJWT.php")
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "ok", "jwt": "T1"}))
                    .set_delay(Duration::from_millis(100)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let session = client.session();

        let (a, b, c) = tokio::join!(
            session.ensure_authenticated(),
            session.ensure_authenticated(),
            session.ensure_authenticated(),
        );
        a.unwrap();
        b.unwrap();
        c.unwrap();

        session.ensure_authenticated().await.unwrap();
    }

    #[tokio::test]
    async fn expired_token_is_refreshed() {
        let server = MockServer::start().await;
        mount_login(&server, "T1").await;

        let client = KlereoClient::new(
            Credentials::new("user@example.com", "password"),
            api_config(&server).with_token_lifetime(Duration::from_millis(50)),
        )
        .unwrap();

        client.session().ensure_authenticated().await.unwrap();
        assert_eq!(request_count(&server, "GetJWT.php").await, 1);

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(client.session().needs_refresh());

        client.session().ensure_authenticated().await.unwrap();
        assert_eq!(request_count(&server, "GetJWT.php").await, 2);
    }
}

// ============================================================================
// Transport and reads
// ============================================================================

mod reads {
    use super::*;

    #[tokio::test]
    async fn get_pools_sends_paging_fields_with_bearer() {
        let server = MockServer::start().await;
        mount_login(&server, "T1").await;
        post("GetIndex.php")
            .and(header("authorization", "Bearer T1"))
            .and(body_string_contains(form_field("max", "60")))
            .and(body_string_contains(form_field("start", "0")))
            .respond_with(ok(json!([
                {"idSystem": POOL_ID, "poolNickname": "La Faub"},
                {"idSystem": 678, "poolNickname": "Spa"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let pools = client(&server).get_pools().await.unwrap();

        assert_eq!(pools.len(), 2);
        assert_eq!(pools[0].id_system, POOL_ID);
        assert_eq!(pools[1].pool_nickname, "Spa");
    }

    #[tokio::test]
    async fn get_pool_details_returns_first_element() {
        let server = MockServer::start().await;
        mount_login(&server, "T1").await;
        post("GetPoolDetails.php")
            .and(body_string_contains(form_field("poolID", "12345")))
            .respond_with(ok(common::pool_details(1, 0, json!({"HeaterMode": 1}))))
            .mount(&server)
            .await;

        let details = client(&server)
            .get_pool_details(POOL_ID)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(details.id_system, POOL_ID);
        assert_eq!(details.outs.len(), 4);
        assert_eq!(details.params.heater_mode_active(), Some(true));
    }

    #[tokio::test]
    async fn empty_details_list_is_none() {
        let server = MockServer::start().await;
        mount_login(&server, "T1").await;
        post("GetPoolDetails.php")
            .respond_with(ok(json!([])))
            .mount(&server)
            .await;

        let details = client(&server).get_pool_details(POOL_ID).await.unwrap();
        assert!(details.is_none());
    }

    #[tokio::test]
    async fn non_ok_status_is_api_error() {
        let server = MockServer::start().await;
        mount_login(&server, "T1").await;
        post("GetPoolDetails.php")
            .respond_with(api_error())
            .mount(&server)
            .await;

        let err = client(&server).get_pool_details(POOL_ID).await.unwrap_err();
        match err {
            Error::Api { endpoint, status } => {
                assert_eq!(endpoint, Endpoint::GetPoolDetails);
                assert_eq!(status, "error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_error_carries_status_and_reason() {
        let server = MockServer::start().await;
        mount_login(&server, "T1").await;
        post("GetIndex.php")
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client(&server).get_pools().await.unwrap_err();
        match &err {
            Error::Transport(TransportError::Status { status, reason }) => {
                assert_eq!(*status, 500);
                assert_eq!(reason, "Internal Server Error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("HTTP 500 - Internal Server Error"));
    }

    #[tokio::test]
    async fn missing_token_sends_bearer_undefined() {
        let server = MockServer::start().await;
        post("GetIndex.php")
            .and(header("authorization", "Bearer undefined"))
            .respond_with(ok(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let body = client
            .request(Endpoint::GetIndex, &[("lang", "en".to_string())], true)
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn anonymous_request_has_no_authorization() {
        let server = MockServer::start().await;
        post("GetIndex.php")
            .respond_with(ok(json!([])))
            .mount(&server)
            .await;

        client(&server)
            .request(Endpoint::GetIndex, &[], false)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }
}

// ============================================================================
// Command dispatch
// ============================================================================

mod dispatch {
    use super::*;

    #[tokio::test]
    async fn set_output_and_wait_resolves() {
        let server = MockServer::start().await;
        mount_login(&server, "T1").await;
        post("SetOut.php")
            .and(header("authorization", "Bearer T1"))
            .and(body_string_contains(form_field("poolID", "12345")))
            .and(body_string_contains(form_field("outIdx", "0")))
            .and(body_string_contains(form_field("newMode", "0")))
            .and(body_string_contains(form_field("newState", "1")))
            .and(body_string_contains(form_field("comMode", "1")))
            .respond_with(ok(json!([{"cmdID": 100_001, "poolID": POOL_ID}])))
            .expect(1)
            .mount(&server)
            .await;
        post("WaitCommand.php")
            .and(body_string_contains(form_field("cmdID", "100001")))
            .respond_with(ok(json!({"cmdID": 100_001, "status": 9, "detail": "Ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(&server)
            .set_output_and_wait(POOL_ID, 0, true)
            .await
            .unwrap();

        assert_eq!(result.cmd_id, CommandId::new(100_001));
        assert_eq!(result.terminal_status, 9);
        assert_eq!(result.detail, "Ok");
    }

    #[tokio::test]
    async fn set_param_sends_parameter_fields() {
        let server = MockServer::start().await;
        mount_login(&server, "T1").await;
        post("SetParam.php")
            .and(body_string_contains(form_field("paramID", "ConsigneEau")))
            .and(body_string_contains(form_field("newValue", "28.5")))
            .and(body_string_contains(form_field("comMode", "1")))
            .respond_with(ok(json!([{"cmdID": 7}])))
            .expect(1)
            .mount(&server)
            .await;
        mount_wait_ok(&server, 7).await;

        let result = client(&server)
            .set_param_and_wait(POOL_ID, "ConsigneEau", 28.5)
            .await
            .unwrap();
        assert_eq!(result.cmd_id.value(), 7);
    }

    #[tokio::test]
    async fn dispatch_api_error_skips_wait() {
        let server = MockServer::start().await;
        mount_login(&server, "T1").await;
        post("SetOut.php")
            .respond_with(api_error())
            .mount(&server)
            .await;
        post("WaitCommand.php")
            .respond_with(ok(json!({"status": 9, "detail": "Ok"})))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server)
            .set_output_and_wait(POOL_ID, 0, true)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::CommandDispatch { endpoint: Endpoint::SetOut, .. }
        ));
    }

    #[tokio::test]
    async fn dispatch_empty_list_skips_wait() {
        let server = MockServer::start().await;
        mount_login(&server, "T1").await;
        post("SetParam.php")
            .respond_with(ok(json!([])))
            .mount(&server)
            .await;
        post("WaitCommand.php")
            .respond_with(ok(json!({"status": 9, "detail": "Ok"})))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server)
            .set_param_and_wait(POOL_ID, "ConsigneEau", 28.0)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CommandDispatch { reason, .. } if reason.contains("empty")));
    }

    #[tokio::test]
    async fn dispatch_without_command_id_fails() {
        let server = MockServer::start().await;
        mount_login(&server, "T1").await;
        post("SetOut.php")
            .respond_with(ok(json!([{"poolID": POOL_ID}])))
            .mount(&server)
            .await;

        let err = client(&server)
            .dispatch(&CommandRequest::set_output(POOL_ID, 1, false))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CommandDispatch { .. }));
    }

    #[tokio::test]
    async fn wait_api_error_is_command_failed() {
        let server = MockServer::start().await;
        mount_login(&server, "T1").await;
        post("WaitCommand.php")
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({
                    "status": "error",
                    "response": {"detail": "Timeout"}
                })),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .wait_for_command(CommandId::new(55))
            .await
            .unwrap_err();
        match err {
            Error::CommandFailed { cmd_id, detail } => {
                assert_eq!(cmd_id, CommandId::new(55));
                assert_eq!(detail, "Timeout");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
