use std::sync::Arc;
use std::time::Duration;

use fews_common::{FewsError, Scalar};
use fews_gateway::QueryGateway;
use test_utils::{sample_source, MockRpcClient};

#[tokio::test]
async fn test_query_returns_rows() {
    let statement = "select id, name, parentid from filters";
    let client = Arc::new(MockRpcClient::new().with_rows(
        statement,
        vec![vec!["1".into(), "Rivers".into(), Scalar::Null]],
    ));
    let gw = QueryGateway::new(client);

    let rows = gw.query(&sample_source(), statement).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], Scalar::Text("Rivers".into()));
}

#[tokio::test]
async fn test_unreachable_host_maps_to_remote_unavailable() {
    let gw = QueryGateway::new(Arc::new(MockRpcClient::new().unreachable()));

    let err = gw
        .query(&sample_source(), "select unit from parameters where id='x'")
        .await
        .unwrap_err();
    assert!(matches!(err, FewsError::RemoteUnavailable { .. }));
}

#[tokio::test]
async fn test_sentinel_code_maps_to_query_error() {
    let statement = "select unit from parameters where id='bogus'";
    let gw = QueryGateway::new(Arc::new(MockRpcClient::new().with_code(statement, -2)));

    let err = gw.query(&sample_source(), statement).await.unwrap_err();
    match err {
        FewsError::RemoteQueryError { code, statement: s } => {
            assert_eq!(code, -2);
            assert_eq!(s, statement);
        }
        other => panic!("expected RemoteQueryError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_registers_tag_when_config_is_absent() {
    let statement = "select id, name, parentid from filters";
    let client = Arc::new(
        MockRpcClient::new()
            .with_unregistered_tag()
            .with_rows(statement, vec![]),
    );
    let gw = QueryGateway::new(client.clone());

    gw.query(&sample_source(), statement).await.unwrap();

    assert_eq!(client.calls().config_put, 1);
    assert_eq!(
        client.call_log(),
        vec!["ping", "config_get", "config_put", "execute"]
    );
}

#[tokio::test]
async fn test_registration_skipped_when_tag_present() {
    let statement = "select id, name, parentid from filters";
    let client = Arc::new(MockRpcClient::new().with_rows(statement, vec![]));
    let gw = QueryGateway::new(client.clone());

    gw.query(&sample_source(), statement).await.unwrap();
    gw.query(&sample_source(), statement).await.unwrap();

    assert_eq!(client.calls().config_put, 0);
    assert_eq!(client.calls().execute, 2);
}

#[tokio::test]
async fn test_garbled_registration_write_is_malformed_not_unavailable() {
    let client = Arc::new(
        MockRpcClient::new()
            .with_unregistered_tag()
            .with_garbled_config_put(),
    );
    let gw = QueryGateway::new(client);

    let err = gw
        .query(&sample_source(), "select id, name, parentid from filters")
        .await
        .unwrap_err();
    assert!(matches!(err, FewsError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_timeout_behaves_like_unreachable() {
    let client = Arc::new(
        MockRpcClient::new()
            .with_rows("select 1", vec![])
            .with_ping_delay(Duration::from_secs(5)),
    );
    let gw = QueryGateway::with_timeout(client, Duration::from_millis(20));

    let err = gw.query(&sample_source(), "select 1").await.unwrap_err();
    assert!(matches!(err, FewsError::RemoteUnavailable { .. }));
}
