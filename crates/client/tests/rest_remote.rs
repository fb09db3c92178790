use std::str::FromStr;

use api_types::budget::{Budget, BudgetInput};
use client::{Budgets, Client, ClientError, RestRemote, facade};
use engine::{AsyncOperationRunner, AsyncResource, Outcome, Period, Remote};
use rust_decimal::Decimal;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};

/// Serves a single canned response and hands back the raw request.
async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/api", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            request.extend_from_slice(&chunk[..n]);
            if n == 0 || complete(&request) {
                break;
            }
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8(request).unwrap()
    });

    (base_url, handle)
}

fn complete(request: &[u8]) -> bool {
    let text = String::from_utf8_lossy(request);
    let Some((head, body)) = text.split_once("\r\n\r\n") else {
        return false;
    };
    let length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    body.len() >= length
}

fn remote(base_url: &str) -> RestRemote<Budgets> {
    RestRemote::new(Client::new(base_url, "anna", "secret").unwrap())
}

#[tokio::test]
async fn list_sends_period_and_auth() {
    let body = r#"[{"id":1,"category":"Food","planned":"300.00","spent":"45.50"}]"#;
    let (base_url, server) = serve_once("200 OK", body).await;

    let outcome = remote(&base_url)
        .list(Period::new(2026, 3).unwrap())
        .await
        .unwrap();

    let Outcome::Success(budgets) = outcome else {
        panic!("expected a successful outcome");
    };
    assert_eq!(
        budgets,
        vec![Budget {
            id: 1,
            category: "Food".to_string(),
            planned: Decimal::from_str("300.00").unwrap(),
            spent: Decimal::from_str("45.50").unwrap(),
        }]
    );

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/budgets?year=2026&month=3 HTTP/1.1"));
    assert!(request.to_lowercase().contains("authorization: basic "));
}

#[tokio::test]
async fn rejection_carries_body_verbatim() {
    let (base_url, server) = serve_once("409 Conflict", r#"{"error":"category exists"}"#).await;

    let outcome = remote(&base_url)
        .create(BudgetInput {
            category: "Food".to_string(),
            planned: Decimal::from(100),
        })
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Failure {
            status: 409,
            body: r#"{"error":"category exists"}"#.to_string(),
        }
    );
    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/budgets HTTP/1.1"));
    assert!(request.contains(r#""category":"Food""#));
}

#[tokio::test]
async fn delete_targets_the_item_path() {
    let (base_url, server) = serve_once("204 No Content", "").await;

    let outcome = remote(&base_url).delete(12).await.unwrap();

    assert_eq!(outcome, Outcome::Success(()));
    assert!(server.await.unwrap().starts_with("DELETE /api/budgets/12 HTTP/1.1"));
}

#[tokio::test]
async fn undecodable_success_is_a_fault() {
    let (base_url, _server) = serve_once("200 OK", "not json").await;

    let err = remote(&base_url)
        .list(Period::new(2026, 1).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn facade_surfaces_rejection_as_error_resource() {
    let (base_url, _server) =
        serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;
    let http = Client::new(&base_url, "anna", "secret").unwrap();
    let budgets = facade::<Budgets>(&http, AsyncOperationRunner::try_current().unwrap());

    let terminal = budgets
        .load(Period::new(2026, 3).unwrap())
        .terminal()
        .await
        .unwrap();

    assert_eq!(terminal, AsyncResource::error(r#"{"error":"boom"}"#));
}
