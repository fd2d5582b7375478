use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::api::{ClientSettings, UserApi};
use crate::runner::{Options, Runner, RunnerError};
use crate::state::{self, Action, AppState};

const FIRST_NAMES: [&str; 7] = ["Olga", "Bea", "Zane", "amir", "Chen", "Bea", "Ines"];

fn query_param(request_line: &str, key: &str) -> Option<String> {
    let target = request_line.split_whitespace().nth(1)?;
    let query = target.split_once('?')?.1;
    query
        .split('&')
        .filter_map(|kv| kv.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.to_string())
}

fn page_body(page: usize, size: usize) -> String {
    let users: Vec<String> = (0..size)
        .map(|i| {
            let first = FIRST_NAMES[(page * 3 + i) % FIRST_NAMES.len()];
            format!(
                r#"{{"name":{{"title":"Mx","first":"{first}","last":"P{page}N{i}"}},"email":"{first}.{page}.{i}@example.com","location":{{"street":{{"number":{i},"name":"Elm"}},"city":"Bergen","state":"Vestland","country":"Norway","postcode":5003}},"phone":"1","cell":"2","dob":{{"date":"1980-01-0{d}T00:00:00Z","age":45}},"picture":{{"large":"l","medium":"m","thumbnail":"t"}}}}"#,
                d = i % 9 + 1
            )
        })
        .collect();
    format!(r#"{{"results":[{}]}}"#, users.join(","))
}

/// Serves randomuser-shaped pages on loopback. `fail_page` answers 500.
async fn spawn_fake_api(fail_page: Option<usize>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            let (mut socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };
            let counter = counter.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                let line = request.lines().next().unwrap_or_default();
                counter.fetch_add(1, Ordering::SeqCst);

                let page: usize = query_param(line, "page")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0);
                let size: usize = query_param(line, "results")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0);

                let (status, body) = if Some(page) == fail_page {
                    ("500 Internal Server Error", r#"{"error":"boom"}"#.to_string())
                } else {
                    ("200 OK", page_body(page, size))
                };
                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{addr}/api/"), hits)
}

fn options_for(base_url: String, desired_total: usize, max_per_request: usize) -> Options {
    Options {
        desired_total,
        max_per_request,
        base_url,
        timeout_seconds: 5,
        ..Options::default()
    }
}

#[tokio::test]
async fn fetches_every_planned_page_and_sorts_by_first_name() {
    crate::logging::init_for_tests();
    let (base_url, hits) = spawn_fake_api(None).await;
    let runner = Runner::new(options_for(base_url, 7, 3)).unwrap();
    assert_eq!(runner.plan().request_sizes(), vec![1, 3, 3]);

    let result = runner.run().await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert_eq!(result.users.len(), 7);

    let firsts: Vec<&str> = result.users.iter().map(|u| u.name.first.as_str()).collect();
    let mut expected = firsts.clone();
    expected.sort();
    assert_eq!(firsts, expected);
    // lowercase names sort after every capitalised one
    assert_eq!(firsts.last(), Some(&"amir"));
}

#[tokio::test]
async fn one_failing_page_fails_the_run_without_retry() {
    let (base_url, hits) = spawn_fake_api(Some(2)).await;
    let runner = Runner::new(options_for(base_url, 30, 10)).unwrap();

    let err = runner.run().await.unwrap_err();
    match err {
        RunnerError::Fetch { source } => assert!(source.to_string().contains("page 2")),
        other => panic!("unexpected error: {other}"),
    }
    // siblings may be dropped before they reach the server, but nothing is re-sent
    assert!(hits.load(Ordering::SeqCst) <= 3);
}

#[tokio::test]
async fn api_client_decodes_a_single_page() {
    let (base_url, _) = spawn_fake_api(None).await;
    let api = UserApi::new(
        crate::api::build_http_client(None, 5).unwrap(),
        ClientSettings {
            base_url,
            ..ClientSettings::default()
        },
    );
    let users = api.fetch_page(1, 4).await.unwrap();
    assert_eq!(users.len(), 4);
    assert!(users.iter().all(|u| u.name.last.starts_with("P2N")));
    assert_eq!(users[0].location.postcode.to_string(), "5003");
}

#[tokio::test]
async fn loaded_users_flow_through_the_reducer_and_filter() {
    let (base_url, _) = spawn_fake_api(None).await;
    let runner = Runner::new(options_for(base_url, 20, 10)).unwrap();
    let result = runner.run().await.unwrap();

    let s = state::reduce(AppState::default(), Action::UsersLoaded(result.users));
    assert_eq!(s.displayed.len(), 20);

    let s = state::reduce(s, Action::SearchInput("BEA".to_string()));
    let s = state::reduce(s, Action::SubmitFilter);
    assert!(!s.displayed.is_empty());
    assert!(s.displayed.iter().all(|u| u.name.first == "Bea"));

    let again = state::reduce(s.clone(), Action::SubmitFilter);
    assert_eq!(again.displayed, s.displayed);

    let records = crate::output::build_records(&s.displayed);
    assert!(records.iter().all(|r| r.location == "Bergen, Norway"));
}

#[test]
fn query_param_reads_request_line() {
    let line = "GET /api/?inc=name&results=12&seed=abc&page=3&noinfo HTTP/1.1";
    assert_eq!(query_param(line, "results").as_deref(), Some("12"));
    assert_eq!(query_param(line, "page").as_deref(), Some("3"));
    assert_eq!(query_param(line, "noinfo"), None);
}
