//! Integration tests for privateer
//!
//! These tests run real searches against an in-process HTTP server that
//! serves canned Jackett responses, and check credential bootstrap against
//! temporary files.

use crossterm::event::{KeyCode, KeyEvent};
use privateer::config::{ApiKey, CredentialFile, PrivateerConfig};
use privateer::search::{JackettClient, SearchQuery, SearchTask};
use privateer::ui::screens::{SearchExit, SearchPhase, SearchScreen};
use privateer::ui::{Flow, Screen};
use privateer::workflow::{ExitStatus, Stage};
use std::fs;
use std::net::SocketAddr;
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::runtime::Runtime;

const TWO_RESULTS: &str = r#"{
    "Results": [
        {
            "Tracker": "nyaasi",
            "CategoryDesc": "TV/Anime",
            "Title": "Demon Slayer S03E05 1080p",
            "Link": "https://nyaa.example/view/1",
            "PublishDate": "2023-05-07T18:00:00+00:00",
            "Size": 1503238553,
            "Seeders": 312,
            "MagnetUri": "magnet:?xt=urn:btih:aaaa"
        },
        {
            "Tracker": "1337x",
            "CategoryDesc": null,
            "Title": "Demon Slayer S03E05 720p",
            "Link": "https://1337x.example/torrent/2",
            "PublishDate": "not a date",
            "Size": -1,
            "Seeders": 45,
            "MagnetUri": null
        },
        {
            "Tracker": "rutor",
            "Title": "No way to open this one"
        },
        "garbage"
    ]
}"#;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap()
}

/// Serve one canned HTTP response; the request line is sent back on the channel
fn serve_once(
    rt: &Runtime,
    status: &'static str,
    body: &'static str,
) -> (SocketAddr, mpsc::Receiver<String>) {
    let listener = rt.block_on(TcpListener::bind("127.0.0.1:0")).unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    rt.spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut chunk = [0_u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
        }
        let request = String::from_utf8_lossy(&request);
        let request_line = request.lines().next().unwrap_or_default().to_string();
        let _ = tx.send(request_line);

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    (addr, rx)
}

fn client_for(addr: SocketAddr) -> JackettClient {
    let config = PrivateerConfig {
        base_url: format!("http://{addr}"),
        request_timeout_secs: 5,
        ..PrivateerConfig::default()
    };
    JackettClient::new(&config, ApiKey::new("abc123").unwrap()).unwrap()
}

/// Tick the screen until it leaves `Loading` or exits
fn drive(screen: &mut SearchScreen) -> Flow<SearchExit> {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        let flow = screen.on_tick();
        if flow.is_exit() || screen.phase() != &SearchPhase::Loading {
            return flow;
        }
        assert!(Instant::now() < deadline, "search never completed");
        std::thread::sleep(Duration::from_millis(10));
    }
}

fn search_screen(rt: &Runtime, addr: SocketAddr, text: &str) -> SearchScreen {
    let query = SearchQuery::new(text).unwrap();
    let task = SearchTask::spawn(rt.handle(), client_for(addr), query.clone());
    SearchScreen::new(query, task)
}

#[test]
fn test_stored_credential_skips_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("privateer.json");
    fs::write(&path, r#"{"ApiKey":"abc123"}"#).unwrap();

    match Stage::bootstrap(&path, None) {
        Stage::Query { api_key, notice } => {
            assert_eq!(api_key.expose(), "abc123");
            assert!(notice.is_none());
        }
        other => panic!("expected query stage, got {other:?}"),
    }

    let query = SearchQuery::new("demon slayer").unwrap();
    match Stage::bootstrap(&path, Some(query)) {
        Stage::Search { query, .. } => assert_eq!(query.normalized(), "demon+slayer"),
        other => panic!("expected search stage, got {other:?}"),
    }
}

#[test]
fn test_missing_or_empty_credential_prompts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("privateer.json");
    assert!(matches!(Stage::bootstrap(&path, None), Stage::CaptureCredential { .. }));

    fs::write(&path, r#"{"ApiKey":""}"#).unwrap();
    assert!(matches!(Stage::bootstrap(&path, None), Stage::CaptureCredential { .. }));

    fs::write(&path, "not json").unwrap();
    assert!(matches!(Stage::bootstrap(&path, None), Stage::CaptureCredential { .. }));
}

#[test]
fn test_saved_credential_is_found_on_next_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("privateer.json");
    CredentialFile::save(&path, &ApiKey::new("k3y").unwrap()).unwrap();

    assert!(matches!(Stage::bootstrap(&path, None), Stage::Query { .. }));
}

#[test]
fn test_empty_results_leave_loading() {
    let rt = runtime();
    let (addr, requests) = serve_once(&rt, "200 OK", r#"{"Results": []}"#);
    let mut screen = search_screen(&rt, addr, "demon slayer s03e05");

    let flow = drive(&mut screen);
    assert!(!flow.is_exit());
    assert!(matches!(screen.phase(), SearchPhase::NoResults { .. }));

    let request_line = requests.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(request_line.starts_with(
        "GET /api/v2.0/indexers/test:passed/results?apikey=abc123&Query=demon+slayer+s03e05&Tracker%5B%5D=1337x"
    ));
    assert!(request_line.contains("Tracker%5B%5D=yts"));
}

#[test]
fn test_results_exit_to_browser() {
    let rt = runtime();
    let (addr, _requests) = serve_once(&rt, "200 OK", TWO_RESULTS);
    let mut screen = search_screen(&rt, addr, "Demon Slayer");

    match drive(&mut screen) {
        Flow::Exit(SearchExit::Results(results)) => {
            assert_eq!(results.len(), 2);
            assert_eq!(results.skipped(), 2);

            let rows = results.to_rows();
            assert_eq!(rows[0].date, "2023-05-07 18:00");
            assert_eq!(rows[0].size, "1433.60 MB");
            assert_eq!(rows[1].date, "not a date");
            assert_eq!(rows[1].size, "0.00 MB");
            assert_eq!(
                rows[1].launch_target().unwrap().as_str(),
                "https://1337x.example/torrent/2"
            );
        }
        other => panic!("expected results, got {other:?}"),
    }
    assert_eq!(screen.phase(), &SearchPhase::Done);
}

#[test]
fn test_http_error_offers_retry() {
    let rt = runtime();
    let (addr, _requests) = serve_once(&rt, "500 Internal Server Error", "");
    let mut screen = search_screen(&rt, addr, "ubuntu");

    drive(&mut screen);
    assert!(matches!(
        screen.phase(),
        SearchPhase::Failed { message, retryable: true } if message.contains("500")
    ));

    let retry = screen.handle_key(KeyEvent::from(KeyCode::Char('r')));
    assert!(matches!(retry, Flow::Exit(SearchExit::Retry)));
}

#[test]
fn test_malformed_body_is_no_results() {
    let rt = runtime();
    let (addr, _requests) = serve_once(&rt, "200 OK", "<html>Jackett is starting</html>");
    let mut screen = search_screen(&rt, addr, "ubuntu");

    drive(&mut screen);
    assert!(matches!(
        screen.phase(),
        SearchPhase::NoResults { reason } if reason.contains("decode")
    ));

    let quit = screen.handle_key(KeyEvent::from(KeyCode::Char('q')));
    assert!(matches!(quit, Flow::Exit(SearchExit::Quit(ExitStatus::Completed))));
}

#[test]
fn test_unreachable_service_fails() {
    let rt = runtime();
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let mut screen = search_screen(&rt, addr, "ubuntu");

    drive(&mut screen);
    assert!(matches!(screen.phase(), SearchPhase::Failed { .. }));
}
