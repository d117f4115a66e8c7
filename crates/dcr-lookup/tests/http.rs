//! Client against a local HTTP server.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

use dcr_core::CompoundLookup;
use dcr_lookup::{CompoundLookupClient, LookupConfig, ReqwestTransport};

/// Client that ignores proxy settings from the environment.
fn direct_client(config: &LookupConfig) -> CompoundLookupClient {
    let client = reqwest::blocking::Client::builder()
        .no_proxy()
        .timeout(config.timeout())
        .build()
        .unwrap();
    CompoundLookupClient::with_transport(config, ReqwestTransport::from_client(client)).unwrap()
}

/// Answers each connection with the next canned response, recording the
/// request line.
fn serve(responses: Vec<(u16, &'static str)>) -> (String, thread::JoinHandle<Vec<String>>) {
    serve_raw(
        responses
            .into_iter()
            .map(|(status, body)| response(status, body, body.len()))
            .collect(),
    )
}

fn response(status: u16, body: &str, content_length: usize) -> String {
    let reason = if status == 200 { "OK" } else { "Not Found" };
    format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: text/plain\r\nContent-Length: {content_length}\r\nConnection: close\r\n\r\n{body}"
    )
}

/// Writes each raw response verbatim, then closes the connection.
fn serve_raw(responses: Vec<String>) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let mut request_lines = Vec::new();
        for raw in responses {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            request_lines.push(line.trim_end().to_string());
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                if header == "\r\n" || header.is_empty() {
                    break;
                }
            }
            stream.write_all(raw.as_bytes()).unwrap();
            stream.flush().unwrap();
        }
        request_lines
    });
    (address, handle)
}

#[test]
fn known_and_unknown_compounds() {
    let (address, server) = serve(vec![
        (200, "5793\n"),
        (404, "Status: 404\nCode: PUGREST.NotFound\n"),
    ]);
    let config = LookupConfig {
        url_template: format!("{address}/compound/name/{{name}}/cids/TXT"),
        min_interval_ms: 0,
        ..LookupConfig::default()
    };
    let client = direct_client(&config);

    assert_eq!(client.lookup("glucose").unwrap(), vec!["5793"]);
    assert!(client.lookup("abcxyz-nonexistent").unwrap().is_empty());

    let requests = server.join().unwrap();
    assert_eq!(
        requests,
        vec![
            "GET /compound/name/glucose/cids/TXT HTTP/1.1",
            "GET /compound/name/abcxyz-nonexistent/cids/TXT HTTP/1.1",
        ]
    );
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let config = LookupConfig {
        url_template: format!("http://{address}/{{name}}"),
        min_interval_ms: 0,
        timeout_secs: 2,
        max_retries: 1,
    };
    let client = direct_client(&config);
    let err = client.lookup("glucose").unwrap_err();
    assert!(matches!(
        err,
        dcr_core::LookupError::Transport { attempts: 2, .. }
    ));
}

#[test]
fn not_found_with_truncated_body_is_still_not_found() {
    // Declares more body than it sends before closing.
    let (address, server) = serve_raw(vec![response(404, "Status: 404", 4096)]);
    let config = LookupConfig {
        url_template: format!("{address}/compound/name/{{name}}/cids/TXT"),
        min_interval_ms: 0,
        max_retries: 0,
        ..LookupConfig::default()
    };
    let client = direct_client(&config);

    assert!(client.lookup("abcxyz").unwrap().is_empty());
    assert_eq!(server.join().unwrap().len(), 1);
}
