//! Exercises the client against a one-shot local HTTP listener.

use modelfix_llm::{ChatClient, LlmError, ModelSettings};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).expect("read request");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Serve exactly one response; the join handle yields the raw request.
fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let request = read_request(&mut stream);
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("write response");
        request
    });
    (format!("http://{addr}/inference/chat/completions"), handle)
}

fn settings(endpoint: String) -> ModelSettings {
    ModelSettings {
        endpoint,
        timeout_secs: 5,
        ..ModelSettings::default()
    }
}

#[tokio::test]
async fn successful_call_returns_first_choice() {
    let (endpoint, server) = serve_once(
        "200 OK",
        r#"{"choices":[{"message":{"role":"assistant","content":"NO_FIX_NEEDED"}}]}"#,
    );
    let client = ChatClient::new(settings(endpoint), "test-token").expect("client");

    let reply = client.complete("The build fails with X").await.expect("reply");
    assert_eq!(reply, "NO_FIX_NEEDED");

    let request = server.join().expect("server thread").to_lowercase();
    assert!(request.starts_with("post /inference/chat/completions"));
    assert!(request.contains("authorization: bearer test-token"));
    assert!(request.contains("x-github-api-version: 2022-11-28"));
    assert!(request.contains("accept: application/json"));
    assert!(request.contains("\"model\":\"openai/gpt-4o\""));
    assert!(request.contains("the build fails with x"));
}

#[tokio::test]
async fn http_error_carries_api_message() {
    let (endpoint, server) = serve_once(
        "401 Unauthorized",
        r#"{"error":{"code":"unauthorized","message":"Bad credentials"}}"#,
    );
    let client = ChatClient::new(settings(endpoint), "nope").expect("client");

    let err = client.complete("prompt").await.unwrap_err();
    server.join().expect("server thread");
    match err {
        LlmError::Http { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Bad credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let client = ChatClient::new(
        settings(format!("http://127.0.0.1:{port}/chat/completions")),
        "t",
    )
    .expect("client");

    let err = client.complete("prompt").await.unwrap_err();
    assert!(matches!(err, LlmError::Network(_)), "{err:?}");
}

#[tokio::test]
async fn empty_prompt_is_rejected_before_sending() {
    let client = ChatClient::new(settings("http://127.0.0.1:9/".to_string()), "t").expect("client");
    let err = client.complete("   \n").await.unwrap_err();
    assert!(matches!(err, LlmError::EmptyPrompt));
}

#[test]
fn missing_token_variable_is_reported() {
    let settings = ModelSettings {
        token_env: "MODELFIX_TEST_TOKEN_THAT_IS_NEVER_SET".to_string(),
        ..ModelSettings::default()
    };
    let err = ChatClient::from_env(settings).unwrap_err();
    assert_eq!(
        err.to_string(),
        "MODELFIX_TEST_TOKEN_THAT_IS_NEVER_SET environment variable not set"
    );
}
