//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use blockscan_chat::ApiConfig;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const GOOD_KEY: &str = "good-key";

/// Decoded form fields of one request.
pub type Form = HashMap<String, String>;

/// A running mock chat API.
pub struct MockBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Form>>>,
}

impl MockBackend {
    pub fn url(&self) -> String {
        format!("http://{}/v1/api", self.addr)
    }

    pub fn config(&self) -> ApiConfig {
        ApiConfig {
            api_key: GOOD_KEY.to_string(),
            api_url: self.url(),
            bulk_send_interval_ms: 0,
        }
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<Form> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose `method` field equals `method`.
    pub fn requests_for(&self, method: &str) -> Vec<Form> {
        self.requests()
            .into_iter()
            .filter(|f| f.get("method").map(String::as_str) == Some(method))
            .collect()
    }
}

/// Start a programmable backend. `f` maps a request form to (status, JSON body).
pub async fn start_programmable_backend<F>(f: F) -> MockBackend
where
    F: Fn(&Form) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let recorded = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        let Some(body) = read_body(&mut socket).await else {
                            return;
                        };
                        let form: Form = url::form_urlencoded::parse(body.as_bytes())
                            .into_owned()
                            .collect();
                        recorded.lock().unwrap().push(form.clone());

                        let (status, body) = f(&form);
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockBackend { addr, requests }
}

/// Start a backend that behaves like the real API for `GOOD_KEY`.
pub async fn start_chat_backend() -> MockBackend {
    start_programmable_backend(|form| {
        if form.get("apikey").map(String::as_str) != Some(GOOD_KEY) {
            return ok_body(json!({"status": "0", "message": "NOTOK", "result": "Invalid API Key"}));
        }
        let result = match form.get("method").map(String::as_str) {
            Some("ping") => json!("pong"),
            Some("unreadmsgcount") if form.contains_key("address") => json!(2),
            Some("unreadmsgcount") => json!(5),
            Some("getfirstmsgid") => json!("100"),
            Some("getlastmsgid") => json!(142),
            Some("getchat") => json!([
                {"id": 141, "from": "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed", "msg": "gm"},
                {"id": 142, "from": "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359", "msg": "gn"}
            ]),
            Some("sendchat") => json!("Message sent"),
            Some("markmsgread") => json!("OK"),
            _ => return ok_body(json!({"status": "0", "message": "NOTOK", "result": "Unknown method"})),
        };
        ok_body(json!({"status": "1", "message": "OK", "result": result}))
    })
    .await
}

pub fn ok_body(value: Value) -> (u16, String) {
    (200, value.to_string())
}

/// Reserve a port with nothing listening on it.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v1/api", addr)
}

async fn read_body(socket: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let end = buf.len().min(body_start + content_length);
    Some(String::from_utf8_lossy(&buf[body_start..end]).into_owned())
}
