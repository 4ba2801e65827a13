//! Shared test utilities: a throwaway local HTTP responder and wallet fixtures.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use walletwatch::database::Chain;
use walletwatch::intel::CandidateWallet;

/// A request as seen by the responder
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Header names are lower-cased
    pub headers: HashMap<String, String>,
    pub body: String,
}

#[derive(Clone)]
struct Reply {
    status: u16,
    body: String,
}

/// Minimal HTTP/1.1 server answering canned replies by method and path
///
/// Paths match case-insensitively, as the Telegram Bot API treats method
/// names. Every connection is closed after one response. Unknown routes get 404.
pub struct Responder {
    addr: SocketAddr,
    routes: Arc<Mutex<HashMap<(String, String), Reply>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Responder {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes = Arc::new(Mutex::new(HashMap::new()));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let (task_routes, task_requests) = (Arc::clone(&routes), Arc::clone(&requests));
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = Arc::clone(&task_routes);
                let requests = Arc::clone(&task_requests);
                tokio::spawn(async move {
                    let _ = handle(stream, routes, requests).await;
                });
            }
        });

        Self {
            addr,
            routes,
            requests,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn route(&self, method: &str, path: &str, status: u16, body: impl Into<String>) {
        self.routes.lock().unwrap().insert(
            (method.to_string(), path.to_lowercase()),
            Reply {
                status,
                body: body.into(),
            },
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.eq_ignore_ascii_case(path))
            .collect()
    }
}

async fn handle(
    mut stream: TcpStream,
    routes: Arc<Mutex<HashMap<(String, String), Reply>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
) -> std::io::Result<()> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buffer.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buffer, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_lowercase(), value.trim().to_string()))
        .collect();

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    while buffer.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }
    let body_end = buffer.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buffer[header_end..body_end]).to_string();

    requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        headers,
        body,
    });

    let reply = routes
        .lock()
        .unwrap()
        .get(&(method, path.to_lowercase()))
        .cloned()
        .unwrap_or(Reply {
            status: 404,
            body: "not found".to_string(),
        });

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reason(reply.status),
        reply.body.len(),
        reply.body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Bot API reply for a delivered `sendMessage`
pub const TELEGRAM_SENT: &str = r#"{"ok":true,"result":{"message_id":1,"date":1742943600,"chat":{"id":42,"type":"private","first_name":"ops"},"from":{"id":123,"is_bot":true,"first_name":"walletwatch"},"text":"ok"}}"#;

/// An entity page with one card per `(address, ticker, amount)`
pub fn entity_page(wallets: &[(&str, &str, &str)]) -> String {
    let cards: String = wallets
        .iter()
        .map(|(address, ticker, amount)| {
            format!(
                r#"<div class="entity-card"><a href="/explorer/address/{a}">{a}</a><span>{t}</span><span>{m}</span></div>"#,
                a = address,
                t = ticker,
                m = amount
            )
        })
        .collect();
    format!("<html><body><div class=\"list\">{}</div></body></html>", cards)
}

pub fn candidate(address: &str, chain: Chain, balance: f64) -> CandidateWallet {
    CandidateWallet {
        address: address.to_string(),
        chain,
        balance,
        label: Some("USG Wallet".to_string()),
        first_seen: "2025-03-25T23:00:00+00:00".to_string(),
        first_transaction: None,
    }
}
