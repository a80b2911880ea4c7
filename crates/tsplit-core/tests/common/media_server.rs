//! Minimal HTTP/1.1 server for acquisition tests.
//!
//! Serves a single static body and counts HEAD and GET requests so tests
//! can assert which cache branch ran.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Default)]
pub struct ServerStats {
    head_requests: AtomicUsize,
    get_requests: AtomicUsize,
}

impl ServerStats {
    pub fn heads(&self) -> usize {
        self.head_requests.load(Ordering::SeqCst)
    }

    pub fn gets(&self) -> usize {
        self.get_requests.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MediaServerOptions {
    /// If false, HEAD responses omit Content-Length.
    pub head_content_length: bool,
}

impl Default for MediaServerOptions {
    fn default() -> Self {
        Self {
            head_content_length: true,
        }
    }
}

/// Starts a server in a background thread serving `body`. Returns the
/// content URL and the request counters. The server runs until the process
/// exits.
pub fn start(body: Vec<u8>) -> (String, Arc<ServerStats>) {
    start_with_options(body, MediaServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: MediaServerOptions) -> (String, Arc<ServerStats>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let stats = Arc::new(ServerStats::default());
    let thread_stats = Arc::clone(&stats);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let stats = Arc::clone(&thread_stats);
            thread::spawn(move || handle(stream, &body, &stats, opts));
        }
    });
    (format!("http://127.0.0.1:{}/media", port), stats)
}

fn handle(
    mut stream: std::net::TcpStream,
    body: &[u8],
    stats: &ServerStats,
    opts: MediaServerOptions,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let method = request.split_whitespace().next().unwrap_or("");
    if method.eq_ignore_ascii_case("HEAD") {
        stats.head_requests.fetch_add(1, Ordering::SeqCst);
        let response = if opts.head_content_length {
            format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n", body.len())
        } else {
            "HTTP/1.1 200 OK\r\n\r\n".to_string()
        };
        let _ = stream.write_all(response.as_bytes());
        return;
    }
    if method.eq_ignore_ascii_case("GET") {
        stats.get_requests.fetch_add(1, Ordering::SeqCst);
        let response = format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n", body.len());
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.write_all(body);
        return;
    }
    let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\n\r\n");
}
