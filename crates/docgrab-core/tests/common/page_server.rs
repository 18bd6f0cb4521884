//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed set of paths. A path may have several responses; they are
//! served in order and the last one repeats, which is enough to fake a
//! viewer whose download control shows up late. Unknown paths get 404.
//! `{BASE}` in an HTML body is replaced with the server's base URL.
//! A [`Response::stall`] accepts the request and never answers.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

const STALL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Response {
    pub status: &'static str,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    stall: bool,
}

impl Response {
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: "200 OK",
            headers: vec![("Content-Type".into(), "text/html; charset=utf-8".into())],
            body: body.into().into_bytes(),
            stall: false,
        }
    }

    pub fn file(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: "200 OK",
            headers: vec![("Content-Type".into(), "application/pdf".into())],
            body: body.into(),
            stall: false,
        }
    }

    pub fn status(status: &'static str) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
            stall: false,
        }
    }

    /// Reads the request and then hangs without writing anything.
    pub fn stall() -> Self {
        Self {
            stall: true,
            ..Self::status("200 OK")
        }
    }

    fn is_html(&self) -> bool {
        self.headers
            .iter()
            .any(|(n, v)| n.eq_ignore_ascii_case("content-type") && v.starts_with("text/html"))
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

#[derive(Default)]
struct Route {
    responses: Vec<Response>,
    hits: usize,
}

/// Handle to a running server. The server thread lives until the process exits.
#[derive(Clone)]
pub struct PageServer {
    base: String,
    routes: Arc<Mutex<HashMap<String, Route>>>,
}

impl PageServer {
    /// `path` on this server, e.g. `http://127.0.0.1:12345/doc/1`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// How many requests `path` has received.
    pub fn hits(&self, path: &str) -> usize {
        self.routes
            .lock()
            .unwrap()
            .get(path)
            .map_or(0, |r| r.hits)
    }
}

/// Starts a server for `routes` (path including query → responses in order).
pub fn start(routes: Vec<(&str, Vec<Response>)>) -> PageServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let table: HashMap<String, Route> = routes
        .into_iter()
        .map(|(path, responses)| {
            (
                path.to_string(),
                Route {
                    responses,
                    hits: 0,
                },
            )
        })
        .collect();
    let routes = Arc::new(Mutex::new(table));
    let base = format!("http://127.0.0.1:{port}");
    let shared = Arc::clone(&routes);
    let server_base = base.clone();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&shared);
            let base = server_base.clone();
            thread::spawn(move || handle(stream, &routes, &base));
        }
    });
    PageServer { base, routes }
}

fn handle(mut stream: TcpStream, routes: &Mutex<HashMap<String, Route>>, base: &str) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    let mut response = {
        let mut routes = routes.lock().unwrap();
        match routes.get_mut(&path) {
            Some(route) if !route.responses.is_empty() => {
                let i = route.hits.min(route.responses.len() - 1);
                route.hits += 1;
                route.responses[i].clone()
            }
            _ => Response::status("404 Not Found"),
        }
    };
    if response.stall {
        thread::sleep(STALL);
        return;
    }
    if response.is_html() {
        let text = String::from_utf8_lossy(&response.body).replace("{BASE}", base);
        response.body = text.into_bytes();
    }

    let mut head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        response.status,
        response.body.len()
    );
    for (name, value) in &response.headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&response.body);
}
