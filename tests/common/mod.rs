//! Shared test fixtures: a stub npm registry and Node project layouts

#![allow(dead_code)]

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;

pub const LETTER: &str = "@bdelab/roar-letter";

/// Minimal HTTP server answering every request with the same response
pub struct StubRegistry {
    pub url: String,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl StubRegistry {
    /// Serve `body` with the given status for every request
    pub fn start(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub registry");
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut reader = BufReader::new(stream.try_clone().unwrap());

                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                // Drain headers
                loop {
                    let mut line = String::new();
                    match reader.read_line(&mut line) {
                        Ok(0) => break,
                        Ok(_) if line == "\r\n" => break,
                        Ok(_) => continue,
                        Err(_) => break,
                    }
                }

                let path = request_line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or_default()
                    .to_string();
                seen.lock().unwrap().push(path);

                let reason = match status {
                    200 => "OK",
                    404 => "Not Found",
                    500 => "Internal Server Error",
                    _ => "Status",
                };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self { url, requests }
    }

    /// Registry document whose `latest` dist-tag points at `version`
    pub fn with_latest(version: &str) -> Self {
        Self::start(200, registry_document(version))
    }

    /// Paths requested so far
    pub fn paths(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// npm registry document for the letter package
pub fn registry_document(latest: &str) -> String {
    format!(
        r#"{{
  "name": "{LETTER}",
  "dist-tags": {{"latest": "{latest}"}},
  "time": {{"created": "2022-05-01T00:00:00.000Z", "{latest}": "2024-03-01T12:30:00.000Z"}},
  "versions": {{"{latest}": {{"name": "{LETTER}", "version": "{latest}"}}}}
}}"#
    )
}

/// Node project with the letter package installed at `version`
pub fn project_with_installed(version: &str) -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    write_installed(temp_dir.path(), version);
    fs::write(
        temp_dir.path().join("package.json"),
        format!(r#"{{"name": "roar-dashboard", "devDependencies": {{"{LETTER}": "^{version}"}}}}"#),
    )
    .unwrap();
    temp_dir
}

pub fn write_installed(root: &Path, version: &str) {
    let dir = root.join("node_modules").join(LETTER);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("package.json"),
        format!(r#"{{"name": "{LETTER}", "version": "{version}"}}"#),
    )
    .unwrap();
}
