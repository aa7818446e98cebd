//! Minimal one-shot HTTP stub for exercising the blocking client.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

pub struct Stub {
    pub base_url: String,
    /// Request lines (`GET /path HTTP/1.1`) in arrival order.
    pub requests: Receiver<String>,
}

/// Serve `responses` in order, one per connection, as `(status line, body)`.
pub fn serve(responses: Vec<(&'static str, String)>) -> Stub {
    serve_delayed(Duration::ZERO, responses)
}

/// Like [`serve`], but hold each response for `delay` after reading the request.
pub fn serve_delayed(delay: Duration, responses: Vec<(&'static str, String)>) -> Stub {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for (status, body) in responses {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let _ = tx.send(request_line.trim_end().to_string());

            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
            }

            thread::sleep(delay);
            let mut stream = stream;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            // The client may have timed out and hung up.
            let _ = stream.write_all(response.as_bytes()).and_then(|_| stream.flush());
        }
    });

    Stub {
        base_url: format!("http://{addr}"),
        requests: rx,
    }
}

pub const DASHBOARD_JSON: &str = r#"{
    "target": "Gold_High",
    "latest": {"date": "2024-01-02", "actual": 2010.0},
    "history": [
        {"date": "2024-01-01", "actual": 2000.0},
        {"date": "2024-01-02", "actual": 2010.0}
    ],
    "forecast": [{"date": "2024-01-03", "pred": 2020.0}],
    "model": {"type": "ARIMA", "order": [2, 1, 0], "n_obs": 2, "aic": 10.5, "bic": 11.5},
    "meta": {"data_path": "gold.csv", "refreshed_at": 1704240000, "rows": 2}
}"#;
