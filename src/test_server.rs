//! One-shot HTTP server for exercising the real clients in tests.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

pub struct CapturedRequest {
    /// Request line and headers, lowercased.
    pub head: String,
    pub body: String,
}

pub struct OneShot {
    pub url: String,
    handle: JoinHandle<CapturedRequest>,
}

impl OneShot {
    /// Waits for the single request and returns what was sent.
    pub fn request(self) -> CapturedRequest {
        self.handle.join().unwrap()
    }
}

pub fn response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut text = format!("HTTP/1.1 {status}\r\n");
    for (name, value) in headers {
        text.push_str(&format!("{name}: {value}\r\n"));
    }
    text.push_str(&format!("Content-Length: {}\r\nConnection: close\r\n\r\n{body}", body.len()));
    text
}

/// Accepts one connection on `path`, answers it with `reply`, and hands the
/// request back through [`OneShot::request`].
pub fn serve(path: &str, reply: String) -> OneShot {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}{path}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut head = String::new();
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if line == "\r\n" || line.is_empty() {
                break;
            }
            let lower = line.to_lowercase();
            if let Some(value) = lower.strip_prefix("content-length:") {
                content_length = value.trim().parse().unwrap();
            }
            head.push_str(&lower);
        }

        let mut body = vec![0; content_length];
        reader.read_exact(&mut body).unwrap();

        let mut stream = stream;
        stream.write_all(reply.as_bytes()).unwrap();
        stream.flush().unwrap();

        CapturedRequest {
            head,
            body: String::from_utf8(body).unwrap(),
        }
    });

    OneShot { url, handle }
}
