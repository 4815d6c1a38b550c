//! In-process RESP server for tests
//!
//! Speaks enough of the Redis protocol for `CacheClient`: PING, SET, SETEX,
//! GET, DEL, EXISTS, and `+OK` for connection setup commands. Switches let a
//! test make PING fail or answer `+PONG` instead of echoing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::config::CacheConfig;

#[derive(Default)]
struct Shared {
    entries: Mutex<HashMap<String, (String, Option<Instant>)>>,
    fail_ping: AtomicBool,
    pong_ping: AtomicBool,
}

// == Fake Store ==
pub struct FakeStore {
    port: u16,
    shared: Arc<Shared>,
    accept: JoinHandle<()>,
}

impl FakeStore {
    /// Binds an ephemeral port and serves until dropped.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let shared = Arc::new(Shared::default());

        let accept_shared = shared.clone();
        let accept = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve_connection(stream, accept_shared.clone()));
            }
        });

        Self {
            port,
            shared,
            accept,
        }
    }

    pub fn config(&self) -> CacheConfig {
        CacheConfig::new("127.0.0.1", self.port)
    }

    /// PING answers `-ERR boom` while set.
    pub fn fail_ping(&self, fail: bool) {
        self.shared.fail_ping.store(fail, Ordering::SeqCst);
    }

    /// PING answers `+PONG` instead of echoing its payload while set.
    pub fn pong_ping(&self, pong: bool) {
        self.shared.pong_ping.store(pong, Ordering::SeqCst);
    }
}

impl Drop for FakeStore {
    fn drop(&mut self) {
        self.accept.abort();
    }
}

/// Accepts connections and never answers anything sent on them.
pub async fn start_silent() -> (CacheConfig, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut sink = [0u8; 512];
                while matches!(stream.read(&mut sink).await, Ok(n) if n > 0) {}
            });
        }
    });

    (CacheConfig::new("127.0.0.1", port), handle)
}

async fn serve_connection(stream: TcpStream, shared: Arc<Shared>) {
    let (read, mut write) = stream.into_split();
    let mut reader = BufReader::new(read);

    while let Some(args) = read_command(&mut reader).await {
        let reply = respond(&shared, &args);
        if write.write_all(reply.as_bytes()).await.is_err() {
            break;
        }
    }
}

/// Reads one RESP array of bulk strings.
async fn read_command(reader: &mut BufReader<OwnedReadHalf>) -> Option<Vec<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line).await.ok()? == 0 {
        return None;
    }
    let count: usize = line.trim_end().strip_prefix('*')?.parse().ok()?;

    let mut args = Vec::with_capacity(count);
    for _ in 0..count {
        line.clear();
        reader.read_line(&mut line).await.ok()?;
        let len: usize = line.trim_end().strip_prefix('$')?.parse().ok()?;

        let mut buf = vec![0u8; len + 2];
        reader.read_exact(&mut buf).await.ok()?;
        buf.truncate(len);
        args.push(String::from_utf8(buf).ok()?);
    }

    Some(args)
}

fn respond(shared: &Shared, args: &[String]) -> String {
    let Some((name, rest)) = args.split_first() else {
        return error("empty command");
    };

    let mut entries = shared.entries.lock().unwrap();
    let now = Instant::now();
    entries.retain(|_, (_, deadline)| deadline.map_or(true, |d| d > now));

    match (name.to_ascii_uppercase().as_str(), rest) {
        ("PING", [payload]) => {
            if shared.fail_ping.load(Ordering::SeqCst) {
                error("boom")
            } else if shared.pong_ping.load(Ordering::SeqCst) {
                "+PONG\r\n".to_string()
            } else {
                bulk(payload)
            }
        }
        ("PING", []) => "+PONG\r\n".to_string(),
        ("SET", [key, value]) => {
            entries.insert(key.clone(), (value.clone(), None));
            "+OK\r\n".to_string()
        }
        ("SETEX", [key, seconds, value]) => match seconds.parse::<u64>() {
            Ok(seconds) if seconds > 0 => {
                let deadline = now + Duration::from_secs(seconds);
                entries.insert(key.clone(), (value.clone(), Some(deadline)));
                "+OK\r\n".to_string()
            }
            _ => error("invalid expire time in 'setex' command"),
        },
        ("GET", [key]) => entries
            .get(key)
            .map_or_else(|| "$-1\r\n".to_string(), |(value, _)| bulk(value)),
        ("DEL", keys) => {
            let removed = keys.iter().filter(|k| entries.remove(*k).is_some()).count();
            format!(":{}\r\n", removed)
        }
        ("EXISTS", keys) => {
            let found = keys.iter().filter(|k| entries.contains_key(*k)).count();
            format!(":{}\r\n", found)
        }
        ("HELLO", _) => error("unknown command 'HELLO'"),
        // CLIENT SETINFO, SELECT and other connection setup
        _ => "+OK\r\n".to_string(),
    }
}

fn bulk(value: &str) -> String {
    format!("${}\r\n{}\r\n", value.len(), value)
}

fn error(message: &str) -> String {
    format!("-ERR {}\r\n", message)
}
