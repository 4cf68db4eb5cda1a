//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use holdover::control::{BackendControl, BackendStatus, ControlError};
use holdover::gateway::{GatewayError, MigrationReport, RoutingGateway, UserId};

/// Start a programmable HTTP mock on an ephemeral port.
///
/// `f` receives the request line (e.g. `"POST /start HTTP/1.1"`) and returns
/// the status code and body to answer with.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&buf);
                let request_line = request.lines().next().unwrap_or_default().to_string();

                let (status, body) = f(request_line).await;
                let status_text = match status {
                    200 => "200 OK".to_string(),
                    202 => "202 Accepted".to_string(),
                    404 => "404 Not Found".to_string(),
                    500 => "500 Internal Server Error".to_string(),
                    503 => "503 Service Unavailable".to_string(),
                    other => format!("{} Unknown", other),
                };

                let response_str = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response_str.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Control endpoint stand-in that records every call.
///
/// `status` answers from a script; once it runs out the fallback is used.
pub struct RecordingControl {
    pub start_calls: AtomicUsize,
    pub stop_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    script: Mutex<VecDeque<BackendStatus>>,
    fallback: BackendStatus,
    fail_commands: bool,
}

impl RecordingControl {
    pub fn new(script: Vec<BackendStatus>, fallback: BackendStatus) -> Arc<Self> {
        Arc::new(Self {
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            script: Mutex::new(script.into()),
            fallback,
            fail_commands: false,
        })
    }

    /// Backend that is up from the first check.
    pub fn always_up() -> Arc<Self> {
        Self::new(Vec::new(), BackendStatus::Up)
    }

    /// Backend that never comes up.
    pub fn never_up() -> Arc<Self> {
        Self::new(Vec::new(), BackendStatus::Down)
    }

    /// Commands fail, status reports up.
    pub fn failing_commands() -> Arc<Self> {
        Arc::new(Self {
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            script: Mutex::new(VecDeque::new()),
            fallback: BackendStatus::Up,
            fail_commands: true,
        })
    }

    pub fn starts(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    pub fn status_checks(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    fn command_result(&self) -> Result<(), ControlError> {
        if self.fail_commands {
            Err(ControlError::Status(503))
        } else {
            Ok(())
        }
    }
}

impl BackendControl for RecordingControl {
    async fn start(&self) -> Result<(), ControlError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        self.command_result()
    }

    async fn stop(&self) -> Result<(), ControlError> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.command_result()
    }

    async fn status(&self) -> BackendStatus {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback)
    }
}

/// Gateway stand-in: holds a set of parked players and records migrations.
/// Migrated players leave the holding set, like a real connection move.
#[derive(Default)]
pub struct RecordingGateway {
    held: Mutex<HashSet<UserId>>,
    pub migrations: Mutex<Vec<HashSet<UserId>>>,
    missing_holding_backend: bool,
}

impl RecordingGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Gateway that does not know the holding backend.
    pub fn without_holding_backend() -> Arc<Self> {
        Arc::new(Self {
            missing_holding_backend: true,
            ..Self::default()
        })
    }

    pub fn park(&self, user: UserId) {
        self.held.lock().unwrap().insert(user);
    }

    pub fn migrations(&self) -> Vec<HashSet<UserId>> {
        self.migrations.lock().unwrap().clone()
    }
}

impl RoutingGateway for RecordingGateway {
    async fn held_users(&self) -> Result<HashSet<UserId>, GatewayError> {
        if self.missing_holding_backend {
            return Err(GatewayError::UnknownBackend("limbo".into()));
        }
        Ok(self.held.lock().unwrap().clone())
    }

    async fn migrate_to_main(&self, users: HashSet<UserId>) -> Result<MigrationReport, GatewayError> {
        {
            let mut held = self.held.lock().unwrap();
            for user in &users {
                held.remove(user);
            }
        }
        let moved = users.len();
        self.migrations.lock().unwrap().push(users);
        Ok(MigrationReport {
            moved,
            ..MigrationReport::default()
        })
    }
}
