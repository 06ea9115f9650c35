#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::Uri;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Isolated home and config directories for one test.
pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");
        let dir = tmp.path().to_path_buf();

        Self {
            _tmp: tmp,
            home,
            dir,
        }
    }

    /// Command with no API key and no config override in its environment.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("medreport");
        cmd.env("HOME", &self.home)
            .env("XDG_CONFIG_HOME", self.home.join(".config"))
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("MEDREPORT_CONFIG")
            .env_remove("GOOGLE_API_KEY");
        cmd
    }

    /// Command pointed at `fake` with a test API key.
    pub fn cmd_against(&self, fake: &FakeGemini) -> Command {
        let config = self.write_config(&fake.endpoint);
        let mut cmd = self.cmd();
        cmd.env("GOOGLE_API_KEY", "test-key").arg("--config").arg(config);
        cmd
    }

    /// Write a config file whose endpoint is `endpoint`.
    pub fn write_config(&self, endpoint: &str) -> PathBuf {
        let path = self.dir.join("config.toml");
        fs::write(&path, format!("[llm]\nendpoint = \"{endpoint}\"\n")).expect("write config");
        path
    }

    pub fn write_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.dir.join(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }
}

/// One request received by the fake model server.
#[derive(Debug, Clone)]
pub struct Captured {
    pub path: String,
    pub body: Value,
}

type FakeState = (Arc<Mutex<Vec<Captured>>>, Arc<String>);

/// Local stand-in for the Generative Language API.
///
/// Every request is answered with a candidate whose text is `reply`.
pub struct FakeGemini {
    pub endpoint: String,
    seen: Arc<Mutex<Vec<Captured>>>,
    _runtime: tokio::runtime::Runtime,
}

impl FakeGemini {
    pub fn replying(reply: &str) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("build runtime");

        let seen = Arc::new(Mutex::new(Vec::new()));
        let state: FakeState = (seen.clone(), Arc::new(reply.to_string()));

        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind fake server");
        listener.set_nonblocking(true).expect("nonblocking listener");
        let addr = listener.local_addr().expect("local addr");

        runtime.spawn(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
            let app = Router::new().fallback(fake_reply).with_state(state);
            axum::serve(listener, app).await.expect("fake server");
        });

        Self {
            endpoint: format!("http://{addr}/v1beta"),
            seen,
            _runtime: runtime,
        }
    }

    pub fn hits(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.seen.lock().unwrap().clone()
    }
}

async fn fake_reply(State((seen, reply)): State<FakeState>, uri: Uri, body: Bytes) -> Json<Value> {
    seen.lock().unwrap().push(Captured {
        path: uri.path().to_string(),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });
    Json(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": reply.as_str()}]},
            "finishReason": "STOP"
        }]
    }))
}

/// A small valid PNG.
pub fn png_bytes() -> Vec<u8> {
    let mut out = Vec::new();
    image::DynamicImage::new_rgb8(4, 4)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .expect("encode png");
    out
}

pub fn parse_stdout(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).expect("valid json output")
}
