//! Stub RPC node for client integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use cid::multihash::Multihash;
use cid::Cid;
use http::StatusCode;
use serde_json::json;
use sha2::{Digest, Sha256};
use url::Url;

use client::ApiClient;

const SHA2_256: u64 = 0x12;
const RAW: u64 = 0x55;

/// CIDv1 (raw, sha2-256) of `data`, the way the stub node hashes uploads.
pub fn cid_of(data: &[u8]) -> Cid {
    let digest = Sha256::digest(data);
    let mh = Multihash::<64>::wrap(SHA2_256, &digest).unwrap();
    Cid::new_v1(RAW, mh)
}

/// One streamed `ls` record carrying a single link.
pub fn ls_line(name: &str, cid: &Cid, size: u64, type_code: i32) -> String {
    json!({
        "Objects": [{
            "Hash": "/ipfs/QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG",
            "Links": [{
                "Name": name,
                "Hash": cid.to_string(),
                "Size": size,
                "Type": type_code,
                "Target": "",
            }],
        }],
    })
    .to_string()
}

#[derive(Debug, Clone)]
pub enum Reply {
    /// Newline-delimited records, sent as one body.
    Lines(Vec<String>),
    /// Error envelope with the given status.
    Error(StatusCode, String),
}

impl Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Lines(lines) => {
                let mut body = lines.join("\n");
                body.push('\n');
                (StatusCode::OK, body).into_response()
            }
            Reply::Error(status, message) => (
                status,
                Json(json!({ "Message": message, "Code": 0, "Type": "error" })),
            )
                .into_response(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedPart {
    pub filename: String,
    pub content_type: String,
    pub abspath: Option<String>,
    pub abspath_encoded: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub command: String,
    pub query: Vec<(String, String)>,
}

impl Recorded {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

pub struct Stub {
    version: Mutex<Reply>,
    add: Mutex<Option<Reply>>,
    ls: Mutex<Reply>,
    pub version_calls: AtomicUsize,
    pub requests: Mutex<Vec<Recorded>>,
    pub parts: Mutex<Vec<UploadedPart>>,
}

pub struct StubNode {
    pub url: Url,
    pub stub: Arc<Stub>,
}

impl StubNode {
    /// Start a stub reporting `version` on an ephemeral local port.
    pub async fn spawn(version: &str) -> Self {
        let stub = Arc::new(Stub {
            version: Mutex::new(version_reply(version)),
            add: Mutex::new(None),
            ls: Mutex::new(Reply::Lines(Vec::new())),
            version_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            parts: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/v0/version", post(version_handler))
            .route("/api/v0/add", post(add_handler))
            .route("/api/v0/ls", post(ls_handler))
            .with_state(stub.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: Url::parse(&format!("http://{}", addr)).unwrap(),
            stub,
        }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.url).unwrap()
    }

    pub fn set_version(&self, reply: Reply) {
        *self.stub.version.lock().unwrap() = reply;
    }

    /// Replace the hashing add handler with a canned reply.
    pub fn set_add(&self, reply: Reply) {
        *self.stub.add.lock().unwrap() = Some(reply);
    }

    pub fn set_ls(&self, reply: Reply) {
        *self.stub.ls.lock().unwrap() = reply;
    }

    pub fn version_calls(&self) -> usize {
        self.stub.version_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self, command: &str) -> Vec<Recorded> {
        self.stub
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.command == command)
            .cloned()
            .collect()
    }

    pub fn parts(&self) -> Vec<UploadedPart> {
        self.stub.parts.lock().unwrap().clone()
    }

    pub fn clear_parts(&self) {
        self.stub.parts.lock().unwrap().clear();
    }
}

pub fn version_reply(version: &str) -> Reply {
    Reply::Lines(vec![json!({
        "Version": version,
        "Commit": "stub",
        "Repo": "16",
        "System": "amd64/linux",
        "Golang": "go1.22",
    })
    .to_string()])
}

fn record(stub: &Stub, command: &str, query: Vec<(String, String)>) {
    stub.requests.lock().unwrap().push(Recorded {
        command: command.to_string(),
        query,
    });
}

async fn version_handler(State(stub): State<Arc<Stub>>) -> Response {
    stub.version_calls.fetch_add(1, Ordering::SeqCst);
    record(&stub, "version", Vec::new());
    let reply = stub.version.lock().unwrap().clone();
    reply.into_response()
}

async fn ls_handler(
    State(stub): State<Arc<Stub>>,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    record(&stub, "ls", query);
    let reply = stub.ls.lock().unwrap().clone();
    reply.into_response()
}

async fn add_handler(
    State(stub): State<Arc<Stub>>,
    Query(query): Query<Vec<(String, String)>>,
    mut multipart: Multipart,
) -> Response {
    let progress = query.iter().any(|(k, v)| k == "progress" && v == "true");
    record(&stub, "add", query);

    let mut uploaded = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let header = |name: &str| {
            field
                .headers()
                .get(name)
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        };
        let abspath = header("abspath");
        let abspath_encoded = header("abspath-encoded");
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await.unwrap().to_vec();

        uploaded.push(UploadedPart {
            filename,
            content_type,
            abspath,
            abspath_encoded,
            data,
        });
    }
    stub.parts.lock().unwrap().extend(uploaded.iter().cloned());

    let canned = stub.add.lock().unwrap().clone();
    if let Some(reply) = canned {
        return reply.into_response();
    }

    // every file gets a record, the root is the hash of all file contents
    let mut lines = Vec::new();
    let mut all = Vec::new();
    for part in uploaded
        .iter()
        .filter(|p| p.content_type == "application/octet-stream")
    {
        if progress {
            lines.push(json!({ "Name": part.filename, "Bytes": part.data.len() }).to_string());
        }
        lines.push(
            json!({
                "Name": part.filename,
                "Hash": cid_of(&part.data).to_string(),
                "Size": part.data.len().to_string(),
            })
            .to_string(),
        );
        all.extend_from_slice(&part.data);
    }
    lines.push(
        json!({
            "Name": "",
            "Hash": cid_of(&all).to_string(),
            "Size": all.len().to_string(),
        })
        .to_string(),
    );

    Reply::Lines(lines).into_response()
}
