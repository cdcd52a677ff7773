#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use github_repo_browser::github::{ClientConfig, GitHubClient};
use github_repo_browser::models::{parse_timestamp, Repository, Zone};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned reply for one username
#[derive(Clone)]
pub struct MockReply {
    pub status: StatusCode,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
    pub delay: Duration,
}

impl MockReply {
    pub fn ok(body: Value) -> Self {
        MockReply {
            status: StatusCode::OK,
            headers: Vec::new(),
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: StatusCode, body: &str) -> Self {
        MockReply {
            status,
            headers: Vec::new(),
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn raw(body: &str) -> Self {
        MockReply::status(StatusCode::OK, body)
    }

    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone, Default)]
struct MockState {
    replies: Arc<HashMap<String, MockReply>>,
    hits: Arc<Mutex<Vec<String>>>,
}

/// Local stand-in for `GET /users/{username}/repos`
pub struct MockGitHub {
    pub base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
    server: tokio::task::JoinHandle<()>,
}

impl MockGitHub {
    pub async fn start(replies: Vec<(&str, MockReply)>) -> anyhow::Result<Self> {
        let state = MockState {
            replies: Arc::new(
                replies
                    .into_iter()
                    .map(|(user, reply)| (user.to_string(), reply))
                    .collect(),
            ),
            hits: Arc::new(Mutex::new(Vec::new())),
        };
        let hits = state.hits.clone();

        let app = Router::new()
            .route("/users/:username/repos", get(user_repos))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(MockGitHub {
            base_url: format!("http://{}", addr),
            hits,
            server,
        })
    }

    pub fn client(&self) -> GitHubClient {
        GitHubClient::new(ClientConfig::with_base_url(self.base_url.clone()))
            .expect("Failed to create client")
    }

    /// Usernames requested so far, in arrival order
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

impl Drop for MockGitHub {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn user_repos(Path(username): Path<String>, State(state): State<MockState>) -> Response {
    state.hits.lock().unwrap().push(username.clone());

    let Some(reply) = state.replies.get(&username).cloned() else {
        return (StatusCode::NOT_FOUND, r#"{"message":"Not Found"}"#).into_response();
    };

    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    let mut headers = HeaderMap::new();
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    for (name, value) in &reply.headers {
        headers.insert(
            HeaderName::from_static(*name),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    (reply.status, headers, reply.body).into_response()
}

pub fn utc() -> Zone {
    Zone::utc()
}

/// Upstream JSON for one repository
pub fn repo_json(
    id: u64,
    size: u64,
    stars: u64,
    language: Option<&str>,
    created_at: &str,
) -> Value {
    json!({
        "id": id,
        "name": format!("repo-{}", id),
        "full_name": format!("octocat/repo-{}", id),
        "size": size,
        "stargazers_count": stars,
        "language": language,
        "created_at": created_at,
        "updated_at": "2024-03-01T12:00:00Z",
        "private": false
    })
}

pub fn repo(
    id: u64,
    size: u64,
    stars: u64,
    language: Option<&str>,
    created_at: &str,
) -> Repository {
    Repository {
        id,
        name: format!("repo-{}", id),
        size,
        stargazers_count: stars,
        language: language.map(str::to_string),
        created_at: parse_timestamp(created_at).unwrap(),
        updated_at: parse_timestamp("2024-03-01T12:00:00Z").unwrap(),
    }
}

/// `count` repositories with distinct ids and descending sizes
pub fn many_repos(count: u64) -> Vec<Repository> {
    (1..=count)
        .map(|id| repo(id, 1000 - id, id % 6, Some("Rust"), "2022-05-05T10:00:00Z"))
        .collect()
}

/// Two Go repositories, sizes 50 and 100, created in different years
pub fn two_go_repos_json() -> Value {
    json!([
        repo_json(1, 50, 5, Some("Go"), "2022-01-01"),
        repo_json(2, 100, 1, Some("Go"), "2023-06-01"),
    ])
}
