use serde::Deserialize;

// GitHub API response structures, as returned by `GET /users/{username}/repos`.
// Only the fields the browser reads are declared; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepo {
    pub id: u64,
    pub name: String,
    pub size: u64,
    pub stargazers_count: u64,
    pub language: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
