use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::{EligibilityCriteria, Gender, UserRecord};

/// Errors from the user directory service
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Read access to user attribute records.
///
/// The directory owns the records; the engine only reads them.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, DirectoryError>;

    /// Bulk read for pool building. Implementations may return a superset
    /// of the criteria; the pool builder re-filters in-process.
    async fn list_eligible(
        &self,
        criteria: &EligibilityCriteria,
    ) -> Result<Vec<UserRecord>, DirectoryError>;
}

/// HTTP client for the managed directory backend
///
/// Handles all communication with the directory service:
/// - Fetching single user records
/// - Bulk candidate queries with pushed-down filters
pub struct HttpDirectoryClient {
    base_url: String,
    api_key: String,
    project_id: String,
    client: Client,
}

impl HttpDirectoryClient {
    pub fn new(base_url: String, api_key: String, project_id: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            project_id,
            client,
        }
    }

    fn gender_param(gender: Gender) -> &'static str {
        match gender {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unspecified => "unspecified",
        }
    }
}

#[async_trait]
impl UserDirectory for HttpDirectoryClient {
    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, DirectoryError> {
        let url = format!(
            "{}/v1/users/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(id)
        );

        tracing::debug!("Fetching user record: {}", id);

        let response = self
            .client
            .get(&url)
            .header("X-Directory-Key", &self.api_key)
            .header("X-Directory-Project", &self.project_id)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(DirectoryError::ApiError(format!(
                "Failed to fetch user {}: {}",
                id,
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        serde_json::from_value(json)
            .map(Some)
            .map_err(|e| DirectoryError::InvalidResponse(format!("Failed to parse user: {}", e)))
    }

    async fn list_eligible(
        &self,
        criteria: &EligibilityCriteria,
    ) -> Result<Vec<UserRecord>, DirectoryError> {
        let mut params = vec![
            ("restricted".to_string(), "false".to_string()),
            ("exclude".to_string(), criteria.exclude_id.clone()),
            ("limit".to_string(), criteria.limit.to_string()),
        ];

        if let Some(gender) = criteria.gender {
            params.push(("gender".to_string(), Self::gender_param(gender).to_string()));
        }
        if let Some(school) = &criteria.school {
            params.push(("school".to_string(), school.clone()));
        }
        if let Some(program) = &criteria.program {
            params.push(("program".to_string(), program.clone()));
        }

        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let url = format!(
            "{}/v1/users?{}",
            self.base_url.trim_end_matches('/'),
            query
        );

        let response = self
            .client
            .get(&url)
            .header("X-Directory-Key", &self.api_key)
            .header("X-Directory-Project", &self.project_id)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DirectoryError::ApiError(format!(
                "Failed to query candidates: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        let documents = json
            .get("users")
            .and_then(|d| d.as_array())
            .ok_or_else(|| DirectoryError::InvalidResponse("Missing users array".into()))?;

        // Skip malformed documents instead of failing the whole batch.
        let records: Vec<UserRecord> = documents
            .iter()
            .filter_map(|doc| serde_json::from_value(doc.clone()).ok())
            .filter(|u: &UserRecord| u.id != criteria.exclude_id)
            .collect();

        tracing::debug!(
            "Directory returned {} eligible records (of {} documents)",
            records.len(),
            documents.len()
        );

        Ok(records)
    }
}

/// In-memory directory for tests and local development.
#[derive(Default)]
pub struct MemoryDirectory {
    users: HashMap<String, UserRecord>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = UserRecord>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
        }
    }

    pub fn insert(&mut self, user: UserRecord) {
        self.users.insert(user.id.clone(), user);
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, DirectoryError> {
        Ok(self.users.get(id).cloned())
    }

    async fn list_eligible(
        &self,
        criteria: &EligibilityCriteria,
    ) -> Result<Vec<UserRecord>, DirectoryError> {
        let mut records: Vec<UserRecord> = self
            .users
            .values()
            .filter(|u| u.id != criteria.exclude_id)
            .filter(|u| !u.is_restricted)
            .filter(|u| criteria.gender.map_or(true, |g| u.gender == g))
            .filter(|u| criteria.school.as_ref().map_or(true, |s| &u.school == s))
            .filter(|u| criteria.program.as_ref().map_or(true, |p| &u.program == p))
            .cloned()
            .collect();

        // Deterministic order so truncation is stable across calls.
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records.truncate(criteria.limit);

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VerificationState;
    use chrono::NaiveDate;

    fn record_json(id: &str) -> serde_json::Value {
        serde_json::json!({
            "userId": id,
            "name": format!("User {}", id),
            "birthDate": "2003-04-02",
            "gender": "female",
            "school": "Tech",
            "program": "CS",
            "preferenceText": "hiking music",
            "verification": "verified",
            "isRestricted": false,
            "reportCount": 0
        })
    }

    #[tokio::test]
    async fn test_get_user_parses_record() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/users/alice")
            .match_header("X-Directory-Key", "key")
            .with_status(200)
            .with_body(record_json("alice").to_string())
            .create_async()
            .await;

        let client = HttpDirectoryClient::new(server.url(), "key".into(), "proj".into());
        let user = client.get_user("alice").await.unwrap().unwrap();

        assert_eq!(user.id, "alice");
        assert_eq!(user.verification, VerificationState::Verified);
        assert_eq!(user.birth_date, NaiveDate::from_ymd_opt(2003, 4, 2).unwrap());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_user_maps_404_to_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/users/ghost")
            .with_status(404)
            .create_async()
            .await;

        let client = HttpDirectoryClient::new(server.url(), "key".into(), "proj".into());
        assert!(client.get_user("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_eligible_skips_malformed_documents() {
        let mut server = mockito::Server::new_async().await;
        let body = serde_json::json!({
            "total": 3,
            "users": [
                record_json("bob"),
                {"userId": "broken"},
                record_json("carol"),
            ]
        });
        server
            .mock("GET", "/v1/users")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = HttpDirectoryClient::new(server.url(), "key".into(), "proj".into());
        let criteria = EligibilityCriteria {
            exclude_id: "alice".to_string(),
            gender: Some(Gender::Female),
            school: None,
            program: None,
            limit: 10,
        };
        let records = client.list_eligible(&criteria).await.unwrap();
        let ids: Vec<&str> = records.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["bob", "carol"]);
    }

    #[tokio::test]
    async fn test_list_eligible_surfaces_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/users")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = HttpDirectoryClient::new(server.url(), "key".into(), "proj".into());
        let criteria = EligibilityCriteria {
            exclude_id: "alice".to_string(),
            gender: None,
            school: None,
            program: None,
            limit: 10,
        };
        assert!(matches!(
            client.list_eligible(&criteria).await,
            Err(DirectoryError::ApiError(_))
        ));
    }
}
