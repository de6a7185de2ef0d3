//! HTTP client for end-to-end tests
//!
//! Wraps reqwest and provides one method per server endpoint.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::json;
use std::time::Duration;

/// HTTP test client with cookie-based session management
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    /// Creates a new unauthenticated client
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true) // Automatically handle session cookies
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// Creates a client signed in as the pre-registered test user
    ///
    /// # Panics
    ///
    /// Panics if authentication fails (indicates test infrastructure problem).
    pub async fn authenticated(base_url: String) -> Self {
        let client = Self::new(base_url);

        let response = client.login(TEST_EMAIL, TEST_PASS).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::OK,
            "Test user authentication failed: {:?}",
            response.text().await
        );

        client
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================================================
    // Authentication Endpoints
    // ========================================================================

    /// POST /v1/auth/signup
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> Response {
        self.client
            .post(self.url("/v1/auth/signup"))
            .json(&json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Signup request failed")
    }

    /// POST /v1/auth/login
    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.client
            .post(self.url("/v1/auth/login"))
            .json(&json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Login request failed")
    }

    /// GET /v1/auth/logout
    pub async fn logout(&self) -> Response {
        self.client
            .get(self.url("/v1/auth/logout"))
            .send()
            .await
            .expect("Logout request failed")
    }

    /// GET /v1/auth/userinfo
    pub async fn userinfo(&self) -> Response {
        self.client
            .get(self.url("/v1/auth/userinfo"))
            .send()
            .await
            .expect("Userinfo request failed")
    }

    // ========================================================================
    // Mood Endpoints
    // ========================================================================

    /// POST /v1/mood
    pub async fn submit_feelings(&self, text: &str) -> Response {
        self.client
            .post(self.url("/v1/mood"))
            .json(&json!({ "text": text }))
            .send()
            .await
            .expect("Submit feelings request failed")
    }

    /// GET /v1/mood/history
    pub async fn get_history(&self) -> Response {
        self.client
            .get(self.url("/v1/mood/history"))
            .send()
            .await
            .expect("Get history request failed")
    }

    /// DELETE /v1/mood/history
    pub async fn clear_history(&self) -> Response {
        self.client
            .delete(self.url("/v1/mood/history"))
            .send()
            .await
            .expect("Clear history request failed")
    }

    /// DELETE /v1/mood/history/{index}
    pub async fn delete_history_entry(&self, index: usize) -> Response {
        self.client
            .delete(self.url(&format!("/v1/mood/history/{}", index)))
            .send()
            .await
            .expect("Delete history entry request failed")
    }

    /// GET /v1/mood/insights
    pub async fn get_insights(&self) -> Response {
        self.client
            .get(self.url("/v1/mood/insights"))
            .send()
            .await
            .expect("Get insights request failed")
    }

    /// GET /v1/mood/solution
    pub async fn get_solution(&self) -> Response {
        self.client
            .get(self.url("/v1/mood/solution"))
            .send()
            .await
            .expect("Get solution request failed")
    }

    // ========================================================================
    // Assistant Endpoints
    // ========================================================================

    /// GET /v1/assistant/chat
    pub async fn chat_greeting(&self) -> Response {
        self.client
            .get(self.url("/v1/assistant/chat"))
            .send()
            .await
            .expect("Greeting request failed")
    }

    /// POST /v1/assistant/chat
    pub async fn chat(&self, question: &str) -> Response {
        self.client
            .post(self.url("/v1/assistant/chat"))
            .json(&json!({ "question": question }))
            .send()
            .await
            .expect("Chat request failed")
    }

    // ========================================================================
    // Catalog Endpoints
    // ========================================================================

    /// GET /v1/catalog/search?q=
    pub async fn search(&self, query: &str) -> Response {
        self.client
            .get(self.url("/v1/catalog/search"))
            .query(&[("q", query)])
            .send()
            .await
            .expect("Search request failed")
    }

    /// GET /v1/catalog/search/history
    pub async fn search_history(&self) -> Response {
        self.client
            .get(self.url("/v1/catalog/search/history"))
            .send()
            .await
            .expect("Search history request failed")
    }

    /// GET /v1/catalog/genres
    pub async fn genres(&self) -> Response {
        self.client
            .get(self.url("/v1/catalog/genres"))
            .send()
            .await
            .expect("Genres request failed")
    }

    /// GET /v1/catalog/genre/{genre}?offset=
    pub async fn browse_genre(&self, genre: &str, offset: usize) -> Response {
        self.client
            .get(self.url(&format!("/v1/catalog/genre/{}", genre)))
            .query(&[("offset", offset)])
            .send()
            .await
            .expect("Browse genre request failed")
    }
}
