//! User lookup client

use super::{json_response, send, ClientError, ClientResponse, UserApi, LOGIN_HEADER};
use crate::models::UserDto;
use async_trait::async_trait;

/// HTTP client for `{api_base}/api/users`
#[derive(Debug, Clone)]
pub struct UserClient {
    http: reqwest::Client,
    url: String,
    login: Option<String>,
}

impl UserClient {
    /// Create a client for the API served at `api_base`
    pub fn new(http: reqwest::Client, api_base: &str) -> Self {
        Self {
            http,
            url: format!("{}/api/users", api_base.trim_end_matches('/')),
            login: None,
        }
    }

    /// Act as the given login on every request
    pub fn with_login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }
}

#[async_trait]
impl UserApi for UserClient {
    async fn query(&self) -> Result<ClientResponse<Vec<UserDto>>, ClientError> {
        let mut request = self.http.get(&self.url);
        if let Some(login) = &self.login {
            request = request.header(LOGIN_HEADER, login);
        }
        json_response(send(request).await?).await
    }
}
