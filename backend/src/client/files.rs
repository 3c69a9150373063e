//! File resource client

use super::{
    json_response, send, ClientError, ClientResponse, FileApi, FileUpload, QueryOptions,
    LOGIN_HEADER,
};
use crate::models::{File, FileDto, FileId};
use async_trait::async_trait;
use reqwest::{multipart::Form, Method, RequestBuilder};

/// HTTP client for `{api_base}/api/files`
#[derive(Debug, Clone)]
pub struct FileClient {
    http: reqwest::Client,
    resource_url: String,
    login: Option<String>,
}

impl FileClient {
    /// Create a client for the API served at `api_base` (e.g. `http://localhost:8080`)
    ///
    /// The `reqwest::Client` is shared so connections are pooled across calls.
    pub fn new(http: reqwest::Client, api_base: &str) -> Self {
        Self {
            http,
            resource_url: format!("{}/api/files", api_base.trim_end_matches('/')),
            login: None,
        }
    }

    /// Act as the given login on every request
    pub fn with_login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }

    /// Base URL of the file resource
    pub fn resource_url(&self) -> &str {
        &self.resource_url
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.login {
            Some(login) => builder.header(LOGIN_HEADER, login),
            None => builder,
        }
    }

    async fn upload(
        &self,
        path: &str,
        form: Form,
    ) -> Result<reqwest::Response, ClientError> {
        let url = format!("{}/{}", self.resource_url, path);
        tracing::debug!(url = %url, "Uploading to file API");
        send(self.request(Method::POST, &url).multipart(form)).await
    }
}

/// Convert a record for sending: the date becomes its wire string
pub fn convert_date_from_client(file: &File) -> FileDto {
    file.to_dto()
}

/// Convert a received record: the wire date becomes a `DateTime`
pub fn convert_date_from_server(response: ClientResponse<FileDto>) -> ClientResponse<File> {
    response.map_body(File::from_dto)
}

/// Convert every record of a received list
pub fn convert_date_array_from_server(
    response: ClientResponse<Vec<FileDto>>,
) -> ClientResponse<Vec<File>> {
    response.map_body(|files| files.into_iter().map(File::from_dto).collect())
}

#[async_trait]
impl FileApi for FileClient {
    async fn create(
        &self,
        upload: FileUpload,
        description: &str,
    ) -> Result<ClientResponse<File>, ClientError> {
        let form = Form::new()
            .text("description", description.to_string())
            .part("file", upload.into_part()?);
        let response = self.upload("single-file", form).await?;
        Ok(convert_date_from_server(json_response(response).await?))
    }

    async fn create_files(
        &self,
        uploads: Vec<FileUpload>,
        description: &str,
    ) -> Result<ClientResponse<Vec<File>>, ClientError> {
        if uploads.is_empty() {
            return Err(ClientError::InvalidUpload("No files selected".to_string()));
        }
        let mut form = Form::new().text("description", description.to_string());
        for upload in uploads {
            form = form.part("files", upload.into_part()?);
        }
        let response = self.upload("multiple-files", form).await?;
        Ok(convert_date_array_from_server(json_response(response).await?))
    }

    async fn update(&self, file: &File) -> Result<ClientResponse<File>, ClientError> {
        let copy = convert_date_from_client(file);
        let response = send(self.request(Method::PUT, &self.resource_url).json(&copy)).await?;
        Ok(convert_date_from_server(json_response(response).await?))
    }

    async fn find(&self, id: FileId) -> Result<ClientResponse<File>, ClientError> {
        let url = format!("{}/{}", self.resource_url, id);
        let response = send(self.request(Method::GET, &url)).await?;
        Ok(convert_date_from_server(json_response(response).await?))
    }

    async fn download(&self, id: FileId) -> Result<Vec<u8>, ClientError> {
        let url = format!("{}/download/{}", self.resource_url, id);
        let response = send(self.request(Method::GET, &url)).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn query(
        &self,
        options: &QueryOptions,
    ) -> Result<ClientResponse<Vec<File>>, ClientError> {
        let response = send(
            self.request(Method::GET, &self.resource_url)
                .query(&options.to_pairs()),
        )
        .await?;
        Ok(convert_date_array_from_server(json_response(response).await?))
    }

    async fn delete(&self, id: FileId) -> Result<ClientResponse<()>, ClientError> {
        let url = format!("{}/{}", self.resource_url, id);
        let response = send(self.request(Method::DELETE, &url)).await?;
        Ok(ClientResponse {
            status: response.status(),
            headers: response.headers().clone(),
            body: None,
        })
    }
}
