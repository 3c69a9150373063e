// In-memory API doubles for component tests

use async_trait::async_trait;
use file_manager_backend::client::{
    ClientError, ClientResponse, FileApi, FileUpload, QueryOptions, UserApi, ALERT_HEADER,
    ALERT_PARAMS_HEADER, TOTAL_COUNT_HEADER,
};
use file_manager_backend::models::{File, FileId, UserDto};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use std::sync::Mutex;

/// Records every call; answers from an in-memory list
#[derive(Default)]
pub struct FakeFileApi {
    pub files: Mutex<Vec<File>>,
    pub calls: Mutex<Vec<String>>,
    pub fail: bool,
    pub hang: bool,
}

impl FakeFileApi {
    pub fn with_files(files: Vec<File>) -> Self {
        Self {
            files: Mutex::new(files),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, call: String) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(call);
        if self.hang {
            std::future::pending::<()>().await;
        }
        if self.fail {
            return Err(ClientError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "boom".to_string(),
            });
        }
        Ok(())
    }

    fn stored(&self, upload: &FileUpload, description: &str) -> File {
        let mut files = self.files.lock().unwrap();
        let file = File {
            id: Some(files.len() as FileId + 1),
            title: upload.file_name.clone(),
            description: description.to_string(),
            ..Default::default()
        };
        files.push(file.clone());
        file
    }
}

fn response<T>(body: Option<T>, alert: &str, param: &str) -> ClientResponse<T> {
    let mut headers = HeaderMap::new();
    if !alert.is_empty() {
        headers.insert(ALERT_HEADER, HeaderValue::from_str(alert).unwrap());
        headers.insert(ALERT_PARAMS_HEADER, HeaderValue::from_str(param).unwrap());
    }
    ClientResponse {
        status: StatusCode::OK,
        headers,
        body,
    }
}

#[async_trait]
impl FileApi for FakeFileApi {
    async fn create(
        &self,
        upload: FileUpload,
        description: &str,
    ) -> Result<ClientResponse<File>, ClientError> {
        self.record(format!("create {}", upload.file_name)).await?;
        let file = self.stored(&upload, description);
        let id = file.id.unwrap().to_string();
        Ok(response(Some(file), "fileManagerApp.file.created", &id))
    }

    async fn create_files(
        &self,
        uploads: Vec<FileUpload>,
        description: &str,
    ) -> Result<ClientResponse<Vec<File>>, ClientError> {
        self.record(format!("create_files {}", uploads.len())).await?;
        let files: Vec<File> = uploads
            .iter()
            .map(|upload| self.stored(upload, description))
            .collect();
        Ok(response(Some(files), "fileManagerApp.file.created", ""))
    }

    async fn update(&self, file: &File) -> Result<ClientResponse<File>, ClientError> {
        self.record(format!("update {}", file.id.unwrap_or_default())).await?;
        let id = file.id.unwrap_or_default().to_string();
        Ok(response(Some(file.clone()), "fileManagerApp.file.updated", &id))
    }

    async fn find(&self, id: FileId) -> Result<ClientResponse<File>, ClientError> {
        self.record(format!("find {}", id)).await?;
        let file = self
            .files
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.id == Some(id))
            .cloned();
        match file {
            Some(file) => Ok(response(Some(file), "", "")),
            None => Err(ClientError::Status {
                status: StatusCode::NOT_FOUND,
                message: format!("File not found: {}", id),
            }),
        }
    }

    async fn download(&self, id: FileId) -> Result<Vec<u8>, ClientError> {
        self.record(format!("download {}", id)).await?;
        Ok(format!("content of {}", id).into_bytes())
    }

    async fn query(&self, options: &QueryOptions) -> Result<ClientResponse<Vec<File>>, ClientError> {
        self.record(format!("query {:?}", options.page)).await?;
        let files = self.files.lock().unwrap().clone();
        let rows = match (options.page, options.size) {
            (Some(page), Some(size)) => files
                .iter()
                .skip((page * size) as usize)
                .take(size as usize)
                .cloned()
                .collect(),
            _ => files.clone(),
        };
        let mut response = response(Some(rows), "", "");
        response.headers.insert(
            TOTAL_COUNT_HEADER,
            HeaderValue::from_str(&files.len().to_string()).unwrap(),
        );
        Ok(response)
    }

    async fn delete(&self, id: FileId) -> Result<ClientResponse<()>, ClientError> {
        self.record(format!("delete {}", id)).await?;
        self.files.lock().unwrap().retain(|f| f.id != Some(id));
        Ok(response(None, "fileManagerApp.file.deleted", &id.to_string()))
    }
}

/// Serves a fixed user list, or fails
#[derive(Default)]
pub struct FakeUserApi {
    pub users: Vec<UserDto>,
    pub fail: bool,
}

impl FakeUserApi {
    pub fn seeded() -> Self {
        Self {
            users: vec![
                UserDto {
                    id: 1,
                    login: "admin".to_string(),
                    first_name: Some("Administrator".to_string()),
                    last_name: None,
                    email: None,
                },
                UserDto {
                    id: 2,
                    login: "user".to_string(),
                    first_name: Some("User".to_string()),
                    last_name: None,
                    email: None,
                },
            ],
            fail: false,
        }
    }
}

#[async_trait]
impl UserApi for FakeUserApi {
    async fn query(&self) -> Result<ClientResponse<Vec<UserDto>>, ClientError> {
        if self.fail {
            return Err(ClientError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: "users unavailable".to_string(),
            });
        }
        Ok(response(Some(self.users.clone()), "", ""))
    }
}
