// Route resolver
// Loads the file a form route needs before the form is shown

use file_manager_backend::client::{ClientError, FileApi};
use file_manager_backend::models::{File, FileId};

/// Fetch the file for an edit route, or a fresh record for a new one
pub async fn resolve_file<A>(api: &A, route_id: Option<FileId>) -> Result<File, ClientError>
where
    A: FileApi + ?Sized,
{
    match route_id {
        Some(id) => api.find(id).await?.into_body(),
        None => Ok(File::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fakes::FakeFileApi;

    #[tokio::test]
    async fn test_resolve_existing_file() {
        let stored = File {
            id: Some(123),
            title: "a.txt".to_string(),
            ..Default::default()
        };
        let api = FakeFileApi::with_files(vec![stored.clone()]);

        let resolved = resolve_file(&api, Some(123)).await.expect("resolve");
        assert_eq!(resolved, stored);
        assert_eq!(api.calls(), vec!["find 123"]);
    }

    #[tokio::test]
    async fn test_resolve_new_file_without_request() {
        let api = FakeFileApi::default();
        let resolved = resolve_file(&api, None).await.expect("resolve");
        assert!(resolved.is_new());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_missing_file_fails() {
        let api = FakeFileApi::default();
        let result = resolve_file(&api, Some(9)).await;
        assert_eq!(result.unwrap_err().status().map(|s| s.as_u16()), Some(404));
    }
}
