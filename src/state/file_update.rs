// File update component
// Form state for creating or editing a file: owner selection, attachments and save flow

use crate::state::alerts::AlertService;
use crate::state::navigation::Navigator;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use file_manager_backend::client::{ClientError, FileApi, FileUpload, UserApi};
use file_manager_backend::models::{File, UserDto, UserId};
use std::sync::Arc;

/// Format of the creation date text field (local time, minute precision)
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Identity of a row in the owner selection list
pub fn track_user_by_id(_index: usize, user: &UserDto) -> UserId {
    user.id
}

/// Format a timestamp for the date field
pub fn format_form_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.with_timezone(&Local).format(DATE_TIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// Parse the date field back; blank or malformed text yields `None`
pub fn parse_form_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let naive = NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT).ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// Create/edit form for one file
pub struct FileUpdateComponent<F: ?Sized, U: ?Sized> {
    file_api: Arc<F>,
    user_api: Arc<U>,
    alerts: AlertService,
    /// Record being edited; `id` is unset for a new upload
    pub file: File,
    /// Creation date text bound to the form
    pub creation_date: String,
    /// Owner choices
    pub users: Vec<UserDto>,
    /// Local files to upload on save (new records only)
    pub attachments: Vec<FileUpload>,
    /// True while a save request is in flight
    pub is_saving: bool,
}

impl<F, U> FileUpdateComponent<F, U>
where
    F: FileApi + ?Sized,
    U: UserApi + ?Sized,
{
    /// Create an empty form bound to the given services
    pub fn new(file_api: Arc<F>, user_api: Arc<U>, alerts: AlertService) -> Self {
        Self {
            file_api,
            user_api,
            alerts,
            file: File::default(),
            creation_date: String::new(),
            users: Vec::new(),
            attachments: Vec::new(),
            is_saving: false,
        }
    }

    /// Load the resolved file into the form and fetch the owner choices
    pub async fn init(&mut self, resolved: File) {
        self.is_saving = false;
        self.creation_date = format_form_date(resolved.creation_date);
        self.file = resolved;
        self.attachments.clear();

        match self.user_api.query().await.and_then(|res| res.into_body()) {
            Ok(users) => self.users = users,
            Err(e) => self.on_error(e),
        }
    }

    /// True when the form edits an existing record
    pub fn is_edit(&self) -> bool {
        !self.file.is_new()
    }

    /// Whether the save button is enabled
    pub fn can_save(&self) -> bool {
        !self.is_saving && (self.is_edit() || !self.attachments.is_empty())
    }

    /// Queue a local file for upload
    pub fn attach(&mut self, upload: FileUpload) {
        self.attachments.push(upload);
    }

    /// Drop a queued upload
    pub fn remove_attachment(&mut self, index: usize) {
        if index < self.attachments.len() {
            self.attachments.remove(index);
        }
    }

    /// Leave the form without saving
    pub fn previous_state(&self, navigator: &mut impl Navigator) {
        navigator.previous_state();
    }

    /// Save the form: update an existing record, or upload the attachments
    ///
    /// Navigates back on success. On failure the form stays open and an error
    /// alert is raised.
    pub async fn save(&mut self, navigator: &mut impl Navigator) {
        self.is_saving = true;
        self.file.creation_date = parse_form_date(&self.creation_date);

        match self.dispatch().await {
            Ok(()) => self.on_save_success(navigator),
            Err(e) => self.on_save_error(e),
        }
    }

    async fn dispatch(&self) -> Result<(), ClientError> {
        if self.is_edit() {
            let response = self.file_api.update(&self.file).await?;
            self.alerts.success_from(&response);
            return Ok(());
        }

        match self.attachments.as_slice() {
            [] => Err(ClientError::InvalidUpload("No file selected".to_string())),
            [upload] => {
                let response = self
                    .file_api
                    .create(upload.clone(), &self.file.description)
                    .await?;
                self.alerts.success_from(&response);
                Ok(())
            }
            uploads => {
                let response = self
                    .file_api
                    .create_files(uploads.to_vec(), &self.file.description)
                    .await?;
                self.alerts.success_from(&response);
                Ok(())
            }
        }
    }

    fn on_save_success(&mut self, navigator: &mut impl Navigator) {
        self.is_saving = false;
        self.attachments.clear();
        self.previous_state(navigator);
    }

    fn on_save_error(&mut self, error: ClientError) {
        self.is_saving = false;
        self.on_error(error);
    }

    fn on_error(&self, error: ClientError) {
        tracing::error!(error = %error, "File form request failed");
        self.alerts.error(error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::alerts::Severity;
    use crate::state::fakes::{FakeFileApi, FakeUserApi};
    use crate::state::navigation::{Route, RouteStack};
    use std::time::Duration;

    type Component = FileUpdateComponent<FakeFileApi, FakeUserApi>;

    fn component(files: FakeFileApi, users: FakeUserApi) -> (Component, AlertService) {
        let alerts = AlertService::new();
        let component = FileUpdateComponent::new(Arc::new(files), Arc::new(users), alerts.clone());
        (component, alerts)
    }

    fn existing() -> File {
        File {
            id: Some(123),
            title: "a.txt".to_string(),
            description: "notes".to_string(),
            creation_date: Some(Utc.with_ymd_and_hms(2019, 3, 1, 10, 15, 0).unwrap()),
            user_id: Some(2),
            user_name: Some("User".to_string()),
        }
    }

    fn edit_route() -> RouteStack {
        let mut routes = RouteStack::new();
        routes.navigate(Route::EditFile(123));
        routes
    }

    #[test]
    fn test_form_date_round_trip() {
        let date = Utc.with_ymd_and_hms(2019, 3, 1, 10, 15, 0).unwrap();
        let text = format_form_date(Some(date));
        assert_eq!(text.len(), "2019-03-01T10:15".len());
        assert_eq!(parse_form_date(&text), Some(date));
        assert_eq!(format_form_date(None), "");
        assert_eq!(parse_form_date(""), None);
        assert_eq!(parse_form_date("yesterday"), None);
    }

    #[tokio::test]
    async fn test_init_loads_file_and_users() {
        let (mut component, alerts) = component(FakeFileApi::default(), FakeUserApi::seeded());
        component.init(existing()).await;

        assert_eq!(component.file, existing());
        assert!(!component.creation_date.is_empty());
        assert_eq!(component.users.len(), 2);
        assert!(!component.is_saving);
        assert!(alerts.drain().is_empty());
    }

    #[tokio::test]
    async fn test_init_user_failure_raises_alert() {
        let users = FakeUserApi {
            fail: true,
            ..Default::default()
        };
        let (mut component, alerts) = component(FakeFileApi::default(), users);
        component.init(File::default()).await;

        assert!(component.users.is_empty());
        let drained = alerts.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_save_existing_calls_update_and_navigates_back() {
        let files = Arc::new(FakeFileApi::default());
        let alerts = AlertService::new();
        let mut component =
            FileUpdateComponent::new(files.clone(), Arc::new(FakeUserApi::seeded()), alerts.clone());
        component.init(existing()).await;
        let mut routes = edit_route();

        component.save(&mut routes).await;

        assert_eq!(files.calls(), vec!["update 123"]);
        assert!(!component.is_saving);
        assert_eq!(routes.current(), Route::FileList);
        assert_eq!(component.file.creation_date, existing().creation_date);
        assert_eq!(
            alerts.drain()[0].message,
            "A file is updated with identifier 123"
        );
    }

    #[tokio::test]
    async fn test_save_new_uploads_single_attachment() {
        let files = Arc::new(FakeFileApi::default());
        let mut component = FileUpdateComponent::new(
            files.clone(),
            Arc::new(FakeUserApi::seeded()),
            AlertService::new(),
        );
        component.init(File::default()).await;
        assert!(!component.can_save());

        component.attach(FileUpload::new("a.txt", b"a".to_vec()));
        assert!(component.can_save());

        let mut routes = RouteStack::new();
        routes.navigate(Route::NewFile);
        component.save(&mut routes).await;

        assert_eq!(files.calls(), vec!["create a.txt"]);
        assert!(component.attachments.is_empty());
        assert_eq!(routes.current(), Route::FileList);
    }

    #[tokio::test]
    async fn test_save_new_uploads_several_attachments_at_once() {
        let files = Arc::new(FakeFileApi::default());
        let mut component = FileUpdateComponent::new(
            files.clone(),
            Arc::new(FakeUserApi::seeded()),
            AlertService::new(),
        );
        component.init(File::default()).await;
        component.attach(FileUpload::new("a.txt", b"a".to_vec()));
        component.attach(FileUpload::new("b.txt", b"b".to_vec()));
        component.attach(FileUpload::new("c.txt", b"c".to_vec()));
        component.remove_attachment(2);

        component.save(&mut RouteStack::new()).await;

        assert_eq!(files.calls(), vec!["create_files 2"]);
        assert_eq!(files.files.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_save_failure_clears_flag_and_stays() {
        let (mut component, alerts) = component(FakeFileApi::failing(), FakeUserApi::seeded());
        component.init(existing()).await;
        let mut routes = edit_route();

        component.save(&mut routes).await;

        assert!(!component.is_saving);
        assert_eq!(routes.current(), Route::EditFile(123));
        let drained = alerts.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].severity, Severity::Error);
        assert!(drained[0].message.contains("boom"));
    }

    #[tokio::test]
    async fn test_is_saving_while_request_in_flight() {
        let files = FakeFileApi {
            hang: true,
            ..Default::default()
        };
        let (mut component, _alerts) = component(files, FakeUserApi::seeded());
        component.init(existing()).await;
        let mut routes = edit_route();

        let finished =
            tokio::time::timeout(Duration::from_millis(20), component.save(&mut routes)).await;

        assert!(finished.is_err());
        assert!(component.is_saving);
        assert!(!component.can_save());
        assert_eq!(routes.current(), Route::EditFile(123));
    }

    #[tokio::test]
    async fn test_previous_state_goes_back() {
        let (component, _alerts) = component(FakeFileApi::default(), FakeUserApi::seeded());
        let mut routes = edit_route();
        component.previous_state(&mut routes);
        assert_eq!(routes.current(), Route::FileList);
    }

    #[test]
    fn test_track_user_by_id() {
        let users = FakeUserApi::seeded().users;
        assert_eq!(track_user_by_id(0, &users[1]), 2);
    }
}
