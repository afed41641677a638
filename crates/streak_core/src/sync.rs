use crate::api::ApiClient;
use crate::clock::today_local;
use crate::error::AppError;
use crate::model::{Credentials, Habit, HabitSeries, SelectedHabit};
use crate::series::build_series;
use crate::storage::CacheStore;

/// Ties the client and the cache together. Constructed once at process start
/// and passed by reference; there is no ambient global instance.
pub struct SyncService {
    store: CacheStore,
    api: ApiClient,
}

impl SyncService {
    pub fn new(store: CacheStore, api: ApiClient) -> Self {
        Self { store, api }
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.credentials().is_some()
    }

    /// Username/password login. Credentials are persisted only after the
    /// service accepts them; a failed login leaves the store untouched.
    pub fn login_with_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Credentials, AppError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::invalid_input("username is required"));
        }
        if password.is_empty() {
            return Err(AppError::invalid_input("password is required"));
        }

        let reply = self.api.login(username, password)?;
        let credentials = Credentials {
            user_id: reply.id,
            api_token: reply.api_token,
        };
        self.store.save_credentials(&credentials)?;

        Ok(credentials)
    }

    /// Token login: verify the pair against the identity endpoint, then
    /// store it verbatim.
    pub fn login_with_token(&self, user_id: &str, api_token: &str) -> Result<Credentials, AppError> {
        let user_id = user_id.trim();
        let api_token = api_token.trim();
        if user_id.is_empty() {
            return Err(AppError::invalid_input("user id is required"));
        }
        if api_token.is_empty() {
            return Err(AppError::invalid_input("api token is required"));
        }

        let credentials = Credentials {
            user_id: user_id.to_string(),
            api_token: api_token.to_string(),
        };
        self.api.authenticate(&credentials)?;
        self.store.save_credentials(&credentials)?;

        Ok(credentials)
    }

    pub fn logout(&self) -> Result<(), AppError> {
        self.store.clear_credentials()
    }

    /// Fetch the full task list and keep only daily recurring tasks, the
    /// only type the tracker handles.
    pub fn available_dailies(&self) -> Result<Vec<Habit>, AppError> {
        let credentials = self
            .store
            .credentials()
            .ok_or(AppError::MissingCredentials)?;

        let tasks = self.api.fetch_tasks(&credentials)?;
        Ok(tasks.into_iter().filter(|task| task.is_daily()).collect())
    }

    /// Persist which daily the cache tracks. The id must name one of the
    /// user's current dailies.
    pub fn select_habit(&self, id: &str) -> Result<SelectedHabit, AppError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(AppError::invalid_input("habit id is required"));
        }

        let dailies = self.available_dailies()?;
        let habit = dailies
            .iter()
            .find(|habit| habit.id == id)
            .ok_or(AppError::HabitNotFound)?;

        let selected = SelectedHabit::new(&habit.id, habit.display_name())?;
        self.store.save_selected_habit(&selected)?;

        Ok(selected)
    }

    /// Re-fetch the tracked daily and overwrite the cached series with a
    /// freshly built one. No merge with prior state.
    pub fn refresh(&self) -> Result<HabitSeries, AppError> {
        let credentials = self
            .store
            .credentials()
            .ok_or(AppError::MissingCredentials)?;
        let selected = self
            .store
            .selected_habit()
            .ok_or(AppError::MissingCredentials)?;

        let tasks = self.api.fetch_tasks(&credentials)?;
        let habit = tasks
            .iter()
            .find(|task| task.id == selected.id)
            .ok_or(AppError::HabitNotFound)?;

        let series = build_series(habit, today_local())?;
        self.store.save_series(&series)?;

        Ok(series)
    }
}
