use crate::error::AppError;
use crate::model::{Credentials, HabitSeries, SelectedHabit};
use crate::signal::{self, ReloadSignal};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

const CREDENTIALS_FILE: &str = "credentials.json";
const SELECTED_HABIT_FILE: &str = "selected_habit.json";
const SERIES_FILE: &str = "habit_data.json";
const SHARED_DIR_ENV_VAR: &str = "STREAKCHART_SHARED_DIR";

pub fn shared_dir() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(SHARED_DIR_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("streakchart"))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home).join(".config").join("streakchart"))
    }
}

/// Key/value namespace shared between the app and the widget host, one JSON
/// document per key. Reads are total: a missing document and an undecodable
/// one both come back as `None`. Writes overwrite whole documents, last
/// writer wins; series and selection writes also ping the reload signal.
pub struct CacheStore {
    dir: PathBuf,
    signal: Box<dyn ReloadSignal>,
}

impl CacheStore {
    pub fn open(dir: PathBuf) -> Self {
        let signal = signal::signal_for_dir(&dir);
        Self { dir, signal }
    }

    pub fn open_default() -> Result<Self, AppError> {
        Ok(Self::open(shared_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.read_doc(CREDENTIALS_FILE)
    }

    pub fn save_credentials(&self, credentials: &Credentials) -> Result<(), AppError> {
        self.write_doc(CREDENTIALS_FILE, credentials)
    }

    pub fn clear_credentials(&self) -> Result<(), AppError> {
        let path = self.dir.join(CREDENTIALS_FILE);
        if !path.exists() {
            return Ok(());
        }
        std::fs::remove_file(&path).map_err(|err| AppError::io(err.to_string()))
    }

    pub fn selected_habit(&self) -> Option<SelectedHabit> {
        self.read_doc(SELECTED_HABIT_FILE)
    }

    pub fn save_selected_habit(&self, habit: &SelectedHabit) -> Result<(), AppError> {
        self.write_doc(SELECTED_HABIT_FILE, habit)?;
        self.signal.ping();
        Ok(())
    }

    pub fn series(&self) -> Option<HabitSeries> {
        self.read_doc(SERIES_FILE)
    }

    pub fn save_series(&self, series: &HabitSeries) -> Result<(), AppError> {
        self.write_doc(SERIES_FILE, series)?;
        self.signal.ping();
        Ok(())
    }

    fn read_doc<T: DeserializeOwned>(&self, file_name: &str) -> Option<T> {
        let content = std::fs::read_to_string(self.dir.join(file_name)).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn write_doc<T: Serialize>(&self, file_name: &str, value: &T) -> Result<(), AppError> {
        std::fs::create_dir_all(&self.dir).map_err(|err| AppError::io(err.to_string()))?;

        let path = self.dir.join(file_name);
        let content = serde_json::to_string_pretty(value)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;
        std::fs::write(&path, content).map_err(|err| AppError::io(err.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&path, permissions)
                .map_err(|err| AppError::io(err.to_string()))?;
        }

        Ok(())
    }
}
