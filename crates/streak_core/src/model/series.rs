use crate::clock::now_rfc3339;
use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// One cell of the contribution graph. `date` is a local `YYYY-MM-DD` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCompletion {
    pub date: String,
    pub completed: bool,
    pub count: u32,
}

/// The cached 45-day series the widget reads. Recomputed whole on every
/// refresh; `habit_name` stays empty so the widget renders without a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitSeries {
    pub habit_id: String,
    pub habit_name: String,
    pub completion_data: Vec<DayCompletion>,
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedHabit {
    pub id: String,
    pub name: String,
    pub last_updated: String,
}

impl SelectedHabit {
    pub fn new(id: &str, name: &str) -> Result<Self, AppError> {
        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            last_updated: now_rfc3339()?,
        })
    }
}
