mod habit;
mod series;

pub use habit::{ApiAuth, ApiEnvelope, ApiProfile, ApiUser, Credentials, Habit, LoginReply, LoginRequest};
pub use series::{DayCompletion, HabitSeries, SelectedHabit};
