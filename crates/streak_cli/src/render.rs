use streak_core::config::Palette;
use streak_core::model::{DayCompletion, Habit, HabitSeries};
use tabled::{Table, Tabled};

/// The full in-app view wraps at a week per row; the widget packs 45 cells
/// into an exact 5x9 block.
pub const SHOW_COLUMNS: usize = 7;
pub const WIDGET_COLUMNS: usize = 9;

const FILLED_GLYPH: &str = "■";
const EMPTY_GLYPH: &str = "·";

/// Intensity bucket for one cell: 0 for an empty day, otherwise the count
/// capped at 4 and shifted past the empty level.
pub fn completion_level(day: &DayCompletion) -> usize {
    if !day.completed {
        0
    } else {
        day.count.min(4) as usize + 1
    }
}

pub fn render_grid(series: &HabitSeries, palette: &Palette, columns: usize) -> String {
    let mut out = String::new();
    for (i, day) in series.completion_data.iter().enumerate() {
        if i > 0 {
            if i % columns == 0 {
                out.push('\n');
            } else {
                out.push(' ');
            }
        }
        let level = completion_level(day);
        let glyph = if level == 0 { EMPTY_GLYPH } else { FILLED_GLYPH };
        out.push_str(&palette.paint(level, glyph));
    }
    out
}

pub fn render_legend(palette: &Palette) -> String {
    let mut out = String::from("Less ");
    for level in 0..6 {
        let glyph = if level == 0 { EMPTY_GLYPH } else { FILLED_GLYPH };
        out.push_str(&palette.paint(level, glyph));
        out.push(' ');
    }
    out.push_str("More");
    out
}

#[derive(Tabled)]
struct HabitRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Daily")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Streak")]
    streak: i64,
}

pub fn habits_table(habits: &[Habit]) -> String {
    let rows: Vec<HabitRow> = habits
        .iter()
        .map(|habit| HabitRow {
            id: habit.id.clone(),
            name: habit.display_name().to_string(),
            status: if habit.is_completed() {
                "completed"
            } else {
                "pending"
            }
            .to_string(),
            streak: habit.streak.unwrap_or(0),
        })
        .collect();

    Table::new(rows).to_string()
}
