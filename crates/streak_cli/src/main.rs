use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use streak_cli::cli::{Cli, Command};
use streak_cli::render::{
    SHOW_COLUMNS, WIDGET_COLUMNS, habits_table, render_grid, render_legend,
};
use streak_core::api::ApiClient;
use streak_core::clock::today_local;
use streak_core::config::{Palette, load_config_with_fallback, palette_for_theme};
use streak_core::error::AppError;
use streak_core::model::{Habit, HabitSeries, SelectedHabit};
use streak_core::series::current_streak;
use streak_core::signal::last_reload;
use streak_core::storage::CacheStore;
use streak_core::sync::SyncService;
use streak_core::timeline::{TIMELINE_HOURS, build_timeline};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

fn build_service() -> Result<SyncService, AppError> {
    let store = CacheStore::open_default()?;
    let api = ApiClient::from_env();
    Ok(SyncService::new(store, api))
}

fn resolve_palette(cli_theme: Option<&str>, config_theme: Option<&str>) -> Palette {
    palette_for_theme(cli_theme.or(config_theme))
}

fn series_json(series: &HabitSeries) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(series).map_err(|err| AppError::invalid_data(err.to_string()))
}

fn print_selected_json(selected: &SelectedHabit) {
    let json = serde_json::json!({
        "id": selected.id,
        "name": selected.name,
        "lastUpdated": selected.last_updated,
    });
    println!("{}", json);
}

fn print_habits_json(habits: &[Habit]) {
    let mut payload = Vec::with_capacity(habits.len());
    for habit in habits {
        payload.push(serde_json::json!({
            "id": habit.id,
            "text": habit.display_name(),
            "completed": habit.is_completed(),
            "streak": habit.streak.unwrap_or(0),
            "isDue": habit.is_due,
        }));
    }
    println!("{}", serde_json::Value::Array(payload));
}

fn format_stamp(stamp: OffsetDateTime) -> Result<String, AppError> {
    stamp
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

fn run_login(
    service: &SyncService,
    json: bool,
    username: Option<String>,
    password: Option<String>,
    user_id: Option<String>,
    api_token: Option<String>,
) -> Result<(), AppError> {
    let credentials = match (username, password, user_id, api_token) {
        (Some(username), Some(password), None, None) => {
            service.login_with_password(&username, &password)?
        }
        (None, None, Some(user_id), Some(api_token)) => {
            service.login_with_token(&user_id, &api_token)?
        }
        _ => {
            return Err(AppError::invalid_input(
                "provide --username with --password, or --user-id with --api-token",
            ));
        }
    };

    if json {
        println!("{}", serde_json::json!({ "userId": credentials.user_id }));
    } else {
        println!("Connected to Habitica as {}", credentials.user_id);
    }
    Ok(())
}

fn run_widget(
    service: &SyncService,
    json: bool,
    palette: &Palette,
    timeline: bool,
) -> Result<(), AppError> {
    let cached = service.store().series();

    if timeline {
        let now = OffsetDateTime::now_utc();
        let widget_timeline = build_timeline(now, today_local(), cached)?;

        if json {
            let mut entries = Vec::with_capacity(TIMELINE_HOURS);
            for entry in &widget_timeline.entries {
                entries.push(serde_json::json!({
                    "asOf": format_stamp(entry.as_of)?,
                    "habitId": entry.series.habit_id,
                }));
            }
            println!(
                "{}",
                serde_json::json!({ "entries": entries, "refresh": "afterLast" })
            );
        } else {
            for (hour, entry) in widget_timeline.entries.iter().enumerate() {
                println!("{:>2}. {}", hour + 1, format_stamp(entry.as_of)?);
            }
            println!("refresh: request a new timeline after the last entry");
        }
        return Ok(());
    }

    match cached {
        Some(series) => {
            if json {
                println!("{}", series_json(&series)?);
            } else {
                println!("{}", render_grid(&series, palette, WIDGET_COLUMNS));
            }
        }
        None => {
            let sample = streak_core::series::sample_series(today_local())?;
            if json {
                println!("{}", series_json(&sample)?);
            } else {
                println!("{}", render_grid(&sample, palette, WIDGET_COLUMNS));
                println!("No habit selected. Run `streakchart login`, then `streakchart select`.");
            }
        }
    }
    Ok(())
}

fn run_show(service: &SyncService, json: bool, palette: &Palette) -> Result<(), AppError> {
    let store = service.store();
    let series = store
        .series()
        .ok_or_else(|| AppError::invalid_input("no cached habit data, run refresh first"))?;

    if json {
        println!("{}", series_json(&series)?);
        return Ok(());
    }

    let name = store
        .selected_habit()
        .map(|selected| selected.name)
        .unwrap_or_else(|| "Habit".to_string());

    println!("{}", name);
    println!(
        "Last {} days (streak: {})",
        series.completion_data.len(),
        current_streak(&series)
    );
    println!("{}", render_grid(&series, palette, SHOW_COLUMNS));
    println!("{}", render_legend(palette));
    println!("Updated {}", series.last_updated);
    Ok(())
}

fn run_status(service: &SyncService, json: bool) -> Result<(), AppError> {
    let store = service.store();
    let authenticated = service.is_authenticated();
    let selected = store.selected_habit();
    let series = store.series();
    let reload = last_reload(store.dir());

    if json {
        let json_value = serde_json::json!({
            "authenticated": authenticated,
            "selectedHabit": selected.as_ref().map(|habit| serde_json::json!({
                "id": habit.id,
                "name": habit.name,
            })),
            "cachedDays": series.as_ref().map(|s| s.completion_data.len()).unwrap_or(0),
            "lastUpdated": series.as_ref().map(|s| s.last_updated.clone()),
            "lastReload": reload,
        });
        println!("{}", json_value);
        return Ok(());
    }

    println!(
        "Authenticated: {}",
        if authenticated { "yes" } else { "no" }
    );
    match selected {
        Some(habit) => println!("Selected habit: {} ({})", habit.name, habit.id),
        None => println!("Selected habit: none"),
    }
    match series {
        Some(series) => println!(
            "Cached series: {} days, updated {}",
            series.completion_data.len(),
            series.last_updated
        ),
        None => println!("Cached series: none"),
    }
    match reload {
        Some(stamp) => println!("Last reload ping: {}", stamp),
        None => println!("Last reload ping: none"),
    }
    Ok(())
}

fn run_command(cli: Cli, service: &SyncService, config_theme: Option<&str>) -> Result<(), AppError> {
    let palette = resolve_palette(cli.theme.as_deref(), config_theme);

    match cli.command {
        Command::Login {
            username,
            password,
            user_id,
            api_token,
        } => run_login(service, cli.json, username, password, user_id, api_token)?,
        Command::Logout => {
            service.logout()?;
            if cli.json {
                println!("{}", serde_json::json!({ "authenticated": false }));
            } else {
                println!("Logged out");
            }
        }
        Command::Habits => {
            let dailies = service.available_dailies()?;
            if cli.json {
                print_habits_json(&dailies);
            } else if dailies.is_empty() {
                println!("No daily tasks found. Create some dailies in Habitica first.");
            } else {
                println!("{}", habits_table(&dailies));
            }
        }
        Command::Select { id } => {
            let selected = service.select_habit(&id)?;
            // The selection sticks even when the follow-up refresh fails;
            // a later manual refresh fills the cache.
            if let Err(err) = service.refresh() {
                eprintln!("WARNING: refresh after selection failed: {err}");
            }
            if cli.json {
                print_selected_json(&selected);
            } else {
                println!("Selected habit: {} ({})", selected.name, selected.id);
            }
        }
        Command::Refresh => {
            let series = service.refresh()?;
            if cli.json {
                println!("{}", series_json(&series)?);
            } else {
                println!(
                    "Refreshed {} days for habit {}",
                    series.completion_data.len(),
                    series.habit_id
                );
            }
        }
        Command::Show => run_show(service, cli.json, &palette)?,
        Command::Widget { timeline } => run_widget(service, cli.json, &palette, timeline)?,
        Command::Status => run_status(service, cli.json)?,
    }

    Ok(())
}

fn is_help_or_version(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
    )
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(current.clone());
                current.clear();
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_interactive(service: &SyncService, config_theme: Option<&str>) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("streakchart".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                if is_help_or_version(&err) {
                    print!("{err}");
                } else {
                    eprintln!("ERROR: {}", normalize_parse_error(err));
                }
                continue;
            }
        };

        if let Err(err) = run_command(cli, service, config_theme) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn main() {
    let config_load = load_config_with_fallback();
    if let Some(err) = &config_load.error {
        eprintln!("WARNING: {}", err);
    }
    let config_theme = config_load.config.theme;

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        let service = match build_service() {
            Ok(service) => service,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                std::process::exit(1);
            }
        };
        if let Err(err) = run_interactive(&service, config_theme.as_deref()) {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if is_help_or_version(&err) {
                err.exit();
            }
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    let service = match build_service() {
        Ok(service) => service,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli, &service, config_theme.as_deref()) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
