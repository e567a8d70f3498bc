mod tui;

use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use clap::Parser;
use tabled::{Table, Tabled};
use taskboard_core::{
    expand_key, init_logging, parse_args, parse_human_date, BoardStore, FileBoardRepository,
    Stage, Task, TaskId, TaskPatch,
};

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "A kanban-style task board for the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a new task (usage: add "Task title" due:tomorrow description:Milk)
    Add {
        /// Task title tokens plus key:value metadata
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List tasks, optionally a single stage (new|ongoing|done)
    List {
        stage: Option<String>,
    },
    /// Show one task in full
    Show {
        id: String,
    },
    /// Move a task to another stage (new|ongoing|done)
    Move {
        id: String,
        stage: String,
    },
    /// Set or overwrite a task's due date
    Due {
        id: String,
        date: String,
    },
    /// Edit a task (usage: edit <id> "New title" due:+2d description:...)
    Edit {
        id: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Delete a task
    Delete {
        id: String,
    },
    /// Open the board in the terminal UI
    Board,
}

const KNOWN_KEYS: [&str; 2] = ["due", "description"];

fn parse_stage(s: &str) -> Option<Stage> {
    match s.to_lowercase().as_str() {
        "new" => Some(Stage::New),
        "ongoing" => Some(Stage::Ongoing),
        "done" => Some(Stage::Done),
        _ => None,
    }
}

fn fmt_local(dt: DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn short_id(id: TaskId) -> String {
    id.to_string()[..8].to_string()
}

/// Resolves a (possibly abbreviated) id typed on the command line. Prefix
/// matching against the full uuid; anything ambiguous is reported rather
/// than guessed.
fn resolve_id(store: &BoardStore<FileBoardRepository>, input: &str) -> Option<TaskId> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    if let Ok(full) = uuid::Uuid::parse_str(&needle) {
        if store.tasks().iter().any(|t| t.id == full) {
            return Some(full);
        }
    }
    let matches: Vec<TaskId> = store
        .tasks()
        .iter()
        .filter(|t| t.id.to_string().starts_with(&needle))
        .map(|t| t.id)
        .collect();
    match matches.len() {
        1 => Some(matches[0]),
        0 => {
            println!("No task matches id '{}'.", input);
            None
        }
        _ => {
            println!("Id '{}' is ambiguous, give more characters.", input);
            None
        }
    }
}

fn normalize_metadata(metadata: HashMap<String, String>) -> HashMap<String, String> {
    let mut normalized = HashMap::new();
    for (key, value) in metadata {
        match expand_key(&key, &KNOWN_KEYS) {
            Ok(full_key) => {
                normalized.insert(full_key, value);
            }
            Err(e) => {
                println!("Warning: {}", e);
            }
        }
    }
    normalized
}

/// One-shot commands confirm what happened by printing the toast the
/// mutation produced; the TUI shows the same toasts in its panel.
fn print_last_toast(store: &BoardStore<FileBoardRepository>) {
    if let Some(toast) = store.toasts().last() {
        println!("{}: {}", toast.title, toast.message);
    }
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Stage")]
    stage: &'static str,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Title")]
    title: String,
}

impl TaskRow {
    fn from_task(task: &Task) -> Self {
        Self {
            id: short_id(task.id),
            stage: task.stage.label(),
            due: task.due_date.map(fmt_local).unwrap_or_else(|| "-".to_string()),
            created: fmt_local(task.created_at),
            title: task.title.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let repo = FileBoardRepository::new(None)?;
    if let Some(dir) = repo.data_dir() {
        if let Err(err) = init_logging(&dir.join("logs")) {
            eprintln!("Warning: logging disabled: {}", err);
        }
    }
    let mut store = BoardStore::load(repo);

    match cli.command {
        Some(Commands::Add { args }) => {
            let parsed = parse_args(&args);
            if parsed.title.trim().is_empty() {
                println!("Error: Task title is required.");
                return Ok(());
            }

            let normalized = normalize_metadata(parsed.metadata);
            let due = match normalized.get("due") {
                Some(d) => match parse_human_date(d) {
                    Ok(dt) => Some(dt),
                    Err(e) => {
                        println!("Warning: Invalid due date '{}': {}", d, e);
                        None
                    }
                },
                None => None,
            };
            let description = normalized.get("description").cloned().unwrap_or_default();

            let id = store.add_task(parsed.title, description, due);
            if let Some(task) = store.find_task(id) {
                println!("Task added: {} (ID: {})", task.title, short_id(task.id));
                if let Some(d) = task.due_date {
                    println!("  Due: {}", fmt_local(d));
                }
            }
        }
        Some(Commands::List { stage }) => {
            let stage_filter = match stage {
                Some(s) => match parse_stage(&s) {
                    Some(st) => Some(st),
                    None => {
                        println!("Error: Unknown stage '{}'. Use new|ongoing|done.", s);
                        return Ok(());
                    }
                },
                None => None,
            };

            let tasks: Vec<&Task> = match stage_filter {
                Some(st) => store.tasks_in_stage(st),
                None => store.tasks().iter().collect(),
            };

            if tasks.is_empty() {
                println!("No tasks found.");
            } else {
                let rows: Vec<TaskRow> = tasks.iter().map(|t| TaskRow::from_task(t)).collect();
                println!("{}", Table::new(rows));
            }
        }
        Some(Commands::Show { id }) => {
            if let Some(id) = resolve_id(&store, &id) {
                if let Some(task) = store.find_task(id) {
                    println!("Title: {}", task.title);
                    println!("ID: {}", task.id);
                    println!("Stage: {}", task.stage.label());
                    println!("Created: {}", fmt_local(task.created_at));
                    println!(
                        "Due: {}",
                        task.due_date.map(fmt_local).unwrap_or_else(|| "-".to_string())
                    );
                    println!(
                        "Completed: {}",
                        task.completed_at
                            .map(fmt_local)
                            .unwrap_or_else(|| "-".to_string())
                    );
                    if !task.description.is_empty() {
                        println!("Description: {}", task.description);
                    }
                }
            }
        }
        Some(Commands::Move { id, stage }) => {
            let Some(stage) = parse_stage(&stage) else {
                println!("Error: Unknown stage '{}'. Use new|ongoing|done.", stage);
                return Ok(());
            };
            if let Some(id) = resolve_id(&store, &id) {
                store.move_task(id, stage);
                print_last_toast(&store);
            }
        }
        Some(Commands::Due { id, date }) => {
            let due = match parse_human_date(&date) {
                Ok(dt) => dt,
                Err(e) => {
                    println!("Error: Invalid due date '{}': {}", date, e);
                    return Ok(());
                }
            };
            if let Some(id) = resolve_id(&store, &id) {
                store.set_due_date(id, due);
                print_last_toast(&store);
            }
        }
        Some(Commands::Edit { id, args }) => {
            let Some(id) = resolve_id(&store, &id) else {
                return Ok(());
            };

            let parsed = parse_args(&args);
            let normalized = normalize_metadata(parsed.metadata);

            let mut patch = TaskPatch::default();
            if !parsed.title.trim().is_empty() {
                patch.title = Some(parsed.title);
            }
            if let Some(value) = normalized.get("due") {
                if value.is_empty() {
                    // `due:` with no value clears the date.
                    patch.due_date = Some(None);
                } else {
                    match parse_human_date(value) {
                        Ok(dt) => patch.due_date = Some(Some(dt)),
                        Err(e) => println!("Warning: Invalid due date '{}': {}", value, e),
                    }
                }
            }
            if let Some(value) = normalized.get("description") {
                patch.description = Some(value.clone());
            }

            if patch.title.is_none() && patch.description.is_none() && patch.due_date.is_none() {
                println!("Nothing to change.");
                return Ok(());
            }

            store.update_task(id, patch);
            print_last_toast(&store);
        }
        Some(Commands::Delete { id }) => {
            if let Some(id) = resolve_id(&store, &id) {
                store.delete_task(id);
                print_last_toast(&store);
            }
        }
        Some(Commands::Board) | None => {
            tui::run(store)?;
        }
    }
    Ok(())
}
