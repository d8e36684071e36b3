//! Command-line front end for the to-do core.
//!
//! # Responsibility
//! - Wire config, logging and storage the same way the FFI bridge does.
//! - Drive the list and detail controllers one command at a time.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use todo_core::{
    init_logging_from_config, AppConfig, SqliteTaskStore, Task, TaskId, TaskListController,
    TodoApp,
};

/// Manage a local to-do list.
#[derive(Parser, Debug)]
#[command(name = "todo", version, about = "todo: a small SQLite-backed task list")]
struct Cli {
    /// Database file (overrides TODO_DB_PATH).
    #[arg(long)]
    db: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a new task.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// List tasks, newest first.
    List {
        /// Print tasks as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show a single task.
    Show {
        #[arg(long)]
        id: TaskId,
    },

    /// Change the title and/or description of a task.
    Edit {
        #[arg(long)]
        id: TaskId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Flip the completed flag of a task.
    Toggle {
        #[arg(long)]
        id: TaskId,
    },

    /// Delete a task.
    Delete {
        #[arg(long)]
        id: TaskId,
    },

    /// Delete every task.
    Clear,
}

fn main() -> Result<()> {
    let Cli { db, cmd } = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(db) = db {
        config.db_path = db.into();
    }
    init_logging_from_config(&config).map_err(|err| anyhow!(err))?;

    let app = TodoApp::open(&config)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    execute_command(&app, cmd)
}

fn execute_command(app: &TodoApp, command: Command) -> Result<()> {
    let list = app.task_list_controller();
    match command {
        Command::Add { title, description } => {
            if title.trim().is_empty() {
                bail!("title must not be blank");
            }
            list.add_task(&title, &description);
            surface(list.state().error_message)?;
            if let Some(task) = list.state().tasks.first() {
                println!("{}", render_line(task));
            }
        }

        Command::List { json } => {
            let tasks = list.state().tasks;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("no tasks");
            } else {
                for task in &tasks {
                    println!("{}", render_line(task));
                }
            }
        }

        Command::Show { id } => {
            let detail = app.task_detail_controller();
            detail.load(id);
            let state = detail.state();
            surface(state.error_message)?;
            if let Some(task) = state.task {
                println!("{}", render_detail(&task));
            }
        }

        Command::Edit {
            id,
            title,
            description,
        } => {
            let detail = app.task_detail_controller();
            detail.load(id);
            let state = detail.state();
            surface(state.error_message)?;
            let Some(mut task) = state.task else {
                bail!("task {id} not found");
            };
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(description) = description {
                task.description = description;
            }
            detail.start_editing();
            detail.update_task(&task);
            surface(detail.state().error_message)?;
            println!("{}", render_line(&task));
        }

        Command::Toggle { id } => {
            let task = find_listed(&list, id)?;
            list.toggle_complete(&task);
            surface(list.state().error_message)?;
            println!("{}", render_line(&task.toggled()));
        }

        Command::Delete { id } => {
            let task = find_listed(&list, id)?;
            list.delete_task(&task);
            surface(list.state().error_message)?;
            println!("deleted {id}");
        }

        Command::Clear => {
            list.delete_all_tasks();
            surface(list.state().error_message)?;
            println!("cleared");
        }
    }
    Ok(())
}

fn find_listed(list: &TaskListController<SqliteTaskStore>, id: TaskId) -> Result<Task> {
    list.state()
        .tasks
        .into_iter()
        .find(|task| task.id == id)
        .ok_or_else(|| anyhow!("task {id} not found"))
}

fn surface(error_message: Option<String>) -> Result<()> {
    match error_message {
        Some(message) => Err(anyhow!(message)),
        None => Ok(()),
    }
}

fn status_badge(completed: bool) -> &'static str {
    if completed {
        "done"
    } else {
        "pending"
    }
}

fn format_date(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local)
        .format("%d %b %Y, %H:%M")
        .to_string()
}

fn render_line(task: &Task) -> String {
    format!(
        "#{:<4} [{:<7}] {}  ({})",
        task.id,
        status_badge(task.completed),
        task.title,
        format_date(task.creation_date)
    )
}

fn render_detail(task: &Task) -> String {
    let mut out = format!(
        "#{} {}\nstatus:  {}\ncreated: {}",
        task.id,
        task.title,
        status_badge(task.completed),
        format_date(task.creation_date)
    );
    if !task.description.is_empty() {
        out.push_str("\n\n");
        out.push_str(&task.description);
    }
    out
}
