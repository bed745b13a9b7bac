mod config;
mod logging;
mod remote;
mod todo;
mod tui;

use anyhow::{Context, Result, bail};
use clap::{Command, CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::{Generator, Shell, generate};
use config::{Config, ConfigError};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use remote::{HttpTodoApi, RemoteSync, TodoApi};
use std::io;
use todo::models::{FilterState, TodoItem};
use todo::snapshot::{self, FileSnapshot, MemorySnapshot, SnapshotStore};
use todo::store::{Action, TodoStore};
use todo::views;
use tracing::info;
use tui::app::{App, DynRemote};
use tui::ui;

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "A terminal todo list with optional sync to a todo REST service")]
struct Cli {
    #[arg(long, global = true, help = "Route changes through the configured todo service")]
    remote: bool,
    #[arg(long, global = true, help = "Keep state in memory only; nothing is read or written")]
    ephemeral: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Add a todo")]
    Add {
        #[arg(required = true, num_args = 1.., help = "Title of the todo")]
        title: Vec<String>,
    },
    #[command(about = "List todos")]
    List {
        #[arg(long, short, default_value = "all", help = "all, active or completed")]
        filter: FilterState,
    },
    #[command(about = "Toggle a todo between active and completed")]
    Toggle {
        #[arg(help = "Todo id")]
        id: String,
    },
    #[command(about = "Delete a todo")]
    Delete {
        #[arg(help = "Todo id")]
        id: String,
    },
    #[command(about = "Remove todos from the local list")]
    Clear {
        #[arg(long, help = "Only remove completed todos")]
        completed: bool,
    },
    #[command(about = "Replace the local list with the todos on the server")]
    Pull,
    #[command(about = "Configuration management")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    #[command(about = "Generate shell completion scripts")]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    #[command(about = "Set a configuration value (an empty value unsets it)")]
    Set {
        #[arg(help = "Configuration key: snapshot_path, api_base_url, api_key or log_file")]
        key: String,
        #[arg(help = "Configuration value", value_hint = ValueHint::AnyPath)]
        value: String,
    },
    #[command(about = "Get a configuration value")]
    Get {
        #[arg(help = "Configuration key")]
        key: String,
    },
    #[command(about = "List all configuration values")]
    List,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Config { action }) => {
            handle_config_command(action).map_err(anyhow::Error::from)
        }
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
            Ok(())
        }
        Some(command) => run_command(cli.remote, cli.ephemeral, command),
        None => run_main_app(cli.remote, cli.ephemeral),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn handle_config_command(action: ConfigAction) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, value)?;
            config.save()?;
            println!("Configuration saved successfully.");
        }
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            println!("{}", config.get(&key)?.unwrap_or_default());
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for key in config::KEYS {
                println!("{} = {}", key, config.get(key)?.unwrap_or_default());
            }
        }
    }
    Ok(())
}

fn load_config() -> Result<Config> {
    let config = Config::load().context("Configuration error")?;
    // Logging is best effort; the app works the same without it.
    logging::init(&config).ok();
    Ok(config)
}

fn open_snapshot(config: &Config, ephemeral: bool) -> Result<Box<dyn SnapshotStore>> {
    if ephemeral {
        return Ok(Box::new(MemorySnapshot::new()));
    }

    let file = match &config.snapshot_path {
        Some(path) => FileSnapshot::new(path),
        None => FileSnapshot::default_location()?,
    };
    info!(path = %file.path().display(), "using snapshot");
    Ok(Box::new(file))
}

fn open_store(config: &Config, ephemeral: bool) -> Result<TodoStore> {
    let slot = open_snapshot(config, ephemeral)?;
    let mut store = TodoStore::new(snapshot::load_or_default(&*slot));
    snapshot::persist_on_change(&mut store, slot);
    Ok(store)
}

fn open_remote(config: &Config) -> Result<DynRemote> {
    let (base_url, api_key) = config.remote().context(
        "Remote mode needs api_base_url and api_key. Run 'todo config set api_base_url <url>' and 'todo config set api_key <key>'",
    )?;
    let api = HttpTodoApi::new(base_url, api_key)?;
    Ok(RemoteSync::new(Box::new(api) as Box<dyn TodoApi>))
}

fn run_command(use_remote: bool, ephemeral: bool, command: Commands) -> Result<()> {
    let config = load_config()?;
    let mut store = open_store(&config, ephemeral)?;
    let remote = if use_remote { Some(open_remote(&config)?) } else { None };

    match command {
        Commands::Add { title } => {
            let title = title.join(" ");
            if title.trim().is_empty() {
                bail!("Title cannot be empty");
            }

            // Keep whatever the TUI had half typed.
            let draft = store.state().ui.text_input.clone();
            store.dispatch(Action::SetTextInput(title));

            let added = match &remote {
                Some(remote) => {
                    remote.add(&mut store)?;
                    store.state().todos.first().cloned()
                }
                None => {
                    store.dispatch(Action::AddTodo);
                    store.state().todos.last().cloned()
                }
            };

            if !draft.is_empty() {
                store.dispatch(Action::SetTextInput(draft));
            }
            if let Some(item) = added {
                println!("Added {}: {}", item.id, item.title);
            }
        }
        Commands::List { filter } => {
            if let Some(remote) = &remote {
                remote.load(&mut store)?;
            }

            let mut view = store.state().clone();
            view.ui.filter_state = filter;
            for item in views::visible_todos(&view) {
                println!("{}", format_item(item));
            }
            println!("{}", views::status_label(views::remaining_count(&view)));
        }
        Commands::Toggle { id } => {
            ensure_exists(&store, &id)?;
            match &remote {
                Some(remote) => remote.toggle(&mut store, &id)?,
                None => store.dispatch(Action::ToggleTodo(id.clone())),
            }
            if let Some(item) = store.state().find(&id) {
                println!("{}", format_item(item));
            }
        }
        Commands::Delete { id } => {
            ensure_exists(&store, &id)?;
            match &remote {
                Some(remote) => remote.delete(&mut store, &id)?,
                None => store.dispatch(Action::DeleteTodo(id.clone())),
            }
            println!("Deleted {}", id);
        }
        Commands::Clear { completed } => {
            let kept: Vec<TodoItem> = if completed {
                store
                    .state()
                    .todos
                    .iter()
                    .filter(|todo| !todo.completed)
                    .cloned()
                    .collect()
            } else {
                Vec::new()
            };
            let removed = store.state().todos.len() - kept.len();
            store.dispatch(Action::SetTodos(kept));
            println!("Removed {} todos", removed);
        }
        Commands::Pull => {
            let remote = match remote {
                Some(remote) => remote,
                None => open_remote(&config)?,
            };
            let count = remote.load(&mut store)?;
            println!("Pulled {} todos", count);
        }
        Commands::Config { .. } | Commands::Completion { .. } => {}
    }
    Ok(())
}

fn ensure_exists(store: &TodoStore, id: &str) -> Result<()> {
    if !store.state().contains(id) {
        bail!("No todo with id '{}'", id);
    }
    Ok(())
}

fn format_item(item: &TodoItem) -> String {
    let checkbox = if item.completed { "[x]" } else { "[ ]" };
    format!("{} {}  {}", checkbox, item.id, item.title)
}

fn run_main_app(use_remote: bool, ephemeral: bool) -> Result<()> {
    let config = load_config()?;
    let store = open_store(&config, ephemeral)?;
    let remote = if use_remote { Some(open_remote(&config)?) } else { None };

    let mut app = App::new(store, remote);
    if app.is_remote() {
        app.reload();
    }

    run_tui(&mut app)?;

    Ok(())
}

fn run_tui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.handle_key_event(key)?;
            if app.should_quit {
                break;
            }
        }
    }
    Ok(())
}

fn print_completions<G: Generator>(generator: G, cmd: &mut Command) {
    generate(generator, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
