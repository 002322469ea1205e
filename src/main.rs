use anyhow::{Context, Result};
use crossterm::style::Stylize;
use reedline::{
    default_emacs_keybindings, ColumnarMenu, Emacs, FileBackedHistory, KeyCode, KeyModifiers,
    MenuBuilder, Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus, Reedline,
    ReedlineEvent, ReedlineMenu, Signal,
};
use std::borrow::Cow;
use std::path::Path;
use tracing::{info, warn};

mod completer;

use completer::CommandCompleter;
use user_directory::command::{parse_command, Command};
use user_directory::config::config::Config;
use user_directory::data::loaders::load_users_json;
use user_directory::logging::{init_tracing, LogRingBuffer};
use user_directory::table_display::{display_view, DisplayOptions};
use user_directory::{user_columns, RouteNavigator, RowNavigationBridge, TableView, User};

struct DirectoryPrompt {
    page: usize,
    page_count: usize,
}

impl Prompt for DirectoryPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned(format!("users [{}/{}] ", self.page, self.page_count))
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, edit_mode: PromptEditMode) -> Cow<'_, str> {
        match edit_mode {
            PromptEditMode::Default | PromptEditMode::Emacs => "> ".into(),
            PromptEditMode::Vi(vi_mode) => match vi_mode {
                reedline::PromptViMode::Normal => "N> ".into(),
                reedline::PromptViMode::Insert => "I> ".into(),
            },
            PromptEditMode::Custom(str) => format!("{str}> ").into(),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse search: {})",
            prefix, history_search.term
        ))
    }
}

fn print_help() {
    println!("{}", "User Directory - browse, search and sort users".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  user-directory [OPTIONS] <users.json>");
    println!();
    println!("{}", "Options:".yellow());
    println!(
        "  {} - Generate config file with defaults",
        "--generate-config".green()
    );
    println!();
    println!("{}", "Commands:".yellow());
    println!("  {}       - Search every column", "search <text>".green());
    println!("  {} - Filter one column (no text clears it)", "filter <col> [text]".green());
    println!("  {}        - Cycle ascending, descending, unsorted", "sort <col>".green());
    println!("  {}            - Rows per page", "size <n>".green());
    println!("  {}            - Go to page n", "page <n>".green());
    println!("  {} - Move between pages", "next/prev/first/last".green());
    println!("  {}   - Hide or show a column", "hide/show <col>".green());
    println!("  {}               - Clear search and filters", "reset".green());
    println!("  {}       - Clear column filters only", "clear-filters".green());
    println!("  {}          - Open the user on row n", "open <n>".green());
    println!("  {}             - List columns", "columns".green());
    println!("  {}                - Show recent log entries", "logs".green());
    println!("  {}                - Exit", "quit".green());
    println!();
}

fn print_columns(view: &TableView<User>) {
    for column in view.columns().iter() {
        let state = if column.visible { "shown" } else { "hidden" };
        let mut flags = Vec::new();
        if !column.hideable {
            flags.push("always shown");
        }
        if !column.sortable {
            flags.push("not sortable");
        }
        if !column.filterable {
            flags.push("not filterable");
        }
        let filter = view
            .filter_state()
            .column_filters
            .get(&column.key)
            .map(|v| format!(" filter='{}'", v))
            .unwrap_or_default();
        println!(
            "  {:<10} {:<10} {:<7} sort={}{}{}",
            column.key,
            column.label,
            state,
            view.sort_state().order_for(&column.key),
            filter,
            if flags.is_empty() {
                String::new()
            } else {
                format!(" ({})", flags.join(", "))
            }
        );
    }
}

fn print_logs(buffer: &LogRingBuffer) {
    let entries = buffer.get_recent(20);
    if entries.is_empty() {
        println!("{}", "No log entries.".yellow());
        return;
    }
    for entry in entries {
        println!("{}", entry.format_for_display());
    }
}

fn generate_config() -> Result<()> {
    let path = Config::get_config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating config directory {:?}", parent))?;
    }
    std::fs::write(&path, Config::create_default_with_comments())
        .with_context(|| format!("Error writing config file {:?}", path))?;
    println!("Configuration file created at: {:?}", path);
    println!("Edit this file to customize the user directory.");
    Ok(())
}

fn build_view(users: Vec<User>, config: &Config) -> Result<TableView<User>> {
    let mut view = TableView::new(users, user_columns()?)
        .with_page_size(config.behavior.default_page_size)?;
    for key in &config.display.hidden_columns {
        view.set_column_visible(key, false);
    }
    Ok(view)
}

/// Run one command; returns false when the browser should exit
fn run_command(
    command: Command,
    view: &mut TableView<User>,
    bridge: &mut RowNavigationBridge<RouteNavigator>,
    config: &Config,
    logs: &LogRingBuffer,
) -> bool {
    match command {
        Command::Search(query) => {
            view.set_global_query(query);
        }
        Command::Filter { column, value } => {
            if view.columns().get(&column).is_none() {
                eprintln!("{}", format!("Unknown column '{}'", column).red());
                return true;
            }
            view.set_column_filter(&column, value);
        }
        Command::Sort(column) => {
            if !view.columns().get(&column).is_some_and(|c| c.sortable) {
                eprintln!("{}", format!("Cannot sort by '{}'", column).red());
                return true;
            }
            view.toggle_sort(&column);
        }
        Command::PageSize(size) => {
            if !config.behavior.page_size_options.contains(&size) {
                warn!(
                    "Page size {} is not one of {:?}",
                    size, config.behavior.page_size_options
                );
            }
            if let Err(e) = view.set_page_size(size) {
                eprintln!("{}", format!("Error: {}", e).red());
                return true;
            }
        }
        Command::Page(index) => {
            view.set_page_index(index);
        }
        Command::Next => {
            view.next_page();
        }
        Command::Previous => {
            view.previous_page();
        }
        Command::First => {
            view.first_page();
        }
        Command::Last => {
            view.last_page();
        }
        Command::Hide(column) | Command::Show(column)
            if view.columns().get(&column).is_none() =>
        {
            eprintln!("{}", format!("Unknown column '{}'", column).red());
            return true;
        }
        Command::Hide(column) => {
            if !view.columns().get(&column).is_some_and(|c| c.hideable) {
                eprintln!("{}", format!("Column '{}' cannot be hidden", column).red());
                return true;
            }
            view.set_column_visible(&column, false);
        }
        Command::Show(column) => {
            view.set_column_visible(&column, true);
        }
        Command::Reset => {
            view.reset_filters();
        }
        Command::ClearFilters => {
            view.clear_column_filters();
        }
        Command::Open(row) => {
            if bridge.activate_row(view.view(), row) {
                if let Some(route) = bridge.navigator().current() {
                    println!("{}", format!("-> {}", route).cyan());
                }
            } else {
                eprintln!("{}", format!("No row {} on this page", row + 1).red());
            }
            return true;
        }
        Command::Columns => {
            print_columns(view);
            return true;
        }
        Command::Logs => {
            print_logs(logs);
            return true;
        }
        Command::Help => {
            print_help();
            return true;
        }
        Command::Quit => return false,
    }

    let options = DisplayOptions {
        use_colors: config.display.use_colors,
        page_window: config.display.page_window,
    };
    display_view(view.view(), view.columns(), view.has_active_filters(), &options);
    true
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--generate-config") {
        return generate_config();
    }
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("{}", format!("Warning: could not load config ({}), using defaults", e).yellow());
        Config::default()
    });
    let logs = init_tracing(&config.behavior.log_level);

    let Some(path) = args.iter().skip(1).find(|a| !a.starts_with("--")) else {
        print_help();
        anyhow::bail!("missing users JSON file");
    };

    let users = load_users_json(path)?;
    info!("Browsing {} users", users.len());

    let mut view = build_view(users, &config)?;
    let mut bridge = RowNavigationBridge::new(RouteNavigator::new(
        config.behavior.route_template.clone(),
    ));

    let column_keys = view.columns().iter().map(|c| c.key.clone()).collect();
    let completer = Box::new(CommandCompleter::new(column_keys));
    let completion_menu = Box::new(
        ColumnarMenu::default()
            .with_name("command_completion")
            .with_columns(1)
            .with_column_width(None)
            .with_column_padding(2),
    );

    let mut keybindings = default_emacs_keybindings();
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::Menu("command_completion".to_string()),
    );

    let mut line_editor = Reedline::create()
        .with_completer(completer)
        .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    if let Some(history_file) = dirs::data_dir().map(|d| d.join("user-directory").join("history")) {
        if let Some(parent) = history_file.parent() {
            prepare_history_dir(parent);
        }
        match FileBackedHistory::with_file(100, history_file) {
            Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
            Err(e) => warn!("History disabled: {}", e),
        }
    }

    let options = DisplayOptions {
        use_colors: config.display.use_colors,
        page_window: config.display.page_window,
    };
    display_view(view.view(), view.columns(), view.has_active_filters(), &options);

    loop {
        let prompt = DirectoryPrompt {
            page: view.view().page_index + 1,
            page_count: view.view().page_count,
        };
        match line_editor.read_line(&prompt)? {
            Signal::Success(buffer) => {
                if buffer.trim().is_empty() {
                    continue;
                }
                match parse_command(&buffer) {
                    Ok(command) => {
                        if !run_command(command, &mut view, &mut bridge, &config, &logs) {
                            break;
                        }
                    }
                    Err(e) => eprintln!("{}", e.to_string().red()),
                }
            }
            Signal::CtrlD | Signal::CtrlC => {
                println!("\nGoodbye!");
                break;
            }
        }
    }

    Ok(())
}

/// Create the history directory, logging instead of failing when it cannot be made
fn prepare_history_dir(dir: &Path) -> bool {
    match std::fs::create_dir_all(dir) {
        Ok(()) => true,
        Err(e) => {
            warn!("Could not create history directory {:?}: {}", dir, e);
            false
        }
    }
}
