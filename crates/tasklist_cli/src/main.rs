//! CLI smoke front end.
//!
//! # Responsibility
//! - Drive `tasklist_core` from stdin as a minimal view layer.
//! - Re-render through a store subscription, never by polling.

use log::info;
use std::io::{self, BufRead, Write};
use tasklist_core::{
    core_version, default_log_level, init_logging, ping, Action, AppState, Store, StoreConfig,
    Transition,
};

const HELP: &str = "commands: add <title> | toggle <n> | rm <n> | clear | dark | dismiss | list | quit";

fn main() {
    let mut args = std::env::args().skip(1);
    if args.any(|arg| arg == "--ping") {
        println!("tasklist_core ping={}", ping());
        println!("tasklist_core version={}", core_version());
        return;
    }

    if let Ok(dir) = std::env::var("TASKLIST_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let config = match StoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let store = Store::new(config);
    info!("event=cli_start module=cli status=ok");
    let _subscription = store.subscribe(|state| {
        let mut stdout = io::stdout().lock();
        // Broken pipe on stdout is not worth aborting over.
        let _ = render(&mut stdout, state);
    });

    println!("{HELP}");
    let _ = render(&mut io::stdout().lock(), &store.snapshot());

    for line in io::stdin().lock().lines() {
        let Ok(line) = line else {
            break;
        };
        match parse_command(&line, &store.snapshot()) {
            Command::Dispatch(action) => {
                if let Transition::Ignored(reason) = store.dispatch(action) {
                    println!("(ignored: {reason})");
                }
            }
            Command::List => {
                let _ = render(&mut io::stdout().lock(), &store.snapshot());
            }
            Command::Quit => break,
            Command::Invalid(message) => println!("{message}\n{HELP}"),
        }
    }
}

enum Command {
    Dispatch(Action),
    List,
    Quit,
    Invalid(String),
}

fn parse_command(line: &str, state: &AppState) -> Command {
    let line = line.trim();
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    match verb {
        "add" => Command::Dispatch(Action::add_task(rest)),
        "toggle" | "rm" => match task_at(state, rest) {
            Ok(id) if verb == "toggle" => Command::Dispatch(Action::ToggleTask { id }),
            Ok(id) => Command::Dispatch(Action::RemoveTask { id }),
            Err(message) => Command::Invalid(message),
        },
        "clear" => Command::Dispatch(Action::ClearAll),
        "dark" => Command::Dispatch(Action::ToggleDarkMode),
        "dismiss" => Command::Dispatch(Action::DismissInfoBanner),
        "list" | "" => Command::List,
        "quit" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command `{other}`")),
    }
}

/// Resolves a 1-based row number to a task id.
fn task_at(state: &AppState, raw: &str) -> Result<tasklist_core::TaskId, String> {
    let index = raw
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("expected a row number, got `{}`", raw.trim()))?;
    index
        .checked_sub(1)
        .and_then(|index| state.tasks.items.get(index))
        .map(|task| task.id)
        .ok_or_else(|| format!("no task at row {index}"))
}

fn render(out: &mut impl Write, state: &AppState) -> io::Result<()> {
    let theme = if state.ui.dark_mode { "dark" } else { "light" };
    writeln!(
        out,
        "--- {} task(s), {} done [{theme}] ---",
        state.tasks.len(),
        state.tasks.completed_count()
    )?;
    if state.ui.show_info_banner {
        writeln!(out, "(i) add tasks below; `dismiss` hides this hint")?;
    }
    if state.ui.show_added_banner {
        writeln!(out, "(+) task added")?;
    }
    for (row, task) in state.tasks.items.iter().enumerate() {
        let mark = if task.done { 'x' } else { ' ' };
        writeln!(out, "{:>3}. [{mark}] {}", row + 1, task.title)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::{parse_command, render, Command};
    use tasklist_core::{Action, AppState, Task};

    fn state_with(titles: &[&str]) -> AppState {
        let mut state = AppState::default();
        for title in titles {
            state.tasks.items.push(Task::new(title, 0).unwrap());
        }
        state
    }

    #[test]
    fn parses_row_numbers_one_based() {
        let state = state_with(&["a", "b"]);
        let second = state.tasks.items[1].id;
        assert!(matches!(
            parse_command("rm 2", &state),
            Command::Dispatch(Action::RemoveTask { id }) if id == second
        ));
        assert!(matches!(parse_command("toggle 0", &state), Command::Invalid(_)));
        assert!(matches!(parse_command("toggle 3", &state), Command::Invalid(_)));
    }

    #[test]
    fn add_keeps_raw_title_for_the_reducer_to_trim() {
        assert!(matches!(
            parse_command("add   milk ", &AppState::default()),
            Command::Dispatch(Action::AddTask { title }) if title == "  milk"
        ));
    }

    #[test]
    fn render_shows_banners_and_rows() {
        let mut state = state_with(&["milk"]);
        state.ui.show_added_banner = true;
        let mut out = Vec::new();
        render(&mut out, &state).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("1 task(s), 0 done [light]"));
        assert!(text.contains("(+) task added"));
        assert!(text.contains("  1. [ ] milk"));
    }
}
