use anyhow::{Context, Result};
use clap::Parser;

use chordmark::app::{App, AppError, DEFAULT_KIND};
use chordmark::cli::{CliArgs, StartupMode};
use chordmark::config::AppConfig;
use chordmark::host::{YamlContextStore, YamlLocationStore};
use chordmark::persist::ProfileStore;
use chordmark::terminal::{read_line, LinePrompter, TerminalInput, TerminalPopup};

type ShellApp = App<YamlLocationStore, YamlContextStore>;

const HELP: &str = "\
commands:
  bind, b           type a chord and bookmark the current directory
  bind-kind, B      type a chord and choose what it does
  go, g             type a chord and run it
  visit, v          choose a binding from the list and run it
  unbind, u         choose a binding from the list and remove it
  list, ls          show all bindings
  save [NAME]       save bindings as a profile (default profile if omitted)
  load NAME         replace bindings with a saved profile
  profiles          list saved profiles
  new-workspace N   start a workspace named N and make it current
  close-workspace N forget the workspace named N
  where             show the current directory, workspace and log file
  help, ?           this text
  quit, q           save (unless --no-autosave) and exit";

fn main() -> Result<()> {
    chordmark::tracing::init();

    let startup = CliArgs::parse()
        .into_config()
        .map_err(anyhow::Error::msg)?;

    let mut config = AppConfig::load();
    startup.apply_to(&mut config);
    let store = ProfileStore::new(&startup.store_path);

    match &startup.mode {
        StartupMode::Profiles => {
            for name in store.list()? {
                println!("{}", name);
            }
            return Ok(());
        }
        StartupMode::DeleteProfile(name) => {
            store
                .delete(name)
                .with_context(|| format!("failed to delete profile {:?}", name))?;
            println!("deleted profile {}", name);
            return Ok(());
        }
        StartupMode::Shell | StartupMode::List { .. } => {}
    }

    let locations = YamlLocationStore::load(&startup.locations_path)
        .with_context(|| format!("failed to load {}", startup.locations_path.display()))?;
    let contexts = YamlContextStore::load(&startup.contexts_path)
        .with_context(|| format!("failed to load {}", startup.contexts_path.display()))?;

    let mut app = App::new(store, locations, contexts, config);
    if let Some(notice) = app.startup() {
        eprintln!("note: {}", notice);
    }

    if let StartupMode::List { json } = startup.mode {
        return print_list(&app, json);
    }

    app.run_session(run_shell)
}

fn print_list(app: &ShellApp, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&app.summaries())?);
    } else {
        println!("{}", list_text(app));
    }
    Ok(())
}

fn list_text(app: &ShellApp) -> String {
    let summaries = app.summaries();
    if summaries.is_empty() {
        return "(no bindings)".to_string();
    }
    summaries
        .iter()
        .map(|summary| summary.line())
        .collect::<Vec<_>>()
        .join("\n")
}

fn where_text(app: &ShellApp) -> Result<String, AppError> {
    let dir = std::env::current_dir().map_err(|e| AppError::Host(e.into()))?;
    let log = chordmark::config_paths::log_file()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());
    Ok(format!(
        "directory {}\nworkspace {}\nlog       {}",
        dir.display(),
        app.contexts().current().unwrap_or("(none)"),
        log
    ))
}

fn run_shell(app: &mut ShellApp) -> Result<()> {
    let mut input = TerminalInput;
    let mut popup = TerminalPopup::default();
    let mut prompter = LinePrompter;

    println!(
        "chordmark: profile {:?}, {} binding(s). Type `help` for commands.",
        app.config().default_profile,
        app.tree().len()
    );

    loop {
        let Some(line) = read_line("chordmark>")? else {
            println!();
            break;
        };
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let arg = words.next();

        let result: Result<Option<String>, AppError> = match command {
            "bind" | "b" => app
                .bind_interactive(&mut input, &mut popup, &mut prompter, false)
                .map(|chord| Some(format!("bound {} ({})", chord, DEFAULT_KIND))),
            "bind-kind" | "B" => app
                .bind_interactive(&mut input, &mut popup, &mut prompter, true)
                .map(|chord| Some(format!("bound {}", chord))),
            "go" | "g" => app
                .read_chord(&mut input, &mut popup)
                .and_then(|chord| app.visit(&chord).map(|()| Some(format!("ran {}", chord)))),
            "visit" | "v" => app
                .visit_interactive(&mut prompter)
                .map(|chord| Some(format!("ran {}", chord))),
            "unbind" | "u" => app
                .unbind_interactive(&mut prompter)
                .map(|chord| Some(format!("unbound {}", chord))),
            "list" | "ls" => Ok(Some(list_text(app))),
            "save" => {
                let name = arg
                    .map(str::to_string)
                    .unwrap_or_else(|| app.config().default_profile.clone());
                app.save_profile(&name)
                    .map(|count| Some(format!("saved {} record(s) as {:?}", count, name)))
            }
            "load" => match arg {
                Some(name) => app.load_profile(name).map(|skipped| {
                    let mut message = format!("loaded {:?}", name);
                    for skip in &skipped {
                        message.push_str(&format!(
                            "\n  skipped #{} [{}]: {}",
                            skip.index,
                            skip.keys.join(" "),
                            skip.reason
                        ));
                    }
                    Some(message)
                }),
                None => Ok(Some("usage: load NAME".to_string())),
            },
            "profiles" => app
                .store()
                .list()
                .map(|names| Some(names.join("\n")))
                .map_err(AppError::from),
            "new-workspace" => match arg {
                Some(name) => app
                    .contexts_mut()
                    .open(name)
                    .map(|()| Some(format!("workspace {:?} is current", name)))
                    .map_err(AppError::Host),
                None => Ok(Some("usage: new-workspace NAME".to_string())),
            },
            "close-workspace" => match arg {
                Some(name) => app
                    .contexts_mut()
                    .close(name)
                    .map(|()| Some(format!("closed workspace {:?}", name)))
                    .map_err(AppError::Host),
                None => Ok(Some("usage: close-workspace NAME".to_string())),
            },
            "where" => where_text(app).map(Some),
            "help" | "?" => Ok(Some(HELP.to_string())),
            "quit" | "q" | "exit" => break,
            other => Ok(Some(format!("unknown command {:?}; try `help`", other))),
        };

        match result {
            Ok(Some(message)) => println!("{}", message),
            Ok(None) => {}
            Err(AppError::Cancelled) => println!("cancelled"),
            Err(e) => {
                tracing::debug!("Command {:?} failed: {}", command, e);
                println!("error: {}", e);
            }
        }
    }
    Ok(())
}
