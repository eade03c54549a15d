mod buffer;
mod config;
mod editor;
mod input;
mod journal;
mod logging;
mod render;
mod slash;
mod util;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::env;
use tracing::{info, warn};

use config::Config;
use editor::Editor;
use journal::{JournalError, ScriptureSelection, Session, Store};

const USAGE: &str = "usage: selah [--date YYYY-MM-DD] [BOOK CHAPTER]\n       selah --list";

/// What the command line asks for
#[derive(Debug, PartialEq)]
enum Command {
    Help,
    /// Print past devotionals
    List,
    /// Write the devotional for `date` (today when absent)
    Write { date: Option<NaiveDate>, selection: ScriptureSelection },
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = parse_command(&args)?;
    if command == Command::Help {
        println!("{USAGE}");
        return Ok(());
    }

    let (config, config_warning) = Config::load();
    let _log_guard = logging::init(&config.data_dir, &config.log_filter)?;
    if let Some(e) = config_warning {
        warn!("config file ignored, using defaults: {e:#}");
    }
    info!(version = env!("CARGO_PKG_VERSION"), data_dir = %config.data_dir.display(), ?command, "starting");

    let store = Store::open(&config.data_dir)?;
    match command {
        Command::Help => Ok(()),
        Command::List => {
            print!("{}", journal::listing(store.devotionals()));
            Ok(())
        }
        Command::Write { date, selection } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let session = Session::new(store, date, selection);
            let mut editor = Editor::new(session, config.trigger_char, config.escape_time_ms)?;
            editor.run()
        }
    }
}

fn parse_command(args: &[String]) -> journal::Result<Command> {
    match args.first().map(String::as_str) {
        Some("-h" | "--help") => return Ok(Command::Help),
        Some("-l" | "--list") if args.len() == 1 => return Ok(Command::List),
        Some("-l" | "--list") => {
            return Err(JournalError::InvalidArgs(format!("--list takes no arguments. {USAGE}")));
        }
        _ => {}
    }

    let (date, rest) = match args.split_first() {
        Some((flag, rest)) if flag == "--date" => {
            let Some((value, rest)) = rest.split_first() else {
                return Err(JournalError::InvalidArgs(format!("--date needs a value. {USAGE}")));
            };
            let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map_err(|_| JournalError::InvalidArgs(format!("expected a YYYY-MM-DD date, got {value:?}")))?;
            (Some(date), rest)
        }
        _ => (None, args),
    };
    Ok(Command::Write { date, selection: parse_selection(rest)? })
}

/// `[BOOK CHAPTER]`, where BOOK may span several words ("Song of Solomon 2")
fn parse_selection(args: &[String]) -> journal::Result<ScriptureSelection> {
    let Some((last, book)) = args.split_last() else {
        return Ok(ScriptureSelection::default());
    };
    if book.is_empty() {
        return ScriptureSelection::new(last, 1);
    }
    let chapter = last
        .parse()
        .map_err(|_| JournalError::InvalidArgs(format!("chapter must be a number, got {last:?}. {USAGE}")))?;
    ScriptureSelection::new(&book.join(" "), chapter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection(&[]).unwrap().to_string(), "Genesis 1");
        assert_eq!(parse_selection(&args("Ruth")).unwrap().to_string(), "Ruth 1");
        assert_eq!(parse_selection(&args("psalms 23")).unwrap().to_string(), "Psalms 23");
        assert_eq!(parse_selection(&args("Song of Solomon 2")).unwrap().to_string(), "Song of Solomon 2");
        assert_eq!(parse_selection(&args("1 John 4")).unwrap().to_string(), "I John 4");
    }

    #[test]
    fn test_parse_selection_errors() {
        assert!(matches!(parse_selection(&args("John three")), Err(JournalError::InvalidArgs(_))));
        assert!(matches!(parse_selection(&args("Obadiah 2")), Err(JournalError::ChapterOutOfRange { .. })));
        assert!(matches!(parse_selection(&args("Enoch 1")), Err(JournalError::UnknownBook(_))));
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command(&args("--help")).unwrap(), Command::Help);
        assert_eq!(parse_command(&args("--list")).unwrap(), Command::List);
        assert!(parse_command(&args("--list Ruth")).is_err());

        let Command::Write { date, selection } = parse_command(&args("--date 2024-03-09 Ruth 2")).unwrap() else {
            panic!("expected a write command");
        };
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 9));
        assert_eq!(selection.to_string(), "Ruth 2");

        assert_eq!(
            parse_command(&[]).unwrap(),
            Command::Write { date: None, selection: ScriptureSelection::default() }
        );
        assert!(matches!(parse_command(&args("--date")), Err(JournalError::InvalidArgs(_))));
        assert!(matches!(parse_command(&args("--date 3/9/24")), Err(JournalError::InvalidArgs(_))));
    }
}
