use std::fmt;
use std::path::PathBuf;

use quiz_core::model::{QuizDirection, SessionType};
use services::{SessionController, SettingsService};
use storage::repository::Storage;
use storage::word_source::read_word_csv;
use tracing::info;

mod terminal;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidDirection { raw: String },
    InvalidRange { raw: String },
    InvalidLimit { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidDirection { raw } => write!(f, "invalid --direction value: {raw}"),
            ArgsError::InvalidRange { raw } => {
                write!(f, "invalid --range value: {raw} (expected <start>-<end>)")
            }
            ArgsError::InvalidLimit { raw } => write!(f, "invalid --limit value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz [quiz]  [--db <sqlite_url>] [--words <csv>] [--training]");
    eprintln!("  quiz config  [--db <sqlite_url>] [--direction forward|reverse]");
    eprintln!("               [--range <start>-<end>] [--limit <n>]");
    eprintln!("  quiz reset   [--db <sqlite_url>] [--yes]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:quiz.sqlite3");
    eprintln!("  --words words.csv");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_WORDS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quiz,
    Config,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "quiz" => Some(Self::Quiz),
            "config" => Some(Self::Config),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ConfigChanges {
    direction: Option<QuizDirection>,
    range: Option<(u64, u64)>,
    limit: Option<u32>,
}

impl ConfigChanges {
    fn is_empty(&self) -> bool {
        self.direction.is_none() && self.range.is_none() && self.limit.is_none()
    }
}

#[derive(Debug)]
struct Args {
    db_url: String,
    words: PathBuf,
    training: bool,
    assume_yes: bool,
    changes: ConfigChanges,
}

impl Args {
    fn parse(
        cmd: Command,
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            db_url: normalize_sqlite_url(
                env("QUIZ_DB_URL").unwrap_or_else(|| "sqlite:quiz.sqlite3".into()),
            ),
            words: env("QUIZ_WORDS").map_or_else(|| PathBuf::from("words.csv"), PathBuf::from),
            training: false,
            assume_yes: false,
            changes: ConfigChanges::default(),
        };

        while let Some(arg) = args.next() {
            match (cmd, arg.as_str()) {
                (_, "--db") => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = normalize_sqlite_url(value);
                }
                (Command::Quiz, "--words") => {
                    parsed.words = PathBuf::from(require_value(args, "--words")?);
                }
                (Command::Quiz, "--training") => parsed.training = true,
                (Command::Reset, "--yes" | "-y") => parsed.assume_yes = true,
                (Command::Config, "--direction") => {
                    let value = require_value(args, "--direction")?;
                    let direction = QuizDirection::parse(&value)
                        .ok_or(ArgsError::InvalidDirection { raw: value })?;
                    parsed.changes.direction = Some(direction);
                }
                (Command::Config, "--range") => {
                    let value = require_value(args, "--range")?;
                    parsed.changes.range = Some(parse_range(&value)?);
                }
                (Command::Config, "--limit") => {
                    let value = require_value(args, "--limit")?;
                    let limit = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidLimit { raw: value.clone() })?;
                    parsed.changes.limit = Some(limit);
                }
                (_, "--help" | "-h") => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

fn parse_range(raw: &str) -> Result<(u64, u64), ArgsError> {
    let invalid = || ArgsError::InvalidRange {
        raw: raw.to_string(),
    };
    let (start, end) = raw.split_once('-').ok_or_else(invalid)?;
    let start = start.trim().parse().map_err(|_| invalid())?;
    let end = end.trim().parse().map_err(|_| invalid())?;
    Ok((start, end))
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Quiz,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with('-') => Command::Quiz,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if argv.first().is_some_and(|first| !first.starts_with('-')) {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;
    info!(db = %parsed.db_url, ?cmd, "storage ready");

    match cmd {
        Command::Quiz => {
            let sheet = read_word_csv(&parsed.words)?;
            info!(
                path = %parsed.words.display(),
                rows = sheet.records.len(),
                skipped = sheet.skipped,
                "word list read"
            );
            let mut controller = SessionController::bootstrap(sheet.records, &storage).await?;
            let session_type = if parsed.training {
                SessionType::Training
            } else {
                SessionType::Normal
            };
            terminal::run_quiz(&mut controller, session_type).await?;
            Ok(())
        }
        Command::Config => {
            let settings = SettingsService::new(storage.settings.clone());
            if !parsed.changes.is_empty() {
                let ConfigChanges {
                    direction,
                    range,
                    limit,
                } = parsed.changes;
                if let Some(direction) = direction {
                    settings.save_direction(direction).await?;
                }
                if let Some((start, end)) = range {
                    settings.save_range(start, end).await?;
                }
                if let Some(limit) = limit {
                    settings.save_limit(limit).await?;
                }
                info!("settings saved");
            }
            terminal::print_settings(&settings.load().await?);
            Ok(())
        }
        Command::Reset => {
            if !parsed.assume_yes && !terminal::confirm("Forget all learning progress?")? {
                println!("Nothing changed.");
                return Ok(());
            }
            storage.progress.clear_progress().await?;
            info!("word progress reset");
            println!("Progress cleared. Settings were kept.");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(cmd: Command, args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|s| (*s).to_string());
        Args::parse(cmd, &mut iter, |_| None)
    }

    #[test]
    fn quiz_defaults() {
        let args = parse(Command::Quiz, &[]).unwrap();
        assert!(args.db_url.starts_with("sqlite://"));
        assert!(args.db_url.ends_with("quiz.sqlite3"));
        assert_eq!(args.words, PathBuf::from("words.csv"));
        assert!(!args.training);
    }

    #[test]
    fn env_fallbacks_are_used() {
        let mut iter = std::iter::empty();
        let args = Args::parse(Command::Quiz, &mut iter, |key| match key {
            "QUIZ_DB_URL" => Some("sqlite::memory:".into()),
            "QUIZ_WORDS" => Some("/tmp/list.csv".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(args.db_url, "sqlite::memory:");
        assert_eq!(args.words, PathBuf::from("/tmp/list.csv"));
    }

    #[test]
    fn config_flags_parse() {
        let args = parse(
            Command::Config,
            &["--direction", "reverse", "--range", "5-40", "--limit", "20"],
        )
        .unwrap();
        assert_eq!(
            args.changes,
            ConfigChanges {
                direction: Some(QuizDirection::TargetToPrompt),
                range: Some((5, 40)),
                limit: Some(20),
            }
        );
        assert!(!args.changes.is_empty());
    }

    #[test]
    fn flags_are_scoped_to_their_command() {
        assert!(matches!(
            parse(Command::Reset, &["--training"]),
            Err(ArgsError::UnknownArg(_))
        ));
        assert!(matches!(
            parse(Command::Quiz, &["--limit", "3"]),
            Err(ArgsError::UnknownArg(_))
        ));
        assert!(parse(Command::Reset, &["--yes"]).unwrap().assume_yes);
    }

    #[test]
    fn bad_values_are_reported() {
        assert!(matches!(
            parse(Command::Config, &["--range", "10"]),
            Err(ArgsError::InvalidRange { .. })
        ));
        assert!(matches!(
            parse(Command::Config, &["--direction", "up"]),
            Err(ArgsError::InvalidDirection { .. })
        ));
        assert!(matches!(
            parse(Command::Quiz, &["--db"]),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
    }

    #[test]
    fn relative_sqlite_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:data/quiz.db".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/quiz.db"));
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
    }
}
