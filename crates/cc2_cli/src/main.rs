use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use cc2_core::codec;
use cc2_core::core_api::{CoreError, Engine, SaveFormat, Session};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Auto,
    Json,
    Encoded,
}

impl FormatArg {
    fn hint(self) -> Option<SaveFormat> {
        match self {
            Self::Auto => None,
            Self::Json => Some(SaveFormat::Json),
            Self::Encoded => Some(SaveFormat::Encoded),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum EmitArg {
    Json,
    Encoded,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Log codec and import details to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode a game save string into JSON.
    Decode {
        /// Save file, or `-` for stdin.
        #[arg(value_name = "SAVE")]
        input: PathBuf,
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Re-indent the decoded JSON instead of printing it verbatim.
        #[arg(long)]
        pretty: bool,
    },
    /// Encode JSON save data into the game's save string format.
    Encode {
        #[arg(value_name = "JSON")]
        input: PathBuf,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print a summary of a save.
    Show {
        #[arg(value_name = "SAVE")]
        input: PathBuf,
        #[arg(long)]
        json: bool,
        #[arg(long, value_enum, default_value_t = FormatArg::Auto)]
        format: FormatArg,
    },
    /// Apply edits to a save and write the result.
    ///
    /// Edits run in this order: --max-stats, --set, --remove-item, --add-item.
    /// --remove-item indices refer to the inventory as loaded.
    Edit {
        #[arg(value_name = "SAVE")]
        input: PathBuf,
        #[arg(long, short)]
        output: PathBuf,
        #[arg(long, value_enum, default_value_t = FormatArg::Auto)]
        format: FormatArg,
        /// Numeric field assignment such as `money=5000` or `stats.clicks=10`.
        #[arg(long = "set", value_name = "PATH=N", value_parser = parse_assignment, allow_hyphen_values = true)]
        set: Vec<(String, i64)>,
        #[arg(long = "add-item", value_name = "ITEM")]
        add_item: Vec<String>,
        #[arg(long = "remove-item", value_name = "INDEX")]
        remove_item: Vec<usize>,
        #[arg(long = "max-stats")]
        max_stats: bool,
        /// Output format; defaults to the format of the input.
        #[arg(long, value_enum)]
        emit: Option<EmitArg>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Decode {
            input,
            output,
            pretty,
        } => {
            let text = read_input(&input);
            let rendered = if pretty {
                let session = open_session(&input, &text, Some(SaveFormat::Encoded));
                session.to_json_pretty().unwrap_or_else(|e| {
                    eprintln!("Error rendering JSON output: {e}");
                    process::exit(1);
                })
            } else {
                codec::decode(text.trim()).unwrap_or_else(|e| {
                    eprintln!("Error decoding save: {}", input.display());
                    eprintln!("  {e}");
                    process::exit(1);
                })
            };
            write_output(output.as_deref(), &rendered);
        }
        Command::Encode { input, output } => {
            let text = read_input(&input);
            let session = open_session(&input, &text, Some(SaveFormat::Json));
            let encoded = export(&session, EmitArg::Encoded);
            write_output(output.as_deref(), &encoded);
        }
        Command::Show {
            input,
            json,
            format,
        } => {
            let text = read_input(&input);
            let session = open_session(&input, &text, format.hint());
            if json {
                let rendered =
                    serde_json::to_string_pretty(&summary_json(&session)).unwrap_or_else(|e| {
                        eprintln!("Error rendering JSON output: {e}");
                        process::exit(1);
                    });
                println!("{rendered}");
            } else {
                print_summary(&session);
            }
        }
        Command::Edit {
            input,
            output,
            format,
            set,
            add_item,
            remove_item,
            max_stats,
            emit,
        } => {
            if set.is_empty() && add_item.is_empty() && remove_item.is_empty() && !max_stats {
                eprintln!("edit requires at least one of --set, --add-item, --remove-item, --max-stats");
                process::exit(2);
            }

            let text = read_input(&input);
            let mut session = open_session(&input, &text, format.hint());

            if max_stats {
                session.max_stats().unwrap_or_else(|e| fail("max stats", e));
            }
            for (path, value) in &set {
                session
                    .set_number(path, *value)
                    .unwrap_or_else(|e| fail(&format!("--set {path}"), e));
            }
            let mut removals = remove_item;
            removals.sort_unstable_by(|a, b| b.cmp(a));
            removals.dedup();
            for index in removals {
                let removed = session
                    .remove_inventory_item(index)
                    .unwrap_or_else(|e| fail(&format!("--remove-item {index}"), e));
                tracing::info!(index, item = %removed, "removed inventory item");
            }
            for item in &add_item {
                let discovered = session
                    .add_inventory_item(item)
                    .unwrap_or_else(|e| fail(&format!("--add-item {item}"), e));
                tracing::info!(item = %item, discovered, "added inventory item");
            }

            let emit = emit.unwrap_or(match session.format() {
                SaveFormat::Json => EmitArg::Json,
                SaveFormat::Encoded => EmitArg::Encoded,
            });
            let rendered = export(&session, emit);
            write_output(Some(&output), &rendered);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "cc2_save=debug,cc2_core=debug"
    } else {
        "cc2_save=warn,cc2_core=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

fn read_input(path: &Path) -> String {
    let result = if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map(|_| text)
    } else {
        fs::read_to_string(path)
    };
    let text = result.unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", path.display());
        process::exit(1);
    });
    tracing::debug!(path = %path.display(), len = text.len(), "read input");
    text
}

fn write_output(path: Option<&Path>, text: &str) {
    let Some(path) = path else {
        println!("{text}");
        return;
    };
    fs::write(path, text).unwrap_or_else(|e| {
        eprintln!("Error writing {}: {e}", path.display());
        process::exit(1);
    });
    tracing::info!(path = %path.display(), len = text.len(), "wrote output");
}

fn open_session(path: &Path, text: &str, hint: Option<SaveFormat>) -> Session {
    let session = Engine::new().open_str(text, hint).unwrap_or_else(|e| {
        eprintln!("Error parsing save data: {}", path.display());
        eprintln!("  {e}");
        process::exit(1);
    });
    tracing::info!(format = %session.format(), "loaded save");
    session
}

fn export(session: &Session, emit: EmitArg) -> String {
    let result = match emit {
        EmitArg::Json => session.to_json_pretty(),
        EmitArg::Encoded => session.to_encoded(),
    };
    result.unwrap_or_else(|e| fail("export", e))
}

fn fail(action: &str, err: CoreError) -> ! {
    eprintln!("Error applying {action}: {err}");
    process::exit(1);
}

fn parse_assignment(value: &str) -> Result<(String, i64), String> {
    let (path, number) = value
        .split_once('=')
        .ok_or_else(|| format!("expected PATH=N, got '{value}'"))?;
    let path = path.trim();
    if path.is_empty() {
        return Err(format!("missing field path in '{value}'"));
    }
    let number = number
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid number in '{value}': {e}"))?;
    Ok((path.to_string(), number))
}

fn summary_json(session: &Session) -> JsonValue {
    let snapshot = session.snapshot();
    let mut out = match serde_json::to_value(&snapshot) {
        Ok(JsonValue::Object(map)) => map,
        _ => JsonMap::new(),
    };
    out.insert(
        "inventory".to_string(),
        JsonValue::from(session.inventory()),
    );
    out.insert(
        "discovered_items".to_string(),
        JsonValue::from(session.discovered_items()),
    );
    JsonValue::Object(out)
}

fn print_summary(session: &Session) {
    let snapshot = session.snapshot();
    println!("Format:     {}", snapshot.format);
    println!("Money:      {}", format_cents(snapshot.money));
    println!("Tickets:    {}", snapshot.tickets);
    println!("Tokens:     {}", snapshot.tokens);
    println!("XP:         {}", snapshot.xp);
    println!(
        "Inventory:  {} items ({} discovered)",
        snapshot.inventory_count, snapshot.discovered_count
    );
    for (index, item) in session.inventory().iter().enumerate() {
        println!("  [{index}] {item}");
    }
}

// Money is stored in cents.
fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{sign}${}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::{format_cents, parse_assignment};

    #[test]
    fn parse_assignment_accepts_nested_paths() {
        assert_eq!(
            parse_assignment("stats.clicks=42").expect("valid assignment"),
            ("stats.clicks".to_string(), 42)
        );
        assert_eq!(
            parse_assignment(" money = -5 ").expect("whitespace is trimmed"),
            ("money".to_string(), -5)
        );
    }

    #[test]
    fn parse_assignment_rejects_malformed_values() {
        assert!(parse_assignment("money").is_err());
        assert!(parse_assignment("=5").is_err());
        assert!(parse_assignment("money=lots").is_err());
    }

    #[test]
    fn format_cents_renders_dollars() {
        assert_eq!(format_cents(125075), "$1250.75");
        assert_eq!(format_cents(5), "$0.05");
        assert_eq!(format_cents(-250), "-$2.50");
    }
}
