use anyhow::{Context, Result, bail};
use jotter::cli::{Args, print_help};
use jotter::config::Config;
use jotter::context::{AppContext, StandardContext};
use jotter::model::{EntryStatus, Profile};
use jotter::pipeline::Pipeline;
use jotter::storage::JsonFileBackend;
use jotter::store::EntryStore;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::io::{IsTerminal, Read};

fn input_text(rest: &[String]) -> Result<String> {
    if !rest.is_empty() {
        return Ok(rest.join(" "));
    }
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        bail!("No text given. Pass it as arguments or pipe it on stdin.");
    }
    let mut buf = String::new();
    stdin.read_to_string(&mut buf)?;
    Ok(buf)
}

fn open_store(ctx: &dyn AppContext) -> Result<EntryStore<JsonFileBackend>> {
    EntryStore::open(JsonFileBackend::from_context(ctx)?)
}

fn required_uid(args: &Args) -> Result<&str> {
    args.rest
        .first()
        .map(String::as_str)
        .context("Missing entry uid")
}

fn main() -> Result<()> {
    let args = Args::parse(env::args().skip(1))?;

    let command = match args.command.as_deref() {
        Some(cmd) if !args.help && cmd != "help" => cmd,
        _ => {
            print_help("jotter");
            return Ok(());
        }
    };

    let ctx = StandardContext::new(args.root.clone());
    let config = Config::load_or_default(&ctx)?;

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        config.log_level_filter()
    };
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let pipeline = Pipeline::new();
    if !matches!(command, "capture" | "list") {
        args.expect_flags(&[])?;
    }

    match command {
        "capture" => {
            args.expect_flags(&["--save"])?;
            args.check_capture(config.profile)?;
            let text = input_text(&args.rest)?;
            if config.profile == Profile::Lightweight {
                let mut items = pipeline.brain_dump(&text);
                if !config.keep_placeholders {
                    items.retain(|i| !i.is_placeholder());
                }
                println!("{}", serde_json::to_string_pretty(&items)?);
                return Ok(());
            }

            let capture = pipeline.capture(&text);
            let entries: Vec<_> = if config.keep_placeholders {
                capture.entries.clone()
            } else {
                capture.visible().cloned().collect()
            };

            let entries = if args.has_flag("--save") {
                let mut store = open_store(&ctx)?;
                store.commit(entries)?
            } else {
                entries
            };
            println!("{}", serde_json::to_string_pretty(&entries)?);

            if config.suggestions {
                for s in &capture.suggestions {
                    println!("* {}", s);
                }
            }
        }
        "dump" => {
            let text = input_text(&args.rest)?;
            let mut items = pipeline.brain_dump(&text);
            if !config.keep_placeholders {
                items.retain(|i| !i.is_placeholder());
            }
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        "list" => {
            args.expect_flags(&["--today", "--active"])?;
            let store = open_store(&ctx)?;
            let entries = if args.has_flag("--today") {
                store.due_today(chrono::Local::now())
            } else if args.has_flag("--active") {
                store.active()
            } else {
                store.entries().iter().collect()
            };
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        cmd @ ("start" | "done") => {
            let status = if cmd == "start" {
                EntryStatus::InProgress
            } else {
                EntryStatus::Completed
            };
            let mut store = open_store(&ctx)?;
            let entry = store.set_status(required_uid(&args)?, status)?;
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        "config" => {
            println!("# {}", Config::path(&ctx)?.display());
            print!("{}", toml::to_string_pretty(&config)?);
        }
        "delete" => {
            let mut store = open_store(&ctx)?;
            let entry = store.delete(required_uid(&args)?)?;
            println!("Deleted: {}", entry.content);
        }
        other => {
            eprintln!("Unknown command '{}'", other);
            print_help("jotter");
            std::process::exit(2);
        }
    }

    Ok(())
}
