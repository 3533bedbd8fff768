use clap::Parser;
use snapkeep::cleanup::{self, EditMode};
use snapkeep::cli::{Cli, Command, CompareArgs, ConfigCommand};
use snapkeep::config::Config;
use snapkeep::diff;
use snapkeep::logging;
use snapkeep::paginate;
use snapkeep::report::{json, text, PageView};
use snapkeep::snapshot::SnapshotSource;
use snapkeep::Result;

fn compare(config: &Config, args: &CompareArgs) -> Result<()> {
    let snapper = config.snapper();
    snapper.ensure_available()?;
    let listing = snapper.snapshots()?;
    let result = diff::compare_snapshots(&snapper, &listing.snapshots, args.base, args.target)?;

    let Some(kind) = args.kind else {
        if config.json_output {
            println!("{}", json::render(&result));
        } else {
            print!("{}", text::summary(&result));
        }
        return Ok(());
    };

    let page = paginate::page_numbered(result.bucket(kind), args.page)?;
    if config.json_output {
        println!("{}", json::render(&PageView::new(&result, kind, page)));
    } else {
        print!("{}", text::page(kind, &page));
    }
    Ok(())
}

fn config_command(config: &Config, command: &ConfigCommand) -> Result<()> {
    let path = config.cleanup_config_path();

    match command {
        ConfigCommand::Keys => {
            if config.json_output {
                println!("{}", json::render(&cleanup::SCHEMA));
            } else {
                print!("{}", text::keys(cleanup::SCHEMA));
            }
        }
        ConfigCommand::Show => {
            let parsed = cleanup::read(&path)?;
            let settings = cleanup::settings(&parsed);
            if config.json_output {
                println!(
                    "{}",
                    json::render(&serde_json::json!({
                        "settings": settings,
                        "warnings": parsed.warnings,
                    }))
                );
            } else {
                print!("{}", text::settings(&config.snapper_config, &settings, &parsed.warnings));
            }
        }
        ConfigCommand::Check => {
            let parsed = cleanup::read(&path)?;
            let failures = cleanup::check(&parsed);
            if config.json_output {
                println!("{}", json::render(&failures));
            } else {
                print!("{}", text::check(&failures));
            }
            if !failures.is_empty() {
                std::process::exit(2);
            }
        }
        ConfigCommand::Set(args) => {
            let mode = if args.add { EditMode::Append } else { EditMode::Replace };
            let edit = cleanup::edit(&path, &args.key, &args.value, mode)?;
            if config.json_output {
                println!("{}", json::render(&edit));
            } else {
                print!("{}", text::edit(&edit, &path.display().to_string()));
            }
        }
    }
    Ok(())
}

fn run(cli: Cli, config: &Config) -> Result<()> {
    match cli.command {
        Command::List => {
            let snapper = config.snapper();
            snapper.ensure_available()?;
            let listing = snapper.snapshots()?;
            if config.json_output {
                println!("{}", json::render(&listing));
            } else {
                print!("{}", text::snapshots(&listing.snapshots));
                for bad in &listing.malformed {
                    eprintln!("warning: skipped snapshot {bad}");
                }
            }
            Ok(())
        }
        Command::Compare(args) => compare(config, &args),
        Command::Config(command) => config_command(config, &command),
    }
}

fn main() {
    let cli = Cli::parse();

    let config = Config::load(&cli.global).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    logging::init(&config.log_level);

    if let Err(e) = run(cli, &config) {
        if config.json_output {
            println!("{}", json::render(&serde_json::json!({ "error": e.to_string() })));
        } else {
            eprintln!("error: {e}");
        }
        std::process::exit(1);
    }
}
