//! Convo CLI - conversation analytics from the command line.

mod config;
mod input;
mod render;
mod store;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use convo_core::{
    Analyzer, ConversationId, ConversationRegistry, InMemorySource, LiveAnalytics, Message,
    Preferences,
};

use config::Config;
use store::FileStore;

/// Convo CLI - conversation analytics
#[derive(Parser)]
#[command(name = "convo")]
#[command(about = "Sentiment, keywords and response times for chat transcripts", long_about = None)]
struct Cli {
    /// Preferences file
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    /// Maximum number of keywords to report
    #[arg(long, global = true)]
    limit: Option<usize>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a conversation file
    Analyze {
        /// JSON file with a message array or an object with `messages`
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Print the full analytics report with the transcript
    Report {
        /// JSON file with a message array or an object with `messages`
        file: PathBuf,
    },

    /// Read messages (one JSON object per line) from stdin and print
    /// analytics after each one
    Follow {
        /// Conversation to follow (defaults to the last selected one)
        #[arg(short, long)]
        conversation: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Show or toggle the color theme preference
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },

    /// List conversations, or select, start or clear one
    Select {
        /// Conversation ID to select
        id: Option<String>,

        /// Start a new conversation and select it
        #[arg(long, conflicts_with = "id")]
        new: bool,

        /// Forget the current selection
        #[arg(long, conflicts_with_all = ["id", "new"])]
        clear: bool,
    },

    /// Delete a conversation and its messages
    Delete {
        /// Conversation ID to delete
        id: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ThemeAction {
    Show,
    Toggle,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the reports.
    let default_directive = if cli.verbose { "convo=debug" } else { "convo=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_directive.parse()?))
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let config = Config::default().with_overrides(cli.state_file, cli.limit);
    debug!(state_path = %config.state_path.display(), keyword_limit = config.analyzer.keyword_limit, "Loaded config");

    match cli.command {
        Commands::Analyze { file, format } => {
            analyze(&config, file, format)?;
        }
        Commands::Report { file } => {
            report(&config, file)?;
        }
        Commands::Follow {
            conversation,
            format,
        } => {
            follow(&config, conversation, format).await?;
        }
        Commands::Theme { action } => {
            theme(&config, action)?;
        }
        Commands::Select { id, new, clear } => {
            select(&config, id, new, clear)?;
        }
        Commands::Delete { id } => {
            delete(&config, id)?;
        }
    }

    Ok(())
}

fn analyze(config: &Config, file: PathBuf, format: Format) -> Result<(), Box<dyn Error>> {
    let messages = input::load_messages(&file)?;
    info!(file = %file.display(), messages = messages.len(), "Analyzing conversation");

    let summary = Analyzer::new(config.analyzer.clone()).analyze(&messages);
    match format {
        Format::Text => print!("{}", render::summary(&summary)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}

fn report(config: &Config, file: PathBuf) -> Result<(), Box<dyn Error>> {
    let messages = input::load_messages(&file)?;
    info!(file = %file.display(), messages = messages.len(), "Building report");

    let summary = Analyzer::new(config.analyzer.clone()).analyze(&messages);
    print!("{}", render::report(&summary, &messages));

    Ok(())
}

async fn follow(
    config: &Config,
    conversation: Option<String>,
    format: Format,
) -> Result<(), Box<dyn Error>> {
    let registry = open_registry(config);

    let record = match conversation.map(ConversationId::from) {
        Some(id) => registry.open(&id)?,
        None => match registry.preferences().last_conversation() {
            Ok(Some(id)) => registry.open(&id)?,
            Ok(None) => registry.create()?,
            Err(e) => {
                warn!(error = %e, "Could not read last conversation");
                registry.create()?
            }
        },
    };
    save_records(&registry);

    let live = LiveAnalytics::attach(
        registry.source(),
        record.id.clone(),
        Analyzer::new(config.analyzer.clone()),
    )?;

    info!(
        conversation = %live.conversation(),
        title = %record.title,
        "Following stdin, one JSON message per line"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("End of input");
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let mut message: Message = match serde_json::from_str(line) {
                    Ok(message) => message,
                    Err(e) => {
                        warn!(error = %e, "Skipping malformed message line");
                        continue;
                    }
                };
                if message.created_at.is_none() {
                    message = message.stamped();
                }

                let record = registry.record_message(live.conversation(), message)?;
                save_records(&registry);

                let summary = live.summary();
                match format {
                    Format::Text => println!("{}", render::follow_line(&record, &summary)),
                    Format::Json => println!("{}", serde_json::to_string(&summary)?),
                }
            }
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
        }
    }

    Ok(())
}

/// Registry over the state file, starting from its saved records.
fn open_registry(config: &Config) -> ConversationRegistry<FileStore> {
    let store = FileStore::new(&config.state_path);
    let records = store.conversations().unwrap_or_else(|e| {
        warn!(error = %e, "Could not read saved conversations");
        Vec::new()
    });
    ConversationRegistry::new(InMemorySource::new(), Preferences::new(store)).with_records(records)
}

fn save_records(registry: &ConversationRegistry<FileStore>) {
    let result = registry
        .list()
        .and_then(|records| registry.preferences().store().save_conversations(&records));
    if let Err(e) = result {
        warn!(error = %e, "Could not save conversations");
    }
}

fn theme(config: &Config, action: ThemeAction) -> Result<(), Box<dyn Error>> {
    let prefs = Preferences::new(FileStore::new(&config.state_path));
    debug!(path = %prefs.store().path().display(), "Reading theme preference");

    let theme = match action {
        ThemeAction::Show => prefs.theme()?,
        ThemeAction::Toggle => {
            let theme = prefs.toggle_theme()?;
            info!(theme = %theme, "Theme changed");
            theme
        }
    };
    println!("{}", theme);

    Ok(())
}

fn select(
    config: &Config,
    id: Option<String>,
    new: bool,
    clear: bool,
) -> Result<(), Box<dyn Error>> {
    let registry = open_registry(config);

    if clear {
        registry.preferences().set_last_conversation(None)?;
        println!("Selection cleared");
        return Ok(());
    }

    if new {
        let record = registry.create()?;
        save_records(&registry);
        println!("{}", record.id);
        return Ok(());
    }

    if let Some(id) = id {
        let record = registry.open(&ConversationId::from(id))?;
        save_records(&registry);
        info!(conversation = %record.id, "Conversation selected");
    }

    let selected = registry.preferences().last_conversation()?;
    print!("{}", render::conversation_list(&registry.list()?, selected.as_ref()));
    if selected.is_none() {
        println!("No conversation selected");
    }

    Ok(())
}

fn delete(config: &Config, id: String) -> Result<(), Box<dyn Error>> {
    let registry = open_registry(config);
    let id = ConversationId::from(id);

    registry.delete(&id)?;
    registry
        .preferences()
        .store()
        .save_conversations(&registry.list()?)?;
    println!("Deleted {}", id);

    Ok(())
}
