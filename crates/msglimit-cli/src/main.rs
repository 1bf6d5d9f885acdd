//! `msglimit` command-line front end.

mod config;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use config::{load_config, LogFormat, MsgLimitConfig};
use msglimit_commands::{register_message_limit_commands, CommandRegistry};
use msglimit_core::{
    clamp_advance_count, AbortHandle, InvocationKind, Message, MessageLimitSettings,
};
use msglimit_settings::{FileSettingsStore, SettingsService};
use msglimit_trim::{ContextWindow, InterceptorChain, MessageLimitInterceptor};
use std::io::Read as _;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "msglimit", about = "Stepped chat-history trimmer")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "msglimit.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trim a JSON array of messages read from stdin and print the result
    Trim {
        /// Generation kind (normal, quiet, regenerate, swipe, continue, impersonate)
        #[arg(short, long, default_value = "normal")]
        kind: InvocationKind,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Push messages one at a time through a rolling window and print its shape
    Simulate {
        /// Number of messages to push
        #[arg(short, long, default_value_t = 20)]
        turns: usize,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Run a control command (ml-state, ml-quiet, ml-limit, ml-advance)
    Cmd {
        /// Command name
        name: String,
        /// Value to set; omit to read the current value
        #[arg(allow_hyphen_values = true)]
        argument: Option<String>,
    },
    /// List the control commands
    Commands,
    /// Print the stored settings as JSON
    Show,
}

/// One-off settings overrides; never written back.
#[derive(clap::Args)]
struct Overrides {
    /// Trim even if the stored settings are disabled
    #[arg(long)]
    enable: bool,
    /// Also trim quiet generations
    #[arg(long)]
    quiet_prompts: bool,
    /// Number of retained messages
    #[arg(long)]
    limit: Option<usize>,
    /// Trim step (values below 1 are treated as 1)
    #[arg(long)]
    advance: Option<usize>,
}

impl Overrides {
    fn apply(&self, mut settings: MessageLimitSettings) -> MessageLimitSettings {
        settings.enabled |= self.enable;
        settings.quiet_prompts |= self.quiet_prompts;
        if let Some(limit) = self.limit {
            settings.limit = limit;
        }
        if let Some(advance) = self.advance {
            settings.advance_count = clamp_advance_count(advance);
        }
        settings
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn open_settings(config: &MsgLimitConfig) -> anyhow::Result<Arc<SettingsService>> {
    let store = FileSettingsStore::new(config.settings_path.clone()).await?;
    let service = SettingsService::load(
        Arc::new(store),
        config.extension_key.clone(),
        config.save_debounce(),
    )
    .await?;
    Ok(Arc::new(service))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    init_tracing(config.log_format);
    info!(
        config = %cli.config.display(),
        settings = %config.settings_path.display(),
        "Configuration loaded"
    );

    let settings = open_settings(&config).await?;

    match cli.command {
        Commands::Trim { kind, overrides } => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read messages from stdin")?;
            let mut chat: Vec<Message> =
                serde_json::from_str(&input).context("Expected a JSON array of messages")?;

            let effective = overrides.apply(settings.snapshot());
            let mut chain = InterceptorChain::new();
            chain.add(Arc::new(MessageLimitInterceptor::new(Arc::new(effective))));

            let before = chat.len();
            chain.run(&mut chat, None, &AbortHandle::new(), kind);
            info!(%kind, before, after = chat.len(), "Chat trimmed");

            println!("{}", serde_json::to_string_pretty(&chat)?);
        }
        Commands::Simulate { turns, overrides } => {
            let effective = overrides.apply(settings.snapshot());
            let mut window = ContextWindow::new(effective.limit, effective.advance_count.get());
            println!("turn\tkept\tstart\tevicted");
            for turn in 1..=turns {
                let evicted = window.push(Message::user(format!("message {turn}")));
                println!(
                    "{turn}\t{}\t{}\t{evicted}",
                    window.messages().len(),
                    window.window_start()
                );
            }
        }
        Commands::Cmd { name, argument } => {
            let mut registry = CommandRegistry::new();
            register_message_limit_commands(&mut registry, settings.clone());
            let result = registry.execute(&name, argument.as_deref())?;
            settings.flush().await;
            println!("{result}");
        }
        Commands::Commands => {
            let mut registry = CommandRegistry::new();
            register_message_limit_commands(&mut registry, settings.clone());
            for desc in registry.list_descriptors() {
                println!("{:<12} {}", desc.name, desc.help);
            }
        }
        Commands::Show => {
            println!("{}", serde_json::to_string_pretty(&settings.snapshot())?);
        }
    }

    Ok(())
}
