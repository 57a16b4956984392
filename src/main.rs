//! Console storyteller.
//!
//! Reads one line per turn from stdin and routes it. When a new story is
//! requested inside a running conversation the driver asks for `y`/`n` and
//! switches to the freshly started conversation on `y`. `exit` or `quit`
//! leave.

use std::error::Error;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storyteller::adapters::ai::OpenAIBackend;
use storyteller::adapters::postgres::{self, PostgresMessageLog};
use storyteller::adapters::storage::InMemoryMessageLog;
use storyteller::application::{
    ConfirmNewStoryCommand, ConfirmNewStoryHandler, ConfirmNewStoryResult, IntentClassifier,
    RouteTurnCommand, RouteTurnHandler, RouteTurnResult, StoryGenerator,
};
use storyteller::config::{AppConfig, ConfigError, LoggingConfig};
use storyteller::domain::foundation::{AccountId, ConversationId};
use storyteller::ports::{GenerationBackend, MessageLog};

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging);
    config.validate().map_err(ConfigError::ValidationFailed)?;

    let log: Arc<dyn MessageLog> = match &config.database {
        Some(database) => {
            let pool = postgres::connect(database).await?;
            info!("Using PostgreSQL message log");
            Arc::new(PostgresMessageLog::new(pool))
        }
        None => {
            info!("No database configured, keeping conversations in memory");
            Arc::new(InMemoryMessageLog::new())
        }
    };

    let backend: Arc<dyn GenerationBackend> =
        Arc::new(OpenAIBackend::new(config.ai.openai_config()?)?);
    let backend_info = backend.backend_info();
    info!(backend = %backend_info.name, model = %backend_info.model, "Generation backend ready");

    let generator = StoryGenerator::new(backend.clone(), config.ai.generation_settings());
    let classifier = IntentClassifier::new(backend);
    let router = RouteTurnHandler::new(log.clone(), classifier, generator.clone());
    let confirmer = ConfirmNewStoryHandler::new(log, generator);

    let account = AccountId::new(config.console.account.as_str())?;

    chat(&router, &confirmer, account).await
}

fn init_tracing(logging: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(logging.env_filter());
    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn chat(
    router: &RouteTurnHandler,
    confirmer: &ConfirmNewStoryHandler,
    account: AccountId,
) -> Result<(), Box<dyn Error>> {
    let mut input: Input = BufReader::new(tokio::io::stdin()).lines();
    let mut conversation: Option<ConversationId> = None;

    say("What story would you like to hear? (type 'exit' to leave)").await?;

    while let Some(line) = prompt(&mut input, "> ").await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit") {
            break;
        }

        let mut cmd = RouteTurnCommand::new(account.clone(), text);
        if let Some(id) = conversation {
            cmd = cmd.in_conversation(id);
        }

        match router.handle(cmd).await {
            Ok(RouteTurnResult::Reply {
                reply,
                conversation_id,
            }) => {
                conversation = Some(conversation_id);
                say(&reply).await?;
            }
            Ok(RouteTurnResult::ConfirmationRequired {
                prompt: question,
                conversation_id,
            }) => {
                let Some(answer) = prompt(&mut input, &format!("{question} ")).await? else {
                    break;
                };
                let confirm = ConfirmNewStoryCommand {
                    account_id: account.clone(),
                    text: text.to_string(),
                    confirmation: answer,
                    conversation_id: Some(conversation_id),
                };
                match confirmer.handle(confirm).await {
                    Ok(ConfirmNewStoryResult::Started {
                        reply,
                        conversation_id,
                    }) => {
                        conversation = Some(conversation_id);
                        say(&reply).await?;
                    }
                    Ok(ConfirmNewStoryResult::Cancelled { message }) => say(&message).await?,
                    Err(e) => {
                        warn!(code = ?e.error_code(), error = %e, "Confirmation failed");
                        say(&format!("Sorry, {e}")).await?;
                    }
                }
            }
            Err(e) => {
                warn!(code = ?e.error_code(), error = %e, "Turn failed");
                say(&format!("Sorry, {e}")).await?;
            }
        }
    }

    say("Goodbye!").await?;
    Ok(())
}

async fn prompt(input: &mut Input, label: &str) -> std::io::Result<Option<String>> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(label.as_bytes()).await?;
    stdout.flush().await?;
    input.next_line().await
}

async fn say(text: &str) -> std::io::Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{text}\n\n").as_bytes()).await?;
    stdout.flush().await
}
