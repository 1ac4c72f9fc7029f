//! Recruitment bot entry point: wires adapters from configuration and runs
//! the long-poll loop until Ctrl-C.

use futures::{Stream, StreamExt};
use secrecy::ExposeSecret;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;

use recruitment_bot::adapters::ai::{GeminiConfig, GeminiResponder, MockAiResponder};
use recruitment_bot::adapters::memory::{
    InMemoryChatStore, InMemorySessionStore, InMemorySurveyStore, SeedData, SeedError,
};
use recruitment_bot::adapters::postgres::{PostgresChatRepository, PostgresSurveyRepository};
use recruitment_bot::adapters::redis::RedisSessionStore;
use recruitment_bot::adapters::telegram::{BotApiClient, BotApiConfig, UpdatePoller};
use recruitment_bot::application::handlers::survey::{
    AnswerRecorder, QuestionPresenter, SurveyCatalog, SurveyFlowController,
};
use recruitment_bot::application::{AiChatHandler, MessageDispatcher};
use recruitment_bot::config::{
    AiProvider, AppConfig, ConfigError, SessionBackend, StorageBackend,
};
use recruitment_bot::domain::chat::InboundText;
use recruitment_bot::ports::{
    AIError, AiResponder, ChatRepository, MessageTransport, SessionStore, SurveyReader,
    SurveyResponseRepository, TransportError,
};

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("redis connection timed out")]
    RedisTimeout,

    #[error("seed file: {0}")]
    Seed(#[from] SeedError),

    #[error("AI responder: {0}")]
    Ai(#[from] AIError),

    #[error("telegram client: {0}")]
    Transport(#[from] TransportError),
}

/// Storage ports resolved from `storage.backend`.
struct Stores {
    surveys: Arc<dyn SurveyReader>,
    responses: Arc<dyn SurveyResponseRepository>,
    chat: Arc<dyn ChatRepository>,
}

#[tokio::main]
async fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("recruitment-bot: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Bot stopped");
        std::process::exit(1);
    }
}

fn load_config() -> Result<AppConfig, ConfigError> {
    let config = AppConfig::load()?;
    config.validate()?;
    Ok(config)
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.runtime.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    let stores = build_stores(&config).await?;
    let sessions = build_session_store(&config).await?;
    let responder = build_responder(&config)?;

    let client = BotApiClient::new(
        BotApiConfig::new(config.telegram.bot_token.expose_secret().clone())
            .with_api_base_url(config.telegram.api_base_url.clone())
            .with_request_timeout(config.telegram.request_timeout())
            .with_max_send_retries(config.telegram.max_send_retries),
    )?;
    let transport: Arc<dyn MessageTransport> = Arc::new(client.clone());

    let catalog = SurveyCatalog::new(stores.surveys.clone());
    let flow = SurveyFlowController::new(
        catalog.clone(),
        QuestionPresenter::new(catalog),
        AnswerRecorder::new(stores.responses.clone()),
        stores.responses.clone(),
    );
    let ai_chat = AiChatHandler::new(stores.chat.clone(), responder, transport.clone());
    let dispatcher = Arc::new(MessageDispatcher::new(
        stores.chat.clone(),
        sessions,
        flow,
        ai_chat,
        transport,
    ));

    let limit = Arc::new(Semaphore::new(config.runtime.max_concurrent_updates));
    let updates = UpdatePoller::new(client, config.telegram.poll_timeout_secs).into_stream();

    tracing::info!(
        storage = ?config.storage.backend,
        sessions = ?config.session.backend,
        ai_provider = ?config.ai.provider,
        max_concurrent_updates = config.runtime.max_concurrent_updates,
        "Recruitment bot started"
    );

    let total_permits = config.runtime.max_concurrent_updates as u32;
    dispatch_updates(updates, limit.clone(), tokio::signal::ctrl_c(), move |inbound| {
        let dispatcher = dispatcher.clone();
        async move {
            // Errors were already logged and reported to the user.
            let _ = dispatcher.handle_incoming_text(&inbound).await;
        }
    })
    .await;

    // Wait for in-flight turns.
    let _ = limit.acquire_many(total_permits).await;
    tracing::info!("Recruitment bot stopped");
    Ok(())
}

/// Spawns one task per update, holding a permit from `limit` for its
/// duration. A permit is taken before the next update is pulled, and both
/// waits race `shutdown`, so a saturated pool never delays Ctrl-C.
async fn dispatch_updates<S, Sd, F, Fut>(
    updates: S,
    limit: Arc<Semaphore>,
    shutdown: Sd,
    handle: F,
) where
    S: Stream<Item = InboundText>,
    Sd: Future,
    F: Fn(InboundText) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::pin!(updates);
    tokio::pin!(shutdown);

    loop {
        let permit = tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested");
                break;
            }
            permit = limit.clone().acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break,
            },
        };
        let inbound = tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested");
                break;
            }
            next = updates.next() => match next {
                Some(inbound) => inbound,
                None => break,
            },
        };
        let turn = handle(inbound);
        tokio::spawn(async move {
            turn.await;
            drop(permit);
        });
    }
}

async fn build_stores(config: &AppConfig) -> Result<Stores, StartupError> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let pool = config
                .database
                .pool_options()
                .connect(&config.database.url)
                .await?;
            if config.database.run_migrations {
                sqlx::migrate!("./migrations").run(&pool).await?;
                tracing::info!("Database migrations applied");
            }
            let surveys = Arc::new(PostgresSurveyRepository::new(pool.clone()));
            Ok(Stores {
                surveys: surveys.clone(),
                responses: surveys,
                chat: Arc::new(PostgresChatRepository::new(pool)),
            })
        }
        StorageBackend::Memory => {
            let surveys = InMemorySurveyStore::new();
            let chat = InMemoryChatStore::new();
            if let Some(path) = &config.storage.seed_file {
                let summary = SeedData::load(path)?.apply(&surveys, &chat).await?;
                tracing::info!(
                    path = %path.display(),
                    surveys = summary.surveys,
                    questions = summary.questions,
                    jobs = summary.jobs,
                    "Seed data loaded"
                );
            }
            let surveys = Arc::new(surveys);
            Ok(Stores {
                surveys: surveys.clone(),
                responses: surveys,
                chat: Arc::new(chat),
            })
        }
    }
}

async fn build_session_store(config: &AppConfig) -> Result<Arc<dyn SessionStore>, StartupError> {
    match config.session.backend {
        SessionBackend::Memory => Ok(Arc::new(InMemorySessionStore::new())),
        SessionBackend::Redis => {
            let client = redis::Client::open(config.redis.url.as_str())?;
            let conn = tokio::time::timeout(
                config.redis.connect_timeout(),
                client.get_multiplexed_tokio_connection(),
            )
            .await
            .map_err(|_| StartupError::RedisTimeout)??;
            Ok(Arc::new(
                RedisSessionStore::new(conn, config.session.ttl_secs)
                    .with_prefix(config.redis.key_prefix.clone()),
            ))
        }
    }
}

fn build_responder(config: &AppConfig) -> Result<Arc<dyn AiResponder>, StartupError> {
    match config.ai.provider {
        AiProvider::Gemini => {
            let api_key = config
                .ai
                .gemini_api_key
                .as_ref()
                .map(|k| k.expose_secret().clone())
                .unwrap_or_default();
            let responder = GeminiResponder::new(
                GeminiConfig::new(api_key)
                    .with_model(config.ai.model.clone())
                    .with_base_url(config.ai.base_url.clone())
                    .with_timeout(config.ai.timeout())
                    .with_max_retries(config.ai.max_retries),
            )?;
            Ok(Arc::new(responder))
        }
        AiProvider::Mock => {
            tracing::warn!("Using the mock AI responder");
            Ok(Arc::new(MockAiResponder::new()))
        }
    }
}
