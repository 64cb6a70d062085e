use dotenvy::dotenv;
use ingest_engine::{
    events::ContinuationSignal,
    sqlite::run_migrations,
    traits::{MarkerStore, SecretStore},
    IngestController,
    SqliteDatabase,
};
use ingest_worker::{
    cli::{self, Command},
    config::WorkerConfig,
    dispatch::ShopDispatcher,
    errors::WorkerError,
    fetcher::ShopifyFetcher,
    publishers::TopicPublisher,
    records::TriggerRecord,
};
use log::*;
use serde_json::Value;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    let command = cli::parse_args(std::env::args().skip(1));
    match run(command).await {
        Ok(_) => println!("Bye!"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        },
    }
}

async fn run(command: Command) -> Result<(), WorkerError> {
    match command {
        Command::Help => {
            cli::print_help();
            Ok(())
        },
        Command::SetSecret { host, token } => set_secret(&host, &token).await,
        Command::Ingest { shops, records_file } => ingest(shops, records_file).await,
    }
}

async fn connect(config: &WorkerConfig) -> Result<SqliteDatabase, WorkerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 5).await?;
    run_migrations(db.pool()).await?;
    Ok(db)
}

async fn set_secret(host: &str, token: &str) -> Result<(), WorkerError> {
    let config = WorkerConfig::try_from_env()?;
    let db = connect(&config).await?;
    db.put_secret(host, token).await?;
    info!("🔑️ Stored Admin API token for {host}");
    Ok(())
}

async fn ingest(shops: Vec<String>, records_file: Option<String>) -> Result<(), WorkerError> {
    let config = WorkerConfig::try_from_env()?;
    info!("🚀️ Starting order ingest worker, batch size {}", config.batch_size);
    let db = connect(&config).await?;

    let (order_topic, mut order_rx) = TopicPublisher::<Value>::channel(&config.order_topic, 128);
    let delivery_topic = config.order_topic.clone();
    // stand-in consumer for the downstream topic; keeps the bounded channel draining
    tokio::spawn(async move {
        while let Some(event) = order_rx.recv().await {
            info!("📨️ Delivered order {} to topic {delivery_topic}", event["id"]);
        }
    });

    let (continuations, mut continuation_rx) =
        TopicPublisher::<ContinuationSignal>::channel(&config.continuation_topic, 128);
    let fetcher = ShopifyFetcher::new(db.clone(), config.shopify_api_version.clone());
    let controller = IngestController::new(db.clone(), fetcher, order_topic, continuations.clone());
    let dispatcher = ShopDispatcher::new(controller, config.batch_size);

    if let Some(path) = records_file {
        let raw = std::fs::read_to_string(&path)?;
        let records: Vec<TriggerRecord> =
            serde_json::from_str(&raw).map_err(|e| WorkerError::RecordsFile(e.to_string()))?;
        info!("🚚️ Processing {} trigger records from {path}", records.len());
        dispatcher.handle_records(&records).await?;
    }

    for shop in shops {
        info!("🚀️ Kicking off recursive processing for {shop}");
        db.mark_processing(&shop).await?;
        continuations.send(ContinuationSignal::new(shop)).await?;
    }

    dispatcher.run_to_completion(&mut continuation_rx).await
}
