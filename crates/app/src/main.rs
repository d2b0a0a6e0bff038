use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "hearth={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;

    let mut builder = engine::Engine::builder().database(db.clone());
    if let Some(quotes) = &settings.quotes {
        tracing::info!("Found quote vendor settings...");
        builder = builder.quotes(Arc::new(engine::HttpQuotes::new(&quotes.base_url)));
    }
    if let Some(mail) = &settings.mail {
        tracing::info!("Found mail settings...");
        let mailer = engine::SmtpMailer::new(&engine::SmtpSettings {
            server: mail.server.clone(),
            port: mail.port,
            username: mail.username.clone(),
            password: mail.password.clone(),
            from: mail.from.clone(),
        })?;
        builder = builder.mailer(Arc::new(mailer));
    }
    let engine = builder.build();

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(engine, db, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
