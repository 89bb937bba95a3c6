use config::{Config, File};
use sea_orm::Database;
use sea_orm_migration::prelude::*;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DatabaseSetting {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
struct ServerSettings {
    database: DatabaseSetting,
}

#[derive(Debug, Deserialize)]
struct Settings {
    server: Option<ServerSettings>,
}

/// `DATABASE_URL` wins; otherwise the `[server]` section of `settings.toml`
/// is used, so the CLI migrates the same database the app serves.
fn database_url() -> String {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        return url;
    }

    Config::builder()
        .add_source(File::with_name("settings").required(false))
        .build()
        .ok()
        .and_then(|config| config.try_deserialize::<Settings>().ok())
        .and_then(|settings| settings.server)
        .map(|server| match server.database {
            DatabaseSetting::Memory => String::from("sqlite::memory:"),
            DatabaseSetting::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        })
        .unwrap_or_else(|| "sqlite:./gruzzolo.db?mode=rwc".to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut args = std::env::args().skip(1);
    let cmd = args.next().unwrap_or_else(|| "up".to_string());

    let db = Database::connect(database_url()).await?;

    match cmd.as_str() {
        "up" => migration::Migrator::up(&db, None).await?,
        "down" => migration::Migrator::down(&db, None).await?,
        "fresh" => migration::Migrator::fresh(&db).await?,
        "status" => {
            migration::Migrator::status(&db).await?;
        }
        _ => {
            eprintln!("Usage: cargo run -p migration -- [up|down|fresh|status]");
            std::process::exit(2);
        }
    }

    Ok(())
}
