use crate::config::AppConfig;
use crate::database::DatabaseManager;

pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    let manager = DatabaseManager::connect(&config.database).await?;
    manager.migrate(&config.database.table_name).await?;
    manager.close().await;
    println!("Table {} is ready", config.database.table_name);
    Ok(())
}
