//! Information display handlers (config, stats)

use crate::cli::output::*;
use crate::store::VectorCollection;
use crate::AppConfig;
use crate::Result;

pub fn handle_config(config: &AppConfig) {
    print_config(config);
}

pub async fn handle_stats(config: &AppConfig) -> Result<()> {
    let collection = VectorCollection::open_or_create(config).await?;
    let count = collection.count().await?;

    println!("📊 Collection statistics");
    println!("  Name: {}", collection.name());
    println!("  Backend: {:?}", collection.backend());
    println!("  Entries: {count}");
    if count == 0 {
        print_warning("Collection is empty. Run `reviewrag index` first");
    }
    Ok(())
}
