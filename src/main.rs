use folioart::{catalogue, Config, GeminiImageClient, ImageAcquirer, Page};
use std::sync::Arc;
use std::time::Duration;

const DATA_URI_PREVIEW: usize = 48;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let config = Config::from_env();
    folioart::logger::init_with_config(config.logger.clone())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }
    folioart::logger::log_config_info(&config);

    let client = GeminiImageClient::new(config.gemini.clone())?;
    let acquirer = ImageAcquirer::new(Arc::new(client));

    let _timer = folioart::logger::timer("Decorative artwork");
    let page = Page::mount(&acquirer, catalogue::page_slots());

    let mut ticker = tokio::time::interval(Duration::from_millis(1000));
    while page.loading_count() > 0 {
        ticker.tick().await;
        log::info!("⏳ {} slot(s) still imagining...", page.loading_count());
    }

    for (id, uri) in page.settle().await {
        if uri.starts_with("data:") {
            log::info!("🖼️  {} -> generated ({}...)", id, &uri[..DATA_URI_PREVIEW.min(uri.len())]);
        } else {
            log::info!("🖼️  {} -> fallback {}", id, uri);
        }
        println!("{}\t{}", id, uri);
    }

    Ok(())
}
