use dotenv::dotenv;
use tracing::{info, warn};

use plaza_backend::app::app::App;
use plaza_backend::util::logger::Logger;

#[tokio::main]
async fn main() {
    // Load .env before the logger reads LOG_DIR and the level variables
    let env_loaded = dotenv();

    let _logger = Logger::new().expect("Failed to initialise logging");

    info!("🚀 Starting Insurance Plaza Backend");
    match env_loaded {
        Ok(_) => info!("✅ Successfully loaded .env file"),
        Err(e) => warn!("⚠️ Failed to load .env file: {} (using system env vars)", e),
    }

    let app = App::new().await;
    app.start().await;
}
