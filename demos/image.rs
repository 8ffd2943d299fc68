use base64::Engine as _;
use bedrock_canvas::{logger, BedrockConfig, GenerationRequest, ImageClient, ImageQuality};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    logger::init_with_config(logger::LoggerConfig::development())?;
    if !dotenv_loaded {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = BedrockConfig::from_env();
    logger::log_config_info(&config);

    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "A serene landscape with mountains and a lake at sunset".to_string());

    let request = GenerationRequest::new(prompt)
        .with_negative_prompt("text, watermark")
        .with_quality(ImageQuality::Standard)
        .with_size(1024, 1024)
        .with_seed(42);

    let client = ImageClient::new(config);
    let image = client.generate(request).await?;

    let bytes = base64::engine::general_purpose::STANDARD.decode(&image)?;
    log::info!("🖼️  Received {} bytes of image data", bytes.len());

    Ok(())
}
