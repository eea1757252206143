use ornagen::{
    Config, OrnamentClient, QuotaManager, SizePreset, StyledImage, RANDOM_MOTIFS,
};
use std::env;
use std::fs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file first
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded successfully"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    ornagen::logger::init_with_config(
        ornagen::logger::LoggerConfig::development()
            .with_level(ornagen::logger::LogLevel::Debug),
    )?;

    ornagen::logger::log_startup_info("ornagen", env!("CARGO_PKG_VERSION"));

    let options = CliOptions::parse(env::args().skip(1))?;

    if options.serve {
        return run_server().await;
    }

    log::info!("🔍 Checking Hugging Face environment...");
    match env::var("HUGGINGFACE_API_KEY").or_else(|_| env::var("VITE_HUGGINGFACE_API_KEY")) {
        Ok(api_key) if !api_key.is_empty() => {
            log::info!("✅ Hugging Face credential found in environment");
            log::debug!(
                "API key starts with: {}...",
                &api_key[..5.min(api_key.len())]
            );
        }
        _ => {
            log::warn!("⚠️  No Hugging Face API key in environment variables");
            log::warn!("💡 Anonymous requests work but are heavily rate limited");
        }
    }

    let config = Config::from_env();
    let quota = QuotaManager::from_config(config.quota.clone().unwrap_or_default());

    let remaining = quota.remaining().await?;
    log::info!(
        "📅 本日の残り生成回数: {} / {}",
        remaining,
        quota.max_per_day()
    );
    if let Err(e) = quota.check().await {
        log::error!("❌ {}", e);
        log::warn!("💡 {}", e.guidance());
        return Err(e.into());
    }

    let motif = options.motif.clone().unwrap_or_else(|| {
        let index = (chrono::Utc::now().timestamp_millis() as usize) % RANDOM_MOTIFS.len();
        let pick = RANDOM_MOTIFS[index];
        log::info!("🎲 おまかせモチーフ: {}", pick);
        pick.to_string()
    });
    let (width, height) = options.size.dimensions();

    log::info!(
        "🎨 Generating ornaments for motif '{}' at {}x{}...",
        motif,
        width,
        height
    );

    let client = OrnamentClient::new(config.huggingface.clone().unwrap_or_default())?;

    let result = if options.placeholder {
        log::info!("🖼️  Placeholder mode: rendering locally, no network calls");
        client.placeholder_batch(&motif, width, height)
    } else {
        client.generate_batch(&motif, width, height).await
    };

    let images = match result {
        Ok(images) => images,
        Err(e) => {
            log::error!("❌ 画像の生成に失敗しました: {}", e);
            log::warn!("💡 {}", e.guidance());
            return Err(e.into());
        }
    };

    save_images(&images)?;

    let remaining = quota.record_batch().await?;
    log::info!("🎉 Batch complete! 残り生成回数: {}", remaining);

    Ok(())
}

fn save_images(images: &[StyledImage]) -> Result<(), Box<dyn std::error::Error>> {
    let timestamp = chrono::Utc::now().timestamp_millis();
    for image in images {
        let filename = image.file_name(timestamp);
        match fs::write(&filename, &image.payload.bytes) {
            Ok(_) => log::info!(
                "💾 {} ({}) saved to: {}",
                image.style.display_name(),
                image.style.id(),
                filename
            ),
            Err(e) => {
                log::error!("❌ Failed to save {}: {}", filename, e);
                return Err(e.into());
            }
        }
    }
    Ok(())
}

async fn run_server() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "server")]
    {
        ornagen::server::run(Config::from_env()).await?;
        Ok(())
    }
    #[cfg(not(feature = "server"))]
    {
        log::error!("❌ Built without the `server` feature; rebuild with --features server");
        Err("server feature not enabled".into())
    }
}

struct CliOptions {
    motif: Option<String>,
    size: SizePreset,
    placeholder: bool,
    serve: bool,
}

impl CliOptions {
    fn parse(args: impl Iterator<Item = String>) -> Result<Self, Box<dyn std::error::Error>> {
        let args: Vec<String> = args.collect();
        let mut options = CliOptions {
            motif: None,
            size: SizePreset::Square,
            placeholder: false,
            serve: false,
        };

        let mut index = 0;
        while index < args.len() {
            match args[index].as_str() {
                "--placeholder" => options.placeholder = true,
                "--serve" => options.serve = true,
                "--size" => {
                    index += 1;
                    let value = args
                        .get(index)
                        .ok_or("--size requires a value: square, vertical or horizontal")?;
                    options.size = SizePreset::from_id(value)
                        .ok_or_else(|| format!("Unknown size preset: {}", value))?;
                }
                other if other.starts_with("--") => {
                    return Err(format!("Unknown option: {}", other).into());
                }
                motif => options.motif = Some(motif.to_string()),
            }
            index += 1;
        }

        Ok(options)
    }
}
