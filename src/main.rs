use artgen::{
    logger, ActionResponse, Config, DataUri, GeminiClient, Orchestrator, RawSubmission,
    SessionHistory,
};
use chrono::Utc;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Turn prompts into abstract art with a short critique", long_about = None)]
struct Args {
    /// Prompts to render, one generation each, in order
    prompts: Vec<String>,

    /// Reference image whose style should guide the generation
    #[arg(short, long)]
    style: Option<PathBuf>,

    /// How strongly to apply the reference style (0-100)
    #[arg(long)]
    strength: Option<String>,

    /// Artistic movement, e.g. Cubism or Surrealism
    #[arg(short, long)]
    movement: Option<String>,

    /// Color mood, e.g. Vibrant or Pastel
    #[arg(short = 'c', long)]
    mood: Option<String>,

    /// Directory the generated images are written to
    #[arg(short, long, default_value = "art")]
    out: PathBuf,

    /// Print each response as the JSON the form would receive
    #[arg(long)]
    json: bool,

    /// Serve POST /api/generate instead of running prompts
    #[cfg(feature = "server")]
    #[arg(long)]
    serve: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded successfully"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    logger::init_with_config(logger::LoggerConfig::from_env())?;
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = Config::from_env();
    logger::log_config_info(&config);

    let client = GeminiClient::new(config.gemini.clone())?;
    let orchestrator = Orchestrator::from_client(&client);

    #[cfg(feature = "server")]
    if args.serve {
        artgen::server::serve(orchestrator, config.port.unwrap_or(8080)).await?;
        return Ok(());
    }

    if args.prompts.is_empty() {
        return Err("at least one prompt is required".into());
    }

    let style_reference = match &args.style {
        Some(path) => Some(read_style_reference(path)?.to_string()),
        None => None,
    };

    fs::create_dir_all(&args.out)?;
    let mut history = SessionHistory::with_capacity(config.history_capacity);
    let mut failures = 0;

    for (index, prompt) in args.prompts.iter().enumerate() {
        let submission = RawSubmission {
            prompt: Some(prompt.clone()),
            style_reference: style_reference.clone(),
            artistic_movement: args.movement.clone(),
            color_mood: args.mood.clone(),
            style_strength: args.strength.clone(),
        };

        log::info!("🖌️  Generating {}/{}: {}", index + 1, args.prompts.len(), prompt);
        let response = orchestrator.generate_art(&submission).await;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        match response {
            ActionResponse::Success(success) => {
                let path = match save_art(&args.out, index + 1, &success.art_data_uri) {
                    Ok(path) => path,
                    Err(e) => {
                        failures += 1;
                        log::error!("❌ Could not save image {}: {}", index + 1, e);
                        continue;
                    }
                };

                if !args.json {
                    let composition = artgen::StyleComposition::from_strength(success.style_strength);
                    println!("🖼️  {}", path.display());
                    println!("📝 {}", success.analysis.textual_analysis);
                    if composition.has_style() {
                        println!(
                            "📊 prompt {}% / style {}%",
                            composition.prompt_influence, composition.style_influence
                        );
                    }
                }
                history.record(success.art_data_uri);
            }
            ActionResponse::Failure(failure) => {
                failures += 1;
                for (field, messages) in &failure.error {
                    for message in messages {
                        log::error!("❌ {}: {}", field, message);
                    }
                }
            }
        }
    }

    log::info!("🗂️  Session history holds {} image(s)", history.len());
    for (position, entry) in history.entries().enumerate() {
        if let Ok(art) = DataUri::parse(entry) {
            log::debug!("   #{} {} ({} base64 chars)", position + 1, art.mime_type(), art.data().len());
        }
    }

    if failures > 0 {
        return Err(format!("{} of {} generation(s) failed", failures, args.prompts.len()).into());
    }
    Ok(())
}

fn save_art(out: &Path, position: usize, art_data_uri: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let art = DataUri::parse(art_data_uri)?;
    let path = out.join(format!(
        "art-{}-{}.{}",
        Utc::now().format("%Y%m%d-%H%M%S"),
        position,
        art.extension()
    ));
    fs::write(&path, art.decode()?)?;
    Ok(path)
}

fn read_style_reference(path: &Path) -> Result<DataUri, Box<dyn std::error::Error>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let mime_type = match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => return Err(format!("unsupported style image: {}", path.display()).into()),
    };

    let bytes = fs::read(path)?;
    Ok(DataUri::from_bytes(mime_type, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_art_writes_decoded_bytes() {
        let out = std::env::temp_dir().join(format!("artgen-save-{}", std::process::id()));
        fs::create_dir_all(&out).unwrap();

        let path = save_art(&out, 3, "data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("png"));
        assert!(path.file_name().unwrap().to_string_lossy().ends_with("-3.png"));
        assert_eq!(fs::read(&path).unwrap(), b"hello");

        fs::remove_dir_all(&out).unwrap();
    }

    #[test]
    fn save_art_reports_unusable_images() {
        let out = std::env::temp_dir();
        assert!(save_art(&out, 1, "data:image/png;base64,").is_err());
        assert!(save_art(&out, 1, "https://example.com/art.png").is_err());
    }
}
