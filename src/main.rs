use screengen::{AppConfig, GeminiClient, Pipeline};
use std::env;
use std::fs;
use std::process;

#[tokio::main]
async fn main() {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    if let Err(e) = screengen::logger::init_with_config(
        screengen::logger::LoggerConfig::development()
            .with_level(screengen::logger::LogLevel::Info),
    ) {
        eprintln!("Failed to initialize logger: {}", e);
        process::exit(1);
    }

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <screenshot.png> [framework] [output]", args[0]);
        process::exit(2);
    }

    let mut config = AppConfig::from_env();
    if let Some(framework) = args.get(2) {
        config = config.with_framework(framework.clone());
    }
    if let Some(output) = args.get(3) {
        config = config.with_output_path(output.clone());
    }

    if config.gemini.api_key.is_none() {
        log::error!("❌ No API key found. Set API_KEY in the environment or .env file");
        process::exit(1);
    }

    let image_path = &args[1];
    let bytes = match fs::read(image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("Could not read {}: {}", image_path, e);
            process::exit(1);
        }
    };

    let client = match GeminiClient::new(config.gemini.clone()) {
        Ok(client) => client,
        Err(e) => {
            log::error!("An error occurred: {}", e);
            process::exit(1);
        }
    };

    let session = client.start_chat(config.generation);
    let mut pipeline = Pipeline::new(session, &config.framework);

    let normalized = match pipeline.load_image(&bytes) {
        Ok(normalized) => normalized,
        Err(e) => {
            log::error!("An error occurred: {}", e);
            process::exit(1);
        }
    };
    log::info!(
        "Uploaded image: {}x{} ({})",
        normalized.width(),
        normalized.height(),
        image_path
    );
    let temp_path = match normalized.persist_temp() {
        Ok(path) => path,
        Err(e) => {
            log::error!("An error occurred: {}", e);
            process::exit(1);
        }
    };
    log::debug!("Working copy at {}", temp_path.display());

    if let Err(e) = pipeline.run_first_pass().await {
        log::error!("An error occurred: {}", e);
        process::exit(1);
    }
    print_code_block("Initial HTML", pipeline.initial_result().unwrap_or_default());

    if let Err(e) = pipeline.run_second_pass().await {
        log::error!("An error occurred: {}", e);
        // The first pass already succeeded; leave it on screen for the user.
        process::exit(1);
    }
    let refined = pipeline.refined_result().unwrap_or_default().to_string();
    print_code_block("Refined HTML", &refined);

    if let Err(e) = fs::write(&config.output_path, &refined) {
        log::error!("Could not write {}: {}", config.output_path, e);
        process::exit(1);
    }
    log::info!("✅ HTML file '{}' has been created", config.output_path);
}

fn print_code_block(label: &str, html: &str) {
    println!("----- {} -----", label);
    println!("{}", html);
    println!("----- end {} -----", label);
}
