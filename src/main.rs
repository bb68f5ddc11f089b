//! vision-relay binary entry point.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use vision_relay::cli::{Cli, Commands};
use vision_relay::config::VisionConfig;
use vision_relay::format::ToolOutput;
use vision_relay::media::{inspect_source, MediaKind};
use vision_relay::pipeline::AnalysisPipeline;
use vision_relay::tools::ToolRegistry;

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse_args();

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Commands::Image(args) => {
            run_tool(
                "analyze_image",
                serde_json::json!({"image_source": args.source, "prompt": args.prompt}),
            )
            .await
        }
        Commands::Video(args) => {
            run_tool(
                "analyze_video",
                serde_json::json!({"video_source": args.source, "prompt": args.prompt}),
            )
            .await
        }
        Commands::Inspect(args) => {
            let kind = if args.video {
                MediaKind::Video
            } else {
                MediaKind::Image
            };
            let info = inspect_source(&args.source, kind).await;
            serde_json::to_string_pretty(&info)
                .map(|json| println!("{json}"))
                .map_err(Into::into)
        }
        Commands::Tools => registry().and_then(|tools| {
            let json = serde_json::to_string_pretty(&tools.definitions())?;
            println!("{json}");
            Ok(())
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

// stderr only; stdout carries tool output
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .ok()
        .or_else(|| {
            std::env::var("LOG_LEVEL")
                .ok()
                .and_then(|level| EnvFilter::try_new(level.to_lowercase()).ok())
        })
        .unwrap_or_else(|| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn registry() -> Result<ToolRegistry, Box<dyn std::error::Error>> {
    let config = Arc::new(VisionConfig::from_env()?);
    let pipeline = Arc::new(AnalysisPipeline::new(config));
    Ok(ToolRegistry::builtin(pipeline))
}

async fn run_tool(name: &str, arguments: serde_json::Value) -> Result<(), Box<dyn std::error::Error>> {
    let output: ToolOutput = registry()?.call(name, arguments).await;
    println!("{}", output.text_content());
    if output.is_error {
        std::process::exit(1);
    }
    Ok(())
}
