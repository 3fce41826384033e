use anyhow::Result;
use clap::{Parser, Subcommand};
use pixpress_cli::{build_client, compress_file, print_result, HttpCompressApi, OutputFormat};
use pixpress_controller::CompressParams;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pixpress")]
#[command(about = "Compress images with a pixpress server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Compression server URL
    #[arg(long, default_value = "http://localhost:8080")]
    server: String,

    /// Timeout for requests in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress an image (PNG, JPEG or GIF, up to 10 MB)
    Compress {
        /// Image to compress
        file: PathBuf,

        /// Output quality, 0-100 (server default when omitted)
        #[arg(long)]
        quality: Option<u32>,

        /// Maximum width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Maximum height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Output format (summary or json)
        #[arg(long, default_value = "summary")]
        output: OutputFormat,

        /// Download the compressed image to this file or directory
        #[arg(long)]
        save_to: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let timeout = Duration::from_secs(cli.timeout);
    let api = HttpCompressApi::new(build_client(timeout)?, &cli.server, timeout);

    match cli.command {
        Commands::Compress {
            file,
            quality,
            width,
            height,
            output,
            save_to,
        } => {
            let params = CompressParams {
                quality,
                width,
                height,
            };
            let show_progress = output == OutputFormat::Summary;
            let result = compress_file(&api, &file, params, show_progress).await?;
            let panel = &result.panel;
            let download_url = panel
                .download_url
                .as_deref()
                .map(|url| api.resolve_url(url));

            print_result(&result, download_url.as_deref(), output)?;

            if let Some(target) = save_to {
                let url = panel
                    .download_url
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("The server did not provide a download link"))?;
                let saved = api.download(url, &target, &panel.filename).await?;
                if output == OutputFormat::Summary {
                    println!("💾 Saved to {}", saved.display());
                }
            }
        }
    }

    Ok(())
}
