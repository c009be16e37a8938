use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "qr-cli")]
#[command(about = "Command line client for the QR service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service health
    Health,
    /// Request a QR code through POST /generate-qr and print the response
    Generate {
        /// URL to encode
        target: String,
        #[arg(short, long, default_value = "png")]
        format: String,
        #[arg(short, long, default_value_t = 200)]
        size: u32,
        #[arg(short, long)]
        transparent: bool,
    },
    /// Download a QR image through GET /qr
    Image {
        /// URL to encode
        target: String,
        /// File to write the image to
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long, default_value = "png")]
        format: String,
        #[arg(short, long, default_value_t = 200)]
        size: u32,
        #[arg(short, long)]
        transparent: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_json(res).await?;
        }
        Commands::Generate {
            target,
            format,
            size,
            transparent,
        } => {
            let res = client
                .post(format!("{}/generate-qr", cli.url))
                .json(&json!({
                    "url": target,
                    "format": format,
                    "size": size,
                    "transparentBackground": transparent,
                }))
                .send()
                .await?;

            let is_json = res
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|ct| ct.starts_with("application/json"));
            if is_json {
                print_json(res).await?;
            } else {
                println!("{}", res.text().await?);
            }
        }
        Commands::Image {
            target,
            output,
            format,
            size,
            transparent,
        } => {
            let res = client
                .get(format!("{}/qr", cli.url))
                .query(&[
                    ("url", target),
                    ("format", format),
                    ("size", size.to_string()),
                    ("transparent", transparent.to_string()),
                ])
                .send()
                .await?;

            if !res.status().is_success() {
                return print_json(res).await;
            }
            let bytes = res.bytes().await?;
            std::fs::write(&output, &bytes)?;
            println!("Wrote {} bytes to {}", bytes.len(), output.display());
        }
    }

    Ok(())
}

async fn print_json(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
    }
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
