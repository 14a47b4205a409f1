//! whatsnew CLI - run the entry-to-message transform from the command line
//!
//! Transforms raw What's New Panel entries into Firefox messages, either
//! from a local JSON file or fetched straight from Contentful.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

use whatsnew::{transform, ContentfulClient, ContentfulConfig, Message};

#[derive(Parser)]
#[command(name = "whatsnew")]
#[command(version, about = "Transform Contentful What's New Panel entries into Firefox messages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform raw entries from a JSON file into panel messages
    Transform {
        /// Path to a JSON file containing an array of raw entries
        input: PathBuf,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Fetch entries from Contentful and print the transformed messages
    Fetch {
        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Transform { input, pretty } => transform_file(&input, pretty),
        Commands::Fetch { pretty } => fetch(pretty).await,
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn transform_file(input: &Path, pretty: bool) -> Result<(), String> {
    let contents = std::fs::read_to_string(input)
        .map_err(|e| format!("Failed to read {}: {}", input.display(), e))?;

    let values: Vec<serde_json::Value> =
        serde_json::from_str(&contents).map_err(|e| format!("Invalid JSON: {}", e))?;

    let messages = transform::transform_values(&values).map_err(|e| e.to_string())?;

    print_messages(&messages, pretty)
}

async fn fetch(pretty: bool) -> Result<(), String> {
    dotenv::dotenv().ok();

    let config = ContentfulConfig::from_env().map_err(|e| e.to_string())?;
    let client = ContentfulClient::new(config);

    let entries = client.fetch_all().await.map_err(|e| e.to_string())?;
    let messages = transform::transform(&entries);

    print_messages(&messages, pretty)
}

fn print_messages(messages: &[Message], pretty: bool) -> Result<(), String> {
    let output = serde_json::json!({ "messages": messages });

    let json = if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .map_err(|e| format!("Failed to serialize messages: {}", e))?;

    println!("{}", json);
    Ok(())
}
