use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "holdover-cli")]
#[command(about = "Management CLI for the holdover controller", long_about = None)]
struct Cli {
    /// Controller admin API.
    #[arg(short, long, default_value = "http://127.0.0.1:7070")]
    url: String,

    /// Backend control endpoint.
    #[arg(short, long, default_value = "http://localhost:8080")]
    control: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show controller phase and timer state
    Status,
    /// Ask the control endpoint to start the main backend
    Start,
    /// Ask the control endpoint to stop the main backend
    Stop,
    /// Query the control endpoint for backend status
    Probe,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Status => {
            let res = client
                .get(format!("{}/admin/status", cli.url.trim_end_matches('/')))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Start => control_call(&client, &cli.control, "start").await?,
        Commands::Stop => control_call(&client, &cli.control, "stop").await?,
        Commands::Probe => control_call(&client, &cli.control, "status").await?,
    }

    Ok(())
}

async fn control_call(
    client: &reqwest::Client,
    base: &str,
    command: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let res = client
        .post(format!("{}/{}", base.trim_end_matches('/'), command))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .send()
        .await?;

    let status = res.status();
    let body = json!({
        "command": command,
        "status": status.as_u16(),
        "accepted": status == reqwest::StatusCode::OK,
    });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
