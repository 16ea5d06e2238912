use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "grid-cli")]
#[command(about = "Read rows from and submit forms through a running grid proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every row of a table
    Rows {
        doc_id: String,
        grid_id: String,
        /// Extra query parameter forwarded upstream, as key=value
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Submit a JSON object to a document's form
    Submit {
        doc_id: String,
        /// Form field values, e.g. '{"Name": "Alice"}'
        json: String,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Rows {
            doc_id,
            grid_id,
            params,
        } => {
            client
                .get(format!("{base}/{doc_id}/{grid_id}"))
                .query(&params)
                .send()
                .await?
        }
        Commands::Submit { doc_id, json } => {
            let row: Value = serde_json::from_str(&json)?;
            client
                .post(format!("{base}/{doc_id}"))
                .json(&row)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let pretty = serde_json::from_str::<Value>(&text)
        .and_then(|json| serde_json::to_string_pretty(&json))
        .unwrap_or(text);

    if status.is_success() {
        println!("{pretty}");
    } else {
        eprintln!("Error: proxy returned status {status}");
        eprintln!("{pretty}");
    }
    Ok(())
}
