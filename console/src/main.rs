//! Loadboard CLI - shipment board and load submission
//!
//! # Commands
//!
//! ```bash
//! loadboard list                       # Show the shipment board
//! loadboard list --format csv          # Export the board as CSV
//! loadboard template -o draft.json     # Write a default draft
//! loadboard build draft.json           # Validate + show the request (no network)
//! loadboard create draft.json          # Submit the draft
//! loadboard --api http://tms:4000 list # Override LOADBOARD_API_URL
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use loadboard::{
    board_rows, validate_create_request, ActivityFeed, BoardRow, BoardState, Console,
    ConsoleConfig, HttpShipmentApi, LoadDraft, ShipmentApi,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "loadboard")]
#[command(about = "Freight brokerage shipment board and load submission", long_about = None)]
struct Cli {
    /// Shipments API base URL (default: $LOADBOARD_API_URL or http://localhost:4000)
    #[arg(long, global = true)]
    api: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch shipments and print the board
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Validate a draft and print the create request, without sending it
    Build {
        /// Draft JSON file
        draft: PathBuf,
    },

    /// Submit a draft, then print the refreshed board
    Create {
        /// Draft JSON file
        draft: PathBuf,

        /// Write the reset draft back to the file after a successful create
        #[arg(long)]
        write_back: bool,
    },

    /// Print a default draft
    Template {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List { format } => cmd_list(cli.api.as_deref(), format).await,

        Commands::Build { draft } => cmd_build(&draft),

        Commands::Create { draft, write_back } => {
            cmd_create(cli.api.as_deref(), &draft, write_back).await
        }

        Commands::Template { output } => cmd_template(output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn api_client(api: Option<&str>) -> Result<HttpShipmentApi, Box<dyn std::error::Error>> {
    Ok(HttpShipmentApi::new(ConsoleConfig::resolve(api)?))
}

/// Console for one CLI run. Its feed stays quiet: failures surface once,
/// through `main`'s error line.
fn cli_console<A: ShipmentApi>(api: A) -> Console<A> {
    Console::with_feed(api, ActivityFeed::quiet())
}

async fn cmd_list(api: Option<&str>, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let api = api_client(api)?;
    eprintln!("📡 Loading shipments from {}", api.config().shipments_url());

    let mut console = cli_console(api);
    console.refresh().await;
    print_board(&console, format)
}

fn cmd_build(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Draft: {}", path.display());

    let draft = LoadDraft::load(path)?;
    let request = loadboard::build_request(&draft)?;
    let value = serde_json::to_value(&request)?;

    println!("{}", serde_json::to_string_pretty(&value)?);
    check_contract(&value)
}

fn check_contract(value: &serde_json::Value) -> Result<(), Box<dyn std::error::Error>> {
    match validate_create_request(value) {
        Ok(()) => {
            eprintln!("   ✅ Request matches the create contract");
            Ok(())
        }
        Err(errors) => {
            eprintln!("   ❌ Request does not match the create contract:");
            for err in errors.iter().take(5) {
                eprintln!("     - {}", err);
            }
            Err(format!("{} contract violation(s)", errors.len()).into())
        }
    }
}

async fn cmd_create(
    api: Option<&str>,
    path: &Path,
    write_back: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let draft = LoadDraft::load(path)?;
    let api = api_client(api)?;
    eprintln!("📤 Submitting {} to {}", path.display(), api.config().shipments_url());

    let mut console = cli_console(api).with_draft(draft);
    console.submit().await?;
    eprintln!("✅ Load created");

    if write_back {
        console.draft().save(path)?;
        eprintln!("💾 Draft reset and saved to: {}", path.display());
    }

    print_board_after_create(&console)
}

/// The load already exists at this point, so a failed refresh is only a warning.
fn print_board_after_create<A: ShipmentApi>(
    console: &Console<A>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let BoardState::Failed(msg) = console.board().state() {
        eprintln!("⚠️  Load created, but refreshing the board failed: {}", msg);
        return Ok(());
    }
    print_board(console, OutputFormat::Table)
}

fn cmd_template(output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let json = LoadDraft::new().to_json()?;
    match output {
        Some(p) => {
            fs::write(p, &json)?;
            eprintln!("💾 Draft template written to: {}", p.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn print_board<A: ShipmentApi>(
    console: &Console<A>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let shipments = match console.board().state() {
        BoardState::Ready(shipments) => shipments,
        BoardState::Failed(msg) => return Err(msg.clone().into()),
        BoardState::Loading => return Err("board is still loading".into()),
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(shipments)?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            for row in board_rows(shipments, chrono::Utc::now()) {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        OutputFormat::Table => {
            let rows = board_rows(shipments, chrono::Utc::now());
            print_table(&rows);
            eprintln!("\n📊 {} shipments", rows.len());
        }
    }
    Ok(())
}

const TABLE_HEADERS: [&str; 10] = [
    "Load #",
    "Carrier",
    "Customer",
    "Pickup",
    "Appointment",
    "P/U Completed",
    "Deliver",
    "Deliver Date",
    "Last Known Location",
    "ETA",
];

fn print_table(rows: &[BoardRow]) {
    let cells: Vec<[String; 10]> = rows
        .iter()
        .map(|r| {
            let deliver_date = if r.overdue {
                format!("{} (!)", r.deliver_date)
            } else {
                r.deliver_date.clone()
            };
            [
                r.load_number.clone(),
                r.carrier.clone(),
                r.customer.clone(),
                r.pickup.clone(),
                r.appointment.clone(),
                r.pickup_completed.clone(),
                r.deliver.clone(),
                deliver_date,
                r.last_known_location.clone(),
                r.eta.clone(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = TABLE_HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |values: Vec<&str>| {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(TABLE_HEADERS.to_vec()));
    for row in &cells {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadboard::{
        RequestError, RequestResult, Shipment, ShipmentCreateRequest, SubmitError,
    };

    struct BoardDownApi;

    impl ShipmentApi for BoardDownApi {
        async fn list_shipments(&self) -> RequestResult<Vec<Shipment>> {
            Err(RequestError::Status { status: 503, body: String::new() })
        }

        async fn create_shipment(&self, _request: &ShipmentCreateRequest) -> RequestResult<()> {
            Ok(())
        }
    }

    fn valid_draft() -> LoadDraft {
        let mut draft = LoadDraft::new();
        draft.customer_id = "cust-1".into();
        let keys: Vec<_> = draft.stops().iter().map(|s| s.key()).collect();
        for (i, key) in keys.into_iter().enumerate() {
            draft.stop_mut(key).unwrap().location_id = format!("loc-{}", i + 1);
        }
        draft
    }

    #[tokio::test]
    async fn test_create_succeeds_when_board_refresh_fails() {
        let mut console = cli_console(BoardDownApi).with_draft(valid_draft());
        console.submit().await.unwrap();

        assert!(matches!(console.board().state(), BoardState::Failed(_)));
        assert!(print_board_after_create(&console).is_ok());
        assert!(print_board(&console, OutputFormat::Table).is_err());
    }

    #[tokio::test]
    async fn test_cli_console_feed_is_quiet() {
        let mut console = cli_console(BoardDownApi);
        let mut rx = console.feed().subscribe();

        let err = console.submit().await.unwrap_err();
        assert!(matches!(err, SubmitError::Validation(_)));
        assert!(!console.feed().echoes());
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_contract_violation_fails_build() {
        let request = loadboard::build_request(&valid_draft()).unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert!(check_contract(&value).is_ok());

        let mut broken = value.clone();
        broken["stops"] = serde_json::json!([]);
        assert!(check_contract(&broken).is_err());
    }
}
