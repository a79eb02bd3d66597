use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::{info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ercot_grid_client::config::Config;
use ercot_grid_client::timezone::OPERATOR_TZ;
use ercot_grid_client::report::ReportRequest;
use ercot_grid_client::{ErcotClient, Frequency, Market, Options};

#[derive(Parser)]
#[command(name = "ercot-grid")]
#[command(about = "Fetch normalized ERCOT load and generation data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// System load (live snapshot or 7-day forecast)
    Load(DataArgs),
    /// Wind / non-wind generation (live snapshot only)
    Gen(DataArgs),
    /// Raw content of a MIS report
    Report {
        /// One of wind_5min, wind_hrly, gen_hrly, load_7day
        report_type: String,

        /// Report date (Central time), e.g. 2026-10-19
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Args, Debug)]
struct DataArgs {
    /// Read the live system conditions page
    #[arg(long)]
    latest: bool,

    /// Read the 7-day forecast report
    #[arg(long)]
    forecast: bool,

    /// Market code override (RTHR, RT5M, RTPD, DAHR)
    #[arg(long)]
    market: Option<String>,

    /// Frequency code override (1hr, 5m, 10m, 15m, 1d)
    #[arg(long)]
    freq: Option<String>,

    /// Window start, RFC 3339
    #[arg(long)]
    start: Option<DateTime<Utc>>,

    /// Window end, RFC 3339
    #[arg(long)]
    end: Option<DateTime<Utc>>,
}

impl DataArgs {
    fn to_options(&self) -> Result<Options, Box<dyn std::error::Error>> {
        Ok(Options {
            latest: self.latest.then_some(true),
            forecast: self.forecast.then_some(true),
            market: self.market.as_deref().map(str::parse::<Market>).transpose()?,
            freq: self.freq.as_deref().map(str::parse::<Frequency>).transpose()?,
            start_at: self.start,
            end_at: self.end,
        })
    }
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with environment filter support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,ercot_grid_client=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env();
    info!("Using ERCOT endpoints: {:?}", config);
    let client = ErcotClient::new(config)?;

    let output = match cli.command {
        Command::Load(args) => serde_json::to_string_pretty(&client.get_load(args.to_options()?).await?)?,
        Command::Gen(args) => {
            serde_json::to_string_pretty(&client.get_generation(args.to_options()?).await?)?
        }
        Command::Report { report_type, date } => {
            // Noon local time keeps the instant inside the requested Central day
            let target = date
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .and_then(|noon| OPERATOR_TZ.from_local_datetime(&noon).single())
                .map(|local| local.with_timezone(&Utc));
            let request = ReportRequest::parse(&report_type, target)?;
            serde_json::to_string_pretty(&client.get_report(request.report_type, request.target_date).await?)?
        }
    };

    println!("{output}");
    Ok(())
}
