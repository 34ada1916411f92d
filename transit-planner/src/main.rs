use std::error::Error;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use transit_planner::cache::{CacheConfig, CachedStore};
use transit_planner::domain::{StopId, TimeOfDay};
use transit_planner::loads::{
    DisabledModel, LoadEstimator, LoadModel, RemoteLoadModel, RemoteModelConfig,
};
use transit_planner::network::{NetworkStore, SnapshotStore};
use transit_planner::planner::{
    PlanError, PlanRequest, Planner, PlannerConfig, Priority, RouteReport,
};

#[derive(Parser)]
#[command(about = "Plan a bus trip between two stops")]
struct Args {
    /// Path to a network snapshot (JSON)
    snapshot: PathBuf,
    /// Origin stop id
    from: u32,
    /// Destination stop id
    to: u32,
    /// Departure time, HH:MM
    #[arg(long, value_parser = parse_departure)]
    departure: u32,
    /// Service date; today when omitted
    #[arg(long)]
    date: Option<NaiveDate>,
    /// 0 = least crowded, 1 = fastest, 2 = balanced
    #[arg(long, default_value = "0", value_parser = parse_priority)]
    priority: Priority,
    /// Only use low-floor routes
    #[arg(long)]
    accessible: bool,
    /// Do not look for itineraries with a change
    #[arg(long)]
    no_transfers: bool,
    /// Base URL of the load prediction service
    #[arg(long, env = "PLANNER_MODEL_URL")]
    model_url: Option<String>,
    /// Give up on a load prediction after this many milliseconds
    #[arg(long, default_value_t = PlannerConfig::default().model_timeout_ms)]
    model_timeout_ms: u64,
}

fn parse_departure(s: &str) -> Result<u32, String> {
    TimeOfDay::parse(s)
        .map(TimeOfDay::minutes)
        .map_err(|e| e.to_string())
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    let value: u8 = s.parse().map_err(|_| format!("not a priority: {s}"))?;
    Priority::try_from(value).map_err(|e| e.to_string())
}

async fn plan<S: NetworkStore, M: LoadModel>(
    store: &S,
    model: M,
    config: &PlannerConfig,
    request: &PlanRequest,
) -> Result<RouteReport, PlanError> {
    let estimator = LoadEstimator::new(model, config.model_timeout());
    Planner::new(store, &estimator, config).plan(request).await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let snapshot = SnapshotStore::from_path(&args.snapshot)?;
    info!(
        path = %args.snapshot.display(),
        stops = snapshot.stop_count(),
        routes = snapshot.route_count(),
        "loaded network snapshot"
    );
    let store = CachedStore::new(snapshot, &CacheConfig::default());

    let config = PlannerConfig {
        model_timeout_ms: args.model_timeout_ms,
        ..PlannerConfig::default()
    };
    let date = args.date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let request = PlanRequest::new(
        StopId::from(args.from),
        StopId::from(args.to),
        args.departure,
        date,
    )
    .with_priority(args.priority)
    .with_transfers(!args.no_transfers)
    .accessible(args.accessible);

    let report = match args.model_url {
        Some(url) => {
            let model = RemoteLoadModel::new(
                RemoteModelConfig::new(url).with_timeout_ms(args.model_timeout_ms),
            )?;
            info!(url = model.url(), "using remote load model");
            plan(&store, model, &config, &request).await?
        }
        None => plan(&store, DisabledModel, &config, &request).await?,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
