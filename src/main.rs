use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use poimap::geo::{Authorization, GeoPermissionGate, LocationTracker};
use poimap::headless::{FixedPermission, LoggingMapWidget, StaticPositionSensor};
use poimap::{
    ApiConfig, CategoryStyles, Coordinate, HttpBackend, MapConfig, MapSession, RemoteDataSyncClient,
    SessionMessage, SessionPhase, ViewportController,
};

#[derive(Parser)]
#[command(name = "poimap")]
#[command(about = "Run a headless map session against a POI backend")]
struct Cli {
    /// Backend base URL (defaults to POIMAP_API_URL, then the build profile default)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Simulated device latitude
    #[arg(long, default_value_t = 40.6401)]
    lat: f64,

    /// Simulated device longitude
    #[arg(long, default_value_t = 22.9444)]
    lon: f64,

    /// Latitude span to zoom to once the map is ready
    #[arg(long, default_value_t = 1.0)]
    span: f64,

    /// Answer the location prompt with "deny"
    #[arg(long)]
    deny: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Cli::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(args))
}

async fn run(args: Cli) -> anyhow::Result<()> {
    let env_api = ApiConfig::from_env();
    let api = match args.api_url {
        Some(url) => ApiConfig {
            list_limit: env_api.list_limit,
            ..ApiConfig::new(url)
        },
        None => env_api,
    };
    let config = MapConfig {
        api,
        ..MapConfig::default()
    };
    info!("Using backend {}", config.api.base_url);

    let backend = HttpBackend::new(config.api.clone())?;
    if let Err(e) = backend.health().await {
        warn!("Backend health check failed: {}", e);
    }

    let answer = if args.deny {
        Authorization::Denied
    } else {
        Authorization::Granted
    };
    let permission = Arc::new(GeoPermissionGate::new(FixedPermission(answer)));
    let sensor = StaticPositionSensor {
        coordinate: Coordinate::new(args.lat, args.lon),
    };
    let tracker = LocationTracker::new(permission, sensor, config.watch);
    let viewport = ViewportController::new(LoggingMapWidget::default(), config.viewport);

    let mut session = MapSession::new(
        tracker,
        RemoteDataSyncClient::new(backend),
        viewport,
        CategoryStyles::default(),
    );
    session.viewport().widget().attach(session.sender());
    session.mount();

    let ready = tokio::time::timeout(Duration::from_secs(30), async {
        while session.phase() == SessionPhase::Loading {
            if !session.process_next().await {
                return false;
            }
            let notifications = session.take_notifications();
            if !notifications.is_empty() {
                for notification in notifications {
                    println!("Notification: {:?}", notification);
                }
                return false;
            }
        }
        true
    })
    .await
    .unwrap_or(false);

    if !ready {
        println!("Map did not become ready; still loading.");
        session.teardown();
        return Ok(());
    }
    print_visible(&session, "initial");

    session.update(SessionMessage::CenterOn {
        latitude: args.lat,
        longitude: args.lon,
        zoom_span: Some(args.span),
    });
    settle(&mut session).await;
    print_visible(&session, "after zoom");

    session.update(SessionMessage::CenterOnUser);
    settle(&mut session).await;
    print_visible(&session, "back on user");

    session.teardown();
    Ok(())
}

/// Process messages until the widget reports a settled region.
async fn settle<P, S, B, W>(session: &mut MapSession<P, S, B, W>)
where
    P: poimap::geo::PermissionProvider,
    S: poimap::geo::PositionSensor,
    B: poimap::Backend,
    W: poimap::MapWidget,
{
    loop {
        match tokio::time::timeout(Duration::from_secs(3), session.next_message()).await {
            Ok(Some(message)) => {
                let settled = matches!(message, SessionMessage::RegionSettled(_));
                session.update(message);
                if settled {
                    return;
                }
            }
            _ => return,
        }
    }
}

fn print_visible<P, S, B, W>(session: &MapSession<P, S, B, W>, label: &str)
where
    P: poimap::geo::PermissionProvider,
    S: poimap::geo::PositionSensor,
    B: poimap::Backend,
    W: poimap::MapWidget,
{
    let span = session
        .viewport()
        .current_region()
        .map(|r| r.latitude_span)
        .unwrap_or_default();
    match session.visible() {
        Some(visible) => println!(
            "[{}] span {}: {} cities, {} locations",
            label,
            span,
            visible.cities.len(),
            visible.pois.len()
        ),
        None => println!("[{}] nothing rendered", label),
    }
}
