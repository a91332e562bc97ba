// INICIO DEL ARCHIVO [apps/sweeper/src/main.rs]
/*!
 * =================================================================
 * APARATO: BULK TOKEN SWEEPER (ESTRATO L1-APP)
 * RESPONSABILIDAD: REFRESCO MASIVO ACOTADO DE TOKENS PROXIMOS A VENCER
 *
 * Invocado por un scheduler externo cada 30 min (§4.11). Comparte el
 * mismo sobre de cifrado AEAD que el gateway en linea: un token rotado
 * aqui es legible de inmediato por cualquier peticion que lo consulte.
 * =================================================================
 */

use chrono::{Duration, Utc};
use clap::Parser;
use connectbridge_db::DbClient;
use connectbridge_models::config::Settings;
use connectbridge_models::Livemode;
use connectbridge_platform::{PlatformClient, PlatformError};
use connectbridge_vault::PlaintextConnection;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, instrument, warn};

const MAX_CANDIDATES: usize = 200;
const EXPIRY_WINDOW_MINUTES: i64 = 35;
const DEFAULT_CONCURRENCY: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "connectbridge-sweeper")]
struct Cli {
    /// Registra las acciones que se tomarian sin llamar al upstream ni escribir.
    #[arg(long)]
    dry_run: bool,

    /// Ignora la ventana de vencimiento y procesa todas las conexiones.
    #[arg(long)]
    force_all: bool,

    /// Numero de refrescos concurrentes.
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,
}

#[derive(Debug, Serialize)]
struct SweepSummary {
    total: usize,
    refreshed: usize,
    failed: usize,
    skipped: usize,
    failures: Vec<RedactedFailure>,
}

#[derive(Debug, Serialize)]
struct RedactedFailure {
    tenant_suffix: String,
    livemode: Livemode,
    error_kind: &'static str,
}

enum SweepOutcome {
    Refreshed,
    Skipped,
    Failed(RedactedFailure),
}

fn redact_tenant_id(tenant_id: &str) -> String {
    let chars: Vec<char> = tenant_id.chars().collect();
    let start = chars.len().saturating_sub(6);
    chars[start..].iter().collect()
}

fn error_kind(err: &PlatformError) -> &'static str {
    match err {
        PlatformError::UpstreamAuthError => "upstream_auth",
        PlatformError::UpstreamTransient(_) => "upstream_transient",
        PlatformError::UpstreamMalformed(_) => "upstream_malformed",
    }
}

#[instrument(skip(db, settings, platform, connection), fields(livemode = %connection.livemode))]
async fn sweep_one(
    db: &DbClient,
    settings: &Settings,
    platform: &PlatformClient,
    connection: PlaintextConnection,
    dry_run: bool,
) -> SweepOutcome {
    let tenant_suffix = redact_tenant_id(&connection.tenant_id);

    if dry_run {
        info!("dry_run: would refresh connection ending in {}", tenant_suffix);
        return SweepOutcome::Skipped;
    }

    let credentials = settings.credentials_for(connection.livemode);

    let exchange = match platform.refresh(credentials, &connection.refresh_token).await {
        Ok(exchange) => exchange,
        Err(e) => {
            warn!("refresh failed for connection ending in {}: {}", tenant_suffix, e);
            return SweepOutcome::Failed(RedactedFailure {
                tenant_suffix,
                livemode: connection.livemode,
                error_kind: error_kind(&e),
            });
        }
    };

    let now = Utc::now();
    let new_expiry = now + Duration::seconds(exchange.expires_in_seconds as i64);

    if let Err(e) = connectbridge_vault::update_rotated_tokens(
        db.pool(),
        &settings.encryption_key,
        &connection.tenant_id,
        connection.livemode,
        &exchange.access_token,
        new_expiry,
        &exchange.refresh_token,
        now,
    )
    .await
    {
        warn!("failed to persist rotated tokens for connection ending in {}: {}", tenant_suffix, e);
        return SweepOutcome::Failed(RedactedFailure {
            tenant_suffix,
            livemode: connection.livemode,
            error_kind: "persist_failed",
        });
    }

    SweepOutcome::Refreshed
}

async fn run(cli: Cli) -> SweepSummary {
    let settings = Settings::from_env().expect("CRITICAL_FAULT: configuracion de proceso invalida.");
    let db = DbClient::connect(&settings.database_url)
        .await
        .expect("CRITICAL_FAULT: enlace a Postgres colapsado. Ignicion abortada.");

    let http = reqwest::Client::builder()
        .build()
        .expect("CRITICAL_FAULT: no se pudo construir el cliente HTTP saliente.");
    let platform = PlatformClient::new(http);

    let now = Utc::now();

    let mut candidates = if cli.force_all {
        connectbridge_vault::list_connections(db.pool(), &settings.encryption_key)
            .await
            .expect("CRITICAL_FAULT: no se pudo listar conexiones para el barrido.")
    } else {
        connectbridge_vault::list_expiring_before(
            db.pool(),
            &settings.encryption_key,
            now + Duration::minutes(EXPIRY_WINDOW_MINUTES),
        )
        .await
        .expect("CRITICAL_FAULT: no se pudo listar conexiones proximas a vencer.")
    };

    if candidates.len() > MAX_CANDIDATES {
        info!(
            "candidate set truncated from {} to {} rows for this run",
            candidates.len(),
            MAX_CANDIDATES
        );
        candidates.truncate(MAX_CANDIDATES);
    }

    let total = candidates.len();
    info!("sweep starting: {} candidate connections, dry_run={}", total, cli.dry_run);

    let results: Vec<SweepOutcome> = stream::iter(candidates)
        .map(|connection| {
            let db = &db;
            let settings = &settings;
            let platform = &platform;
            async move { sweep_one(db, settings, platform, connection, cli.dry_run).await }
        })
        .buffer_unordered(cli.concurrency.max(1))
        .collect()
        .await;

    let mut refreshed = 0usize;
    let mut skipped = 0usize;
    let mut failures = Vec::new();

    for outcome in results {
        match outcome {
            SweepOutcome::Refreshed => refreshed += 1,
            SweepOutcome::Skipped => skipped += 1,
            SweepOutcome::Failed(failure) => failures.push(failure),
        }
    }

    let failed = failures.len();

    SweepSummary { total, refreshed, failed, skipped, failures }
}

fn main() {
    dotenvy::dotenv().ok();
    connectbridge_models::telemetry::init_tracing("connectbridge_sweeper");

    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("CRITICAL_FAULT: failed to build tokio runtime.");

    let summary = runtime.block_on(run(cli));

    info!(
        "sweep complete: total={} refreshed={} failed={} skipped={}",
        summary.total, summary.refreshed, summary.failed, summary.skipped
    );

    println!("{}", serde_json::to_string_pretty(&summary).expect("summary always serializes"));

    if summary.failed > 0 {
        std::process::exit(1);
    }
}
// FIN DEL ARCHIVO [apps/sweeper/src/main.rs]
