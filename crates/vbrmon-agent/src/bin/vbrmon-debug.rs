//! Connectivity and performance diagnostic for a VBR REST endpoint.
//!
//! Probes authentication and every resource endpoint the poller uses,
//! prints per-call timings, and compares the time-filtered bulk restore
//! point fetch against the legacy per-object calls.

use anyhow::Context;
use clap::Parser;
use std::time::Instant;
use vbrmon_client::client::created_after_days;
use vbrmon_client::page::PageBody;
use vbrmon_client::{ConnectConfig, VbrClient, API_VERSION, DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(name = "vbrmon-debug", about = "Debug VBR REST API connectivity")]
struct Cli {
    /// Backup server IP or hostname
    #[arg(long)]
    host: String,

    /// Username (DOMAIN\user or user@domain)
    #[arg(long)]
    user: String,

    /// Password; falls back to the environment when omitted
    #[arg(long, env = "VBRMON_PASSWORD", hide_env_values = true)]
    password: String,

    /// REST API port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Disable TLS certificate verification
    #[arg(long)]
    no_cert_check: bool,

    /// Redact hostnames, credentials and license holder from output
    #[arg(long)]
    redact: bool,

    /// Number of objects in the per-object comparison
    #[arg(long, default_value_t = 10)]
    perf_objects: usize,

    /// Restore point window in days for the bulk fetch (0 = unfiltered)
    #[arg(long, default_value_t = 7)]
    restore_points_days: i64,
}

/// Which strings to blank out of diagnostic output. Immutable; growing the
/// set produces a new policy, so every print site sees exactly the values
/// known at its point in the flow.
#[derive(Debug, Clone)]
struct RedactionPolicy {
    enabled: bool,
    values: Vec<String>,
}

const REDACT_REPLACEMENT: &str = "***redacted***";

impl RedactionPolicy {
    fn disabled() -> Self {
        Self {
            enabled: false,
            values: Vec::new(),
        }
    }

    fn with_values(values: Vec<String>) -> Self {
        Self {
            enabled: true,
            values,
        }
    }

    fn extend(&self, value: Option<&str>) -> Self {
        let mut next = self.clone();
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            if next.enabled && !next.values.iter().any(|known| known == value) {
                next.values.push(value.to_string());
            }
        }
        next
    }

    fn apply(&self, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        let mut out = text.to_string();
        for value in &self.values {
            if !value.is_empty() {
                out = out.replace(value, REDACT_REPLACEMENT);
            }
        }
        out
    }
}

#[derive(Debug, Default)]
struct TimingTracker {
    entries: Vec<(String, f64, u32)>,
}

impl TimingTracker {
    fn add(&mut self, name: impl Into<String>, elapsed_ms: f64, calls: u32) {
        self.entries.push((name.into(), elapsed_ms, calls));
    }

    fn print_summary(&self) {
        println!("\n=== TIMING SUMMARY ===");
        if self.entries.is_empty() {
            println!("  no timing data collected");
            return;
        }

        let mut sorted: Vec<_> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.1.total_cmp(&a.1));

        println!("Individual API calls (sorted by duration):");
        let mut total_ms = 0.0;
        let mut total_calls = 0;
        for (name, elapsed, calls) in sorted {
            total_ms += elapsed;
            total_calls += calls;
            let count_str = if *calls > 1 {
                format!(" ({calls} calls)")
            } else {
                String::new()
            };
            println!("  {elapsed:>8.0}ms  {name}{count_str}");
        }
        println!("  {total_ms:>8.0}ms  total API time ({total_calls} calls)");

        if total_ms > 30_000.0 {
            println!("warning: API time exceeds 30 seconds, poll cycles may time out");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let policy = if cli.redact {
        RedactionPolicy::with_values(vec![
            cli.host.clone(),
            cli.user.clone(),
            cli.password.clone(),
        ])
    } else {
        RedactionPolicy::disabled()
    };

    let config = ConnectConfig {
        host: cli.host.clone(),
        port: cli.port,
        username: cli.user.clone(),
        password: cli.password.clone(),
        verify_tls: !cli.no_cert_check,
        page_size: 500,
    };

    println!("=== VBR REST API Debug ===");
    println!("  Target: {}", policy.apply(&config.base_url()));
    println!("  User: {}", policy.apply(&cli.user));
    println!("  API version: {API_VERSION}");
    println!("  TLS verify: {}", config.verify_tls);

    println!("\n=== AUTHENTICATION ===");
    let mut timing = TimingTracker::default();
    let auth_start = Instant::now();
    let client = match VbrClient::connect(&config).await {
        Ok(client) => {
            let elapsed = auth_start.elapsed().as_secs_f64() * 1_000.0;
            timing.add("oauth2/token", elapsed, 1);
            println!("  ok: token obtained in {elapsed:.0}ms");
            client
        }
        Err(e) => {
            println!("  FAILED: {}", policy.apply(&e.to_string()));
            println!("  hints:");
            println!("    - check username format: DOMAIN\\user or user@domain");
            println!("    - verify the account has REST API access");
            println!("    - ensure the REST API service listens on port {}", cli.port);
            timing.print_summary();
            return Err(e).context("authentication failed");
        }
    };

    println!("\n=== SERVER INFORMATION ===");
    let mut policy = policy;
    let start = Instant::now();
    match client.server_info().await {
        Ok(info) => {
            timing.add("serverInfo", start.elapsed().as_secs_f64() * 1_000.0, 1);
            policy = policy.extend(info.name.as_deref());
            println!(
                "  Name: {}",
                policy.apply(info.name.as_deref().unwrap_or("Unknown"))
            );
            println!("  Build: {}", info.build_version.as_deref().unwrap_or("Unknown"));
            println!(
                "  Database: {}",
                info.database_vendor.as_deref().unwrap_or("Unknown")
            );
            if !info.patches.is_empty() {
                println!("  Patches: {} installed", info.patches.len());
            }
        }
        Err(e) => println!("  FAILED: {}", policy.apply(&e.to_string())),
    }

    println!("\n=== LICENSE INFORMATION ===");
    let start = Instant::now();
    match client.license().await {
        Ok(license) => {
            timing.add("license", start.elapsed().as_secs_f64() * 1_000.0, 1);
            policy = policy.extend(license.licensed_to.as_deref());
            println!("  Status: {}", license.status.as_deref().unwrap_or("Unknown"));
            println!(
                "  Edition: {}",
                license.edition.as_deref().unwrap_or("Unknown")
            );
            println!(
                "  Licensed to: {}",
                policy.apply(license.licensed_to.as_deref().unwrap_or("Unknown"))
            );
            if let Some(expires) = license.expiration_date.as_deref() {
                println!("  Expires: {expires}");
            }
            if let Some(summary) = &license.instance_license_summary {
                println!(
                    "  Instances: {:.0}/{:.0} used",
                    summary.used_instances_number, summary.licensed_instances_number
                );
            }
        }
        Err(e) => println!("  FAILED: {}", policy.apply(&e.to_string())),
    }

    println!("\n=== RESOURCE ENDPOINTS ===");
    let endpoints = [
        ("jobs/states", "Job States"),
        ("taskSessions", "Task Sessions"),
        ("backupInfrastructure/repositories/states", "Repositories"),
        ("backupInfrastructure/proxies/states", "Proxies"),
        (
            "backupInfrastructure/scaleOutRepositories",
            "Scale-Out Repositories",
        ),
    ];
    for (endpoint, name) in endpoints {
        let fetched = client
            .fetch_collection::<serde_json::Value>(endpoint, &[])
            .await;
        let elapsed_ms = fetched.elapsed.as_secs_f64() * 1_000.0;
        timing.add(endpoint, elapsed_ms, fetched.calls);
        match &fetched.error {
            None => println!(
                "  ok: {name}: {} items in {elapsed_ms:.0}ms ({} calls)",
                fetched.records.len(),
                fetched.calls
            ),
            Some(e) => println!(
                "  FAILED: {name}: {} ({} items before failure)",
                policy.apply(&e.to_string()),
                fetched.records.len()
            ),
        }
    }

    run_performance_test(&client, &policy, &mut timing, &cli).await;

    timing.print_summary();
    Ok(())
}

/// Bulk-vs-per-object restore point comparison. The unfiltered per-object
/// pattern costs one request per protected object; the filtered bulk fetch
/// costs a handful of pages regardless of object count.
async fn run_performance_test(
    client: &VbrClient,
    policy: &RedactionPolicy,
    timing: &mut TimingTracker,
    cli: &Cli,
) {
    println!("\n=== PERFORMANCE: BULK VS PER-OBJECT ===");

    let objects = client
        .fetch_collection::<serde_json::Value>("backupObjects", &[])
        .await;
    timing.add(
        "backupObjects (paginated)",
        objects.elapsed.as_secs_f64() * 1_000.0,
        objects.calls,
    );
    println!(
        "  Fetched {} backup objects in {:.0}ms ({} calls)",
        objects.records.len(),
        objects.elapsed.as_secs_f64() * 1_000.0,
        objects.calls
    );
    if objects.records.is_empty() {
        println!("  no backup objects found, skipping performance test");
        return;
    }

    let mut filter = Vec::new();
    if cli.restore_points_days > 0 {
        let (key, value) = created_after_days(cli.restore_points_days);
        println!("  Filter: {key}={value}");
        filter.push((key, value));
    }
    let bulk = client
        .fetch_collection::<serde_json::Value>("restorePoints", &filter)
        .await;
    let bulk_ms = bulk.elapsed.as_secs_f64() * 1_000.0;
    timing.add(
        format!("restorePoints bulk ({} days)", cli.restore_points_days),
        bulk_ms,
        bulk.calls,
    );
    println!(
        "  Bulk: {} restore points in {bulk_ms:.0}ms ({} calls)",
        bulk.records.len(),
        bulk.calls
    );

    let mut per_object_ms = 0.0;
    let mut per_object_calls = 0u32;
    let mut per_object_points = 0usize;
    for object in objects.records.iter().take(cli.perf_objects) {
        let Some(id) = object.get("id").and_then(|v| v.as_str()) else {
            continue;
        };
        let start = Instant::now();
        match client
            .get_json::<PageBody<serde_json::Value>>(&format!("backupObjects/{id}/restorePoints"))
            .await
        {
            Ok(body) => {
                per_object_ms += start.elapsed().as_secs_f64() * 1_000.0;
                per_object_calls += 1;
                let (items, _) = body.into_parts();
                per_object_points += items.len();
            }
            Err(e) => println!("    error for object {id}: {}", policy.apply(&e.to_string())),
        }
    }
    timing.add(
        format!("restorePoints per-object ({per_object_calls} objects)"),
        per_object_ms,
        per_object_calls,
    );

    if per_object_calls == 0 {
        println!("  no per-object calls succeeded, skipping comparison");
        return;
    }
    let avg_ms = per_object_ms / per_object_calls as f64;
    println!(
        "  Per-object: {per_object_calls} objects, {per_object_ms:.0}ms total, {avg_ms:.0}ms avg, {per_object_points} restore points"
    );

    let total_objects = objects.records.len();
    let estimated_ms = avg_ms * total_objects as f64;
    println!("\n  For {total_objects} backup objects:");
    println!(
        "    Bulk API (filtered):    {bulk_ms:>8.0}ms  ({} calls)",
        bulk.calls
    );
    println!("    Per-object (estimated): {estimated_ms:>8.0}ms  ({total_objects} calls)");
    if bulk_ms > 0.0 && estimated_ms > bulk_ms {
        println!(
            "  Bulk API is ~{:.1}x faster, {} calls reduced to {}",
            estimated_ms / bulk_ms,
            total_objects,
            bulk.calls
        );
    }
}
