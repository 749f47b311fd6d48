//! Sync command handlers.
//!
//! A run is strictly sequential: every project is fetched before anything
//! is transformed, and nothing is written until the whole batch enriched
//! and typed cleanly. Any error aborts the run.

use advhouse_api::AdvcakeClient;
use advhouse_core::{AppConfig, ProjectConfig, ProjectsFile};
use advhouse_store::{ClickHouseClient, ClickHouseConfig};
use advhouse_transform::EnrichmentRules;
use chrono::Local;

/// Resolves the projects a run should cover.
///
/// With `login_filter` set, returns just that project or an error when it
/// is not configured.
pub(crate) fn select_projects(
    file: &ProjectsFile,
    login_filter: Option<&str>,
) -> anyhow::Result<Vec<ProjectConfig>> {
    match login_filter {
        Some(login) => {
            let project = file
                .find(login)
                .ok_or_else(|| anyhow::anyhow!("project with login '{login}' is not configured"))?;
            Ok(vec![project.clone()])
        }
        None => Ok(file.projects.clone()),
    }
}

/// Fetch, enrich, type and load orders for the selected projects.
///
/// When `dry_run` is `true` the table DDL and row counts are printed and
/// ClickHouse is never contacted.
///
/// # Errors
///
/// Returns an error if the projects file cannot be loaded, the project
/// filter matches nothing, or any fetch, transform, provision or insert
/// step fails.
pub(crate) async fn run_sync(
    config: &AppConfig,
    login_filter: Option<&str>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let projects_file = advhouse_core::load_projects(&config.projects_path)?;
    let projects = select_projects(&projects_file, login_filter)?;

    let run_at = Local::now().naive_local();
    let date_from = config.date_from(run_at.date());
    tracing::info!(projects = projects.len(), %date_from, dry_run, "starting sync run");

    let api = AdvcakeClient::with_base_url(
        &config.api_key,
        config.request_timeout_secs,
        &config.api_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build advcake client: {e}"))?;
    let batches = api.fetch_projects(&projects, date_from).await?;

    let fetched: usize = batches.iter().map(|b| b.orders.len()).sum();
    let rules = EnrichmentRules::from_config(config);
    let rows = advhouse_transform::enrich(&batches, &rules, run_at)?;

    if rows.is_empty() {
        tracing::warn!(fetched, "no orders passed the status filter; nothing to load");
        println!("fetched {fetched} orders, none eligible for loading");
        return Ok(());
    }

    let schema = advhouse_transform::infer_schema(&rows)?;
    let ddl = advhouse_store::create_table_sql(
        &config.clickhouse_database,
        &config.clickhouse_table,
        &schema,
        &config.layout,
    )?;

    if dry_run {
        println!("{ddl}");
        println!(
            "dry-run: fetched {fetched} orders from {} projects, {} rows would be loaded into {}.{}",
            batches.len(),
            rows.len(),
            config.clickhouse_database,
            config.clickhouse_table
        );
        return Ok(());
    }

    let store = ClickHouseClient::new(&ClickHouseConfig::from_app_config(config))
        .map_err(|e| anyhow::anyhow!("failed to build ClickHouse client: {e}"))?;
    store.ping().await.map_err(|e| {
        anyhow::anyhow!("ClickHouse at {} is unreachable: {e}", config.clickhouse_url)
    })?;
    advhouse_store::provision_table(&store, &config.clickhouse_table, &schema, &config.layout)
        .await?;

    let inserted = advhouse_store::load_rows(
        &store,
        &config.clickhouse_table,
        &schema,
        &rows,
        &config.layout.index_field,
        config.insert_batch_size,
    )
    .await?;

    tracing::info!(
        fetched,
        inserted,
        table = %config.clickhouse_table,
        "load complete"
    );
    println!(
        "loaded {inserted} rows into {}.{}",
        config.clickhouse_database, config.clickhouse_table
    );
    Ok(())
}

/// Print the configured projects, one per line.
///
/// # Errors
///
/// Returns an error if the projects file cannot be loaded.
pub(crate) fn list_projects(config: &AppConfig) -> anyhow::Result<()> {
    let file = advhouse_core::load_projects(&config.projects_path)?;
    for p in &file.projects {
        println!("{}\t{}\t{}", p.login, p.project, p.store_name);
    }
    Ok(())
}
