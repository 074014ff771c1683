use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use metrics::counter;
use precast_api::{ClientConfig, HttpApi};
use precast_core::filter::FilterCriteria;
use precast_core::page::PageEnvelope;
use precast_core::screens::*;
use precast_core::ListRow;
use precast_export::{ExportFormat, FileExporter};
use precast_list::{ListController, ResultProjector, TracingToaster};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::signal;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "precastctl", version, about = "Precast list screens from the terminal")]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, global = true, default_value_t = Output::Human)]
    output: Output,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Output { Human, Json }

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Format { Csv, Excel, Pdf }

impl From<Format> for ExportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Csv => ExportFormat::Csv,
            Format::Excel => ExportFormat::Excel,
            Format::Pdf => ExportFormat::Pdf,
        }
    }
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Screen: element, element_type, log, stockyard, retification, dispatch
    screen: ScreenKind,
    /// Project id
    #[arg(long = "project")]
    project: u64,
    #[arg(long = "page", default_value_t = 1)]
    page: u32,
    /// Rows per page (default: PRECAST_PAGE_SIZE or 10)
    #[arg(long = "page-size")]
    page_size: Option<u32>,
    /// Filter by wire key, e.g. hierarchy_id=3 or status=cast,qc (repeatable)
    #[arg(long = "filter", value_name = "KEY=VALUE")]
    filters: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch one page of a list screen
    Ls {
        #[command(flatten)]
        list: ListArgs,
        /// Sort the page by a column id (client-side, this page only)
        #[arg(long = "sort")]
        sort: Option<String>,
        /// Sort descending
        #[arg(long = "desc")]
        desc: bool,
        /// Hide a column (repeatable)
        #[arg(long = "hide")]
        hide: Vec<String>,
    },
    /// Fetch one page, select rows by id and export them
    Export {
        #[command(flatten)]
        list: ListArgs,
        /// Row ids to select, comma separated
        #[arg(long = "select", value_delimiter = ',')]
        select: Vec<u64>,
        #[arg(long = "format", value_enum, default_value_t = Format::Csv)]
        format: Format,
        /// Target directory (default: PRECAST_EXPORT_DIR or .)
        #[arg(long = "out-dir")]
        out_dir: Option<PathBuf>,
    },
    /// Show the column set of a screen
    Columns {
        screen: ScreenKind,
    },
}

fn init_tracing() {
    let env = std::env::var("PRECAST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env).unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_writer(std::io::stderr).init();
}

fn init_metrics() {
    if let Ok(addr) = std::env::var("PRECAST_METRICS_ADDR") {
        if let Ok(sock) = addr.parse::<std::net::SocketAddr>() {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            match builder.with_http_listener(sock).install() {
                Ok(_) => tracing::info!(addr = %addr, "Prometheus metrics exporter listening"),
                Err(e) => tracing::warn!(error = %e, "failed to install metrics exporter"),
            }
        } else {
            tracing::warn!(addr = %addr, "invalid PRECAST_METRICS_ADDR; expected host:port");
        }
    }
}

fn parse_filters<F: FilterCriteria>(raw: &[String]) -> Result<F> {
    let mut f = F::default();
    for kv in raw {
        let (k, v) = kv.split_once('=').ok_or_else(|| anyhow!("invalid --filter {:?}; expected key=value", kv))?;
        f.assign(k.trim(), v)?;
    }
    Ok(f)
}

/// Run a generic fn for the screen type behind a `ScreenKind`.
macro_rules! dispatch {
    ($kind:expr, $func:ident($($arg:expr),* $(,)?)) => {
        match $kind {
            ScreenKind::Element => $func::<ElementScreen>($($arg),*).await,
            ScreenKind::ElementType => $func::<ElementTypeScreen>($($arg),*).await,
            ScreenKind::Log => $func::<LogScreen>($($arg),*).await,
            ScreenKind::Stockyard => $func::<StockyardScreen>($($arg),*).await,
            ScreenKind::Retification => $func::<RetificationScreen>($($arg),*).await,
            ScreenKind::Dispatch => $func::<DispatchScreen>($($arg),*).await,
        }
    };
}

/// Fetch the requested page. `None` when interrupted.
async fn fetch<S: Screen>(args: &ListArgs, cfg: &ClientConfig) -> Result<Option<ListController<S>>> {
    let filters: S::Filter = parse_filters(&args.filters)?;
    let api = Arc::new(HttpApi::new(cfg)?);
    let page_size = args.page_size.unwrap_or(cfg.page_size);
    let mut ctl = ListController::<S>::new(api, Arc::new(TracingToaster), args.project, page_size).with_filters(filters);
    if args.page > 1 {
        ctl.set_page(args.page);
    } else {
        ctl.refresh();
    }
    tokio::select! {
        _ = ctl.settle() => {}
        _ = signal::ctrl_c() => {
            warn!("interrupted; cancelling request");
            return Ok(None);
        }
    }
    if let Some(e) = ctl.last_error() {
        bail!("{}", e.user_message().unwrap_or_else(|| e.to_string()));
    }
    Ok(Some(ctl))
}

#[derive(Serialize)]
struct LsOut<'a> {
    screen: &'static str,
    page: u32,
    page_size: u32,
    pagination: Option<&'a PageEnvelope>,
    rows: Vec<Map<String, Value>>,
}

fn row_objects<R: ListRow>(p: &ResultProjector<R>) -> Vec<Map<String, Value>> {
    let cols = p.visible_columns();
    p.rows()
        .iter()
        .map(|r| cols.iter().map(|c| (c.id.to_string(), Value::String(r.cell(c.id)))).collect())
        .collect()
}

fn print_table<R: ListRow>(p: &ResultProjector<R>) {
    let cols = p.visible_columns();
    let cells: Vec<Vec<String>> = p.rows().iter().map(|r| cols.iter().map(|c| r.cell(c.id)).collect()).collect();
    let mut widths: Vec<usize> = cols.iter().map(|c| c.label.len()).collect();
    for row in &cells {
        for (i, c) in row.iter().enumerate() {
            widths[i] = widths[i].max(c.chars().count()).min(40);
        }
    }
    let labels: Vec<&str> = cols.iter().map(|c| c.label).collect();
    println!("{}", pad_line(&labels, &widths));
    for row in &cells {
        let vals: Vec<&str> = row.iter().map(|s| s.as_str()).collect();
        println!("{}", pad_line(&vals, &widths));
    }
}

fn pad_line(vals: &[&str], widths: &[usize]) -> String {
    vals.iter()
        .zip(widths)
        .map(|(v, w)| format!("{:<w$}", v.chars().take(*w).collect::<String>(), w = *w))
        .collect::<Vec<_>>()
        .join("  ")
}

async fn ls<S: Screen>(
    args: &ListArgs,
    cfg: &ClientConfig,
    output: Output,
    sort: Option<&str>,
    desc: bool,
    hide: &[String],
) -> Result<()> {
    let Some(mut ctl) = fetch::<S>(args, cfg).await? else { return Ok(()) };
    let p = ctl.projector_mut();
    for id in hide {
        if !p.set_column_visible(id, false) {
            warn!(column = %id, "unknown column; not hidden");
        }
    }
    if let Some(col) = sort {
        if !p.sort_by(col) {
            bail!("unknown column {:?}; see `precastctl columns {}`", col, S::KIND);
        }
        if desc {
            p.sort_by(col);
        }
    }
    let p = ctl.projector();
    match output {
        Output::Human => {
            print_table(p);
            match p.envelope() {
                Some(e) => println!(
                    "page {}/{} • {} records{}{}",
                    e.current_page,
                    e.total_pages,
                    e.total_records,
                    if e.has_prev { " • prev" } else { "" },
                    if e.has_next { " • next" } else { "" },
                ),
                None => println!("{} rows", p.rows().len()),
            }
        }
        Output::Json => {
            let pg = ctl.pagination();
            let out = LsOut { screen: S::KIND.name(), page: pg.page, page_size: pg.page_size, pagination: p.envelope(), rows: row_objects(p) };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

async fn export<S: Screen>(args: &ListArgs, cfg: &ClientConfig, select: &[u64], format: ExportFormat, dir: PathBuf) -> Result<()> {
    let Some(mut ctl) = fetch::<S>(args, cfg).await? else { return Ok(()) };
    for id in select {
        if !ctl.projector_mut().toggle_select(*id) {
            warn!(id, "row not on this page; ignored");
        }
    }
    match ctl.export_selected(format, &FileExporter::new(dir)) {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => bail!("nothing exported"),
    }
}

fn print_columns(kind: ScreenKind, output: Output) -> Result<()> {
    let cols = kind.columns();
    match output {
        Output::Human => {
            for c in &cols {
                println!("{:<20} {:<16} {:?}", c.id, c.label, c.kind);
            }
        }
        Output::Json => {
            let list: Vec<Value> = cols
                .iter()
                .map(|c| serde_json::json!({ "id": c.id, "label": c.label, "kind": format!("{:?}", c.kind).to_lowercase() }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    init_metrics();
    let cli = Cli::parse();
    let cfg = ClientConfig::from_env();

    match cli.command {
        Commands::Ls { list, sort, desc, hide } => {
            info!(screen = %list.screen, project = list.project, page = list.page, "ls invoked");
            counter!("cli_commands_total", 1, "command" => "ls");
            dispatch!(list.screen, ls(&list, &cfg, cli.output, sort.as_deref(), desc, &hide))
        }
        Commands::Export { list, select, format, out_dir } => {
            info!(screen = %list.screen, project = list.project, selected = select.len(), "export invoked");
            counter!("cli_commands_total", 1, "command" => "export");
            let dir = out_dir.unwrap_or_else(|| cfg.export_dir.clone());
            dispatch!(list.screen, export(&list, &cfg, &select, format.into(), dir))
        }
        Commands::Columns { screen } => print_columns(screen, cli.output),
    }
}
