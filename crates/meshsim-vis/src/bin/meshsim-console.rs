//! Meshsim operator console
//!
//! Configure a running simulation engine, send messages through it and
//! follow the event log from the command line.

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use meshsim_topology::{default_node_id, random_topology, NodeForm};
use meshsim_vis::config::parse_viewport;
use meshsim_vis::{
    spawn_frame_loop, AppState, ConsoleConfig, CustomTab, EngineClient, EventStream, Mode,
    Orchestrator, Selection,
};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// Operator console for the mesh message-routing simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Engine base URL (overrides MESHSIM_ENGINE_URL)
    #[arg(long)]
    engine: Option<Url>,

    /// Topology file held by the engine
    #[arg(long, conflicts_with_all = ["custom", "form", "random"])]
    topology: Option<String>,

    /// Descriptor file to paste as a custom topology
    #[arg(long, conflicts_with_all = ["form", "random"])]
    custom: Option<PathBuf>,

    /// Form node as ID or ID:NEIGHBOR,NEIGHBOR (repeat once per node).
    /// A neighbor must be a row that keeps its default id (A, B, ...)
    #[arg(long, conflicts_with = "random")]
    form: Vec<String>,

    /// Generate a random custom topology with this many nodes
    #[arg(long)]
    random: Option<usize>,

    /// Link probability for --random
    #[arg(long, default_value_t = 0.3)]
    density: f64,

    /// Probability that the network drops a hop
    #[arg(long)]
    drop_rate: Option<f64>,

    /// Initial hop budget per message
    #[arg(long)]
    ttl: Option<u32>,

    /// Queue a message as FROM:TO (repeatable)
    #[arg(long)]
    send: Vec<String>,

    /// List the engine's topology files and exit
    #[arg(long)]
    list: bool,

    /// Seconds to keep following events after the last message
    #[arg(long, default_value_t = 5)]
    linger: u64,

    /// Render surface width
    #[arg(long)]
    width: Option<f64>,

    /// Render surface height
    #[arg(long)]
    height: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meshsim_console=info,meshsim_vis=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = overlay(ConsoleConfig::from_env()?, &args)?;
    tracing::info!(engine = %config.engine_url, "Starting meshsim console");

    let state = AppState::new(config.viewport);
    let client = EngineClient::new(config.engine_url.clone(), config.request_timeout)?;
    let orchestrator = Orchestrator::new(client, state.clone());

    let files = orchestrator.load_topologies().await;
    if args.list {
        for file in files {
            println!("{file}");
        }
        return Ok(());
    }

    let mut lines = state.scene.read().await.log.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match lines.recv().await {
                Ok(entry) => println!("{entry}"),
                Err(RecvError::Lagged(n)) => tracing::warn!(skipped = n, "log output lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let stream = EventStream::new(config.events_url()?, state.clone()).spawn();
    let frames = spawn_frame_loop(state.clone(), config.frame_period);

    fill_inputs(&state, &args).await?;

    let outcome = orchestrator.configure().await;
    match &outcome {
        Ok(report) => {
            tracing::info!(nodes = report.nodes, edges = report.edges, "Configured");
            for route in &args.send {
                let Some((from, to)) = route.split_once(':') else {
                    eprintln!("--send expects FROM:TO, got {route:?}");
                    continue;
                };
                if let Err(e) = orchestrator.send_between(from.trim(), to.trim()).await {
                    tracing::warn!(error = %e, %route, "Message not sent");
                    if matches!(e, meshsim_vis::Error::MissingRoute) {
                        eprintln!("{e}");
                    }
                }
            }
            tokio::time::sleep(Duration::from_secs(args.linger)).await;
        }
        Err(e) => {
            if let Some(notice) = e.notice() {
                eprintln!("{notice}");
            }
        }
    }

    stream.abort();
    frames.abort();

    {
        let scene = state.scene.read().await;
        for node in scene.layout.nodes() {
            println!("{:>8} {:>8.1} {:>8.1}", node.id, node.x, node.y);
        }
    }
    // Let the printer drain before exit
    tokio::time::sleep(Duration::from_millis(50)).await;
    printer.abort();

    outcome.map(drop).map_err(Into::into)
}

/// Apply command-line overrides to the environment configuration.
fn overlay(mut config: ConsoleConfig, args: &Args) -> Result<ConsoleConfig, Box<dyn Error>> {
    if let Some(engine) = &args.engine {
        config.engine_url = engine.clone();
    }
    if args.width.is_some() || args.height.is_some() {
        let width = args.width.unwrap_or(config.viewport.width);
        let height = args.height.unwrap_or(config.viewport.height);
        config.viewport = parse_viewport(&format!("{width}x{height}"))?;
    }
    Ok(config)
}

/// Put the requested topology into the input panel and the parameters into
/// the controls.
async fn fill_inputs(state: &AppState, args: &Args) -> Result<(), Box<dyn Error>> {
    {
        let mut scene = state.scene.write().await;
        if let Some(drop_rate) = args.drop_rate {
            scene.controls.set_drop_rate(drop_rate);
        }
        if let Some(ttl) = args.ttl {
            scene.controls.set_ttl(ttl);
        }
    }

    let pasted = match (&args.custom, args.random) {
        (Some(path), _) => Some(tokio::fs::read_to_string(path).await?),
        (None, Some(n)) => {
            let topology = random_topology(n, args.density, &mut rand::thread_rng());
            Some(topology.to_yaml()?)
        }
        (None, None) => None,
    };

    let mut inputs = state.inputs.write().await;
    if let Some(name) = &args.topology {
        inputs.select(Selection::Mode(Mode::Existing));
        inputs.topology = Some(name.clone());
    } else if let Some(text) = pasted {
        inputs.select(Selection::Mode(Mode::Custom));
        inputs.select(Selection::Tab(CustomTab::PasteDescriptor));
        inputs.paste = text;
    } else if !args.form.is_empty() {
        inputs.select(Selection::Mode(Mode::Custom));
        inputs.select(Selection::Tab(CustomTab::BuildForm));

        fill_form(&mut inputs.form, &args.form)?;
    }
    Ok(())
}

/// Fill the build form from `--form` rows.
///
/// Each neighbor checkbox carries the default id of its row, so a row can
/// only be named as a neighbor while it keeps that id.
fn fill_form(form: &mut NodeForm, rows: &[String]) -> Result<(), String> {
    let rows: Vec<(&str, Vec<&str>)> = rows
        .iter()
        .map(|row| match row.split_once(':') {
            Some((id, nbs)) => (
                id.trim(),
                nbs.split(',').map(str::trim).filter(|s| !s.is_empty()).collect(),
            ),
            None => (row.trim(), Vec::new()),
        })
        .collect();

    form.set_count(rows.len().to_string());
    for (i, (id, _)) in rows.iter().enumerate() {
        form.set_id(i, *id);
    }

    for (i, (id, neighbors)) in rows.iter().enumerate() {
        for nb in neighbors {
            let j = rows
                .iter()
                .position(|(other, _)| other == nb)
                .ok_or_else(|| format!("--form {id}: no node has id {nb}"))?;
            let label = default_node_id(j);
            if label != *nb {
                return Err(format!(
                    "--form {id}: neighbor {nb} is a renamed node; only nodes that keep \
                     their default id ({label} for node {}) can be named as neighbors",
                    j + 1
                ));
            }
            if !form.set_neighbor(i, &label, true) {
                return Err(format!("--form {id}: a node cannot list itself as a neighbor"));
            }
        }
    }
    Ok(())
}
