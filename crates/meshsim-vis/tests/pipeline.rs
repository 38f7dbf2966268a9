//! Configuration pipeline against a mock engine.

mod support;

use axum::http::StatusCode;
use meshsim_topology::Error as InputError;
use meshsim_vis::{CustomTab, Mode, PipelineError, Selection};
use serde_json::json;
use support::{Harness, MockEngine};

async fn set_params(h: &Harness, drop_rate: f64, ttl: u32) {
    let mut scene = h.state.scene.write().await;
    scene.controls.set_drop_rate(drop_rate);
    scene.controls.set_ttl(ttl);
}

async fn paste(h: &Harness, text: &str) {
    let mut inputs = h.state.inputs.write().await;
    inputs.select(Selection::Mode(Mode::Custom));
    inputs.paste = text.to_string();
}

#[tokio::test]
async fn existing_ring5_end_to_end() {
    let h = Harness::start(MockEngine::ring5()).await;
    set_params(&h, 0.1, 4).await;

    assert_eq!(h.orchestrator.load_topologies().await.len(), 2);
    h.state.inputs.write().await.topology = Some("ring5.yaml".into());

    let report = h.orchestrator.configure().await.unwrap();

    assert_eq!(
        h.engine.configured(),
        vec![json!({"dropRate": 0.1, "ttl": 4, "topology": "ring5.yaml"})]
    );
    assert_eq!(report.roster, vec!["A", "B", "C", "D", "E"]);
    assert_eq!(report.nodes, 5);
    // A-B, A-E, B-C, C-D, D-E
    assert_eq!(report.edges, 5);

    let scene = h.state.scene.read().await;
    assert_eq!(scene.controls.sender.options, report.roster);
    assert_eq!(scene.controls.recipient.options, report.roster);
    assert!(scene.controls.send_enabled && scene.controls.reset_enabled);
    assert_eq!(
        scene.log.lines(),
        vec![r#"Configured existing "ring5.yaml", dropRate=0.1, ttl=4"#]
    );
}

#[tokio::test]
async fn topology_choices_default_to_first_file() {
    let h = Harness::start(MockEngine::ring5()).await;
    h.orchestrator.load_topologies().await;

    assert_eq!(
        h.state.inputs.read().await.topology.as_deref(),
        Some("line3.yaml")
    );
    assert_eq!(
        h.state.scene.read().await.controls.topologies,
        vec!["line3.yaml", "ring5.yaml"]
    );
}

#[tokio::test]
async fn null_topology_list_is_empty() {
    let h = Harness::start(MockEngine::default()).await;
    assert!(h.orchestrator.load_topologies().await.is_empty());
    assert!(h.state.inputs.read().await.topology.is_none());
}

#[tokio::test]
async fn form_chain_renders_three_edges() {
    let h = Harness::start(MockEngine::with_nodes(&["A", "B", "C", "D"])).await;
    {
        let mut inputs = h.state.inputs.write().await;
        inputs.select(Selection::Mode(Mode::Custom));
        inputs.select(Selection::Tab(CustomTab::BuildForm));
        inputs.form.set_count("4");
        inputs.form.set_neighbor(0, "B", true);
        inputs.form.set_neighbor(1, "C", true);
        inputs.form.set_neighbor(2, "D", true);
    }

    let report = h.orchestrator.configure().await.unwrap();
    assert_eq!(report.edges, 3);

    let scene = h.state.scene.read().await;
    let edges: Vec<_> = scene
        .layout
        .edges()
        .iter()
        .map(|e| (e.source_id.as_str(), e.target_id.as_str()))
        .collect();
    assert_eq!(edges, vec![("A", "B"), ("B", "C"), ("C", "D")]);
    assert!(scene.log.contains(
        r#"Configured "custom YAML" (built from form), dropRate=0, ttl=5"#
    ));

    let body = &h.engine.configured()[0];
    assert!(body["customYAML"].as_str().unwrap().contains("id: D"));
    assert!(body.get("topology").is_none());
}

#[tokio::test]
async fn rejected_configuration_is_a_notice() {
    let mut engine = MockEngine::ring5();
    engine.configure_failure = Some((StatusCode::BAD_REQUEST, "ttl must be ≥ 1\n".into()));
    let h = Harness::start(engine).await;
    h.state.inputs.write().await.topology = Some("ring5.yaml".into());

    let err = h.orchestrator.configure().await.unwrap_err();

    assert_eq!(err, PipelineError::Rejected("ttl must be ≥ 1\n".into()));
    assert_eq!(err.notice().as_deref(), Some("Configuration failed: ttl must be ≥ 1\n"));
    assert_eq!(h.engine.node_requests(), 0);
    assert!(h.log_lines().await.is_empty());
    assert!(!h.state.scene.read().await.controls.send_enabled);
}

#[tokio::test]
async fn roster_failure_stops_before_render() {
    let mut engine = MockEngine::ring5();
    engine.nodes_failure = Some(StatusCode::INTERNAL_SERVER_ERROR);
    let h = Harness::start(engine).await;
    h.state.inputs.write().await.topology = Some("ring5.yaml".into());

    let err = h.orchestrator.configure().await.unwrap_err();

    assert_eq!(err, PipelineError::RosterRejected);
    let lines = h.log_lines().await;
    assert_eq!(lines.last().map(String::as_str), Some("Error: could not fetch node list."));
    let scene = h.state.scene.read().await;
    assert!(!scene.controls.sender.enabled);
    assert!(scene.layout.is_empty());
}

#[tokio::test]
async fn missing_topology_file_is_logged() {
    let h = Harness::start(MockEngine::ring5()).await;
    h.state.inputs.write().await.topology = Some("gone.yaml".into());

    let err = h.orchestrator.configure().await.unwrap_err();

    assert_eq!(err, PipelineError::FileMissing);
    assert!(h.state.scene.read().await.log.contains("Error: topology file not found."));
    // Roster was already loaded
    assert!(h.state.scene.read().await.controls.send_enabled);
}

#[tokio::test]
async fn invalid_yaml_stops_without_render() {
    let h = Harness::start(MockEngine::with_nodes(&["A"])).await;
    paste(&h, "nodes: [").await;

    let err = h.orchestrator.configure().await.unwrap_err();

    assert_eq!(err, PipelineError::Parse);
    let scene = h.state.scene.read().await;
    assert!(scene.log.contains("Error: invalid YAML."));
    assert!(scene.layout.is_empty());
}

#[tokio::test]
async fn unknown_neighbor_fails_render() {
    let h = Harness::start(MockEngine::with_nodes(&["A"])).await;
    paste(&h, "nodes:\n- id: A\n  neighbors: [B]\n").await;

    let err = h.orchestrator.configure().await.unwrap_err();

    assert!(matches!(err, PipelineError::Render(_)));
    assert!(h
        .state
        .scene
        .read()
        .await
        .log
        .contains("Error: topology references unknown node B."));
}

#[tokio::test]
async fn oversized_paste_never_reaches_engine() {
    let h = Harness::start(MockEngine::with_nodes(&["A"])).await;
    let text: String = (1..=31)
        .map(|i| format!("- id: N{i}\n  neighbors: []\n"))
        .collect();
    paste(&h, &format!("nodes:\n{text}")).await;
    h.state.scene.write().await.log.push("previous run");

    let err = h.orchestrator.configure().await.unwrap_err();

    assert_eq!(
        err,
        PipelineError::Invalid(InputError::PastedTooLarge {
            count: 31,
            limit: 30
        })
    );
    assert_eq!(err.notice().as_deref(), Some("Custom YAML may not exceed 30 nodes."));
    assert!(h.engine.configured().is_empty());
    // Validation failures leave the previous run on screen
    assert_eq!(h.log_lines().await, vec!["previous run"]);
}

#[tokio::test]
async fn reset_starts_from_a_clean_slate() {
    let h = Harness::start(MockEngine::ring5()).await;
    h.state.inputs.write().await.topology = Some("ring5.yaml".into());
    h.orchestrator.configure().await.unwrap();
    {
        let mut scene = h.state.scene.write().await;
        scene.log.push("Node B RECEIVED from A (TTL=3)");
        scene.layout.settle(50);
    }

    h.orchestrator.reset().await.unwrap();

    let lines = h.log_lines().await;
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("Configured existing"));
    assert_eq!(h.engine.configured().len(), 2);
    assert_eq!(h.state.scene.read().await.layout.ticks(), 0);
}

#[tokio::test]
async fn reset_discards_packets_in_flight() {
    let h = Harness::start(MockEngine::ring5()).await;
    h.state.inputs.write().await.topology = Some("ring5.yaml".into());
    h.orchestrator.configure().await.unwrap();
    h.state
        .scene
        .write()
        .await
        .apply_frame(r#"{"type":"delivered","from":"A","to":"B","ttl":3}"#);
    assert_eq!(h.state.scene.read().await.animations.active(), 1);

    h.orchestrator.reset().await.unwrap();

    let scene = h.state.scene.read().await;
    assert_eq!(scene.animations.active(), 0);
    assert!(scene.animations.markers().is_empty());
}

#[tokio::test]
async fn send_message_logs_outcome() {
    let h = Harness::start(MockEngine::ring5()).await;
    h.state.inputs.write().await.topology = Some("ring5.yaml".into());
    h.orchestrator.configure().await.unwrap();

    h.orchestrator.send_between("A", "C").await.unwrap();

    assert_eq!(h.engine.sent(), vec![json!({"from": "A", "to": "C"})]);
    assert!(h.state.scene.read().await.log.contains("Queued message from A → C"));
}

#[tokio::test]
async fn send_requires_both_selections() {
    let h = Harness::start(MockEngine::ring5()).await;

    let err = h.orchestrator.send_message().await.unwrap_err();

    assert!(matches!(err, meshsim_vis::Error::MissingRoute));
    assert_eq!(err.to_string(), "Select both sender and recipient.");
    assert!(h.engine.sent().is_empty());
    assert!(h.log_lines().await.is_empty());
}

#[tokio::test]
async fn rejected_send_is_logged() {
    let h = Harness::start(MockEngine::ring5()).await;
    // Roster the engine does not know about
    h.state
        .scene
        .write()
        .await
        .controls
        .set_roster(&["X".to_string(), "Y".to_string()]);

    assert!(h.orchestrator.send_message().await.is_err());
    assert!(h.state.scene.read().await.log.contains("Error: message not queued."));
}
