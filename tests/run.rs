use std::cell::Cell;
use std::fs;
use std::path::PathBuf;

use elecciones_scraper::config::Config;
use elecciones_scraper::data_structs::{DepartmentSelection, FieldValue};
use elecciones_scraper::error::{Error, ErrorKind, Result};
use elecciones_scraper::run::run;
use elecciones_scraper::source::{DocumentSource, SnapshotSource};

const TEST_DATA_RESULTS_PAGE: &'static str = include_str!("../test_data/lavalleja.html");

/// Hands back a fixed document, remembering which department was asked for.
struct FixtureSource {
    html: String,
    asked_for: Cell<Option<String>>
}

impl FixtureSource {
    fn new<S: Into<String>>(html: S) -> Self {
        FixtureSource {
            html: html.into(),
            asked_for: Cell::new(None)
        }
    }
}

impl DocumentSource for FixtureSource {
    fn settled_document(&self, department: &DepartmentSelection) -> Result<String> {
        self.asked_for.set(Some(department.code.clone()));
        Ok(self.html.clone())
    }
}

struct UnsettledSource;

impl DocumentSource for UnsettledSource {
    fn settled_document(&self, _: &DepartmentSelection) -> Result<String> {
        Err(ErrorKind::NavigationOrRenderFailure("timed out waiting for #resultadosDepartamental".into()).into())
    }
}

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("elecciones_run_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

fn config_for(dir: &PathBuf) -> Config {
    let mut config = Config::default();
    config.output = dir.join("elecciones_lavalleja.csv");
    config
}

#[test]
fn full_cycle_writes_one_row() {
    let dir = tmp_dir("full_cycle");
    let config = config_for(&dir);
    let source = FixtureSource::new(TEST_DATA_RESULTS_PAGE);

    let record = run(&config, &source).unwrap();
    assert_eq!(source.asked_for.take(), Some("LAVALLEJA".to_string()));
    assert_eq!(record.get("totalEligibleVoters"), Some(&FieldValue::Integer(54_312)));

    let contents = fs::read_to_string(&config.output).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next(),
        Some("timestamp,lastUpdated,countedPrecincts,totalPrecincts,precinctsWithObservations,\
              totalEligibleVoters,votes_Partido_Nacional,votes_Frente_Amplio,\
              votes_Partido_Colorado,votes_Partido_Independiente_PI")
    );
    let row = lines.next().unwrap();
    assert!(row.ends_with(",11/05/2025 23:45,120/150,150,3,54312,21408,14977,3112,402"));
    assert_eq!(lines.next(), None);

    // A second run appends without repeating the header
    run(&config, &source).unwrap();
    let contents = fs::read_to_string(&config.output).unwrap();
    assert_eq!(contents.lines().count(), 3);
    assert_eq!(contents.matches("timestamp").count(), 1);
}

#[test]
fn missing_container_writes_nothing() {
    let dir = tmp_dir("missing_container");
    let config = config_for(&dir);
    fs::write(&config.output, "timestamp,votes_A\nt0,1\n").unwrap();

    let source = FixtureSource::new("<html><body><p>Cargando...</p></body></html>");

    match run(&config, &source) {
        Err(Error(ErrorKind::ExtractionFailed(_), _)) => {}
        other => panic!("expected ExtractionFailed, got {:?}", other)
    }
    assert_eq!(fs::read_to_string(&config.output).unwrap(), "timestamp,votes_A\nt0,1\n");
}

#[test]
fn unsettled_page_writes_nothing() {
    let dir = tmp_dir("unsettled");
    let config = config_for(&dir);

    match run(&config, &UnsettledSource) {
        Err(Error(ErrorKind::NavigationOrRenderFailure(_), _)) => {}
        other => panic!("expected NavigationOrRenderFailure, got {:?}", other)
    }
    assert!(!config.output.exists());
}

#[test]
fn unparseable_total_still_completes() {
    let dir = tmp_dir("unparseable");
    let config = config_for(&dir);
    let html = TEST_DATA_RESULTS_PAGE.replace(
        "<span class=\"bold\">150</span>",
        "<span class=\"bold\">N/A</span>"
    );

    let record = run(&config, &FixtureSource::new(html)).unwrap();

    assert_eq!(record.get("totalPrecincts"), None);
    assert_eq!(record.get("precinctsWithObservations"), Some(&FieldValue::Integer(3)));
    assert_eq!(record.get("countedPrecincts"), Some(&FieldValue::Text("120/150".into())));
    assert_eq!(record.party_votes().count(), 4);

    let contents = fs::read_to_string(&config.output).unwrap();
    assert!(!contents.lines().next().unwrap().contains("totalPrecincts"));
}

#[test]
fn snapshot_source_drives_a_run() {
    let dir = tmp_dir("snapshot");
    let config = config_for(&dir);
    let source = SnapshotSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/test_data/lavalleja.html"));

    let record = run(&config, &source).unwrap();

    assert_eq!(record.party_votes().count(), 4);
    assert!(config.output.exists());
}

#[test]
fn unwritable_output_fails_after_extraction() {
    let dir = tmp_dir("unwritable");
    let mut config = config_for(&dir);
    config.output = dir.join("no_such_dir").join("out.csv");

    match run(&config, &FixtureSource::new(TEST_DATA_RESULTS_PAGE)) {
        Err(Error(ErrorKind::WriteFailed(_), _)) => {}
        other => panic!("expected WriteFailed, got {:?}", other)
    }
}
