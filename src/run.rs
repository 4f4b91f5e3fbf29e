//! One extract-and-append cycle.

use crate::config::Config;
use crate::data_structs::ResultRecord;
use crate::error::*;
use crate::recorder::CsvRecorder;
use crate::scrapers::results_page::ResultsPageScraper;
use crate::source::DocumentSource;

/// Gets the settled results page from `source`, extracts the configured
/// department's figures and appends them to the configured output file.
///
/// Nothing is written unless extraction succeeded. Returns the record that
/// was written.
pub fn run<S: DocumentSource + ?Sized>(config: &Config, source: &S) -> Result<ResultRecord> {
    info!(department = config.department.name.as_str(), "starting run");
    let html = source.settled_document(&config.department)?;

    info!("extracting data");
    let record = ResultsPageScraper::from(html).result_record()?;
    info!(
        fields = record.field_names().len(),
        parties = record.party_votes().count(),
        "data extracted"
    );

    let recorder = CsvRecorder::new(config.output.clone(), config.header_policy);
    recorder.record(&record)?;
    info!(path = %recorder.path().display(), "data saved");

    Ok(record)
}
