//! Handles extraction of content from the departmental results page.

use super::{css_table, load_sels};
use crate::data_structs::{FieldValue, ResultRecord, VOTES_PREFIX};
use crate::error::*;
use crate::normalize::{parse_clean_integer, parse_digits, party_key};
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;

const RESULTS_PAGE_SELECTORS_STR: &'static str = include_str!("../../selectors/results_page.toml");

static RESULTS_PAGE_CSS: LazyLock<HashMap<String, String>> =
    LazyLock::new(|| css_table(RESULTS_PAGE_SELECTORS_STR));

/// How the text of a matched row becomes a field value.
#[derive(Debug, Copy, Clone, PartialEq)]
enum Coercion {
    /// Kept verbatim.
    Text,
    /// Must already be a clean integer.
    Integer,
    /// Integer after dropping every non-digit.
    Digits
}

/// Label fragments of the results table and the fields they fill.
///
/// Labels are matched by containment; the page pads and decorates them.
const AGGREGATE_FIELDS: &[(&str, &str, Coercion)] = &[
    ("Resultados al:", "lastUpdated", Coercion::Text),
    ("Circuitos escrutados:", "countedPrecincts", Coercion::Text),
    ("Total de circuitos:", "totalPrecincts", Coercion::Integer),
    ("Circuitos con observaciones:", "precinctsWithObservations", Coercion::Integer),
    ("Total de habilitados:", "totalEligibleVoters", Coercion::Digits)
];

fn text_of(elem: ElementRef) -> String {
    elem.text().collect::<String>().trim().into()
}

fn coerce(field: &str, raw: &str, coercion: Coercion) -> Option<FieldValue> {
    let value = match coercion {
        Coercion::Text => return Some(FieldValue::Text(raw.into())),
        Coercion::Integer => parse_clean_integer(raw),
        Coercion::Digits => parse_digits(raw)
    };

    if value.is_none() {
        warn!(field, raw, "field parse skipped: value is not an integer");
    }

    value.map(FieldValue::Integer)
}

/// Handles extraction of content from the departmental results page.
///
/// Build one from the HTML of a settled page (see the `From<String>` impl);
/// `source::DocumentSource` implementations produce that HTML.
pub struct ResultsPageScraper {
    doc: Html,
    selectors: HashMap<String, Selector>
}

impl From<String> for ResultsPageScraper {
    fn from(html: String) -> Self {
        ResultsPageScraper::from(html.as_str())
    }
}

impl<'a> From<&'a str> for ResultsPageScraper {
    fn from(html: &'a str) -> Self {
        ResultsPageScraper {
            doc: Html::parse_document(html),
            selectors: load_sels(&RESULTS_PAGE_CSS)
        }
    }
}

impl ResultsPageScraper {
    /// Extracts the department's figures, stamped with the current time.
    #[inline]
    pub fn result_record(&self) -> Result<ResultRecord> {
        self.result_record_at(Utc::now())
    }

    /// Extracts the department's figures, stamped with `timestamp`.
    ///
    /// Fails with `ExtractionFailed` only when the results table itself is
    /// missing. Rows and parties that are missing or unreadable just leave
    /// their field out.
    pub fn result_record_at(&self, timestamp: DateTime<Utc>) -> Result<ResultRecord> {
        let mut record = ResultRecord::new(timestamp);

        record.merge(self.aggregate_fields()?);
        record.merge(self.party_votes());

        debug!(fields = record.field_names().len(), "record assembled");
        Ok(record)
    }

    /// Gets the fixed counters from the results table, in page order.
    pub fn aggregate_fields(&self) -> Result<Vec<(String, FieldValue)>> {
        let sels = &self.selectors;
        let container = match self.doc.select(&sels["container"]).next() {
            Some(elem) => elem,
            None => bail!(ErrorKind::ExtractionFailed(container_css()))
        };

        let mut fields = vec![];

        for row in container.select(&sels["row"]) {
            let mut cells = row.select(&sels["cell"]);

            if_chain! {
                if let Some(label_cell) = cells.next();
                if let Some(value_cell) = cells.next();
                if let Some(value_elem) = value_cell.select(&sels["value"]).next();
                let label = text_of(label_cell);
                if let Some(&(_, field, coercion)) = AGGREGATE_FIELDS.iter()
                    .find(|(fragment, _, _)| label.contains(fragment));

            then {
                let raw = text_of(value_elem);
                debug!(label = label.as_str(), raw = raw.as_str(), field, "matched results row");

                if let Some(value) = coerce(field, &raw, coercion) {
                    fields.push((field.to_string(), value));
                }
            }}
        }

        Ok(fields)
    }

    /// Gets one `votes_<party key>` field per party card on the page.
    pub fn party_votes(&self) -> Vec<(String, FieldValue)> {
        let sels = &self.selectors;
        let mut fields = vec![];

        for party in self.doc.select(&sels["party"]) {
            if_chain! {
                if let Some(name_elem) = party.select(&sels["party_name"]).next();
                if let Some(votes_elem) = party.select(&sels["party_votes"]).next();

            then {
                let name = text_of(name_elem);
                let field = format!("{}{}", VOTES_PREFIX, party_key(&name));

                if let Some(value) = coerce(&field, &text_of(votes_elem), Coercion::Digits) {
                    debug!(party = name.as_str(), field = field.as_str(), "matched party");
                    fields.push((field, value));
                }
            }}
        }

        fields
    }
}

/// CSS of the results table, for callers that wait on it to appear.
pub fn container_css() -> String {
    RESULTS_PAGE_CSS.get("container")
                    .expect("embedded selector table has no `container`")
                    .clone()
}
