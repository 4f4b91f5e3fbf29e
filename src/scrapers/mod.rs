//! Various modules for getting data from the site's HTML.

pub mod results_page;

use scraper::Selector;
use std::collections::HashMap;

/// Parses a TOML table of `name = "css selector"` pairs.
///
/// The tables are embedded at compile time, so a malformed one is a bug in
/// this crate rather than a runtime condition.
fn css_table(toml_str: &str) -> HashMap<String, String> {
    toml::from_str(toml_str).expect("embedded selector table is not valid TOML")
}

/// Compiles every selector of a `css_table`.
fn load_sels(table: &HashMap<String, String>) -> HashMap<String, Selector> {
    table.iter()
         .map(|(name, css)| {
             let sel = Selector::parse(css)
                 .unwrap_or_else(|e| panic!("invalid selector `{}` for `{}`: {:?}", css, name, e));
             (name.clone(), sel)
         })
         .collect()
}
