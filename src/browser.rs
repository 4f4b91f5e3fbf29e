//! A quick, built-in way to render the live results page.
//!
//! This module can be disabled by building this crate without default features.

use crate::config::Config;
use crate::data_structs::DepartmentSelection;
use crate::error::*;
use crate::scrapers::results_page::container_css;
use crate::source::DocumentSource;
use headless_chrome::{Browser, LaunchOptions};
use std::fmt::Display;
use std::thread;
use std::time::Duration;

fn render_failure<E: Display>(e: E) -> Error {
    ErrorKind::NavigationOrRenderFailure(e.to_string()).into()
}

/// Drives a headless Chrome to the results page and selects a department.
///
/// A fresh browser is launched for every document and closed when it has
/// been read.
#[derive(Debug, Clone)]
pub struct ChromeSource {
    url: String,
    user_agent: String,
    navigation_timeout: Duration,
    container_timeout: Duration,
    settle: Duration
}

impl ChromeSource {
    /// Takes the page address, user agent and waits from `config`.
    #[inline]
    pub fn from_config(config: &Config) -> Self {
        ChromeSource {
            url: config.url.clone(),
            user_agent: config.user_agent.clone(),
            navigation_timeout: config.navigation_timeout(),
            container_timeout: config.container_timeout(),
            settle: config.settle()
        }
    }
}

impl DocumentSource for ChromeSource {
    fn settled_document(&self, department: &DepartmentSelection) -> Result<String> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .build()
            .map_err(render_failure)?;
        let browser = Browser::new(options).map_err(render_failure)?;
        let tab = browser.new_tab().map_err(render_failure)?;
        let container = container_css();

        tab.set_default_timeout(self.navigation_timeout);
        tab.set_user_agent(&self.user_agent, None, None).map_err(render_failure)?;

        info!(url = self.url.as_str(), "navigating to results page");
        tab.navigate_to(&self.url)
           .and_then(|tab| tab.wait_until_navigated())
           .map_err(render_failure)?;
        tab.wait_for_element_with_custom_timeout(&container, self.container_timeout)
           .map_err(render_failure)?;

        info!(department = department.name.as_str(), "selecting department");
        tab.evaluate(&select_script(department), false).map_err(render_failure)?;

        // The page redraws asynchronously with no completion signal
        thread::sleep(self.settle);
        tab.wait_for_element_with_custom_timeout(&container, self.container_timeout)
           .map_err(render_failure)?;

        tab.get_content().map_err(render_failure)
    }
}

/// The call the page itself makes when a department is clicked.
fn select_script(department: &DepartmentSelection) -> String {
    format!(
        "selectDepto({}, {});",
        js_string(&department.code),
        js_string(&department.name)
    )
}

fn js_string(s: &str) -> String {
    // A JSON string literal is a valid JS string literal
    serde_json::Value::from(s).to_string()
}
