error_chain! {
    foreign_links {
        Io(::std::io::Error);
        Csv(::csv::Error);
        Toml(::toml::de::Error);
        Json(::serde_json::Error);
    }

    errors {
        NavigationOrRenderFailure(reason: String) {
            description("The results page could not be rendered into a settled document.")
            display("The results page could not be rendered into a settled document: {}",
                     reason)
        }

        ExtractionFailed(selector: String) {
            description("The results container was not present in the rendered document.")
            display("The results container matching `{}` was not present in the \
                     rendered document", selector)
        }

        WriteFailed(path: String) {
            description("The output file could not be created or appended to.")
            display("The output file {} could not be created or appended to", path)
        }

        HeaderMismatch(existing: Vec<String>, record: Vec<String>) {
            description("The record's fields do not match the existing file header.")
            display("The record's fields {:?} do not match the existing file header {:?}",
                     record, existing)
        }

        RaggedRows(path: String, line: u64) {
            description("The output file has rows with more cells than its header.")
            display("The output file {} has rows with more cells than its header (first at \
                     line {}); rewriting it would drop those cells", path, line)
        }

        InvalidConfig(reason: String) {
            description("The run configuration is invalid.")
            display("The run configuration is invalid: {}", reason)
        }
    }
}
