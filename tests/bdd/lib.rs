//! # Plant store BDD suite
//!
//! The `.feature` files under `features/` run through the cucumber runner
//! in `main.rs`:
//!
//! ```bash
//! # Against the in-process fake store
//! cargo test --test bdd
//!
//! # Against a deployed store
//! API_BASE_URL=http://localhost:8080 cargo test --test bdd
//!
//! # A single feature
//! cargo test --test bdd -- --name "Selling more than the stock"
//! ```
//!
//! Step definitions live next to the runner so they are registered exactly
//! once. This library only carries helpers shared by the steps.

/// Utility functions for BDD tests
pub mod utils {
    use std::collections::HashMap;

    /// Helper to parse a table from Cucumber into a Vector of HashMaps
    pub fn parse_table(table: &cucumber::gherkin::Table) -> Vec<HashMap<String, String>> {
        let headers = table.rows.first().cloned().unwrap_or_default();

        table
            .rows
            .iter()
            .skip(1)
            .map(|row| {
                headers
                    .iter()
                    .cloned()
                    .zip(row.iter().map(|cell| cell.trim().to_string()))
                    .collect()
            })
            .collect()
    }

    /// Replace `{mainCategoryId}`-style placeholders in a request path.
    pub fn expand_path(path: &str, values: &[(&str, Option<i64>)]) -> String {
        values.iter().fold(path.to_string(), |path, (key, value)| {
            let placeholder = format!("{{{key}}}");
            match value {
                Some(value) => path.replace(&placeholder, &value.to_string()),
                None => path,
            }
        })
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn expand_path_skips_unknown_values() {
            let path = expand_path(
                "/api/plants/category/{subCategoryId}/{plantId}",
                &[("subCategoryId", Some(4)), ("plantId", None)],
            );
            assert_eq!(path, "/api/plants/category/4/{plantId}");
        }
    }
}
