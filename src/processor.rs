use std::path::Path;

use anyhow::Result;

use crate::models::{ScanResult, ScanSelection};
use crate::projector::{project_copyrights, project_emails, project_licenses, project_urls};
use crate::scanner::Scanner;

/// Scan `path` for the selected categories and merge the projected findings.
///
/// Categories run one after another in a fixed order: copyrights, licenses,
/// emails, urls. Any scanner failure aborts the whole run, so a result is
/// either complete or not produced at all. Unselected categories stay empty.
pub fn process_file<S: Scanner + ?Sized>(
    scanner: &S,
    path: &Path,
    selection: &ScanSelection,
) -> Result<ScanResult> {
    let mut result = ScanResult::default();

    if selection.copyrights {
        let raw = scanner.get_copyrights(path)?;
        let (copyrights, holders) = project_copyrights(&raw);
        result.copyrights = copyrights;
        result.holders = holders;
    }

    if selection.licenses {
        let raw = scanner.get_licenses(path, true)?;
        result.licenses = project_licenses(&raw);
    }

    if selection.emails {
        let raw = scanner.get_emails(path)?;
        result.emails = project_emails(&raw);
    }

    if selection.urls {
        let raw = scanner.get_urls(path)?;
        result.urls = project_urls(&raw);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use anyhow::bail;

    use crate::models::RawFileScan;

    /// Records every call and answers from canned JSON.
    #[derive(Default)]
    struct MockScanner {
        calls: RefCell<Vec<String>>,
        copyrights: &'static str,
        licenses: &'static str,
        emails: &'static str,
        urls: &'static str,
        fail_on: Option<&'static str>,
    }

    impl MockScanner {
        fn answer(&self, call: &str, json: &str) -> Result<RawFileScan> {
            self.calls.borrow_mut().push(call.to_string());
            if self.fail_on == Some(call) {
                bail!("{} scan failed", call);
            }
            let json = if json.is_empty() { "{}" } else { json };
            Ok(serde_json::from_str(json)?)
        }
    }

    impl Scanner for MockScanner {
        fn get_copyrights(&self, _path: &Path) -> Result<RawFileScan> {
            self.answer("copyrights", self.copyrights)
        }

        fn get_licenses(&self, _path: &Path, include_text: bool) -> Result<RawFileScan> {
            assert!(include_text);
            self.answer("licenses", self.licenses)
        }

        fn get_emails(&self, _path: &Path) -> Result<RawFileScan> {
            self.answer("emails", self.emails)
        }

        fn get_urls(&self, _path: &Path) -> Result<RawFileScan> {
            self.answer("urls", self.urls)
        }
    }

    fn all() -> ScanSelection {
        ScanSelection {
            copyrights: true,
            licenses: true,
            emails: true,
            urls: true,
        }
    }

    #[test]
    fn test_no_selection_runs_nothing() {
        let scanner = MockScanner::default();
        let result =
            process_file(&scanner, Path::new("missing.c"), &ScanSelection::default()).unwrap();

        assert!(scanner.calls.borrow().is_empty());
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"licenses":[],"copyrights":[],"holders":[],"emails":[],"urls":[]}"#
        );
    }

    #[test]
    fn test_licenses_only() {
        let scanner = MockScanner {
            licenses: r#"{"licenses": [{"key": "mit", "score": 100, "start_line": 1}]}"#,
            ..Default::default()
        };
        let selection = ScanSelection {
            licenses: true,
            ..Default::default()
        };

        let result = process_file(&scanner, Path::new("LICENSE"), &selection).unwrap();
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"licenses":[{"key":"mit","score":100,"start_line":1}],"copyrights":[],"holders":[],"emails":[],"urls":[]}"#
        );
    }

    #[test]
    fn test_categories_run_in_fixed_order() {
        let scanner = MockScanner::default();
        process_file(&scanner, Path::new("a.c"), &all()).unwrap();

        assert_eq!(
            *scanner.calls.borrow(),
            vec!["copyrights", "licenses", "emails", "urls"]
        );
    }

    #[test]
    fn test_all_buckets_are_filled() {
        let scanner = MockScanner {
            copyrights: r#"{
                "copyrights": [{"copyright": "Copyright 2020 ACME Inc.", "start_line": 1}],
                "holders": [{"holder": "ACME Inc.", "start_line": 1}],
                "authors": [{"author": "Wile E. Coyote", "start_line": 2}]
            }"#,
            licenses: r#"{"licenses": [{"key": "apache-2.0", "score": 95.5}]}"#,
            emails: r#"{"emails": [{"email": "dev@acme.test", "start_line": 3}]}"#,
            urls: r#"{"urls": [{"url": "https://acme.test", "start_line": 4}]}"#,
            ..Default::default()
        };

        let result = process_file(&scanner, Path::new("a.c"), &all()).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "licenses": [{"key": "apache-2.0", "score": 95.5}],
                "copyrights": [{"value": "Copyright 2020 ACME Inc.", "start": 1}],
                "holders": [{"value": "ACME Inc.", "start": 1}],
                "emails": [{"value": "dev@acme.test", "start": 3}],
                "urls": [{"value": "https://acme.test", "start": 4}]
            })
        );
    }

    #[test]
    fn test_scanner_failure_aborts() {
        let scanner = MockScanner {
            fail_on: Some("licenses"),
            ..Default::default()
        };

        let err = process_file(&scanner, Path::new("a.c"), &all()).unwrap_err();
        assert_eq!(err.to_string(), "licenses scan failed");
        // nothing after the failing category is attempted
        assert_eq!(*scanner.calls.borrow(), vec!["copyrights", "licenses"]);
    }

    #[test]
    fn test_works_through_trait_object() {
        let scanner = MockScanner::default();
        let dyn_scanner: &dyn Scanner = &scanner;
        let selection = ScanSelection {
            emails: true,
            ..Default::default()
        };

        let result = process_file(dyn_scanner, Path::new("a.c"), &selection).unwrap();
        assert!(result.emails.is_empty());
        assert_eq!(*scanner.calls.borrow(), vec!["emails"]);
    }
}
