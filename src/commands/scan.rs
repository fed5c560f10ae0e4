//! `scan project`
//!
//! Identifies the language of each directory, reads the runtime version from
//! its manifest and looks up the matching release cycle.

use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::api::error::ApiError;
use crate::api::source::Query;
use crate::api::types::ApiResponse;
use crate::commands::AppContext;
use crate::error::EolError;
use crate::output::{Render, Table};
use crate::scanner::detector::{DetectError, detector_for};
use crate::scanner::language::identify;

/// Cycle identifier used by the API for a detected version.
///
/// Leading operators (`>=`, `^`, `~`, ...) are dropped, then the version is cut
/// to the major for Node.js and to major.minor for Go and Python. `None` if
/// no digits remain.
pub fn lookup_cycle(product: &str, version: &str) -> Option<String> {
    let version = version.trim_start_matches(|c: char| !c.is_ascii_digit());
    let parts = if product == "nodejs" { 1 } else { 2 };

    let cycle = version
        .split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .next()
        .unwrap_or_default()
        .split('.')
        .filter(|part| !part.is_empty())
        .take(parts)
        .collect::<Vec<_>>()
        .join(".");

    (!cycle.is_empty()).then_some(cycle)
}

/// EOL status of one project directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRow {
    pub directory: String,
    pub language: String,
    pub product: String,
    pub version: String,
    pub cycle: String,
    pub latest: String,
    pub eol: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport(pub Vec<ScanRow>);

impl Render for ScanReport {
    fn to_json(&self) -> Result<Vec<u8>, EolError> {
        serde_json::to_vec(&self.0).map_err(|e| EolError::Render(e.to_string()))
    }

    fn to_table(&self) -> Table {
        let mut table = Table::new([
            "Directory",
            "Language",
            "Product",
            "Version",
            "Cycle",
            "Latest",
            "EOL",
            "Status",
        ]);
        for row in &self.0 {
            table.push_row([
                row.directory.as_str(),
                row.language.as_str(),
                row.product.as_str(),
                row.version.as_str(),
                row.cycle.as_str(),
                row.latest.as_str(),
                row.eol.as_str(),
                row.status.as_str(),
            ]);
        }
        table
    }
}

fn display_dir(root: &Path, dir: &Path) -> String {
    match dir.strip_prefix(root) {
        Ok(relative) if relative.as_os_str().is_empty() => ".".to_string(),
        Ok(relative) => relative.display().to_string(),
        Err(_) => dir.display().to_string(),
    }
}

/// Scan `root` and report the EOL status of every directory with a detectable version.
///
/// Directories without a detector or without a declared version are skipped.
/// Fails with `NotFound` when no directory yields a version.
pub async fn project(
    ctx: &mut AppContext,
    root: &Path,
    recursive: bool,
    today: NaiveDate,
    out: &mut dyn Write,
) -> Result<(), EolError> {
    info!("Scanning {:?} (recursive: {})", root, recursive);

    let languages = identify(root, recursive)?;
    let mut rows = Vec::new();

    for (dir, language) in languages {
        let Some(detector) = detector_for(language) else {
            debug!("No version detector for {} in {:?}, skipping", language, dir);
            continue;
        };

        let version = match detector.detect(&dir) {
            Ok(version) => version,
            Err(DetectError::VersionNotFound { .. }) => {
                debug!("No {} version declared in {:?}, skipping", detector.ecosystem(), dir);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let product = detector.product();
        let Some(cycle) = lookup_cycle(product, &version) else {
            debug!("Unusable {} version {:?} in {:?}, skipping", product, version, dir);
            continue;
        };

        debug!("Detected {} {} in {:?}, looking up cycle {}", product, version, dir, cycle);
        let view = ctx.fetch_view(&Query::cycle(product, &cycle)).await?;
        let ApiResponse::Cycle(record) = view.response() else {
            return Err(ApiError::InvalidResponse(format!(
                "expected a single release cycle for {} {}",
                product, cycle
            ))
            .into());
        };

        rows.push(ScanRow {
            directory: display_dir(root, &dir),
            language: language.to_string(),
            product: product.to_string(),
            version,
            latest: record.latest.clone().unwrap_or_default(),
            eol: record.eol.as_ref().map(ToString::to_string).unwrap_or_default(),
            status: record.eol_status(today).to_string(),
            cycle,
        });
    }

    if rows.is_empty() {
        return Err(EolError::not_found(format!(
            "no runtime version detected in {}",
            root.display()
        )));
    }

    ctx.emit(&ScanReport(rows), out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::source::MockEolSource;
    use crate::cache::CacheHandle;
    use crate::output::OutputFormat;
    use rstest::rstest;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
    }

    fn write(root: &Path, name: &str, content: &str) {
        let path = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn context(source: MockEolSource) -> AppContext {
        AppContext::new(Box::new(source), CacheHandle::disabled(), Duration::from_secs(60))
            .with_output(Some(OutputFormat::Json))
    }

    fn cycles_source() -> MockEolSource {
        let mut source = MockEolSource::new();
        source.expect_fetch().returning(|query| match query {
            Query::Cycle { name, version } if name == "go" && version == "1.21" => {
                Ok(br#"{"latest":"1.21.13","eol":"2024-08-13"}"#.to_vec())
            }
            Query::Cycle { name, version } if name == "nodejs" && version == "20" => {
                Ok(br#"{"latest":"20.18.0","eol":"2026-04-30"}"#.to_vec())
            }
            Query::Cycle { name, version } if name == "nodejs" && version == "22" => {
                Ok(br#"{"latest":"22.9.0","eol":"2027-04-30"}"#.to_vec())
            }
            Query::Cycle { name, version } if name == "python" && version == "3.12" => {
                Ok(br#"{"latest":"3.12.7","eol":false}"#.to_vec())
            }
            other => Err(ApiError::NotFound(other.path())),
        });
        source
    }

    fn rows(out: &[u8]) -> Vec<serde_json::Value> {
        serde_json::from_slice(out).unwrap()
    }

    #[rstest]
    #[case("nodejs", ">=18", Some("18"))]
    #[case("nodejs", "^20.11.1", Some("20"))]
    #[case("nodejs", "18.x", Some("18"))]
    #[case("go", "1.21", Some("1.21"))]
    #[case("go", "1.22.3", Some("1.22"))]
    #[case("go", "1", Some("1"))]
    #[case("python", ">=3.9", Some("3.9"))]
    #[case("python", "3.11.4", Some("3.11"))]
    #[case("nodejs", "*", None)]
    #[case("go", "", None)]
    fn lookup_cycle_truncates_per_product(
        #[case] product: &str,
        #[case] version: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(lookup_cycle(product, version).as_deref(), expected);
    }

    #[tokio::test]
    async fn project_reports_go_module_as_eol() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "main.go", "package main\n");
        write(temp_dir.path(), "go.mod", "module example.com/app\n\ngo 1.21.5\n");
        let mut ctx = context(cycles_source());
        let mut out = Vec::new();

        project(&mut ctx, temp_dir.path(), false, today(), &mut out)
            .await
            .unwrap();

        let rows = rows(&out);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["directory"], ".");
        assert_eq!(rows[0]["language"], "Go");
        assert_eq!(rows[0]["version"], "1.21.5");
        assert_eq!(rows[0]["cycle"], "1.21");
        assert_eq!(rows[0]["eol"], "2024-08-13");
        assert_eq!(rows[0]["status"], "EOL");
    }

    #[tokio::test]
    async fn project_recursive_reports_each_detected_directory() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "api/main.py", "");
        write(
            temp_dir.path(),
            "api/pyproject.toml",
            "[project]\nrequires-python = \">=3.12\"\n",
        );
        write(temp_dir.path(), "web/index.ts", "");
        write(
            temp_dir.path(),
            "web/package.json",
            r#"{"engines":{"node":">=22.0.0"}}"#,
        );
        write(temp_dir.path(), "legacy/Main.java", "");
        let mut ctx = context(cycles_source());
        let mut out = Vec::new();

        project(&mut ctx, temp_dir.path(), true, today(), &mut out)
            .await
            .unwrap();

        let rows = rows(&out);
        let summary: Vec<(&str, &str, &str)> = rows
            .iter()
            .map(|r| {
                (
                    r["directory"].as_str().unwrap(),
                    r["product"].as_str().unwrap(),
                    r["status"].as_str().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("api", "python", "Supported"),
                ("web", "nodejs", "Supported"),
            ]
        );
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    #[tokio::test]
    async fn project_reads_root_manifest_with_sources_in_subdirectory(#[case] recursive: bool) {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "package.json", r#"{"engines":{"node":">=20"}}"#);
        write(temp_dir.path(), "src/index.js", "");
        let mut ctx = context(cycles_source());
        let mut out = Vec::new();

        project(&mut ctx, temp_dir.path(), recursive, today(), &mut out)
            .await
            .unwrap();

        let rows = rows(&out);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["directory"], ".");
        assert_eq!(rows[0]["language"], "JavaScript");
        assert_eq!(rows[0]["cycle"], "20");
        assert_eq!(rows[0]["status"], "Supported");
    }

    #[tokio::test]
    async fn project_reads_root_pyproject_with_package_sources() {
        let temp_dir = TempDir::new().unwrap();
        write(
            temp_dir.path(),
            "pyproject.toml",
            "[project]\nname = \"app\"\nrequires-python = \">=3.12\"\n",
        );
        write(temp_dir.path(), "src/app/__init__.py", "");
        let mut ctx = context(cycles_source());
        let mut out = Vec::new();

        project(&mut ctx, temp_dir.path(), true, today(), &mut out)
            .await
            .unwrap();

        let rows = rows(&out);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["directory"], ".");
        assert_eq!(rows[0]["product"], "python");
        assert_eq!(rows[0]["cycle"], "3.12");
    }

    #[tokio::test]
    async fn project_skips_directory_without_declared_version() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "main.go", "");
        write(temp_dir.path(), "go.mod", "module example.com/app\n");
        write(temp_dir.path(), "tools/gen.py", "");
        write(temp_dir.path(), "tools/setup.py", "setup(python_requires='>=3.12')\n");
        let mut ctx = context(cycles_source());
        let mut out = Vec::new();

        project(&mut ctx, temp_dir.path(), true, today(), &mut out)
            .await
            .unwrap();

        let rows = rows(&out);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["directory"], "tools");
    }

    #[tokio::test]
    async fn project_without_any_version_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "Main.java", "");
        let mut ctx = context(MockEolSource::new());
        let mut out = Vec::new();

        let result = project(&mut ctx, temp_dir.path(), true, today(), &mut out).await;

        assert!(matches!(result, Err(EolError::NotFound(_))));
    }

    #[tokio::test]
    async fn project_propagates_malformed_package_json() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "index.js", "");
        write(temp_dir.path(), "package.json", "{ not json");
        let mut ctx = context(MockEolSource::new());
        let mut out = Vec::new();

        let result = project(&mut ctx, temp_dir.path(), false, today(), &mut out).await;

        assert!(matches!(
            result,
            Err(EolError::Detect(DetectError::Parse { .. }))
        ));
    }

    #[test]
    fn scan_report_table_has_status_column() {
        let report = ScanReport(vec![ScanRow {
            directory: ".".to_string(),
            language: "Go".to_string(),
            product: "go".to_string(),
            version: "1.21".to_string(),
            cycle: "1.21".to_string(),
            latest: "1.21.13".to_string(),
            eol: "2024-08-13".to_string(),
            status: "EOL".to_string(),
        }]);

        let rendered = report.to_table().render();

        assert!(rendered.contains("STATUS"));
        assert!(rendered.contains("| EOL    |"));
    }
}
