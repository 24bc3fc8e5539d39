use crate::types::{PackageEntry, PackageStatus, UpdateSeverity};
use colored::Colorize;
use serde::Serialize;

/// Shown in place of a missing snapshot or latest value
pub const NONE: &str = "NONE";

/// Renders registered packages in a table format
pub struct TableRenderer {
    show_colors: bool,
}

/// Row of the JSON rendering
#[derive(Debug, Serialize)]
struct JsonRow<'a> {
    name: &'a str,
    snapshot: Option<&'a str>,
    latest: Option<&'a str>,
    status: PackageStatus,
    severity: Option<UpdateSeverity>,
    script: String,
}

impl TableRenderer {
    pub fn new(show_colors: bool) -> Self {
        Self { show_colors }
    }

    /// Render entries, optionally hiding those that are up to date
    pub fn render(&self, entries: &[&PackageEntry], outdated_only: bool) {
        let entries: Vec<&PackageEntry> = entries
            .iter()
            .copied()
            .filter(|e| !outdated_only || e.status() != PackageStatus::UpToDate)
            .collect();

        if entries.is_empty() {
            if outdated_only {
                println!("All packages are up to date!");
            } else {
                println!("No packages registered. Add one with `ups insert <name> <script>`.");
            }
            return;
        }

        for line in self.format_table(&entries) {
            println!("{line}");
        }
    }

    /// Format the header and one line per entry
    pub fn format_table(&self, entries: &[&PackageEntry]) -> Vec<String> {
        let max_name = column_width("Package", entries.iter().map(|e| e.name.len()));
        let max_snapshot = column_width(
            "Snapshot",
            entries.iter().map(|e| display(&e.snapshot_version).len()),
        );
        let max_latest = column_width(
            "Latest",
            entries.iter().map(|e| display(&e.latest_version).len()),
        );
        let max_status = column_width(
            "Status",
            entries.iter().map(|e| self.status_text(e).len()),
        );

        let header = format!(
            "{:<max_name$}  {:<max_snapshot$}  {:<max_latest$}  {:<max_status$}  Script",
            "Package", "Snapshot", "Latest", "Status",
        );

        let mut lines = Vec::with_capacity(entries.len() + 1);
        lines.push(self.paint(header.trim_end(), |s| s.bright_blue().to_string()));

        for entry in entries {
            let name = format!("{:<max_name$}", entry.name);
            let snapshot = format!("{:<max_snapshot$}", display(&entry.snapshot_version));
            let latest = format!("{:<max_latest$}", display(&entry.latest_version));
            let status = format!("{:<max_status$}", self.status_text(entry));
            let script = entry.script_path.display().to_string();

            let diff_color = |s: &str| match entry.status() {
                PackageStatus::UpToDate => s.green().to_string(),
                PackageStatus::Outdated => s.red().to_string(),
                PackageStatus::NoSnapshot | PackageStatus::Unknown => s.normal().to_string(),
            };

            lines.push(format!(
                "{}  {}  {}  {}  {}",
                self.paint(&name, |s| s.yellow().to_string()),
                self.paint(&snapshot, diff_color),
                self.paint(&latest, diff_color),
                self.paint(&status, diff_color),
                self.paint(&script, |s| s.dimmed().to_string()),
            ));
        }

        lines
    }

    /// Status column text, e.g. `outdated (minor)`
    pub fn status_text(&self, entry: &PackageEntry) -> String {
        match entry.severity() {
            Some(UpdateSeverity::Major) => format!("{} (MAJOR)", entry.status()),
            Some(UpdateSeverity::Minor) => format!("{} (minor)", entry.status()),
            Some(UpdateSeverity::Patch) => format!("{} (patch)", entry.status()),
            Some(UpdateSeverity::Downgrade) => format!("{} (older)", entry.status()),
            Some(UpdateSeverity::Other) | None => entry.status().to_string(),
        }
    }

    /// Render entries as a JSON array
    pub fn render_json(&self, entries: &[&PackageEntry], outdated_only: bool) -> serde_json::Result<String> {
        let rows: Vec<JsonRow<'_>> = entries
            .iter()
            .filter(|e| !outdated_only || e.status() != PackageStatus::UpToDate)
            .map(|e| JsonRow {
                name: &e.name,
                snapshot: e.snapshot_version.as_deref(),
                latest: e.latest_version.as_deref(),
                status: e.status(),
                severity: e.severity(),
                script: e.script_path.display().to_string(),
            })
            .collect();

        serde_json::to_string_pretty(&rows)
    }

    /// Print checks that failed, after the table
    pub fn render_failures(&self, failures: &[(String, String)]) {
        if failures.is_empty() {
            return;
        }

        println!();
        println!("{}", self.paint("Checks that failed:", |s| s.red().to_string()));
        for (name, error) in failures {
            println!("  {}: {}", self.paint(name, |s| s.yellow().to_string()), error);
        }
    }

    fn paint(&self, text: &str, color: impl Fn(&str) -> String) -> String {
        if self.show_colors {
            color(text)
        } else {
            text.to_string()
        }
    }
}

fn display(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NONE)
}

fn column_width(header: &str, widths: impl Iterator<Item = usize>) -> usize {
    widths.max().unwrap_or(0).max(header.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, snapshot: Option<&str>, latest: Option<&str>) -> PackageEntry {
        PackageEntry {
            snapshot_version: snapshot.map(str::to_string),
            latest_version: latest.map(str::to_string),
            ..PackageEntry::new(name, format!("/scripts/{name}.sh"))
        }
    }

    #[test]
    fn test_format_table_aligns_columns() {
        let helix = entry("helix", Some("24.03"), Some("24.07"));
        let ripgrep = entry("ripgrep", Some("14.1.0"), Some("14.1.0"));
        let lines = TableRenderer::new(false).format_table(&[&helix, &ripgrep]);

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Package  Snapshot  Latest  Status            Script"
        );
        assert_eq!(
            lines[1],
            "helix    24.03     24.07   outdated (minor)  /scripts/helix.sh"
        );
        assert_eq!(
            lines[2],
            "ripgrep  14.1.0    14.1.0  up to date        /scripts/ripgrep.sh"
        );
    }

    #[test]
    fn test_missing_values_show_none() {
        let bat = entry("bat", None, None);
        let lines = TableRenderer::new(false).format_table(&[&bat]);
        assert!(lines[1].starts_with("bat      NONE      NONE    unknown"));
    }

    #[test]
    fn test_status_text() {
        let renderer = TableRenderer::new(false);
        assert_eq!(
            renderer.status_text(&entry("a", Some("1.0.0"), Some("2.0.0"))),
            "outdated (MAJOR)"
        );
        assert_eq!(
            renderer.status_text(&entry("a", Some("nightly-1"), Some("nightly-2"))),
            "outdated"
        );
        assert_eq!(
            renderer.status_text(&entry("a", None, Some("2.0.0"))),
            "no snapshot"
        );
        assert_eq!(
            renderer.status_text(&entry("a", Some("2.1.0"), Some("2.0.5"))),
            "outdated (older)"
        );
    }

    #[test]
    fn test_render_json_filters_outdated() {
        let helix = entry("helix", Some("24.03"), Some("24.07"));
        let ripgrep = entry("ripgrep", Some("14.1.0"), Some("14.1.0"));

        let json = TableRenderer::new(false)
            .render_json(&[&helix, &ripgrep], true)
            .unwrap();
        let rows: serde_json::Value = serde_json::from_str(&json).unwrap();

        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "helix");
        assert_eq!(rows[0]["status"], "outdated");
        assert_eq!(rows[0]["severity"], "minor");
        assert_eq!(rows[0]["snapshot"], "24.03");
    }
}
