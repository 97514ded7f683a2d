//! Status table: one row per repository, one column per category, plus README.

use colored::Colorize;
use docsgen_core::{RepoReport, SectionRegistry};

/// Width of the repository column; longer names are cut.
const REPO_COLUMN_WIDTH: usize = 20;

const OK: &str = "✔";
const NOK: &str = "✘";

const README_HEADER: &str = "README";

pub(crate) fn render(registry: &SectionRegistry, reports: &[RepoReport]) -> String {
    let mut header = format!("| {:^REPO_COLUMN_WIDTH$} |", "repository");
    let mut rule = format!("|{}|", "-".repeat(REPO_COLUMN_WIDTH + 2));
    for category in registry {
        header.push_str(&format!(" {} |", category.header_text));
        rule.push_str(&format!("{}|", "-".repeat(category.header_text.chars().count() + 2)));
    }
    header.push_str(&format!(" {README_HEADER} |"));
    rule.push_str(&format!("{}|", "-".repeat(README_HEADER.len() + 2)));

    let mut out = format!("{header}\n{rule}\n");
    for report in reports {
        let name: String = report.name.chars().take(REPO_COLUMN_WIDTH).collect();
        out.push_str(&format!("| {name:^REPO_COLUMN_WIDTH$} |"));

        for category in registry {
            let width = category.header_text.chars().count();
            out.push_str(&format!(" {} |", glyph(report.found(&category.name), width)));
        }
        out.push_str(&format!(" {} |", glyph(report.has_readme, README_HEADER.len())));
        out.push('\n');
    }
    out
}

fn glyph(ok: bool, width: usize) -> colored::ColoredString {
    if ok {
        format!("{OK:^width$}").green()
    } else {
        format!("{NOK:^width$}").red()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsgen_shared::CategoryDef;

    fn registry() -> SectionRegistry {
        SectionRegistry::new(vec![
            CategoryDef {
                header_text: "Tutorials".into(),
                ..CategoryDef::named("tutorials")
            },
            CategoryDef {
                header_text: "Refs".into(),
                ..CategoryDef::named("references")
            },
        ])
    }

    #[test]
    fn renders_glyph_per_category() {
        colored::control::set_override(false);

        let report = RepoReport {
            name: "a-very-long-repository-name".into(),
            found: vec![("tutorials".into(), true), ("references".into(), false)],
            has_readme: true,
            ..RepoReport::default()
        };
        let table = render(&registry(), &[report]);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines[0], "|      repository      | Tutorials | Refs | README |");
        assert_eq!(lines[1], "|----------------------|-----------|------|--------|");
        assert_eq!(lines[2], "| a-very-long-reposito |     ✔     |  ✘   |   ✔    |");
    }
}
