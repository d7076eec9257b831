//! `syndic catalog` - list every report the engine can assemble.

use std::io::{self, Write};

use serde::Serialize;
use syndic_core::model::EntityKind;
use syndic_core::report::ReportId;

use crate::output::{OutputMode, pretty_section, render};

#[derive(Debug, Serialize)]
struct CatalogEntry {
    id: ReportId,
    title: &'static str,
    depends_on: &'static [EntityKind],
}

fn entries() -> Vec<CatalogEntry> {
    ReportId::ALL
        .into_iter()
        .map(|id| CatalogEntry {
            id,
            title: id.title(),
            depends_on: id.depends_on(),
        })
        .collect()
}

fn depends_label(kinds: &[EntityKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn render_catalog(entries: &[CatalogEntry], mode: OutputMode, w: &mut dyn Write) -> io::Result<()> {
    if mode == OutputMode::Pretty {
        pretty_section(w, &format!("Report catalogue ({} reports)", entries.len()))?;
        for entry in entries {
            writeln!(
                w,
                "{:<32} {:<36} {}",
                entry.id.as_str(),
                entry.title,
                depends_label(entry.depends_on)
            )?;
        }
        return Ok(());
    }

    for entry in entries {
        writeln!(
            w,
            "{}\t{}\t{}",
            entry.id.as_str(),
            entry.title,
            depends_label(entry.depends_on)
        )?;
    }
    Ok(())
}

/// Execute `syndic catalog`.
pub fn run_catalog(output: OutputMode) -> anyhow::Result<()> {
    render(output, &entries(), |entries, mode, w| {
        render_catalog(entries, mode, w)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_lists_every_report() {
        let mut buf = Vec::new();
        render_catalog(&entries(), OutputMode::Text, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), ReportId::ALL.len());
        let directory = "union-directory\tUnion directory\tunions,members,executives,agreements";
        assert!(text.contains(directory));
    }
}
