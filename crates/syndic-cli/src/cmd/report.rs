//! `syndic report` - load a snapshot and render reports.

use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use syndic_core::config::SyndicConfig;
use syndic_core::context::{DateRange, FilterContext, Selectors};
use syndic_core::date;
use syndic_core::engine::Engine;
use syndic_core::error::{ErrorCode, FilterError};
use syndic_core::model::Severity;
use syndic_core::report::{Report, ReportId, ReportStatus, Row};
use syndic_core::source::{DirectorySource, EntitySource};
use tracing::{info, warn};

use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render, render_error};
use crate::source::HttpSource;

/// Arguments for `syndic report`.
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Report ids to render (all when omitted; see `syndic catalog`).
    pub ids: Vec<String>,

    /// Range start, inclusive (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<String>,

    /// Range end, inclusive (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<String>,

    /// Reference date for ages and windows (default: local today).
    #[arg(long)]
    pub today: Option<String>,

    /// Union id for the union profile report.
    #[arg(long = "union")]
    pub union_id: Option<String>,

    /// Agreement expiry window in days, either side of the end date.
    #[arg(long)]
    pub expiry_days: Option<u32>,

    /// Upcoming assembly window in days.
    #[arg(long)]
    pub assembly_days: Option<u32>,

    /// Executive term ending window in days.
    #[arg(long)]
    pub term_days: Option<u32>,

    /// Minimum severity for serious incidents (none, minor, moderate, major, critical).
    #[arg(long)]
    pub min_severity: Option<String>,

    /// Directory holding `<kind>.json` exports.
    #[arg(long, conflicts_with = "base_url")]
    pub source_dir: Option<PathBuf>,

    /// Base URL of the admin API.
    #[arg(long)]
    pub base_url: Option<String>,
}

/// JSON payload for `syndic report`.
#[derive(Debug, Serialize)]
struct ReportOutput<'a> {
    context: &'a FilterContext,
    reports: Vec<&'a Report>,
}

/// Execute `syndic report`.
pub fn run_report(
    args: &ReportArgs,
    config: &SyndicConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let (ids, ctx) = match parse_request(args, config) {
        Ok(parsed) => parsed,
        Err(err) => {
            let cli_err = CliError::from_code(err.error_code(), err.to_string());
            render_error(output, &cli_err)?;
            bail!("{err}");
        }
    };

    let Some(source) = build_source(args, config) else {
        let code = ErrorCode::SourceNotConfigured;
        render_error(output, &CliError::from_code(code, code.message()))?;
        bail!("no entity source configured");
    };

    let mut engine = Engine::load(source.as_ref());
    for kind in engine.snapshot().failed_kinds() {
        if let Some(err) = engine.snapshot().failure(kind) {
            warn!(%kind, code = %err.error_code(), error = %err, "entity kind unavailable");
        }
    }

    let book = engine.generate(&ctx);
    let reports: Vec<&Report> = ids.iter().filter_map(|id| book.get(*id)).collect();
    info!(
        requested = reports.len(),
        unavailable = reports.iter().filter(|r| !r.is_ready()).count(),
        "rendering reports"
    );

    let payload = ReportOutput {
        context: &book.context,
        reports,
    };
    render(output, &payload, render_reports).context("failed to write report output")
}

/// Resolve the requested report ids and the filter context.
fn parse_request(
    args: &ReportArgs,
    config: &SyndicConfig,
) -> Result<(Vec<ReportId>, FilterContext), FilterError> {
    let ids = if args.ids.is_empty() {
        ReportId::ALL.to_vec()
    } else {
        args.ids
            .iter()
            .map(|raw| ReportId::from_str(raw))
            .collect::<Result<Vec<_>, _>>()?
    };

    let today = parse_cli_date(args.today.as_deref())?;
    let today = today.unwrap_or_else(date::today);
    let range = DateRange::checked(
        parse_cli_date(args.from.as_deref())?,
        parse_cli_date(args.to.as_deref())?,
    )?;

    let defaults = config.windows.selectors();
    let min_severity = match args.min_severity.as_deref() {
        Some(raw) => match Severity::from_str(raw) {
            Ok(Severity::Unknown) | Err(_) => {
                return Err(FilterError::InvalidSeverity(raw.to_string()));
            }
            Ok(severity) => severity,
        },
        None => defaults.min_severity,
    };
    let selectors = Selectors {
        union_id: args.union_id.clone(),
        agreement_expiry_days: args.expiry_days.unwrap_or(defaults.agreement_expiry_days),
        assembly_upcoming_days: args.assembly_days.unwrap_or(defaults.assembly_upcoming_days),
        executive_term_days: args.term_days.unwrap_or(defaults.executive_term_days),
        min_severity,
    };

    Ok((
        ids,
        FilterContext::new(today)
            .with_range(range)
            .with_selectors(selectors),
    ))
}

fn parse_cli_date(raw: Option<&str>) -> Result<Option<NaiveDate>, FilterError> {
    raw.map(|raw| {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| FilterError::InvalidDate(raw.to_string()))
    })
    .transpose()
}

/// CLI flags first, then the resolved config; a directory wins over a URL.
fn build_source(args: &ReportArgs, config: &SyndicConfig) -> Option<Box<dyn EntitySource>> {
    let source = &config.source;
    if let Some(dir) = &args.source_dir {
        return Some(Box::new(DirectorySource::new(dir)));
    }
    let http = |base_url: &str| -> Box<dyn EntitySource> {
        Box::new(HttpSource::new(
            base_url,
            source.token.clone(),
            source.per_page,
            Duration::from_secs(source.timeout_secs),
        ))
    };
    if let Some(url) = &args.base_url {
        return Some(http(url));
    }
    if let Some(dir) = &source.dir {
        return Some(Box::new(DirectorySource::new(dir)));
    }
    source.base_url.as_deref().map(http)
}

// ---------------------------------------------------------------------------
// Human rendering
// ---------------------------------------------------------------------------

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn row_cells(row: &Row) -> Vec<String> {
    match row {
        Row::Share(share) => vec![
            share.key.clone(),
            share.count.to_string(),
            format!("{:.1}%", share.percentage),
        ],
        Row::UnionDirectory(u) => vec![
            or_dash(u.union_code.as_deref()),
            u.name.clone(),
            u.sector.clone(),
            u.organization.clone(),
            u.members.to_string(),
            u.executives.to_string(),
            u.agreements.to_string(),
        ],
        Row::ExecutiveTerm(e) => vec![
            e.union.clone(),
            e.member.clone(),
            e.position.clone(),
            or_dash(e.term_end),
            or_dash(e.remaining_days),
        ],
        Row::AgreementExpiry(a) => vec![
            a.agreement_id.clone(),
            a.union.clone(),
            a.status.label().to_string(),
            a.end_date.to_string(),
            a.days_until_expiry.to_string(),
        ],
        Row::Incident(i) => vec![
            or_dash(i.occurred_on),
            i.union.clone(),
            i.category.clone(),
            i.injury_severity.label().to_string(),
            i.damage_severity.label().to_string(),
            i.status.clone(),
            if i.reportable { "reportable" } else { "-" }.to_string(),
        ],
        Row::Terminated(t) => vec![
            or_dash(t.union_code.as_deref()),
            t.name.clone(),
            t.sector.clone(),
            or_dash(t.terminated_date),
            t.reason.clone(),
        ],
        Row::Assembly(a) => vec![
            a.union.clone(),
            a.assembly_date.to_string(),
            a.days_until.to_string(),
        ],
        Row::Metric(m) => vec![m.metric.clone(), m.value.to_string()],
    }
}

fn missing_label(report: &Report) -> String {
    report
        .missing
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_reports(
    payload: &ReportOutput<'_>,
    mode: OutputMode,
    w: &mut dyn Write,
) -> io::Result<()> {
    match mode {
        OutputMode::Text => render_text(payload, w),
        OutputMode::Pretty | OutputMode::Json => render_pretty(payload, w),
    }
}

fn render_pretty(payload: &ReportOutput<'_>, w: &mut dyn Write) -> io::Result<()> {
    let ctx = payload.context;
    pretty_kv(w, "Today", ctx.today.to_string())?;
    pretty_kv(
        w,
        "Range",
        format!("{} .. {}", or_dash(ctx.range.start), or_dash(ctx.range.end)),
    )?;
    writeln!(w)?;

    for report in &payload.reports {
        pretty_section(w, &format!("{} ({})", report.title, report.id))?;
        if report.status == ReportStatus::Unavailable {
            writeln!(w, "unavailable: missing {}", missing_label(report))?;
            writeln!(w)?;
            continue;
        }
        if report.rows.is_empty() {
            writeln!(w, "(no rows)")?;
        }
        for row in &report.rows {
            let cells = row_cells(row);
            let (first, rest) = cells
                .split_first()
                .map_or(("", &[][..]), |(f, r)| (f.as_str(), r));
            writeln!(w, "{first:<36} {}", rest.join("  "))?;
        }
        writeln!(w, "total: {}", report.total)?;
        writeln!(w)?;
    }
    Ok(())
}

fn render_text(payload: &ReportOutput<'_>, w: &mut dyn Write) -> io::Result<()> {
    for report in &payload.reports {
        let status = match report.status {
            ReportStatus::Ready => "ready".to_string(),
            ReportStatus::Unavailable => format!("unavailable\t{}", missing_label(report)),
        };
        writeln!(w, "# {}\t{}\ttotal={}", report.id, status, report.total)?;
        for row in &report.rows {
            writeln!(w, "{}\t{}", report.id, row_cells(row).join("\t"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use syndic_core::config::WindowConfig;
    use syndic_core::report::ShareRow;

    fn args() -> ReportArgs {
        ReportArgs {
            today: Some("2025-06-01".into()),
            ..ReportArgs::default()
        }
    }

    #[test]
    fn no_ids_means_every_report() {
        let (ids, ctx) = parse_request(&args(), &SyndicConfig::default()).unwrap();
        assert_eq!(ids.len(), ReportId::ALL.len());
        assert!(!ctx.range.is_active());
        assert_eq!(ctx.today, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }

    #[test]
    fn unknown_id_is_rejected() {
        let args = ReportArgs {
            ids: vec!["members-by-sex".into(), "members-by-shoe-size".into()],
            ..args()
        };
        let err = parse_request(&args, &SyndicConfig::default()).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::UnknownReport);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let args = ReportArgs {
            from: Some("2025-02-01".into()),
            to: Some("2025-01-01".into()),
            ..args()
        };
        let err = parse_request(&args, &SyndicConfig::default()).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::InvalidDateRange);
    }

    #[test]
    fn malformed_date_is_rejected() {
        let args = ReportArgs {
            from: Some("01/02/2025".into()),
            ..args()
        };
        assert!(matches!(
            parse_request(&args, &SyndicConfig::default()),
            Err(FilterError::InvalidDate(_))
        ));
    }

    #[test]
    fn flags_override_configured_windows() {
        let mut config = SyndicConfig::default();
        config.windows = WindowConfig {
            agreement_expiry_days: 10,
            assembly_upcoming_days: 20,
            executive_term_days: 30,
        };
        let args = ReportArgs {
            expiry_days: Some(5),
            min_severity: Some("moderate".into()),
            union_id: Some("u1".into()),
            ..args()
        };
        let (_, ctx) = parse_request(&args, &config).unwrap();
        assert_eq!(ctx.selectors.agreement_expiry_days, 5);
        assert_eq!(ctx.selectors.assembly_upcoming_days, 20);
        assert_eq!(ctx.selectors.executive_term_days, 30);
        assert_eq!(ctx.selectors.min_severity, Severity::Moderate);
        assert_eq!(ctx.selectors.union_id.as_deref(), Some("u1"));
    }

    #[test]
    fn unknown_severity_is_not_a_threshold() {
        for raw in ["unknown", "catastrophe-ish"] {
            let args = ReportArgs {
                min_severity: Some(raw.into()),
                ..args()
            };
            let err = parse_request(&args, &SyndicConfig::default()).unwrap_err();
            assert_eq!(err.error_code(), ErrorCode::InvalidSelector);
        }
    }

    #[test]
    fn source_precedence() {
        let mut config = SyndicConfig::default();
        assert!(build_source(&args(), &config).is_none());

        config.source.base_url = Some("https://api.example".into());
        assert!(build_source(&args(), &config).is_some());
    }

    #[test]
    fn text_rows_are_tab_separated() {
        let ctx = FilterContext::new(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        let report = Report {
            id: ReportId::MembersBySex,
            title: ReportId::MembersBySex.title(),
            status: ReportStatus::Ready,
            missing: Vec::new(),
            rows: vec![Row::Share(ShareRow {
                key: "Female".into(),
                count: 2,
                percentage: 66.666,
            })],
            total: 3,
        };
        let payload = ReportOutput {
            context: &ctx,
            reports: vec![&report],
        };
        let mut buf = Vec::new();
        render_text(&payload, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "# members-by-sex\tready\ttotal=3\nmembers-by-sex\tFemale\t2\t66.7%\n"
        );
    }
}
