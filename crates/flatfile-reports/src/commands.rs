use std::io::Write;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use reports_core::formatting::timing_message;
use reports_core::models::{ExtractMethod, Gender, NameRankRecord, OrdStatus, OrderFill, StatusCount};
use reports_core::settings::{
    delimiter_from_name, Command, ConfigArgs, FillQuantitiesArgs, FixLogConfig, NameTrendsArgs,
    OrderStatusArgs, ReportConfig, Settings, TopNamesArgs,
};
use reports_data::aggregator::{self, RankTrends, TopNames};
use reports_data::rank_cache::RankCache;
use reports_data::{baby_names, fix_log};
use reports_output::destination::{emit_to, Destination};
use reports_output::{Cell, Report, ReportTable};
use tracing::{debug, info};

use crate::bootstrap;

const GENDERS: [Gender; 2] = [Gender::Male, Gender::Female];

// ── Dispatch ───────────────────────────────────────────────────────────────────

/// Run the selected sub-command, writing console output to `out`.
pub fn run<W: Write>(settings: &Settings, config: ReportConfig, out: &mut W) -> Result<()> {
    let output_dir = settings.output_dir.as_path();
    match &settings.command {
        Command::TopNames(args) => top_names(args, config, output_dir, out),
        Command::NameTrends(args) => name_trends(args, config, output_dir, out),
        Command::OrderStatus(args) => order_status(args, config, output_dir, out),
        Command::FillQuantities(args) => fill_quantities(args, config, output_dir, out),
        Command::Config(args) => write_config(args, &config, out),
    }
}

/// Run `work` and log how long it took.
fn timed<T>(destination: &Destination, work: impl FnOnce() -> Result<T>) -> Result<T> {
    let start = Instant::now();
    let value = work()?;
    info!("{}", timing_message(start.elapsed(), destination.writes_file()));
    Ok(value)
}

fn fix_config(mut config: FixLogConfig, data_dir: Option<&Path>, delimiter: Option<&str>) -> Result<FixLogConfig> {
    if let Some(dir) = data_dir {
        config.data_dir = dir.to_path_buf();
    }
    if let Some(name) = delimiter {
        config.delimiter = delimiter_from_name(name)?;
    }
    Ok(config)
}

// ── top-names ──────────────────────────────────────────────────────────────────

fn top_names<W: Write>(args: &TopNamesArgs, config: ReportConfig, output_dir: &Path, out: &mut W) -> Result<()> {
    let mut config = config.baby_names;
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    let method: ExtractMethod = args.method.parse()?;
    let destination = Destination::resolve(args.output.as_deref(), args.excel, output_dir, "top_names")?;

    timed(&destination, || {
        let tables = baby_names::load_year_tables(&config, method)?;
        let top = aggregator::top_names(&tables, args.count as usize);
        emit_to(&top_names_report(&top, &args.sheet), &destination, out)?;
        Ok(())
    })
}

/// One table per gender: the year followed by the top names in rank order.
///
/// Rank columns stop at the longest list found, so short pages do not widen
/// the table to the requested count.
pub fn top_names_report(top: &TopNames, sheet_name: &str) -> Report {
    let mut report = Report::new(sheet_name);
    for gender in GENDERS {
        let columns = top
            .for_gender(gender)
            .iter()
            .map(|(_, names)| names.len())
            .max()
            .unwrap_or(0)
            .min(top.count);
        let header = std::iter::once("Year".to_string()).chain((1..=columns).map(|i| i.to_string()));
        let mut table = ReportTable::new(
            format!("Top {} {} Names Per Year", top.count, gender.label()),
            header,
        );
        for (year, names) in top.for_gender(gender) {
            let mut row = vec![Cell::from(year.to_string())];
            row.extend(names.iter().map(|n| Cell::from(n.as_str())));
            table.push_row(row);
        }
        report.push_table(table);
    }
    report
}

// ── name-trends ────────────────────────────────────────────────────────────────

fn name_trends<W: Write>(args: &NameTrendsArgs, config: ReportConfig, output_dir: &Path, out: &mut W) -> Result<()> {
    let mut config = config.baby_names;
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    let method: ExtractMethod = args.method.parse()?;
    let destination = Destination::resolve(args.output.as_deref(), args.excel, output_dir, "name_trends")?;

    timed(&destination, || {
        let scrape = || -> Result<Vec<NameRankRecord>> {
            info!("Scraping HTML files for data.");
            let tables = baby_names::load_year_tables(&config, method)?;
            Ok(aggregator::rank_records(&tables))
        };

        let records = if args.no_cache {
            scrape()?
        } else {
            let cache_dir = args.cache_dir.clone().unwrap_or_else(RankCache::default_dir);
            bootstrap::ensure_cache_dir(&cache_dir)?;
            let cache_path = RankCache::path_in(&cache_dir);

            let cached = if args.refresh {
                None
            } else {
                RankCache::load_from(&cache_path).filter(|cache| {
                    let usable = cache.matches(&config.data_dir, method);
                    if !usable {
                        debug!(
                            "Rank cache {} was built from {} ({} method), ignoring it",
                            cache_path.display(),
                            cache.source_dir.display(),
                            cache.method
                        );
                    }
                    usable
                })
            };

            match cached {
                Some(cache) => {
                    info!("Using the stored rank data in {}", cache_path.display());
                    cache.records
                }
                None => {
                    let records = scrape()?;
                    RankCache::new(&config.data_dir, method, records.clone()).save_to(&cache_path)?;
                    debug!("Saved {} rank records to {}", records.len(), cache_path.display());
                    records
                }
            }
        };

        let trends = aggregator::rank_trends(&records, &args.names);
        emit_to(&name_trends_report(&trends, &args.sheet), &destination, out)?;
        Ok(())
    })
}

/// One table per gender: the year followed by the rank of every requested
/// name, `N/A` where the name is unranked.
pub fn name_trends_report(trends: &RankTrends, sheet_name: &str) -> Report {
    let mut report = Report::new(sheet_name);
    for gender in GENDERS {
        let header = std::iter::once("Year".to_string()).chain(trends.names.iter().cloned());
        let mut table = ReportTable::new(format!("{} Name Rankings Per Year", gender.label()), header);
        for row in trends.for_gender(gender) {
            let mut cells = vec![Cell::from(row.year.to_string())];
            cells.extend(row.ranks.iter().map(|rank| Cell::from(*rank)));
            table.push_row(cells);
        }
        report.push_table(table);
    }
    report
}

// ── order-status ───────────────────────────────────────────────────────────────

fn order_status<W: Write>(args: &OrderStatusArgs, config: ReportConfig, output_dir: &Path, out: &mut W) -> Result<()> {
    let config = fix_config(config.fix_logs, args.data_dir.as_deref(), args.delimiter.as_deref())?;
    let method: ExtractMethod = args.method.parse()?;
    let wanted = args
        .statuses
        .iter()
        .map(|s| s.parse::<OrdStatus>())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let destination = Destination::resolve(args.output.as_deref(), args.excel, output_dir, "order_status")?;

    timed(&destination, || {
        let counts = fix_log::load_status_counts(&config, &wanted, method)?;
        emit_to(&order_status_report(&counts), &destination, out)?;
        Ok(())
    })
}

/// Status, its tag-39 form and the number of execution reports, with a total.
pub fn order_status_report(counts: &[StatusCount]) -> Report {
    let mut table = ReportTable::new("Order Status Counts", ["Status", "Tag", "Count"]);
    for entry in counts {
        table.push_row(vec![
            Cell::from(entry.status.label()),
            Cell::from(entry.status.tag()),
            Cell::from(entry.count),
        ]);
    }
    let total: u64 = counts.iter().map(|c| c.count).sum();
    let table = table.with_totals(vec![Cell::from("TOTAL"), Cell::from(""), Cell::from(total)]);

    let mut report = Report::new("Order Status");
    report.push_table(table);
    report
}

// ── fill-quantities ────────────────────────────────────────────────────────────

fn fill_quantities<W: Write>(
    args: &FillQuantitiesArgs,
    config: ReportConfig,
    output_dir: &Path,
    out: &mut W,
) -> Result<()> {
    let config = fix_config(config.fix_logs, args.data_dir.as_deref(), args.delimiter.as_deref())?;
    let method: ExtractMethod = args.method.parse()?;
    let destination = Destination::resolve(args.output.as_deref(), args.excel, output_dir, "fill_quantities")?;
    let symbol_tag = fix_log::symbol_tag(&args.symbol);

    timed(&destination, || {
        let fills = fix_log::load_order_fills(&config, &symbol_tag, method)?;
        info!("{} orders filled on {}", fills.len(), symbol_tag);
        emit_to(&fill_quantities_report(&symbol_tag, &fills), &destination, out)?;
        Ok(())
    })
}

/// Final cumulative quantity per order id, with the total filled.
pub fn fill_quantities_report(symbol_tag: &str, fills: &[OrderFill]) -> Report {
    let mut table = ReportTable::new(format!("Fill Quantities ({symbol_tag})"), ["Order Id", "Cumulative Qty"]);
    for fill in fills {
        table.push_row(vec![Cell::from(fill.order_id.as_str()), Cell::from(fill.cumulative_qty)]);
    }
    let table = table.with_totals(vec![Cell::from("TOTAL"), Cell::from(aggregator::total_filled(fills))]);

    let mut report = Report::new("Fill Quantities");
    report.push_table(table);
    report
}

// ── config ─────────────────────────────────────────────────────────────────────

fn write_config<W: Write>(args: &ConfigArgs, config: &ReportConfig, out: &mut W) -> Result<()> {
    config.save_to(&args.write)?;
    info!("Wrote config to {}", args.write.display());
    writeln!(out, "Created: {}", args.write.display())?;
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
