//! Aggregation of extracted records into report-ready structures.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use reports_core::models::{
    Gender, NameRankRecord, OrdStatus, OrderFill, StatusCount, YearTable,
};

// ── Top names ─────────────────────────────────────────────────────────────────

/// The first N names of every year, per gender.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopNames {
    pub count: usize,
    pub male: Vec<(u16, Vec<String>)>,
    pub female: Vec<(u16, Vec<String>)>,
}

impl TopNames {
    pub fn for_gender(&self, gender: Gender) -> &[(u16, Vec<String>)] {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
        }
    }
}

/// Take the first `count` rows of each year's table, in page order.
pub fn top_names(tables: &[YearTable], count: usize) -> TopNames {
    let mut top = TopNames {
        count,
        ..TopNames::default()
    };
    for table in tables {
        let rows = table.rows.iter().take(count);
        top.male
            .push((table.year, rows.clone().map(|r| r.male.clone()).collect()));
        top.female
            .push((table.year, rows.map(|r| r.female.clone()).collect()));
    }
    top
}

// ── Rank trends ───────────────────────────────────────────────────────────────

/// Flatten ranking tables into one record per `(gender, year, name)`.
pub fn rank_records(tables: &[YearTable]) -> Vec<NameRankRecord> {
    let mut records = Vec::with_capacity(tables.iter().map(|t| t.rows.len() * 2).sum());
    for table in tables {
        for row in &table.rows {
            records.push(NameRankRecord {
                gender: Gender::Male,
                year: table.year,
                name: row.male.clone(),
                rank: row.rank,
            });
            records.push(NameRankRecord {
                gender: Gender::Female,
                year: table.year,
                name: row.female.clone(),
                rank: row.rank,
            });
        }
    }
    records
}

/// One year's ranks for the followed names; `None` when a name is unranked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendRow {
    pub year: u16,
    pub ranks: Vec<Option<u32>>,
}

/// Ranks of the followed names per year, per gender.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankTrends {
    pub names: Vec<String>,
    pub male: Vec<TrendRow>,
    pub female: Vec<TrendRow>,
}

impl RankTrends {
    pub fn for_gender(&self, gender: Gender) -> &[TrendRow] {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
        }
    }
}

/// Build the rank-trend rows for `names`.
///
/// Every year present in `records` gets a row, ascending. A name listed twice
/// in one year keeps its best (lowest) rank.
pub fn rank_trends(records: &[NameRankRecord], names: &[String]) -> RankTrends {
    let years: BTreeSet<u16> = records.iter().map(|r| r.year).collect();

    let mut best: HashMap<(Gender, u16, &str), u32> = HashMap::new();
    for record in records {
        if !names.iter().any(|n| *n == record.name) {
            continue;
        }
        best.entry((record.gender, record.year, record.name.as_str()))
            .and_modify(|rank| *rank = (*rank).min(record.rank))
            .or_insert(record.rank);
    }

    let rows_for = |gender: Gender| -> Vec<TrendRow> {
        years
            .iter()
            .map(|&year| TrendRow {
                year,
                ranks: names
                    .iter()
                    .map(|name| best.get(&(gender, year, name.as_str())).copied())
                    .collect(),
            })
            .collect()
    };

    RankTrends {
        names: names.to_vec(),
        male: rows_for(Gender::Male),
        female: rows_for(Gender::Female),
    }
}

// ── FIX aggregates ────────────────────────────────────────────────────────────

/// Order the per-status totals as requested, listing zero counts and
/// dropping repeated requests.
pub fn status_counts(wanted: &[OrdStatus], totals: &HashMap<OrdStatus, u64>) -> Vec<StatusCount> {
    let mut seen: Vec<OrdStatus> = Vec::with_capacity(wanted.len());
    for status in wanted {
        if !seen.contains(status) {
            seen.push(*status);
        }
    }
    seen.into_iter()
        .map(|status| StatusCount {
            status,
            count: totals.get(&status).copied().unwrap_or(0),
        })
        .collect()
}

/// Reduce `(order id, cumulative quantity)` observations to one fill per
/// order. `CumQty` is cumulative, so the largest value is the order's final
/// fill. Sorted by order id.
pub fn finish_fills(observations: impl IntoIterator<Item = (String, u64)>) -> Vec<OrderFill> {
    let mut fills: BTreeMap<String, u64> = BTreeMap::new();
    for (order_id, qty) in observations {
        fills
            .entry(order_id)
            .and_modify(|max| *max = (*max).max(qty))
            .or_insert(qty);
    }
    fills
        .into_iter()
        .map(|(order_id, cumulative_qty)| OrderFill {
            order_id,
            cumulative_qty,
        })
        .collect()
}

/// Total quantity filled across all orders.
pub fn total_filled(fills: &[OrderFill]) -> u64 {
    fills.iter().map(|f| f.cumulative_qty).sum()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
