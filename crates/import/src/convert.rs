use ledgerlift_core::{ConversionProfile, OutputRecord, Record};
use serde::{Deserialize, Serialize};

use crate::knowledge::MerchantKnowledge;
use crate::transform::transform;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionStats {
    pub total_rows: usize,
    pub categorized_rows: usize,
    pub uncategorized_rows: usize,
    pub learned_merchants: usize,
    /// Percentage with one decimal place, e.g. `"87.5%"`.
    pub categorization_rate: String,
}

impl ConversionStats {
    pub fn from_rows(rows: &[OutputRecord], learned_merchants: usize, uncategorized_label: &str) -> Self {
        let total_rows = rows.len();
        let categorized_rows = rows
            .iter()
            .filter(|r| r.is_categorized(uncategorized_label))
            .count();
        Self::from_counts(total_rows, categorized_rows, learned_merchants)
    }

    fn from_counts(total_rows: usize, categorized_rows: usize, learned_merchants: usize) -> Self {
        Self {
            total_rows,
            categorized_rows,
            uncategorized_rows: total_rows - categorized_rows,
            learned_merchants,
            categorization_rate: format_rate(categorized_rows, total_rows),
        }
    }

    /// Sums row counts across files converted against one knowledge base.
    /// `learned_merchants` is shared, not summed. `None` for an empty input.
    pub fn combine<'a>(stats: impl IntoIterator<Item = &'a ConversionStats>) -> Option<Self> {
        let mut iter = stats.into_iter().peekable();
        let learned_merchants = iter.peek()?.learned_merchants;
        let (total, categorized) = iter.fold((0, 0), |(t, c), s| {
            (t + s.total_rows, c + s.categorized_rows)
        });
        Some(Self::from_counts(total, categorized, learned_merchants))
    }
}

/// `categorized / total` as a percentage with one decimal, rounded from the
/// exact value of the float quotient. Exact halves round up.
fn format_rate(categorized: usize, total: usize) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    let pct = categorized as f64 / total as f64 * 100.0;
    // Only an odd number of quarters is an exact tie at one decimal; `{:.1}`
    // would send those to even.
    let quarters = pct * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        return format!("{:.1}%", (pct * 10.0 + 0.5).floor() / 10.0);
    }
    format!("{pct:.1}%")
}

/// Output of converting one raw export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub records: Vec<OutputRecord>,
    pub stats: ConversionStats,
}

/// Learns from `reference` and converts every raw row, preserving order.
///
/// Returns `None` when either side is empty: there is nothing to learn from
/// or nothing to convert, and callers treat that as "not ready".
pub fn convert(raw: &[Record], reference: &[Record], profile: &ConversionProfile) -> Option<Conversion> {
    if raw.is_empty() || reference.is_empty() {
        return None;
    }
    let knowledge = MerchantKnowledge::learn(reference, profile);
    Some(convert_with(raw, &knowledge, profile))
}

/// Converts `raw` against already-learned knowledge. `raw` must be non-empty
/// for the rate to be meaningful.
pub fn convert_with(raw: &[Record], knowledge: &MerchantKnowledge, profile: &ConversionProfile) -> Conversion {
    let records: Vec<OutputRecord> = raw
        .iter()
        .map(|row| transform(row, knowledge, profile))
        .collect();
    let stats = ConversionStats::from_rows(&records, knowledge.len(), &profile.uncategorized_label);
    Conversion { records, stats }
}

/// A parsed raw export together with the file name it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    pub name: String,
    pub records: Vec<Record>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileConversion {
    pub name: String,
    pub records: Vec<OutputRecord>,
    pub stats: ConversionStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchConversion {
    pub files: Vec<FileConversion>,
    pub combined: ConversionStats,
    /// Knowledge learned once from the reference and applied to every file.
    #[serde(skip)]
    pub knowledge: MerchantKnowledge,
}

/// Converts several raw exports against one reference export. Each file
/// gets its own rows and stats; `combined` aggregates them. Files without
/// rows are skipped. `None` when the reference is empty or no file has rows.
pub fn convert_batch(
    files: &[RawFile],
    reference: &[Record],
    profile: &ConversionProfile,
) -> Option<BatchConversion> {
    if reference.is_empty() || files.iter().all(|f| f.records.is_empty()) {
        return None;
    }

    let knowledge = MerchantKnowledge::learn(reference, profile);

    let converted: Vec<FileConversion> = files
        .iter()
        .filter(|file| {
            if file.records.is_empty() {
                tracing::warn!(file = %file.name, "skipping export with no transactions");
                return false;
            }
            true
        })
        .map(|file| {
            let Conversion { records, stats } = convert_with(&file.records, &knowledge, profile);
            tracing::debug!(
                file = %file.name,
                total = stats.total_rows,
                categorized = stats.categorized_rows,
                rate = %stats.categorization_rate,
                "converted export"
            );
            FileConversion {
                name: file.name.clone(),
                records,
                stats,
            }
        })
        .collect();

    let combined = ConversionStats::combine(converted.iter().map(|f| &f.stats))?;
    Some(BatchConversion {
        files: converted,
        combined,
        knowledge,
    })
}
