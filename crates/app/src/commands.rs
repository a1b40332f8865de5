use anyhow::{bail, Context, Result};
use ledgerlift_core::{ConversionProfile, Record};
use ledgerlift_import::csv::read_records_from_path;
use ledgerlift_import::{
    output_file_name, write_output, ConversionSession, ConversionStats, MerchantKnowledge, RawFile,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

const PROFILE_FILE: &str = "profile.toml";

#[derive(Debug, Serialize)]
struct FileSummary {
    name: String,
    output: PathBuf,
    stats: ConversionStats,
}

#[derive(Debug, Serialize)]
struct ConvertSummary {
    files: Vec<FileSummary>,
    combined: ConversionStats,
}

fn default_profile_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "ledgerlift", "Ledgerlift")
        .map(|dirs| dirs.config_dir().join(PROFILE_FILE))
}

/// Explicit `--profile`, else the per-user profile if one exists, else defaults.
pub fn load_profile(explicit: Option<&Path>) -> Result<ConversionProfile> {
    if let Some(path) = explicit {
        return ConversionProfile::load(path)
            .with_context(|| format!("loading profile {}", path.display()));
    }

    match default_profile_path() {
        Some(path) if path.exists() => {
            tracing::debug!("Using profile: {}", path.display());
            ConversionProfile::load(&path)
                .with_context(|| format!("loading profile {}", path.display()))
        }
        _ => Ok(ConversionProfile::default()),
    }
}

pub fn init_profile(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match path.or_else(default_profile_path) {
        Some(p) => p,
        None => bail!("no config directory available; pass --path <file>"),
    };

    if path.exists() && !force {
        println!("Profile already exists: {} (use --force to overwrite)", path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let text = ConversionProfile::default().to_toml()?;
    std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Parses one export on a blocking thread.
async fn read_export(path: PathBuf, delimiter: u8) -> Result<Vec<Record>> {
    let shown = path.display().to_string();
    let rows = tokio::task::spawn_blocking(move || read_records_from_path(&path, delimiter))
        .await
        .with_context(|| format!("parse task for {shown} failed"))?
        .with_context(|| format!("reading {shown}"))?;
    tracing::info!("Parsed {} rows from {}", rows.len(), shown);
    Ok(rows)
}

/// Parses every raw export concurrently and returns them in argument order.
async fn read_raw_files(paths: &[PathBuf], delimiter: u8) -> Result<Vec<RawFile>> {
    let handles: Vec<_> = paths
        .iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            (name, tokio::spawn(read_export(path.clone(), delimiter)))
        })
        .collect();

    let mut files = Vec::with_capacity(handles.len());
    for (name, handle) in handles {
        let records = handle.await.context("parse task failed")??;
        files.push(RawFile::new(name, records));
    }
    Ok(files)
}

pub async fn convert(
    profile: ConversionProfile,
    reference_path: &Path,
    raw_paths: &[PathBuf],
    out_dir: &Path,
    json: bool,
    explain: bool,
) -> Result<()> {
    let delimiter = profile.delimiter_byte();
    let (reference, raw_files) = tokio::try_join!(
        read_export(reference_path.to_path_buf(), delimiter),
        read_raw_files(raw_paths, delimiter),
    )?;

    let mut session = ConversionSession::new(profile);
    session.set_reference(reference);
    session.add_raw_files(raw_files);

    let Some(batch) = session.result() else {
        println!(
            "Nothing to convert: need at least one transaction in {} and in one bank export.",
            reference_path.display()
        );
        return Ok(());
    };

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut summaries = Vec::with_capacity(batch.files.len());
    for file in &batch.files {
        let output = out_dir.join(output_file_name(&file.name));
        let writer = std::fs::File::create(&output)
            .with_context(|| format!("creating {}", output.display()))?;
        write_output(writer, &file.records)
            .with_context(|| format!("writing {}", output.display()))?;
        tracing::info!("Wrote {} rows to {}", file.records.len(), output.display());

        summaries.push(FileSummary {
            name: file.name.clone(),
            output,
            stats: file.stats.clone(),
        });
    }

    let summary = ConvertSummary {
        files: summaries,
        combined: batch.combined.clone(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    if explain {
        let unmatched = batch.files.iter().flat_map(|f| {
            f.records
                .iter()
                .filter(|r| !r.is_categorized(&session.profile().uncategorized_label))
                .map(|r| r.merchant.as_str())
        });
        print_near_misses(&batch.knowledge, unmatched);
    }

    Ok(())
}

fn print_summary(summary: &ConvertSummary) {
    for f in &summary.files {
        println!(
            "{} -> {}: {}/{} categorized ({})",
            f.name,
            f.output.display(),
            f.stats.categorized_rows,
            f.stats.total_rows,
            f.stats.categorization_rate
        );
    }
    let c = &summary.combined;
    println!(
        "\n{} categorized | {} / {} transactions | learned from {} merchants",
        c.categorization_rate, c.categorized_rows, c.total_rows, c.learned_merchants
    );
}

fn print_near_misses<'a>(knowledge: &MerchantKnowledge, merchants: impl Iterator<Item = &'a str>) {
    let mut seen: Vec<&str> = Vec::new();
    for merchant in merchants {
        if merchant.is_empty() || seen.contains(&merchant) {
            continue;
        }
        seen.push(merchant);
    }

    if seen.is_empty() {
        return;
    }

    println!("\nUncategorized merchants:");
    for merchant in seen {
        let candidates: Vec<&str> = knowledge
            .near_misses(merchant)
            .into_iter()
            .map(|m| m.display_name.as_str())
            .collect();
        if candidates.is_empty() {
            println!("  {merchant}: no similar learned merchant");
        } else {
            println!("  {merchant}: similar to {}", candidates.join(", "));
        }
    }
}

pub async fn learn(profile: &ConversionProfile, reference_path: &Path, json: bool) -> Result<()> {
    let reference = read_export(reference_path.to_path_buf(), profile.delimiter_byte()).await?;
    let knowledge = MerchantKnowledge::learn(&reference, profile);

    if json {
        println!("{}", serde_json::to_string_pretty(&knowledge)?);
        return Ok(());
    }

    println!("Account: {}", knowledge.dominant_account());
    println!("Learned {} merchants\n", knowledge.len());
    for m in knowledge.iter() {
        println!("{:<40} {}", m.display_name, m.category);
    }
    Ok(())
}
