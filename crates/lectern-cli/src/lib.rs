use lectern_core::models::{DocumentPage, StorageStats};
use lectern_processing::{DocumentFormat, ExtractionOutcome};

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub fn bytes_to_mb(bytes: i64) -> f64 {
    (bytes as f64) / (1024.0 * 1024.0)
}

pub fn render_stats_table(stats: &StorageStats) -> String {
    let mut out = String::from("\n=== Document Storage Statistics ===\n\n");
    out.push_str(&format!("Documents:       {:>8}\n", stats.total_documents));
    out.push_str(&format!("Media assets:    {:>8}\n", stats.total_media_assets));
    out.push_str("\n--- By Backend ---\n");
    out.push_str(&format!("Disk:            {:>8}\n", stats.disk_backed_count));
    out.push_str(&format!(
        "Inline:          {:>8}  ({:.2} MB, {} bytes)\n",
        stats.inline_backed_count,
        bytes_to_mb(stats.total_inline_bytes),
        stats.total_inline_bytes
    ));
    out.push_str(&format!(
        "\nAverage size:    {:>8} bytes (inline bytes / all documents)\n",
        stats.average_document_size
    ));
    out
}

pub fn render_document_table(page: &DocumentPage) -> String {
    let shown_from = (i64::from(page.page) - 1) * i64::from(page.page_size);
    let mut out = String::from("\n=== Documents ===\n\n");
    out.push_str(&format!(
        "Total: {} documents (page {}, showing {} to {})\n",
        page.total,
        page.page,
        if page.items.is_empty() { 0 } else { shown_from + 1 },
        shown_from + page.items.len() as i64
    ));

    if page.items.is_empty() {
        out.push_str("\nNo documents found.\n");
        return out;
    }

    out.push_str(&format!(
        "\n{:<36} {:<30} {:<7} {:<10} {:>6} {:>12} {:>20}\n",
        "ID", "Original Filename", "Backend", "Status", "Media", "Size (MB)", "Created At"
    ));
    out.push_str(&"-".repeat(127));
    out.push('\n');

    for doc in &page.items {
        out.push_str(&format!(
            "{:<36} {:<30} {:<7} {:<10} {:>6} {:>12.2} {:>20}\n",
            doc.id,
            truncate_string(&doc.original_filename, 30),
            doc.storage_backend.to_string(),
            doc.status.to_string(),
            doc.media_count,
            bytes_to_mb(doc.file_size),
            doc.created_at.format("%Y-%m-%d %H:%M:%S")
        ));
    }

    out
}

/// Dry-run report of what ingestion would extract from a file.
pub fn render_extraction_report(
    filename: &str,
    format: DocumentFormat,
    outcome: &ExtractionOutcome,
) -> String {
    let mut out = format!("\n=== Extraction: {} ===\n\nFormat: {}\n", filename, format);
    match outcome.degraded_reason() {
        Some(reason) => out.push_str(&format!("Outcome: degraded ({})\n", reason)),
        None => out.push_str("Outcome: extracted\n"),
    }
    out.push_str(&format!("Media: {}\n", outcome.candidates().len()));

    if !outcome.candidates().is_empty() {
        out.push_str(&format!(
            "\n{:>5} {:<30} {:<26} {:>10} {:<12}\n",
            "Index", "Filename", "MIME Type", "Bytes", "Rel ID"
        ));
        for candidate in outcome.candidates() {
            out.push_str(&format!(
                "{:>5} {:<30} {:<26} {:>10} {:<12}\n",
                candidate.order_index,
                truncate_string(&candidate.filename, 30),
                candidate.mime_type,
                candidate.data.len(),
                candidate.relationship_id.as_deref().unwrap_or("-")
            ));
        }
    }

    out
}

/// Initialize tracing for CLI binaries.
///
/// `RUST_LOG` overrides the default filter; `LOG_FORMAT=json` switches to
/// JSON lines.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lectern=info,sqlx=warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
