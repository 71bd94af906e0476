use sigma_aggregator::AggregationReport;
use sigma_protocol::{ArchiveStats, Page, Record};

const TITLE_WIDTH: usize = 72;

pub fn render_page(page: &Page<&Record>, archive_total: Option<usize>) -> String {
    let mut out = String::new();
    for record in &page.data {
        out.push_str(&format!(
            "{:>7}  {:<10}  {:<10}  {:<20}  {}\n",
            record.id,
            record.date,
            record.category,
            truncate_one_line(&record.author, 20),
            truncate_one_line(&record.title, TITLE_WIDTH),
        ));
    }
    if page.data.is_empty() {
        out.push_str("No exploits on this page.\n");
    }

    out.push('\n');
    out.push_str(&format!(
        "Page {} of {} ({} matching)\n",
        page.current_page,
        page.total_pages.max(1),
        page.total_items
    ));
    if let Some(total) = archive_total.filter(|total| *total != page.total_items) {
        out.push_str(&format!(
            "Showing {} of {} exploits\n",
            page.total_items, total
        ));
    }
    out
}

pub fn render_record(record: &Record) -> String {
    let mut out = String::new();
    out.push_str(&format!("Exploit #{}\n", record.id));
    out.push_str(&format!("Title:    {}\n", record.title));
    out.push_str(&format!("Author:   {}\n", record.author));
    out.push_str(&format!("Date:     {}\n", record.date));
    out.push_str(&format!("Category: {}\n", record.category));
    if let Some(platform) = &record.platform {
        out.push_str(&format!("Platform: {platform}\n"));
    }
    if let Some(cve) = &record.cve_id {
        out.push_str(&format!("CVE:      {cve}\n"));
    }
    if !record.cves.is_empty() {
        out.push_str(&format!("CVEs:     {}\n", record.cves.join(", ")));
    }
    out.push_str(&format!("Source:   {}\n", record.source));
    if !record.content.is_empty() {
        out.push('\n');
        out.push_str(&record.content);
        if !record.content.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

pub fn render_stats(stats: &ArchiveStats, top: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("Total exploits: {}\n", stats.total_exploits));
    out.push_str(&format!("Categories:     {}\n", stats.categories.len()));
    out.push_str(&format!("Authors:        {}\n", stats.authors.len()));
    out.push_str(&format!("CVEs:           {}\n", stats.cves.len()));
    match stats.year_range() {
        Some((first, last)) => out.push_str(&format!("Years:          {first} - {last}\n")),
        None => out.push_str("Years:          n/a\n"),
    }

    out.push_str("\nTop categories:\n");
    for (category, count) in stats.top_categories(top) {
        out.push_str(&format!("  {category:<20} {count}\n"));
    }

    out.push_str("\nTop authors:\n");
    for (author, count) in stats.author_counts.iter().take(top) {
        out.push_str(&format!("  {:<20} {count}\n", truncate_one_line(author, 20)));
    }
    out
}

pub fn render_aggregation(report: &AggregationReport) -> String {
    let mut out = String::new();
    out.push_str("Data aggregation complete!\n");
    out.push_str(&format!("- Total exploits: {}\n", report.processed));
    out.push_str(&format!("- Categories: {}\n", report.categories));
    out.push_str(&format!("- Authors: {}\n", report.authors));
    out.push_str(&format!("- CVEs: {}\n", report.cves));
    out.push_str(&format!("- Years: {}\n", report.years));
    if !report.failures.is_empty() {
        out.push_str(&format!(
            "- Skipped: {} of {} files\n",
            report.failures.len(),
            report.files_found
        ));
    }
    if let Some(path) = &report.records_path {
        out.push_str(&format!("- Output: {}\n", path.display()));
    }
    if let Some(path) = &report.stats_path {
        out.push_str(&format!("- Stats: {}\n", path.display()));
    }
    out
}

fn truncate_one_line(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    let mut cut: String = line.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}
