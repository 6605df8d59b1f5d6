use colored::*;
use tadisc_common::accessory::AccessoryRecord;
use tadisc_common::summary::DiscoverySummary;
use tadisc_core::DiscoveryReport;

pub const TOTAL_WIDTH: usize = 64;
const KEY_WIDTH: usize = 18;

mod colors {
    use colored::Color;

    pub const PRIMARY: Color = Color::TrueColor { r: 94, g: 190, b: 255 };
    pub const SEPARATOR: Color = Color::BrightBlack;
    pub const TEXT_DEFAULT: Color = Color::White;
    pub const ACCENT: Color = Color::TrueColor { r: 255, g: 200, b: 87 };
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    println!("{line}");
}

pub fn fat_separator() {
    println!("{}", "═".repeat(TOTAL_WIDTH).bright_black());
}

pub trait WithDefaultColor {
    fn with_default(self, default_color: Color) -> ColoredString;
}

impl WithDefaultColor for &str {
    fn with_default(self, default_color: Color) -> ColoredString {
        self.color(default_color)
    }
}

impl WithDefaultColor for String {
    fn with_default(self, default_color: Color) -> ColoredString {
        self.color(default_color)
    }
}

impl WithDefaultColor for ColoredString {
    fn with_default(self, _default_color: Color) -> ColoredString {
        self
    }
}

pub fn aligned_line<V: WithDefaultColor>(key: &str, value: V) {
    let dots: String = ".".repeat((KEY_WIDTH + 1).saturating_sub(key.chars().count()));
    println!(
        "{} {}{}{} {}",
        ">".color(colors::SEPARATOR),
        key.color(colors::PRIMARY),
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR),
        value.with_default(colors::TEXT_DEFAULT)
    );
}

fn accessory_line(idx: usize, record: &AccessoryRecord) {
    let idx_str: String = format!("[{}]", idx.to_string().color(colors::ACCENT));
    println!(
        "{} {} {}",
        idx_str.color(colors::SEPARATOR),
        record.host.to_string().color(colors::PRIMARY),
        record.attributes.color(colors::TEXT_DEFAULT)
    );
}

fn summary(summary: &DiscoverySummary, port: u16) {
    aligned_line("Total IPs scanned", summary.total_hosts.to_string());
    aligned_line(&format!("Port {port} open"), summary.reachable.to_string());
    aligned_line("Valid accessories", summary.valid.to_string().green().bold());
    aligned_line("Invalid responses", summary.invalid.to_string());
    aligned_line("TCP scan time", format!("{:.3}s", summary.scan_time.as_secs_f64()));
    aligned_line("Query time", format!("{:.3}s", summary.query_time.as_secs_f64()));
    aligned_line("Total time", format!("{:.3}s", summary.total_time.as_secs_f64()).yellow());
}

/// Prints the accessories of a finished run followed by its counters.
pub fn report(report: &DiscoveryReport, port: u16) {
    if report.accessories.is_empty() {
        header("no accessories found");
    } else {
        header("test accessories");
        for (idx, record) in report.accessories.iter().enumerate() {
            accessory_line(idx, record);
        }
    }

    fat_separator();
    summary(&report.summary, port);
}

pub fn interrupted() {
    println!("{} {}", "[*]".yellow().bold(), "Scan interrupted, no results written".yellow());
}
