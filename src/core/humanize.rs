// src/core/humanize.rs

const SUFFIXES: [&str; 5] = ["", "k", "M", "G", "T"];

/// Metric abbreviation with one decimal: `999`, `1.5 k`, `350 M`, `1.2 G`.
/// A trailing `.0` is dropped.
pub fn abbreviate(value: u64) -> String {
    let mut v = value as f64;
    let mut i = 0;
    while v >= 1000.0 && i + 1 < SUFFIXES.len() {
        v /= 1000.0;
        i += 1;
    }
    // 999_950 rounds to "1000 k"; bump to the next unit instead.
    if i + 1 < SUFFIXES.len() && (v * 10.0).round() / 10.0 >= 1000.0 {
        v /= 1000.0;
        i += 1;
    }
    let mut num = format!("{:.1}", v);
    if num.ends_with(".0") {
        num.truncate(num.len() - 2);
    }
    if i == 0 { num } else { format!("{} {}", num, SUFFIXES[i]) }
}
