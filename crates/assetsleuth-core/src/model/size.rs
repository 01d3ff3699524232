/// Human-readable byte and count formatting for reports.
///
/// Sizes stay `u64` bytes everywhere else; floating point only appears here.

const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

/// Format a byte count using binary multiples with short labels.
///
/// Below 1 KB the exact byte count is printed. KB and MB get one decimal,
/// GB and TB two, since those are the sizes users compare closely.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit >= 2 {
        format!("{value:.2} {}", UNITS[unit])
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Format an asset count with comma thousand separators.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
