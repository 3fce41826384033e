const UNITS: &[&str] = &["Bytes", "KB", "MB", "GB"];

/// Human readable size: two decimals at most, trailing zeros dropped.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{} {}", round_to(size, 2), UNITS[unit_index])
}

pub fn format_ratio(ratio: f64) -> String {
    format!("{:.1}%", round_to(ratio, 1))
}

pub fn format_duration(seconds: f64) -> String {
    format!("{:.2}s", round_to(seconds, 2))
}

// Halves round away from zero
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
