const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Format a byte count with 1024-based units, clamped to TB.
pub fn format_size(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let exponent = (bytes.ilog(1024) as usize).min(SIZE_UNITS.len() - 1);
    if exponent == 0 {
        return format!("{} {}", bytes, SIZE_UNITS[0]);
    }

    let scaled = bytes as f64 / 1024f64.powi(exponent as i32);
    format!("{:.*} {}", decimals, scaled, SIZE_UNITS[exponent])
}

pub fn format_speed(bytes_per_second: f64) -> String {
    let bytes = if bytes_per_second.is_finite() && bytes_per_second > 0.0 {
        bytes_per_second.round() as u64
    } else {
        0
    };
    format!("{}/s", format_size(bytes, 2))
}
