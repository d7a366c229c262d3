//! Small formatting helpers shared by the CLI status output.

/// Converts a byte count into a human-readable string using the most
/// appropriate unit (B, KB, MB, GB, TB), formatted with one decimal place.
/// Exact byte counts matter less to users than quick comprehension, so
/// `1234567` renders as `"1.2 MB"`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    const BASE: f64 = 1024.0;

    if bytes == 0 {
        return "0.0 B".to_string();
    }

    let exp = ((bytes as f64).ln() / BASE.ln()) as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = bytes as f64 / BASE.powi(exp as i32);

    format!("{:.1} {}", value, UNITS[exp])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_sizes_across_units() {
        let cases = [
            (0, "0.0 B"),
            (1, "1.0 B"),
            (512, "512.0 B"),
            (1024, "1.0 KB"),
            (1536, "1.5 KB"),
            (1_048_576, "1.0 MB"),
            (1_234_567, "1.2 MB"),
            (1_073_741_824, "1.0 GB"),
            (1_099_511_627_776, "1.0 TB"),
        ];
        for (input, expected) in cases {
            assert_eq!(format_size(input), expected, "for {} bytes", input);
        }
    }
}
