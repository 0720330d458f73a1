/// `$157,262`: rounded half up, comma thousands separators.
pub fn usd(value: f64) -> String {
    let rounded = (value + 0.5).floor() as i64;
    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(rounded.unsigned_abs()))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Axis tick label for a salary, e.g. `150k`.
pub fn salary_tick(value: f64) -> String {
    if value.abs() >= 1000.0 {
        format!("{}k", (value / 1000.0).round())
    } else {
        format!("{value:.0}")
    }
}
