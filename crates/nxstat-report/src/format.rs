//! Number formatting helpers shared by the report sections.

/// `1234567` → `"1,234,567"`.
pub fn thousands(n: u64) -> String {
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

/// Two-decimal percentage padded to the report column, e.g. `"    12.50%"`.
pub fn percent(value: f64) -> String {
    format!("{value:>9.2}%")
}
