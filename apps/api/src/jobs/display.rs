//! Display helpers for job postings.

/// Formats a salary amount for display. IDR amounts use the local
/// convention: `Rp` prefix and `.` as the thousands separator, no decimals.
/// Other currencies fall back to `{code} {amount}` with the same grouping.
pub fn format_salary(amount: i64, currency: &str) -> String {
    let grouped = group_thousands(amount);
    if currency == "IDR" {
        format!("Rp{grouped}")
    } else {
        format!("{currency} {grouped}")
    }
}

fn group_thousands(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    if negative {
        format!("-{out}")
    } else {
        out
    }
}

/// Derives a URL slug from a job title: lowercase, alphanumeric runs
/// joined by single hyphens, everything else dropped.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_salary_idr_grouping() {
        assert_eq!(format_salary(7_000_000, "IDR"), "Rp7.000.000");
        assert_eq!(format_salary(12_500_000, "IDR"), "Rp12.500.000");
        assert_eq!(format_salary(950, "IDR"), "Rp950");
        assert_eq!(format_salary(0, "IDR"), "Rp0");
    }

    #[test]
    fn test_format_salary_other_currency() {
        assert_eq!(format_salary(120_000, "USD"), "USD 120.000");
    }

    #[test]
    fn test_generate_slug() {
        assert_eq!(generate_slug("Backend Engineer"), "backend-engineer");
        assert_eq!(generate_slug("Sr. Data Analyst (Remote)"), "sr-data-analyst-remote");
        assert_eq!(generate_slug("  QA -- Lead  "), "qa-lead");
        assert_eq!(generate_slug("C++ Developer"), "c-developer");
    }
}
