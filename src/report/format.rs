//! Fixed-width terminal table for the actual vs fitted comparison.

use crate::report::DiffRow;

const RULE_WIDTH: usize = 82;

/// Format the diff table, bracketed by `=` rules.
pub fn format_diff_table(grid: &str, composition: &str, rows: &[DiffRow]) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("{:27}{grid} {composition} cross-sections [fb]\n", ""));
    out.push_str(&rule);
    out.push('\n');
    out.push_str(
        format!(
            "{:13} ::    Actual -   Fitted - {:8} ::   Actual -   Fitted -",
            "", ""
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str("  Mass [GeV]  ::     xsec  -    xsec  - Diff [%] ::     unc  -     unc  - Diff [%]\n");
    out.push_str(&rule);
    out.push('\n');

    for r in rows {
        out.push_str(
            format!(
                " {:>8}     :: {:>9} - {:>8} - {:>8} :: {:>8} - {:>8} - {:>8}",
                fmt_sig(r.mass, 5),
                fmt_sig(r.xsec, 5),
                fmt_sig(r.fit_xsec, 5),
                fmt_pct(r.xsec_diff_pct),
                fmt_sig(r.xsec_unc, 5),
                fmt_sig(r.fit_unc, 5),
                fmt_pct(r.unc_diff_pct),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out.push_str(&rule);
    out.push('\n');
    out
}

fn fmt_pct(v: Option<f64>) -> String {
    match v {
        // Adding 0.0 turns a rounded -0.0 into 0.0.
        Some(v) => format!("{:.2}", (v * 100.0).round() / 100.0 + 0.0),
        None => "n/a".to_string(),
    }
}

/// Format with `sig` significant digits, switching to exponent form for very
/// small or very large magnitudes.
pub fn fmt_sig(v: f64, sig: usize) -> String {
    if v == 0.0 || !v.is_finite() {
        return format!("{v}");
    }
    let sig = sig.max(1);
    let exp = v.abs().log10().floor() as i32;
    if exp < -4 || exp >= sig as i32 {
        return format!("{:.*e}", sig - 1, v);
    }
    let decimals = (sig as i32 - 1 - exp).max(0) as usize;
    format!("{v:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn significant_digit_formatting() {
        assert_eq!(fmt_sig(1234.5678, 5), "1234.6");
        assert_eq!(fmt_sig(0.012345678, 5), "0.012346");
        assert_eq!(fmt_sig(125.0, 5), "125.00");
        assert_eq!(fmt_sig(1.5e6, 5), "1.5000e6");
        assert_eq!(fmt_sig(0.0, 5), "0");
    }

    #[test]
    fn rounded_zero_prints_without_sign() {
        assert_eq!(fmt_pct(Some(-1e-9)), "0.00");
        assert_eq!(fmt_pct(Some(-0.004)), "0.00");
        assert_eq!(fmt_pct(Some(-0.006)), "-0.01");
        assert_eq!(fmt_pct(Some(0.0437)), "0.04");
        assert_eq!(fmt_pct(None), "n/a");
    }

    #[test]
    fn table_has_rules_title_and_one_line_per_row() {
        let rows = vec![
            DiffRow {
                mass: 100.0,
                window: 0,
                xsec: 22670.1,
                fit_xsec: 22680.0,
                xsec_diff_pct: Some(0.0437),
                xsec_unc: 973.967,
                fit_unc: 980.0,
                unc_diff_pct: Some(0.62),
            },
            DiffRow {
                mass: 125.0,
                window: 0,
                xsec: 10034.8,
                fit_xsec: 10034.8,
                xsec_diff_pct: Some(0.0),
                xsec_unc: 0.0,
                fit_unc: 0.0,
                unc_diff_pct: None,
            },
        ];
        let table = format_diff_table("C1N2", "wino", &rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 2 + 1 + 3 + rows.len() + 1);
        assert_eq!(lines[0], "=".repeat(82));
        assert_eq!(lines.last().copied(), Some("=".repeat(82).as_str()));
        assert!(lines[1].trim() == "C1N2 wino cross-sections [fb]");
        assert!(lines[6].contains("0.04"));
        assert!(lines[7].contains("0.00"));
        assert!(lines[7].ends_with("n/a"));
    }
}
