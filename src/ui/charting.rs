use times_drill::TableStat;

/// Fill ratio for a gauge, clamped into 0.0..=1.0
pub fn ratio(value: usize, max: usize) -> f64 {
    if max == 0 {
        return 0.0;
    }
    (value as f64 / max as f64).clamp(0.0, 1.0)
}

/// Bar chart points: one bar per table, valued by rounded accuracy percent
pub fn accuracy_bars(stats: &[TableStat]) -> Vec<(String, u64)> {
    stats
        .iter()
        .map(|s| (s.table.to_string(), s.accuracy_percent().round() as u64))
        .collect()
}

/// Format an accuracy ratio as a percent label, or a dash when untried
pub fn format_label(stat: &TableStat) -> String {
    if stat.attempts == 0 {
        "-".to_string()
    } else {
        format!("{:.0}%", stat.accuracy_percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(table: u8, attempts: u64, correct: u64) -> TableStat {
        TableStat {
            table,
            attempts,
            correct,
        }
    }

    #[test]
    fn test_ratio_bounds() {
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(ratio(3, 12), 0.25);
        assert_eq!(ratio(20, 10), 1.0);
    }

    #[test]
    fn test_accuracy_bars() {
        let bars = accuracy_bars(&[stat(0, 0, 0), stat(7, 4, 3)]);
        assert_eq!(bars, vec![("0".to_string(), 0), ("7".to_string(), 75)]);
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(&stat(2, 0, 0)), "-");
        assert_eq!(format_label(&stat(2, 3, 2)), "67%");
    }
}
