use std::fmt;
use crate::stats::CacheStats;

const BORDER: &str = "==================================================================";

/// How statistics are printed
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReportMode {
    /// Bordered block of percentages
    Verbose,
    /// A single space separated line of fractions
    Compact,
}

impl ReportMode {
    /// `"0"` selects the verbose report, anything else the compact one
    pub fn from_flag(flag: &str) -> Self {
        if flag == "0" {
            ReportMode::Verbose
        } else {
            ReportMode::Compact
        }
    }
}

/// Formats statistics for the terminal. Output always ends with a newline
pub struct Report<'a> {
    stats: &'a CacheStats,
    mode: ReportMode,
}

impl<'a> Report<'a> {
    pub fn new(stats: &'a CacheStats, mode: ReportMode) -> Self {
        Self { stats, mode }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.stats;
        match self.mode {
            ReportMode::Compact => writeln!(
                f,
                "{} {:.4} {:.4} {:.4} {:.4} {:.4}",
                s.accesses,
                s.hit_rate(),
                s.miss_rate(),
                s.compulsory_ratio(),
                s.capacity_ratio(),
                s.conflict_ratio()
            ),
            ReportMode::Verbose => {
                writeln!(f, "{BORDER}")?;
                writeln!(f, "Total accesses:              {}", s.accesses)?;
                writeln!(f, "Hit rate:                    {:.2}%", 100.0 * s.hit_rate())?;
                writeln!(f, "Miss rate:                   {:.2}%", 100.0 * s.miss_rate())?;
                writeln!(f, "- Compulsory misses:         {:.2}%", 100.0 * s.compulsory_ratio())?;
                writeln!(f, "- Capacity misses:           {:.2}%", 100.0 * s.capacity_ratio())?;
                writeln!(f, "- Conflict misses:           {:.2}%", 100.0 * s.conflict_ratio())?;
                writeln!(f, "{BORDER}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CacheStats {
        CacheStats {
            accesses: 3,
            hits: 0,
            misses: 3,
            miss_compulsory: 1,
            miss_capacity: 2,
            miss_conflict: 0,
            total_valid_lines: 1,
        }
    }

    #[test]
    fn mode_flag() {
        assert_eq!(ReportMode::from_flag("0"), ReportMode::Verbose);
        assert_eq!(ReportMode::from_flag("1"), ReportMode::Compact);
        assert_eq!(ReportMode::from_flag("yes"), ReportMode::Compact);
        assert_eq!(ReportMode::from_flag("00"), ReportMode::Compact);
    }

    #[test]
    fn compact_line() {
        let out = Report::new(&sample(), ReportMode::Compact).to_string();
        assert_eq!(out, "3 0.0000 1.0000 0.3333 0.6667 0.0000\n");
    }

    #[test]
    fn compact_line_for_empty_trace() {
        let out = Report::new(&CacheStats::default(), ReportMode::Compact).to_string();
        assert_eq!(out, "0 0.0000 0.0000 0.0000 0.0000 0.0000\n");
    }

    #[test]
    fn verbose_block() {
        let out = Report::new(&sample(), ReportMode::Verbose).to_string();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], BORDER);
        assert_eq!(lines[7], BORDER);
        assert_eq!(lines[1], "Total accesses:              3");
        assert_eq!(lines[2], "Hit rate:                    0.00%");
        assert_eq!(lines[3], "Miss rate:                   100.00%");
        assert_eq!(lines[4], "- Compulsory misses:         33.33%");
        assert_eq!(lines[5], "- Capacity misses:           66.67%");
        assert_eq!(lines[6], "- Conflict misses:           0.00%");
    }
}
