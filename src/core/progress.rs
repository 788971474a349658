use serde::Serialize;

/// Progress signal emitted after each file of a bulk run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkProgress {
    /// Number of files handled so far (1-based)
    pub current: usize,
    /// Total number of files in the run
    pub total: usize,
    /// `current / total`, between 0 and 1
    pub percent: f64,
}

impl BulkProgress {
    pub fn new(current: usize, total: usize) -> Self {
        let percent = if total > 0 {
            current as f64 / total as f64
        } else {
            0.0
        };

        Self { current, total, percent }
    }
}

/// A file that was optimized successfully
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSuccess {
    pub filename: String,
    /// Optimized SVG text
    pub data: String,
    pub original_size: usize,
    pub optimized_size: usize,
}

impl BulkSuccess {
    /// Bytes saved (negative if the file grew)
    pub fn saved_bytes(&self) -> i64 {
        self.original_size as i64 - self.optimized_size as i64
    }
}

/// A file that failed validation or optimization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkFailure {
    pub filename: String,
    pub error: String,
}

/// Everything a bulk run produced, in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkReport {
    pub results: Vec<BulkSuccess>,
    pub errors: Vec<BulkFailure>,
}

impl BulkReport {
    /// Human-readable summary lines, as shown after a run
    pub fn summary(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.errors.is_empty() {
            lines.push(format!(
                "{} file{} failed to process",
                self.errors.len(),
                plural(self.errors.len())
            ));
        }
        if !self.results.is_empty() {
            lines.push(format!(
                "{} file{} optimized",
                self.results.len(),
                plural(self.results.len())
            ));
        }
        lines
    }
}

fn plural(count: usize) -> &'static str {
    if count > 1 { "s" } else { "" }
}

/// Signals delivered to a bulk-run observer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BulkEvent {
    Progress(BulkProgress),
    Complete(BulkReport),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percent() {
        assert_eq!(BulkProgress::new(1, 4).percent, 0.25);
        assert_eq!(BulkProgress::new(3, 3).percent, 1.0);
        assert_eq!(BulkProgress::new(0, 0).percent, 0.0);
    }

    #[test]
    fn test_summary() {
        let report = BulkReport {
            results: vec![
                BulkSuccess { filename: "a.svg".into(), data: String::new(), original_size: 10, optimized_size: 4 },
                BulkSuccess { filename: "b.svg".into(), data: String::new(), original_size: 10, optimized_size: 12 },
            ],
            errors: vec![BulkFailure { filename: "c.svg".into(), error: "Not a valid SVG file".into() }],
        };
        assert_eq!(report.summary(), vec!["1 file failed to process", "2 files optimized"]);
        assert_eq!(report.results[0].saved_bytes(), 6);
        assert_eq!(report.results[1].saved_bytes(), -2);
    }
}
