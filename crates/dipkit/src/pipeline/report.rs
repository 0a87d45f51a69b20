use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    /// Catalogue name.
    pub name: String,
    /// Human readable description.
    pub description: String,
    /// Textual result for operations that compute a value.
    pub result: Option<String>,
    /// Wall time spent in the operation.
    pub duration: Duration,
}

/// A similarity measurement between two images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonEntry {
    /// Metric name.
    pub metric: String,
    /// Metric description.
    pub description: String,
    /// Formatted value.
    pub result: String,
    /// Name of the evaluated image.
    pub name1: String,
    /// Name of the reference image.
    pub name2: String,
}

/// Everything a pipeline run reports, in request order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExecutionReport {
    /// One entry per executed operation.
    pub entries: Vec<ReportEntry>,
    /// Similarity measurements.
    pub comparisons: Vec<ComparisonEntry>,
    /// Files written at the end of the run.
    pub written: Vec<PathBuf>,
    /// Total wall time, including loading and writing.
    pub total: Duration,
}

impl ExecutionReport {
    /// Result of the first entry with the given operation name.
    pub fn result_of(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .and_then(|entry| entry.result.as_deref())
    }
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            write!(f, "{:<18} {}", entry.name, entry.description)?;
            if let Some(result) = &entry.result {
                write!(f, ": {result}")?;
            }
            writeln!(f, " [{:.3} ms]", entry.duration.as_secs_f64() * 1e3)?;
        }
        for cmp in &self.comparisons {
            writeln!(
                f,
                "{} ({} vs {}): {}",
                cmp.metric, cmp.name1, cmp.name2, cmp.result
            )?;
        }
        for path in &self.written {
            writeln!(f, "wrote {}", path.display())?;
        }
        writeln!(f, "total [{:.3} ms]", self.total.as_secs_f64() * 1e3)
    }
}
