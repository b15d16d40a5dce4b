use std::{fmt, time::Duration};

use chrono::{DateTime, Utc};

/// Timing summary over measured passes. One sample is one full batch.
#[derive(Debug, Clone)]
pub struct Report {
    pub started_at: DateTime<Utc>,
    pub batch_len: usize,
    pub samples: usize,
    pub avg_us: f64,
    pub min_us: f64,
    pub max_us: f64,
}

impl Report {
    pub fn from_samples(started_at: DateTime<Utc>, batch_len: usize, samples: &[Duration]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let micros: Vec<f64> = samples.iter().map(|d| d.as_secs_f64() * 1_000_000.0).collect();
        let total: f64 = micros.iter().sum();
        let min_us = micros.iter().copied().fold(f64::INFINITY, f64::min);
        let max_us = micros.iter().copied().fold(0.0, f64::max);
        Some(Self {
            started_at,
            batch_len,
            samples: micros.len(),
            avg_us: total / micros.len() as f64,
            min_us,
            max_us,
        })
    }

    pub fn per_record_us(&self) -> f64 {
        if self.batch_len == 0 {
            return 0.0;
        }
        self.avg_us / self.batch_len as f64
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "run started {}", self.started_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(f, "batch size  {} persons", self.batch_len)?;
        writeln!(f, "samples     {}", self.samples)?;
        writeln!(f, "avg         {:.3} us/op", self.avg_us)?;
        writeln!(f, "min         {:.3} us/op", self.min_us)?;
        writeln!(f, "max         {:.3} us/op", self.max_us)?;
        write!(f, "per record  {:.3} us", self.per_record_us())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary() {
        let samples = [
            Duration::from_micros(100),
            Duration::from_micros(300),
            Duration::from_micros(200),
        ];
        let report = Report::from_samples(Utc::now(), 10, &samples).unwrap();
        assert_eq!(report.samples, 3);
        assert!((report.avg_us - 200.0).abs() < 1e-6);
        assert!((report.min_us - 100.0).abs() < 1e-6);
        assert!((report.max_us - 300.0).abs() < 1e-6);
        assert!((report.per_record_us() - 20.0).abs() < 1e-6);
        assert!(report.to_string().contains("avg         200.000 us/op"));
    }

    #[test]
    fn no_samples() {
        assert!(Report::from_samples(Utc::now(), 10, &[]).is_none());
    }
}
