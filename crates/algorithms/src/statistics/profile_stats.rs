//! Per-polygon width statistics
//!
//! Summarises each polygon's width profile. Zero widths (probes that
//! missed the polygon) are part of the profile and are included.

use std::collections::HashMap;
use std::io::Write;
use swath_core::io::TableRow;
use swath_core::{PolygonId, WidthRecord};

/// Summary of one polygon's width profile
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileStats {
    pub polygon_id: PolygonId,
    pub samples: usize,
    /// Largest sampled distance
    pub total_length: f64,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    /// Samples with width 0
    pub zero_count: usize,
}

impl ProfileStats {
    /// Statistics of a non-empty set of records sharing one polygon id.
    fn from_records(polygon_id: PolygonId, records: &[&WidthRecord]) -> Self {
        let count = records.len();
        let mut widths: Vec<f64> = records.iter().map(|r| r.width).collect();

        let mean = widths.iter().sum::<f64>() / count as f64;
        let var = widths.iter().map(|w| (w - mean) * (w - mean)).sum::<f64>() / count as f64;

        widths.sort_by(f64::total_cmp);
        let median = if count % 2 == 0 {
            (widths[count / 2 - 1] + widths[count / 2]) / 2.0
        } else {
            widths[count / 2]
        };

        Self {
            polygon_id,
            samples: count,
            total_length: records.iter().map(|r| r.distance).fold(0.0, f64::max),
            mean,
            std_dev: var.sqrt(),
            min: widths[0],
            max: widths[count - 1],
            median,
            zero_count: records.iter().filter(|r| r.width == 0.0).count(),
        }
    }
}

/// Compute statistics for every polygon present in `records`.
///
/// Results follow the order in which each polygon first appears.
pub fn profile_statistics(records: &[WidthRecord]) -> Vec<ProfileStats> {
    let mut order: Vec<PolygonId> = Vec::new();
    let mut groups: HashMap<PolygonId, Vec<&WidthRecord>> = HashMap::new();

    for r in records {
        groups
            .entry(r.polygon_id)
            .or_insert_with(|| {
                order.push(r.polygon_id);
                Vec::new()
            })
            .push(r);
    }

    order
        .into_iter()
        .filter_map(|id| groups.get(&id).map(|g| ProfileStats::from_records(id, g)))
        .collect()
}

impl TableRow for ProfileStats {
    fn header() -> &'static str {
        "polygon_id,samples,total_length,mean,std_dev,min,max,median,zero_count"
    }

    fn write_row<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        write!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            self.polygon_id,
            self.samples,
            self.total_length,
            self.mean,
            self.std_dev,
            self.min,
            self.max,
            self.median,
            self.zero_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(polygon_id: PolygonId, distance: f64, width: f64) -> WidthRecord {
        WidthRecord { polygon_id, distance, width }
    }

    #[test]
    fn test_basic_stats() {
        let records = vec![
            rec(1, 0.0, 2.0),
            rec(1, 1.0, 4.0),
            rec(1, 2.0, 0.0),
            rec(1, 3.0, 6.0),
        ];
        let stats = profile_statistics(&records);
        assert_eq!(stats.len(), 1);

        let s = &stats[0];
        assert_eq!(s.samples, 4);
        assert!((s.mean - 3.0).abs() < 1e-10);
        assert!((s.std_dev - 5f64.sqrt()).abs() < 1e-10);
        assert_eq!(s.min, 0.0);
        assert_eq!(s.max, 6.0);
        assert!((s.median - 3.0).abs() < 1e-10);
        assert_eq!(s.zero_count, 1);
        assert_eq!(s.total_length, 3.0);
    }

    #[test]
    fn test_first_appearance_order() {
        let records = vec![rec(9, 0.0, 1.0), rec(2, 0.0, 1.0), rec(9, 1.0, 3.0)];
        let stats = profile_statistics(&records);
        let ids: Vec<PolygonId> = stats.iter().map(|s| s.polygon_id).collect();
        assert_eq!(ids, vec![9, 2]);
        assert_eq!(stats[0].samples, 2);
        assert!((stats[0].median - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty() {
        assert!(profile_statistics(&[]).is_empty());
    }

    #[test]
    fn test_row_format() {
        let s = profile_statistics(&[rec(5, 0.0, 1.5)]).remove(0);
        let mut buf = Vec::new();
        s.write_row(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "5,1,0,1.5,0,1.5,1.5,1.5,0");
    }
}
