//! Storage introspection for a sparse row array.
//!
//! [`StoreStats`] is a point-in-time snapshot of buffer occupancy plus the
//! allocator's cumulative operation counters, for telemetry, tuning the
//! pad unit, and deciding when a purge is worthwhile.

/// Occupancy and operation counts for a single store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of rows, absent ones included.
    pub rows: usize,
    /// Occupied data length in slots (live content plus slack).
    pub data_len: usize,
    /// Allocated data buffer capacity in slots.
    pub data_capacity: usize,
    /// Allocated index/length table capacity in entries.
    pub row_capacity: usize,
    /// Slots holding row content.
    pub live_slots: usize,
    /// Occupied slots not holding row content.
    pub slack_slots: usize,
    /// Memory usage of all three buffers in bytes.
    pub memory_bytes: usize,
    /// Cumulative row stretches.
    pub stretches: u64,
    /// Cumulative mid-container row insertions.
    pub row_gaps_opened: u64,
    /// Cumulative mid-container row removals.
    pub row_gaps_closed: u64,
    /// Cumulative purges.
    pub purges: u64,
    /// Cumulative slots reclaimed by purges.
    pub reclaimed_slots: u64,
    /// Cumulative buffer reallocations.
    pub buffer_growths: u64,
}

impl StoreStats {
    /// Fraction of the occupied data that is slack, in `[0, 1]`.
    ///
    /// Zero for an empty buffer.
    pub fn slack_ratio(&self) -> f64 {
        if self.data_len == 0 {
            return 0.0;
        }
        self.slack_slots as f64 / self.data_len as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_zero() {
        let s = StoreStats::default();
        assert_eq!(s.rows, 0);
        assert_eq!(s.data_len, 0);
        assert_eq!(s.stretches, 0);
        assert_eq!(s.slack_ratio(), 0.0);
    }

    #[test]
    fn slack_ratio_of_half_empty_buffer() {
        let s = StoreStats {
            data_len: 32,
            live_slots: 16,
            slack_slots: 16,
            ..StoreStats::default()
        };
        assert_eq!(s.slack_ratio(), 0.5);
    }
}
