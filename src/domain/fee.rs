//! Tiered parking fee
//!
//! The first `grace_minutes` are billed at `base_rate`; every started
//! `block_minutes` block after that adds `block_rate`.

use chrono::{DateTime, Utc};

/// Whole minutes between two instants, truncated at the seconds level.
/// An exit stamped before the entry counts as zero minutes.
pub fn elapsed_minutes(entry_time: DateTime<Utc>, exit_time: DateTime<Utc>) -> i64 {
    (exit_time - entry_time).num_seconds().max(0) / 60
}

/// Fee in whole cents, for integer counters that must add up to the
/// stored totals.
pub fn fee_cents(fee: f64) -> u64 {
    (fee.max(0.0) * 100.0).round() as u64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeSchedule {
    pub base_rate: f64,
    pub block_rate: f64,
    pub grace_minutes: i64,
    pub block_minutes: i64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            base_rate: 20.0,
            block_rate: 10.0,
            grace_minutes: 30,
            block_minutes: 30,
        }
    }
}

impl FeeSchedule {
    pub fn fee(&self, entry_time: DateTime<Utc>, exit_time: DateTime<Utc>) -> f64 {
        self.fee_for_minutes(elapsed_minutes(entry_time, exit_time))
    }

    pub fn fee_for_minutes(&self, minutes: i64) -> f64 {
        if minutes <= self.grace_minutes {
            return self.base_rate;
        }
        let block = self.block_minutes.max(1);
        let extra_blocks = (minutes - self.grace_minutes + block - 1) / block;
        self.base_rate + extra_blocks as f64 * self.block_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn cents_keep_fractional_rates() {
        let fees = FeeSchedule {
            block_rate: 2.5,
            ..FeeSchedule::default()
        };
        let charged: Vec<f64> = [31, 61, 95].iter().map(|m| fees.fee_for_minutes(*m)).collect();
        assert_eq!(charged, vec![22.5, 25.0, 27.5]);

        let cents: u64 = charged.iter().map(|f| fee_cents(*f)).sum();
        let total: f64 = charged.iter().sum();
        assert_eq!(cents, 7500);
        assert_eq!(cents as f64 / 100.0, total);
        assert_eq!(fee_cents(0.1 + 0.2), 30);
    }

    #[test]
    fn grace_boundary_and_block_ceiling() {
        let fees = FeeSchedule::default();
        for (minutes, expected) in [
            (0, 20.0),
            (30, 20.0),
            (31, 30.0),
            (45, 30.0),
            (60, 30.0),
            (61, 40.0),
            (90, 40.0),
            (91, 50.0),
            (24 * 60, 20.0 + 47.0 * 10.0),
        ] {
            assert_eq!(fees.fee_for_minutes(minutes), expected, "{} minutes", minutes);
        }
    }

    #[test]
    fn elapsed_minutes_truncates_seconds() {
        let entry = Utc::now();
        assert_eq!(elapsed_minutes(entry, entry + Duration::seconds(59)), 0);
        assert_eq!(elapsed_minutes(entry, entry + Duration::seconds(119)), 1);
        assert_eq!(elapsed_minutes(entry, entry + Duration::minutes(45)), 45);
    }

    #[test]
    fn exit_before_entry_is_zero_minutes() {
        let entry = Utc::now();
        assert_eq!(elapsed_minutes(entry, entry - Duration::minutes(5)), 0);
        assert_eq!(FeeSchedule::default().fee(entry, entry - Duration::minutes(5)), 20.0);
    }

    #[test]
    fn thirty_minutes_and_a_few_seconds_stays_in_grace() {
        let entry = Utc::now();
        let exit = entry + Duration::seconds(30 * 60 + 59);
        assert_eq!(FeeSchedule::default().fee(entry, exit), 20.0);
    }

    #[test]
    fn custom_schedule() {
        let fees = FeeSchedule {
            base_rate: 5.0,
            block_rate: 2.5,
            grace_minutes: 15,
            block_minutes: 60,
        };
        assert_eq!(fees.fee_for_minutes(15), 5.0);
        assert_eq!(fees.fee_for_minutes(16), 7.5);
        assert_eq!(fees.fee_for_minutes(75), 7.5);
        assert_eq!(fees.fee_for_minutes(76), 10.0);
    }
}
