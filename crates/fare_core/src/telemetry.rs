//! Run telemetry: counters collected while folding a ping stream.

use serde::Serialize;

use crate::accumulator::FareEstimate;
use crate::segment::{Segment, SegmentRejection};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunTelemetry {
    pub pings_read: u64,
    pub rides_emitted: u64,
    pub segments_accepted: u64,
    pub rejected_non_positive_duration: u64,
    pub rejected_implausible_speed: u64,
    pub rejected_unrepresentable_duration: u64,
    pub rides_at_minimum_fare: u64,
    pub total_fare: f64,
}

impl RunTelemetry {
    pub(crate) fn record_ping(&mut self) {
        self.pings_read += 1;
    }

    pub(crate) fn record_segment(&mut self, outcome: &Result<Segment, SegmentRejection>) {
        match outcome {
            Ok(_) => self.segments_accepted += 1,
            Err(SegmentRejection::NonPositiveDuration { .. }) => {
                self.rejected_non_positive_duration += 1
            }
            Err(SegmentRejection::ImplausibleSpeed { .. }) => self.rejected_implausible_speed += 1,
            Err(SegmentRejection::UnrepresentableDuration) => {
                self.rejected_unrepresentable_duration += 1
            }
        }
    }

    pub(crate) fn record_ride(&mut self, estimate: &FareEstimate) {
        self.rides_emitted += 1;
        self.total_fare += estimate.fare;
        if estimate.breakdown.minimum_applied {
            self.rides_at_minimum_fare += 1;
        }
    }

    pub fn segments_rejected(&self) -> u64 {
        self.rejected_non_positive_duration
            + self.rejected_implausible_speed
            + self.rejected_unrepresentable_duration
    }

    /// Share of candidate segments that survived the filters.
    pub fn acceptance_rate(&self) -> f64 {
        let candidates = self.segments_accepted + self.segments_rejected();
        if candidates == 0 {
            return 1.0;
        }
        self.segments_accepted as f64 / candidates as f64
    }
}
