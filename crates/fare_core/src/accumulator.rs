//! Ride accumulation: folds an ordered ping stream into one fare per ride.
//!
//! A ride is a maximal run of consecutive pings sharing a ride id. The
//! accumulator keeps the ride in progress and emits its [`FareEstimate`] as
//! soon as a ping with another id arrives, or when the stream ends.

use std::convert::Infallible;
use std::mem;

use log::debug;
use serde::Serialize;

use crate::config::EstimatorConfig;
use crate::ping::Ping;
use crate::pricing::{ride_fare_breakdown, FareBreakdown};
use crate::segment::{build_segment, Segment};
use crate::spatial::DistanceProvider;
use crate::telemetry::RunTelemetry;

/// Estimated fare for one completed ride.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareEstimate {
    pub ride_id: i64,
    pub fare: f64,
    pub ping_count: usize,
    pub segment_count: usize,
    pub rejected_segments: usize,
    /// Epoch seconds of the first and last ping of the ride.
    pub started_at: i64,
    pub ended_at: i64,
    pub breakdown: FareBreakdown,
}

impl FareEstimate {
    /// Fare rendered with four fractional digits, as written to output files.
    pub fn fare_text(&self) -> String {
        format!("{:.4}", self.fare)
    }
}

#[derive(Debug, Clone)]
struct RideInProgress {
    ride_id: i64,
    previous: Ping,
    started_at: i64,
    ping_count: usize,
    segments: Vec<Segment>,
    rejected: usize,
}

impl RideInProgress {
    fn start(ping: Ping) -> Self {
        Self {
            ride_id: ping.ride_id,
            previous: ping,
            started_at: ping.timestamp_secs,
            ping_count: 1,
            segments: Vec::new(),
            rejected: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
enum RideState {
    #[default]
    Empty,
    InRide(RideInProgress),
}

/// Driving state machine of the estimator.
///
/// Rejected segments drop the segment, not the ping: the rejected pair's
/// later ping still becomes `previous` for the next comparison.
pub struct RideAccumulator<D> {
    distance: D,
    config: EstimatorConfig,
    state: RideState,
    telemetry: RunTelemetry,
}

impl<D: DistanceProvider> RideAccumulator<D> {
    pub fn new(distance: D, config: EstimatorConfig) -> Self {
        Self {
            distance,
            config,
            state: RideState::Empty,
            telemetry: RunTelemetry::default(),
        }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn telemetry(&self) -> &RunTelemetry {
        &self.telemetry
    }

    /// Id of the ride currently being accumulated.
    pub fn current_ride_id(&self) -> Option<i64> {
        match &self.state {
            RideState::Empty => None,
            RideState::InRide(ride) => Some(ride.ride_id),
        }
    }

    /// Feed the next ping. Returns the previous ride's estimate when `ping`
    /// starts a new ride.
    pub fn push(&mut self, ping: Ping) -> Option<FareEstimate> {
        self.telemetry.record_ping();

        let same_ride = matches!(&self.state, RideState::InRide(ride) if ride.ride_id == ping.ride_id);
        if !same_ride {
            let finished = self.close_ride();
            self.state = RideState::InRide(RideInProgress::start(ping));
            return finished;
        }

        if let RideState::InRide(ride) = &mut self.state {
            let outcome = build_segment(&ride.previous, &ping, &self.distance, &self.config.filter);
            self.telemetry.record_segment(&outcome);
            match outcome {
                Ok(segment) => ride.segments.push(segment),
                Err(rejection) => {
                    debug!(
                        "ride {}: dropped segment ending at {}: {}",
                        ride.ride_id, ping.timestamp_secs, rejection
                    );
                    ride.rejected += 1;
                }
            }
            ride.previous = ping;
            ride.ping_count += 1;
        }
        None
    }

    /// Flush the ride in progress, if any. The accumulator is empty afterwards.
    pub fn finish(&mut self) -> Option<FareEstimate> {
        self.close_ride()
    }

    fn close_ride(&mut self) -> Option<FareEstimate> {
        let RideState::InRide(ride) = mem::take(&mut self.state) else {
            return None;
        };

        let breakdown =
            ride_fare_breakdown(&ride.segments, &self.config.tariff, &self.config.timezone);
        let estimate = FareEstimate {
            ride_id: ride.ride_id,
            fare: breakdown.total,
            ping_count: ride.ping_count,
            segment_count: ride.segments.len(),
            rejected_segments: ride.rejected,
            started_at: ride.started_at,
            ended_at: ride.previous.timestamp_secs,
            breakdown,
        };
        debug!(
            "ride {} closed: {} segments, {} rejected, fare {}",
            estimate.ride_id,
            estimate.segment_count,
            estimate.rejected_segments,
            estimate.fare_text()
        );
        self.telemetry.record_ride(&estimate);
        Some(estimate)
    }
}

/// Iterator adapter yielding one estimate per ride from a fallible ping
/// stream. The first error is yielded once and ends the iteration.
pub struct FareEstimates<I, D> {
    pings: I,
    accumulator: RideAccumulator<D>,
    done: bool,
}

impl<I, D: DistanceProvider> FareEstimates<I, D> {
    pub fn new(pings: I, distance: D, config: EstimatorConfig) -> Self {
        Self {
            pings,
            accumulator: RideAccumulator::new(distance, config),
            done: false,
        }
    }

    pub fn telemetry(&self) -> &RunTelemetry {
        self.accumulator.telemetry()
    }
}

impl<I, D, E> Iterator for FareEstimates<I, D>
where
    I: Iterator<Item = Result<Ping, E>>,
    D: DistanceProvider,
{
    type Item = Result<FareEstimate, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for item in self.pings.by_ref() {
            match item {
                Ok(ping) => {
                    if let Some(estimate) = self.accumulator.push(ping) {
                        return Some(Ok(estimate));
                    }
                }
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
        self.done = true;
        self.accumulator.finish().map(Ok)
    }
}

/// Estimate every ride of a fallible ping stream, stopping at the first error.
pub fn estimate_fares<P, D, E>(
    pings: P,
    distance: D,
    config: EstimatorConfig,
) -> Result<Vec<FareEstimate>, E>
where
    P: IntoIterator<Item = Result<Ping, E>>,
    D: DistanceProvider,
{
    FareEstimates::new(pings.into_iter(), distance, config).collect()
}

/// Estimate every ride of an already-parsed ping sequence.
pub fn estimate_ride_fares<P, D>(pings: P, distance: D, config: EstimatorConfig) -> Vec<FareEstimate>
where
    P: IntoIterator<Item = Ping>,
    D: DistanceProvider,
{
    let parsed = pings.into_iter().map(Ok::<Ping, Infallible>);
    match estimate_fares(parsed, distance, config) {
        Ok(estimates) => estimates,
        Err(never) => match never {},
    }
}
