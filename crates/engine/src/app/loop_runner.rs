use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::input::InputSnapshot;
use super::metrics::{MetricsAccumulator, MetricsHandle};

/// The two fixed cadences of the simulation: a movement/AI/combat tick and a
/// slower animation-frame tick, interleaved on one thread. Defaults match
/// the original cadence (30 updates and 8 animation frames per second).
#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub update_period: Duration,
    pub animate_period: Duration,
    pub max_frame_delta: Duration,
    pub max_updates_per_frame: u32,
    pub max_animates_per_frame: u32,
    pub metrics_log_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            update_period: Duration::from_secs(1) / 30,
            animate_period: Duration::from_secs(1) / 8,
            max_frame_delta: Duration::from_millis(250),
            max_updates_per_frame: 5,
            max_animates_per_frame: 2,
            metrics_log_interval: Duration::from_secs(1),
        }
    }
}

/// One simulated world driven by the loop. Every callback runs to completion
/// before the loop proceeds; there is no concurrent mutation to guard
/// against.
pub trait Simulation {
    /// One fixed-period simulation tick: movement, AI, collision, combat.
    fn update(&mut self, input: &InputSnapshot);
    /// One fixed-period animation tick: advance sprite frames.
    fn animate(&mut self);
    /// When true the loop stops after the current pass.
    fn is_over(&self) -> bool;
}

/// Supplies the per-tick input snapshot (the UI collaborator's side of the
/// §6-style contract).
pub trait InputSource {
    fn poll(&mut self) -> InputSnapshot;
}

/// Input source for headless or scripted runs: nothing is ever pressed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullInputSource;

impl InputSource for NullInputSource {
    fn poll(&mut self) -> InputSnapshot {
        InputSnapshot::empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    QuitRequested,
    SimulationOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StepPlan {
    pub(crate) steps_to_run: u32,
    pub(crate) remaining_accumulator: Duration,
    pub(crate) dropped_backlog: Duration,
}

/// How many fixed steps fit in the accumulated time, capped at `max_steps`;
/// backlog beyond the cap is dropped so a stall cannot snowball.
pub(crate) fn plan_fixed_steps(
    accumulator: Duration,
    period: Duration,
    max_steps: u32,
) -> StepPlan {
    let mut steps: u32 = 0;
    let mut remaining = accumulator;
    while remaining >= period && steps < max_steps {
        remaining = remaining.saturating_sub(period);
        steps = steps.saturating_add(1);
    }

    let mut dropped = Duration::ZERO;
    while remaining >= period {
        remaining = remaining.saturating_sub(period);
        dropped = dropped.saturating_add(period);
    }

    StepPlan {
        steps_to_run: steps,
        remaining_accumulator: remaining,
        dropped_backlog: dropped,
    }
}

pub(crate) fn clamp_frame_delta(raw: Duration, max_frame_delta: Duration) -> Duration {
    raw.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

pub fn run_loop(
    config: LoopConfig,
    simulation: &mut dyn Simulation,
    input: &mut dyn InputSource,
) -> LoopExit {
    run_loop_with_metrics(config, simulation, input, MetricsHandle::default())
}

/// Cooperative two-cadence scheduler. Pausing is the caller stopping this
/// loop and calling it again later; every tick ran to completion, so there
/// is no in-flight work to drain.
pub fn run_loop_with_metrics(
    config: LoopConfig,
    simulation: &mut dyn Simulation,
    input: &mut dyn InputSource,
    metrics_handle: MetricsHandle,
) -> LoopExit {
    let defaults = LoopConfig::default();
    let update_period = normalize_non_zero_duration(config.update_period, defaults.update_period);
    let animate_period =
        normalize_non_zero_duration(config.animate_period, defaults.animate_period);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, defaults.max_frame_delta);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, defaults.metrics_log_interval);
    let max_updates_per_frame = config.max_updates_per_frame.max(1);
    let max_animates_per_frame = config.max_animates_per_frame.max(1);

    info!(
        update_period_ms = update_period.as_millis() as u64,
        animate_period_ms = animate_period.as_millis() as u64,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_updates_per_frame,
        max_animates_per_frame,
        "loop_config"
    );

    let mut update_accumulator = Duration::ZERO;
    let mut animate_accumulator = Duration::ZERO;
    let mut last_pass_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);

    loop {
        if simulation.is_over() {
            info!(reason = "simulation_over", "loop_stopped");
            return LoopExit::SimulationOver;
        }

        let now = Instant::now();
        let raw_delta = now.saturating_duration_since(last_pass_instant);
        last_pass_instant = now;
        let delta = clamp_frame_delta(raw_delta, max_frame_delta);
        update_accumulator = update_accumulator.saturating_add(delta);
        animate_accumulator = animate_accumulator.saturating_add(delta);

        let update_plan = plan_fixed_steps(update_accumulator, update_period, max_updates_per_frame);
        for _ in 0..update_plan.steps_to_run {
            let snapshot = input.poll();
            if snapshot.quit_requested() {
                info!(reason = "quit_requested", "loop_stopped");
                return LoopExit::QuitRequested;
            }
            simulation.update(&snapshot);
            metrics_accumulator.record_update();
        }
        update_accumulator = update_plan.remaining_accumulator;
        if update_plan.dropped_backlog > Duration::ZERO {
            warn!(
                dropped_backlog_ms = update_plan.dropped_backlog.as_millis() as u64,
                max_updates_per_frame, "update_clamp_triggered"
            );
        }

        let animate_plan =
            plan_fixed_steps(animate_accumulator, animate_period, max_animates_per_frame);
        for _ in 0..animate_plan.steps_to_run {
            simulation.animate();
            metrics_accumulator.record_animate();
        }
        animate_accumulator = animate_plan.remaining_accumulator;
        if animate_plan.dropped_backlog > Duration::ZERO {
            warn!(
                dropped_backlog_ms = animate_plan.dropped_backlog.as_millis() as u64,
                max_animates_per_frame, "animate_clamp_triggered"
            );
        }

        if let Some(snapshot) = metrics_accumulator.maybe_snapshot(Instant::now()) {
            info!(
                updates_per_second = snapshot.updates_per_second,
                animates_per_second = snapshot.animates_per_second,
                "loop_metrics"
            );
            metrics_handle.publish(snapshot);
        }

        let until_update = update_period.saturating_sub(update_accumulator);
        let until_animate = animate_period.saturating_sub(animate_accumulator);
        let sleep_for = until_update.min(until_animate);
        if sleep_for > Duration::ZERO {
            thread::sleep(sleep_for);
        }
    }
}
