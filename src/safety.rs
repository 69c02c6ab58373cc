//! Per-pulse safety monitor and free-motion anomaly detector.
//!
//! Every counted chain pulse is run through [`PULSE_RULES`] top to bottom;
//! the first rule that matches decides the outcome and the rest are not
//! evaluated for that pulse.
//!
//! | # | Rule        | Condition                                   | Outcome            |
//! |---|-------------|---------------------------------------------|--------------------|
//! | 1 | `MinStop`   | going-up live and counter <= min_stop       | Up relay off, Off  |
//! | 2 | `MaxDeploy` | going-down live and counter >= max_deploy   | Up relay off, Off  |
//! | 3 | `FreeFall`  | direction Down, going-down not live         | status `freeFall`  |
//! | 4 | `FreeUp`    | direction Up, going-up not live             | status `freeUp`    |
//!
//! Rule 2 releases the **Up** relay even though the windlass is paying out.
//! This matches the behaviour of the fielded controller and is kept until
//! the product owner decides otherwise; see [`SafetyStop::relay`].

use core::fmt;

use crate::control::{Direction, Relay, SafetyBounds, SensorLevels, WindlassStatus};

/// Everything a rule may look at, captured right after the counter step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseContext {
    pub counter: i32,
    pub direction: Direction,
    pub sensors: SensorLevels,
}

/// A counter bound that forced the windlass to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyStop {
    /// Chain fully recovered (counter at or below `min_stop`).
    MinStop,
    /// Maximum deployment reached (counter at or above `max_deploy`).
    MaxDeploy,
}

impl SafetyStop {
    /// Relay forced off by this stop.
    ///
    /// Both bounds release the up relay; for `MaxDeploy` this is the
    /// fielded behaviour, not the down relay one might expect.
    pub const fn relay(self) -> Relay {
        Relay::Up
    }
}

impl fmt::Display for SafetyStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MinStop => write!(f, "safety stop reached"),
            Self::MaxDeploy => write!(f, "maximum chain length reached"),
        }
    }
}

/// Outcome of the first matching rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Force a relay off and publish `Off`.
    Stop(SafetyStop),
    /// Publish an anomaly status; relays untouched.
    Anomaly(WindlassStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseRule {
    MinStop,
    MaxDeploy,
    FreeFall,
    FreeUp,
}

/// Evaluation order.  Safety rules strictly precede anomaly rules.
pub const PULSE_RULES: [PulseRule; 4] = [
    PulseRule::MinStop,
    PulseRule::MaxDeploy,
    PulseRule::FreeFall,
    PulseRule::FreeUp,
];

impl PulseRule {
    pub fn check(self, ctx: &PulseContext, bounds: &SafetyBounds) -> Option<Verdict> {
        let fired = match self {
            Self::MinStop => ctx.sensors.going_up && ctx.counter <= bounds.min_stop,
            Self::MaxDeploy => ctx.sensors.going_down && ctx.counter >= bounds.max_deploy,
            Self::FreeFall => ctx.direction == Direction::Down && !ctx.sensors.going_down,
            Self::FreeUp => ctx.direction == Direction::Up && !ctx.sensors.going_up,
        };
        fired.then_some(self.verdict())
    }

    const fn verdict(self) -> Verdict {
        match self {
            Self::MinStop => Verdict::Stop(SafetyStop::MinStop),
            Self::MaxDeploy => Verdict::Stop(SafetyStop::MaxDeploy),
            Self::FreeFall => Verdict::Anomaly(WindlassStatus::FreeFall),
            Self::FreeUp => Verdict::Anomaly(WindlassStatus::FreeUp),
        }
    }
}

/// Run the ordered rule list; first match wins.
pub fn evaluate(ctx: &PulseContext, bounds: &SafetyBounds) -> Option<Verdict> {
    PULSE_RULES.iter().find_map(|rule| rule.check(ctx, bounds))
}
