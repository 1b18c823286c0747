// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Statistics
//!
//! Counters are kept by the engine and incremented as it pushes, pops and
//! steps. The push/pop pairs let callers check that a completed run left
//! both stacks balanced.

use std::fmt;
use strum::EnumCount;
use strum_macros::{EnumCount as EnumCountMacro, EnumIter, IntoStaticStr};

#[derive(Debug, EnumCountMacro, EnumIter, IntoStaticStr, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Counters {
    /// Root configurations handed out by the policy.
    Nucleations,
    FramePushes,
    FramePops,
    OdometerPushes,
    OdometerPops,
    /// Recursion entries, each consulting the policy's step gate.
    StepAttempts,
    /// Recursion entries the step gate refused.
    StepRefusals,
    /// Odometers that could not be initialised.
    DeadEnds,
    WheelSteps,
    WheelSkips,
    Rollovers,
    /// Frames reported to the policy as solutions.
    Solutions,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Statistics {
    stats: [u64; Counters::COUNT],
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    /// Increment the specified counter by 1.
    pub(crate) fn increment_counter(&mut self, counter: Counters) {
        self.stats[counter as usize] += 1;
    }

    /// Get the current value of the specified counter.
    pub fn get(&self, counter: Counters) -> u64 {
        self.stats[counter as usize]
    }

    /// Net frame-stack depth implied by the push and pop counts.
    pub fn frame_balance(&self) -> i64 {
        self.get(Counters::FramePushes) as i64 - self.get(Counters::FramePops) as i64
    }

    /// Net odometer-stack depth implied by the push and pop counts.
    pub fn odometer_balance(&self) -> i64 {
        self.get(Counters::OdometerPushes) as i64 - self.get(Counters::OdometerPops) as i64
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use strum::IntoEnumIterator;
        let mut first = true;
        for counter in Counters::iter() {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            let name: &'static str = counter.into();
            write!(f, "{}={}", name, self.get(counter))?;
        }
        Ok(())
    }
}
