//! Morph/blend controllers.
//!
//! Two ways of choosing `(current, next, blend)`: a repeating timed cycle
//! driven purely by elapsed time, and a step-driven variant whose target is
//! set by an external section observer.

use serde::{Deserialize, Serialize};

use crate::math::ease;

/// Controller output for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MorphState {
    pub current: usize,
    pub next: usize,
    /// 0 shows `current` exactly, 1 shows `next` exactly.
    pub blend: f32,
}

impl MorphState {
    pub fn resting(index: usize) -> Self {
        Self {
            current: index,
            next: index,
            blend: 0.0,
        }
    }

    /// Whether a slot accepted by `matches` is on screen enough to count as
    /// showing: it is current, or incoming past `threshold`.
    pub fn is_showing(&self, threshold: f32, matches: impl Fn(usize) -> bool) -> bool {
        matches(self.current) || (matches(self.next) && self.blend > threshold)
    }
}

/// Position inside the repeating cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CycleSlot {
    pub current: usize,
    pub next: usize,
    /// Seconds since the slot started.
    pub elapsed: f32,
    /// Full length of the slot.
    pub duration: f32,
}

/// Smoothstep blend over the trailing `transition` seconds of a slot.
///
/// 0 throughout the hold, exactly 1 at `elapsed == duration`. A slot shorter
/// than the transition has a negative hold and starts part-way through the
/// blend.
pub fn transition_blend(elapsed: f32, duration: f32, transition: f32) -> f32 {
    if elapsed >= duration {
        return 1.0;
    }
    if transition <= 0.0 {
        return 0.0;
    }
    let hold = duration - transition;
    if elapsed <= hold {
        return 0.0;
    }
    ease(((elapsed - hold) / transition).clamp(0.0, 1.0))
}

/// Timer-driven cycle: a short intro hold for the first shape on the first
/// pass, then uniform holds, each ending in a blend to the next shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MorphCycle {
    pub shape_count: usize,
    pub hold: f32,
    pub transition: f32,
    pub intro: f32,
}

impl MorphCycle {
    pub fn new(shape_count: usize, hold: f32, transition: f32) -> Self {
        Self {
            shape_count,
            hold,
            transition,
            intro: hold,
        }
    }

    pub fn with_intro(mut self, intro: f32) -> Self {
        self.intro = intro;
        self
    }

    pub fn first_pass_length(&self) -> f32 {
        self.intro + self.shape_count.saturating_sub(1) as f32 * self.hold
    }

    pub fn pass_length(&self) -> f32 {
        self.shape_count as f32 * self.hold
    }

    /// Locate `time` (seconds since start) within the cycle.
    pub fn slot(&self, time: f32) -> CycleSlot {
        let n = self.shape_count.max(1);
        let time = time.max(0.0);
        let first = self.first_pass_length();

        let (current, elapsed, duration) = if time < self.intro {
            (0, time, self.intro)
        } else if time < first {
            let rem = time - self.intro;
            let current = (1 + (rem / self.hold) as usize).min(n - 1);
            (current, rem % self.hold, self.hold)
        } else {
            let rem = (time - first) % self.pass_length();
            let current = (rem / self.hold) as usize % n;
            (current, rem % self.hold, self.hold)
        };

        CycleSlot {
            current,
            next: (current + 1) % n,
            elapsed,
            duration,
        }
    }

    pub fn state(&self, time: f32) -> MorphState {
        let slot = self.slot(time);
        if slot.current == slot.next {
            return MorphState::resting(slot.current);
        }
        MorphState {
            current: slot.current,
            next: slot.next,
            blend: transition_blend(slot.elapsed, slot.duration, self.transition),
        }
    }
}

/// Step-driven morph: an observer names the target step, and each advance
/// moves a fixed amount toward it.
///
/// The step is per call, not per second, so perceived speed follows the
/// host's frame rate.
#[derive(Clone, Debug, PartialEq)]
pub struct StepMorph {
    shape_count: usize,
    active: usize,
    target: usize,
    /// Step being blended toward; equals `active` when idle.
    incoming: usize,
    progress: f32,
    step: f32,
}

impl StepMorph {
    pub fn new(shape_count: usize, initial: usize, step: f32) -> Self {
        let initial = initial.min(shape_count.saturating_sub(1));
        Self {
            shape_count,
            active: initial,
            target: initial,
            incoming: initial,
            progress: 0.0,
            step,
        }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Point the morph at `index`. Later calls in the same frame win.
    /// Returns `false` and leaves the target untouched when out of range.
    pub fn set_target(&mut self, index: usize) -> bool {
        if index >= self.shape_count {
            log::warn!(
                "ignoring step {} for a {}-shape sequence",
                index,
                self.shape_count
            );
            return false;
        }
        if index != self.target {
            log::info!("morph target {} -> {}", self.target, index);
        }
        self.target = index;
        true
    }

    pub fn advance(&mut self) -> MorphState {
        if self.progress > 0.0 && self.incoming != self.target {
            // Target moved mid-blend: unwind to the active step before
            // heading anywhere else
            self.progress = (self.progress - self.step).max(0.0);
            if self.progress == 0.0 {
                self.incoming = self.active;
            }
        } else if self.active != self.target {
            self.incoming = self.target;
            self.progress = (self.progress + self.step).min(1.0);
            if self.progress >= 1.0 {
                self.active = self.target;
                self.incoming = self.target;
                self.progress = 0.0;
            }
        }
        self.state()
    }

    pub fn state(&self) -> MorphState {
        MorphState {
            current: self.active,
            next: self.incoming,
            blend: ease(self.progress),
        }
    }
}

/// Either controller behind one `advance` call.
#[derive(Clone, Debug, PartialEq)]
pub enum MorphController {
    Timed(MorphCycle),
    Stepped(StepMorph),
}

impl MorphController {
    pub fn advance(&mut self, time: f32) -> MorphState {
        match self {
            MorphController::Timed(cycle) => cycle.state(time),
            MorphController::Stepped(steps) => steps.advance(),
        }
    }

    /// Route an external section signal. Timed controllers ignore it.
    pub fn set_target(&mut self, index: usize) -> bool {
        match self {
            MorphController::Timed(_) => false,
            MorphController::Stepped(steps) => steps.set_target(index),
        }
    }
}
