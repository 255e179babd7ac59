//! Transition curves: how an element travels from its hidden to its shown pose

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::spring::SpringConfig;

/// How progress evolves over time once an element starts moving
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transition {
    /// Damped spring, settles on its own
    Spring(SpringConfig),
    /// Fixed duration with an easing curve
    Timed {
        duration_ms: u64,
        #[serde(default)]
        easing: Easing,
    },
}

/// Progress of a transition at one instant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    /// Fraction of travel; springs may overshoot past 1
    pub value: f32,
    pub settled: bool,
}

impl Progress {
    pub const START: Progress = Progress {
        value: 0.0,
        settled: false,
    };
    pub const DONE: Progress = Progress {
        value: 1.0,
        settled: true,
    };
}

impl Transition {
    pub fn spring(config: SpringConfig) -> Self {
        Transition::Spring(config)
    }

    pub fn timed(duration_ms: u64, easing: Easing) -> Self {
        Transition::Timed {
            duration_ms,
            easing,
        }
    }

    /// Progress `elapsed_ms` after the transition started
    pub fn progress_at(&self, elapsed_ms: u64) -> Progress {
        match *self {
            Transition::Spring(config) => {
                let response = config.response(elapsed_ms as f32 / 1000.0);
                Progress {
                    value: response.position,
                    settled: response.settled,
                }
            }
            Transition::Timed {
                duration_ms,
                easing,
            } => {
                if elapsed_ms >= duration_ms {
                    return Progress::DONE;
                }
                Progress {
                    value: easing.apply(elapsed_ms as f32 / duration_ms as f32),
                    settled: false,
                }
            }
        }
    }
}

impl Default for Transition {
    fn default() -> Self {
        Transition::Spring(SpringConfig::entrance())
    }
}
