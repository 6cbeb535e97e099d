use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// How many particles a spawn request creates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnMode {
    /// One particle under the pointer.
    #[default]
    Single,
    /// A scattered cluster of particles around the point under the pointer.
    Burst,
}

/// Abstract input event, already translated from platform pointer, touch and wheel events.
///
/// Screen coordinates are in pixels from the top-left corner of the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum InputEvent {
    /// Spawns particles under a screen position.
    SpawnAt {
        /// Horizontal screen position.
        x: f64,
        /// Vertical screen position.
        y: f64,
        /// One particle or a burst.
        mode: SpawnMode,
    },
    /// Starts an orbit drag.
    BeginOrbit,
    /// Starts a pan drag.
    BeginPan,
    /// Ends the current drag.
    EndDrag,
    /// Pointer motion during an orbit drag.
    OrbitDelta {
        /// Horizontal motion, in pixels.
        dx: f64,
        /// Vertical motion, in pixels.
        dy: f64,
    },
    /// Pointer motion during a pan drag.
    PanDelta {
        /// Horizontal motion, in pixels.
        dx: f64,
        /// Vertical motion, in pixels.
        dy: f64,
    },
    /// Wheel or pinch motion.
    ZoomDelta {
        /// Change of orbit distance. Positive values move the camera away.
        delta: f64,
    },
    /// The drawing surface changed size.
    Resize {
        /// New width, in pixels.
        width: f64,
        /// New height, in pixels.
        height: f64,
    },
    /// Sets the simulation speed multiplier.
    SetSpeed {
        /// Multiplier of the base timestep, clamped to the supported range.
        speed: f64,
    },
    /// Sets the radius of particles spawned from now on.
    SetSize {
        /// Strictly positive radius. Mass follows from it.
        radius: f64,
    },
    /// Removes every particle.
    Clear,
}

/// First-in first-out queue of [`InputEvent`]s, filled by event handlers and drained once per
/// frame.
#[derive(Clone, Debug, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    /// Creates a new empty [`InputQueue`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an event behind every event already queued.
    #[inline]
    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Returns the number of queued events.
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if no event is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Removes and returns every queued event, in arrival order.
    #[inline]
    pub fn drain(&mut self) -> std::collections::vec_deque::Drain<'_, InputEvent> {
        self.events.drain(..)
    }
}

impl Extend<InputEvent> for InputQueue {
    #[inline]
    fn extend<I: IntoIterator<Item = InputEvent>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}

impl FromIterator<InputEvent> for InputQueue {
    #[inline]
    fn from_iter<I: IntoIterator<Item = InputEvent>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_arrival_order() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::BeginOrbit);
        queue.extend([
            InputEvent::OrbitDelta { dx: 1.0, dy: 2.0 },
            InputEvent::EndDrag,
        ]);

        assert_eq!(queue.len(), 3);
        assert_eq!(
            queue.drain().collect::<Vec<_>>(),
            [
                InputEvent::BeginOrbit,
                InputEvent::OrbitDelta { dx: 1.0, dy: 2.0 },
                InputEvent::EndDrag,
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn events_deserialize_from_yaml() {
        let events: Vec<InputEvent> = serde_yaml::from_str(
            "
- event: resize
  width: 1024
  height: 768
- event: spawn_at
  x: 10
  y: 20
  mode: burst
- event: set_size
  radius: 20
- event: clear
",
        )
        .unwrap();

        assert_eq!(
            events,
            [
                InputEvent::Resize {
                    width: 1024.0,
                    height: 768.0
                },
                InputEvent::SpawnAt {
                    x: 10.0,
                    y: 20.0,
                    mode: SpawnMode::Burst
                },
                InputEvent::SetSize { radius: 20.0 },
                InputEvent::Clear,
            ]
        );
    }
}
