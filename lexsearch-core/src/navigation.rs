use serde::{Deserialize, Serialize};

/// A cursor movement requested by the participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Navigation {
    StepLeft,
    StepRight,
    /// Absolute jump, e.g. a click on the scroll bar. May be out of range.
    JumpTo(i64),
}

impl Navigation {
    /// Index this navigation asks for, before any clamping.
    pub fn requested_index(&self, cursor: usize) -> i64 {
        match *self {
            Navigation::StepLeft => cursor as i64 - 1,
            Navigation::StepRight => cursor as i64 + 1,
            Navigation::JumpTo(index) => index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Direction of travel from `from` to `to`, `None` when they are equal.
    ///
    /// `to` may lie outside the list, so a push past either end still has a
    /// direction.
    pub fn between(from: i64, to: i64) -> Option<Self> {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Some(Direction::Right),
            std::cmp::Ordering::Less => Some(Direction::Left),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_resolve_relative_to_cursor() {
        assert_eq!(Navigation::StepLeft.requested_index(0), -1);
        assert_eq!(Navigation::StepRight.requested_index(4), 5);
        assert_eq!(Navigation::JumpTo(17).requested_index(4), 17);
    }

    #[test]
    fn direction_between_positions() {
        assert_eq!(Direction::between(3, 4), Some(Direction::Right));
        assert_eq!(Direction::between(3, 0), Some(Direction::Left));
        assert_eq!(Direction::between(3, 3), None);
        assert_eq!(Direction::between(0, -1), Some(Direction::Left));
    }
}
