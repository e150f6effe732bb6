use serde::{Deserialize, Serialize};

/// Inclusive stepped interval of bet values.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

impl Interval {
    /// `None` when the borders are inverted or the step is zero.
    pub fn new(min: u32, max: u32, step: u32) -> Option<Self> {
        if step == 0 || min > max {
            return None;
        }
        Some(Self { min, max, step })
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value) && value % self.step == 0
    }

    pub fn is_single(&self) -> bool {
        self.min == self.max
    }

    /// Same interval with the lower border lifted to at least `floor`,
    /// rounded up to the step.
    pub fn lifted(&self, floor: u32) -> Option<Self> {
        let min = self.min.max(floor);
        let min = min.div_ceil(self.step) * self.step;
        Interval::new(min, self.max, self.step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_respects_step_and_borders() {
        let i = Interval::new(10, 100, 5).unwrap();
        assert!(i.contains(10));
        assert!(i.contains(55));
        assert!(!i.contains(57));
        assert!(!i.contains(105));
        assert!(!i.contains(5));
    }

    #[test]
    fn lifting_past_max_is_empty() {
        let i = Interval::new(0, 4, 5).unwrap();
        assert_eq!(i.lifted(5), None);
        let i = Interval::new(0, 20, 5).unwrap();
        assert_eq!(i.lifted(5), Interval::new(5, 20, 5));
    }
}
