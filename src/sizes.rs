//! Size-space enumeration.
//!
//! A [`SizeSpace`] is an ordered list of [`SizeStrategy`] entries. Each
//! strategy owns one [`Axis`] (an ordered list of pixel lengths) and crosses
//! it with itself, row-major: the outer loop walks widths, the inner loop
//! walks heights, both in the axis' declared order.
//!
//! ```text
//! power-of-two    1, 2, 4, … 2048                 → 12 × 12 = 144 pairs
//! round-numbers   10, 20, … 250, 300, 400, … 1000 → 33 × 33 = 1089 pairs
//! ```
//!
//! Strategies are concatenated, never merged: a size that appears in two
//! strategies is produced twice. Everything here is lazy and restartable:
//! iterating a space twice yields the same sequence, and no pair list is
//! materialized up front.

use serde::Serialize;

/// Pixel dimensions of one placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Inclusive stepped range: `start, start + step, …` while `<= end`.
///
/// A zero step yields nothing. Stops cleanly instead of wrapping when the
/// next value would overflow `u32`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRange {
    next: Option<u32>,
    end: u32,
    step: u32,
}

impl StepRange {
    pub fn new(start: u32, end: u32, step: u32) -> Self {
        let next = (step > 0 && start <= end).then_some(start);
        Self { next, end, step }
    }
}

impl Iterator for StepRange {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let current = self.next?;
        self.next = current
            .checked_add(self.step)
            .filter(|&following| following <= self.end);
        Some(current)
    }
}

/// One contiguous piece of an axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxisSegment {
    /// Explicit values, emitted as declared.
    Values(Vec<u32>),
    /// `start..=end` by `step`.
    Range { start: u32, end: u32, step: u32 },
}

impl AxisSegment {
    /// Number of values, computed without walking a range.
    pub fn len(&self) -> usize {
        match self {
            AxisSegment::Values(values) => values.len(),
            AxisSegment::Range { start, end, step } => {
                if *step == 0 || start > end {
                    0
                } else {
                    usize::try_from((end - start) / step)
                        .map_or(usize::MAX, |n| n.saturating_add(1))
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> SegmentIter<'_> {
        match self {
            AxisSegment::Values(values) => SegmentIter::Values(values.iter()),
            AxisSegment::Range { start, end, step } => {
                SegmentIter::Range(StepRange::new(*start, *end, *step))
            }
        }
    }
}

#[derive(Clone)]
enum SegmentIter<'a> {
    Values(std::slice::Iter<'a, u32>),
    Range(StepRange),
}

impl Iterator for SegmentIter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        match self {
            SegmentIter::Values(values) => values.next().copied(),
            SegmentIter::Range(range) => range.next(),
        }
    }
}

/// Ordered pixel lengths used for both the width and height of a strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Axis {
    segments: Vec<AxisSegment>,
}

impl Axis {
    pub fn new(segments: Vec<AxisSegment>) -> Self {
        Self { segments }
    }

    /// `1, 2, 4, … 2^max_exponent`.
    pub fn powers_of_two(max_exponent: u32) -> Self {
        let values = (0..=max_exponent.min(31)).map(|e| 1u32 << e).collect();
        Self::new(vec![AxisSegment::Values(values)])
    }

    /// Lazily walk the axis values in declared order.
    pub fn values(&self) -> impl Iterator<Item = u32> + Clone + '_ {
        self.segments.iter().flat_map(AxisSegment::iter)
    }

    pub fn len(&self) -> usize {
        self.segments
            .iter()
            .fold(0, |total, segment| total.saturating_add(segment.len()))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named axis crossed with itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeStrategy {
    pub name: String,
    pub axis: Axis,
}

impl SizeStrategy {
    pub fn new(name: impl Into<String>, axis: Axis) -> Self {
        Self {
            name: name.into(),
            axis,
        }
    }

    /// Row-major cross product of the axis with itself.
    pub fn pairs(&self) -> impl Iterator<Item = Dimensions> + Clone + '_ {
        let heights = self.axis.values();
        self.axis.values().flat_map(move |width| {
            heights
                .clone()
                .map(move |height| Dimensions::new(width, height))
        })
    }

    /// Pair count, or `None` when it does not fit in `usize`.
    pub fn checked_len(&self) -> Option<usize> {
        let n = self.axis.len();
        n.checked_mul(n)
    }

    /// Pair count, saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        self.checked_len().unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }
}

/// All sizes to render: each strategy's pairs, strategies concatenated in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeSpace {
    strategies: Vec<SizeStrategy>,
}

impl SizeSpace {
    pub fn new(strategies: Vec<SizeStrategy>) -> Self {
        Self { strategies }
    }

    pub fn strategies(&self) -> &[SizeStrategy] {
        &self.strategies
    }

    pub fn iter(&self) -> impl Iterator<Item = Dimensions> + Clone + '_ {
        self.strategies.iter().flat_map(SizeStrategy::pairs)
    }

    /// Total pair count, computed from axis lengths without enumerating pairs.
    /// `None` when it does not fit in `usize`.
    pub fn checked_len(&self) -> Option<usize> {
        self.strategies
            .iter()
            .try_fold(0usize, |total, strategy| total.checked_add(strategy.checked_len()?))
    }

    /// Total pair count, saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        self.checked_len().unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
