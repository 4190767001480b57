//! Result windows
//!
//! A [`Window`] describes which slice of an ordered key space a query
//! wants: how many rows, how many to skip, an optional anchor key to walk
//! away from, an optional key prefix to stay inside, and a direction.

/// Traversal direction over the key space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending key order (`first`/`next`)
    Forward,
    /// Descending key order (`last`/`prev`)
    Backward,
}

/// One query's result window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// Maximum rows to emit. `0` means unbounded - callers that want a cap
    /// set one.
    pub count: u64,
    /// Rows to pass over before emitting.
    ///
    /// Skip indexing is 1-based and carries a historical quirk, preserved
    /// for compatibility: the initial cursor hit always counts as the first
    /// skipped step, so `skip = 1` and `skip = 2` both pass over exactly one
    /// row, and `skip = n` for n >= 2 passes over `n - 1`. With `skip = 0`
    /// the initial position is itself the first emitted row.
    pub skip: u64,
    /// Key to walk away from. The seek position is the first emitted row
    /// (when `skip == 0`); a seek finding nothing is
    /// [`PageError::NotFound`](super::PageError::NotFound).
    pub anchor: Option<String>,
    /// Emit only while keys retain this prefix; the first mismatch ends the
    /// sequence. Prefix windows always walk forward.
    pub prefix: Option<String>,
    pub direction: Direction,
}

impl Window {
    /// Up to `count` rows in ascending key order.
    pub fn forward(count: u64) -> Self {
        Self {
            count,
            skip: 0,
            anchor: None,
            prefix: None,
            direction: Direction::Forward,
        }
    }

    /// Up to `count` rows in descending key order - the default shape for
    /// unindexed "all" queries.
    pub fn backward(count: u64) -> Self {
        Self {
            direction: Direction::Backward,
            ..Self::forward(count)
        }
    }

    /// Every row, descending. Equivalent to `backward(0)`.
    pub fn all() -> Self {
        Self::backward(0)
    }

    /// Up to `count` rows at and after `anchor`.
    pub fn after(anchor: impl Into<String>, count: u64) -> Self {
        Self {
            anchor: Some(anchor.into()),
            ..Self::forward(count)
        }
    }

    /// Up to `count` rows at and before `anchor`, walking backward.
    pub fn before(anchor: impl Into<String>, count: u64) -> Self {
        Self {
            anchor: Some(anchor.into()),
            ..Self::backward(count)
        }
    }

    /// Up to `count` rows whose keys share `prefix`.
    pub fn prefixed(prefix: impl Into<String>, count: u64) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::forward(count)
        }
    }

    /// Sets the skip (see [`Window::skip`] for the indexing rules).
    pub fn with_skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::all()
    }
}

/// Verdict for one candidate row, in encounter order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    /// Still inside the skip run
    Skip,
    /// Counts toward the window
    Emit,
    /// Window full
    Done,
}

/// Applies a window's skip/count bookkeeping to a sequence of candidates.
///
/// Shared between the raw cursor walk and the executor's post-filter
/// windowing so both paths page identically. The skip run reproduces the
/// historical loop: a step counter starting at 1 against a `skip - 1`
/// target, every row seen during the run consumed.
#[derive(Debug)]
pub(crate) struct SkipGate {
    skipping: bool,
    stepped: u64,
    target: u64,
    emitted: u64,
    count: u64,
}

impl SkipGate {
    pub(crate) fn new(window: &Window) -> Self {
        Self {
            skipping: window.skip > 0,
            stepped: 1,
            target: window.skip.saturating_sub(1),
            emitted: 0,
            count: window.count,
        }
    }

    pub(crate) fn admit(&mut self) -> Admission {
        if self.skipping {
            if self.stepped >= self.target {
                self.skipping = false;
            } else {
                self.stepped += 1;
            }
            return Admission::Skip;
        }
        if self.count > 0 && self.emitted >= self.count {
            return Admission::Done;
        }
        self.emitted += 1;
        Admission::Emit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admissions(window: &Window, candidates: u64) -> Vec<Admission> {
        let mut gate = SkipGate::new(window);
        (0..candidates).map(|_| gate.admit()).collect()
    }

    #[test]
    fn test_no_skip_emits_from_first() {
        let verdicts = admissions(&Window::forward(3), 5);
        assert_eq!(
            verdicts,
            vec![
                Admission::Emit,
                Admission::Emit,
                Admission::Emit,
                Admission::Done,
                Admission::Done,
            ]
        );
    }

    #[test]
    fn test_skip_one_and_two_both_pass_one_row() {
        // the historical quirk: the initial hit counts as a step
        let one = admissions(&Window::forward(10).with_skip(1), 3);
        let two = admissions(&Window::forward(10).with_skip(2), 3);
        let expected = vec![Admission::Skip, Admission::Emit, Admission::Emit];
        assert_eq!(one, expected);
        assert_eq!(two, expected);
    }

    #[test]
    fn test_skip_five_passes_four_rows() {
        let verdicts = admissions(&Window::forward(10).with_skip(5), 6);
        assert_eq!(
            verdicts,
            vec![
                Admission::Skip,
                Admission::Skip,
                Admission::Skip,
                Admission::Skip,
                Admission::Emit,
                Admission::Emit,
            ]
        );
    }

    #[test]
    fn test_count_zero_is_unbounded() {
        let verdicts = admissions(&Window::forward(0), 100);
        assert!(verdicts.iter().all(|v| *v == Admission::Emit));
    }

    #[test]
    fn test_count_caps_after_skip() {
        let verdicts = admissions(&Window::forward(2).with_skip(3), 6);
        assert_eq!(
            verdicts,
            vec![
                Admission::Skip,
                Admission::Skip,
                Admission::Emit,
                Admission::Emit,
                Admission::Done,
                Admission::Done,
            ]
        );
    }

    #[test]
    fn test_window_builders() {
        let w = Window::before("5", 3);
        assert_eq!(w.anchor.as_deref(), Some("5"));
        assert_eq!(w.direction, Direction::Backward);
        assert_eq!(w.count, 3);

        let w = Window::prefixed("user:", 10).with_skip(2);
        assert_eq!(w.prefix.as_deref(), Some("user:"));
        assert_eq!(w.direction, Direction::Forward);
        assert_eq!(w.skip, 2);

        assert_eq!(Window::default(), Window::all());
    }
}
