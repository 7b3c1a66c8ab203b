// src/interval.rs
//
// Intervals over ordered values, each end optional and inclusive or exclusive.
//
//   [1,10]   (-∞,5)   [51,∞)   (3,7]
//
// An interval is valid by construction: when both ends are present, min ≤ max.
// Equality and hashing are structural, so intervals can key a map.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundKind {
    Inclusive,
    Exclusive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint<T> {
    pub value: T,
    pub kind: BoundKind,
}

impl<T> Endpoint<T> {
    pub fn inclusive(value: T) -> Self {
        Self { value, kind: BoundKind::Inclusive }
    }

    pub fn exclusive(value: T) -> Self {
        Self { value, kind: BoundKind::Exclusive }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntervalError {
    #[error("interval minimum {min} is greater than its maximum {max}")]
    Inverted { min: String, max: String },
    #[error("malformed interval '{0}'")]
    Syntax(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Interval<T> {
    min: Option<Endpoint<T>>,
    max: Option<Endpoint<T>>,
}

impl<T: Ord + fmt::Display> Interval<T> {
    pub fn new(min: Option<Endpoint<T>>, max: Option<Endpoint<T>>) -> Result<Self, IntervalError> {
        if let (Some(lo), Some(hi)) = (&min, &max) {
            if lo.value > hi.value {
                return Err(IntervalError::Inverted { min: lo.value.to_string(), max: hi.value.to_string() });
            }
        }
        Ok(Self { min, max })
    }

    /// `[lo,hi]`
    pub fn closed(lo: T, hi: T) -> Result<Self, IntervalError> {
        Self::new(Some(Endpoint::inclusive(lo)), Some(Endpoint::inclusive(hi)))
    }
}

impl<T> Interval<T> {
    /// `(-∞,∞)`
    pub fn unbounded() -> Self {
        Self { min: None, max: None }
    }

    /// `[lo,∞)`
    pub fn at_least(lo: T) -> Self {
        Self { min: Some(Endpoint::inclusive(lo)), max: None }
    }

    pub fn min(&self) -> Option<&Endpoint<T>> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&Endpoint<T>> {
        self.max.as_ref()
    }
}

impl<T: Clone> Interval<T> {
    /// `[v,v]`
    pub fn point(v: T) -> Self {
        Self { min: Some(Endpoint::inclusive(v.clone())), max: Some(Endpoint::inclusive(v)) }
    }
}

impl<T: Ord> Interval<T> {
    /// Each present end is checked with its own comparator; missing ends accept anything.
    pub fn contains(&self, x: &T) -> bool {
        let above_min = match &self.min {
            None => true,
            Some(Endpoint { value, kind: BoundKind::Inclusive }) => value <= x,
            Some(Endpoint { value, kind: BoundKind::Exclusive }) => value < x,
        };
        let below_max = match &self.max {
            None => true,
            Some(Endpoint { value, kind: BoundKind::Inclusive }) => x <= value,
            Some(Endpoint { value, kind: BoundKind::Exclusive }) => x < value,
        };
        above_min && below_max
    }
}

impl<T: fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.min {
            None => f.write_str("(-∞")?,
            Some(Endpoint { value, kind: BoundKind::Inclusive }) => write!(f, "[{}", value)?,
            Some(Endpoint { value, kind: BoundKind::Exclusive }) => write!(f, "({}", value)?,
        }
        f.write_str(",")?;
        match &self.max {
            None => f.write_str("∞)"),
            Some(Endpoint { value, kind: BoundKind::Inclusive }) => write!(f, "{}]", value),
            Some(Endpoint { value, kind: BoundKind::Exclusive }) => write!(f, "{})", value),
        }
    }
}

fn is_infinity(s: &str) -> bool {
    matches!(s, "∞" | "+∞" | "-∞" | "inf" | "+inf" | "-inf")
}

impl<T: FromStr + Ord + fmt::Display> FromStr for Interval<T> {
    type Err = IntervalError;

    /// Interval notation as printed by `Display`. `inf` may stand in for `∞`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let syntax = || IntervalError::Syntax(s!(s));
        let t = s.trim();

        let open = t.chars().next().ok_or_else(syntax)?;
        let close = t.chars().last().ok_or_else(syntax)?;
        if t.chars().count() < 3 { return Err(syntax()); }
        let lo_kind = match open {
            '[' => BoundKind::Inclusive,
            '(' => BoundKind::Exclusive,
            _ => return Err(syntax()),
        };
        let hi_kind = match close {
            ']' => BoundKind::Inclusive,
            ')' => BoundKind::Exclusive,
            _ => return Err(syntax()),
        };

        let body = &t[open.len_utf8()..t.len() - close.len_utf8()];
        let (lo, hi) = body.split_once(',').ok_or_else(syntax)?;
        let (lo, hi) = (lo.trim(), hi.trim());

        let end = |v: &str, kind: BoundKind| -> Result<Option<Endpoint<T>>, IntervalError> {
            if is_infinity(v) { return Ok(None); }
            let value = v.parse::<T>().map_err(|_| syntax())?;
            Ok(Some(Endpoint { value, kind }))
        };
        Interval::new(end(lo, lo_kind)?, end(hi, hi_kind)?)
    }
}

/* ---------------- discrete domains ---------------- */

/// Values with a next/previous neighbour, so exclusive ends can be turned into
/// inclusive ones and gaps can be found.
pub trait Discrete: Ord + Copy + fmt::Display {
    fn succ(self) -> Option<Self>;
    fn pred(self) -> Option<Self>;
}

macro_rules! discrete_int {
    ($($t:ty),*) => {$(
        impl Discrete for $t {
            fn succ(self) -> Option<Self> { self.checked_add(1) }
            fn pred(self) -> Option<Self> { self.checked_sub(1) }
        }
    )*};
}

discrete_int!(u32, u64, i32, i64, usize);

impl<T: Discrete> Interval<T> {
    /// Inclusive `(lo, hi)`, `None` meaning unbounded on that side.
    /// Returns `None` when the interval holds no value at all.
    pub fn closed_bounds(&self) -> Option<(Option<T>, Option<T>)> {
        let lo = match self.min {
            None => None,
            Some(Endpoint { value, kind: BoundKind::Inclusive }) => Some(value),
            Some(Endpoint { value, kind: BoundKind::Exclusive }) => Some(value.succ()?),
        };
        let hi = match self.max {
            None => None,
            Some(Endpoint { value, kind: BoundKind::Inclusive }) => Some(value),
            Some(Endpoint { value, kind: BoundKind::Exclusive }) => Some(value.pred()?),
        };
        if let (Some(l), Some(h)) = (lo, hi) {
            if l > h { return None; }
        }
        Some((lo, hi))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoverageError {
    #[error("interval #{index} {interval} contains no values")]
    Empty { index: usize, interval: String },
    #[error("interval #{index} {interval} reaches below the domain start {start}")]
    BelowDomain { index: usize, interval: String, start: String },
    #[error("intervals #{first} and #{second} overlap")]
    Overlap { first: usize, second: usize },
    #[error("no interval covers {0}")]
    Gap(String),
}

/// Check that `intervals` split `[start, ∞)` exactly: every value covered once,
/// nothing below `start`. Indices in errors refer to positions in `intervals`.
pub fn check_partition<T: Discrete>(intervals: &[&Interval<T>], start: T) -> Result<(), CoverageError> {
    let mut spans: Vec<(usize, T, Option<T>)> = Vec::with_capacity(intervals.len());
    for (index, iv) in intervals.iter().enumerate() {
        let (lo, hi) = iv
            .closed_bounds()
            .ok_or_else(|| CoverageError::Empty { index, interval: iv.to_string() })?;
        let below = || CoverageError::BelowDomain { index, interval: iv.to_string(), start: start.to_string() };
        let lo = lo.ok_or_else(below)?;
        if lo < start { return Err(below()); }
        spans.push((index, lo, hi));
    }
    spans.sort_by_key(|&(index, lo, _)| (lo, index));

    // `next`: first value not yet covered; None once coverage reached the top.
    let mut next = Some(start);
    let mut prev: Option<usize> = None;
    for (index, lo, hi) in spans {
        let want = match next {
            Some(w) => w,
            None => return Err(CoverageError::Overlap { first: prev.unwrap_or(index), second: index }),
        };
        if lo < want {
            return Err(CoverageError::Overlap { first: prev.unwrap_or(index), second: index });
        }
        if lo > want {
            return Err(CoverageError::Gap(want.to_string()));
        }
        next = hi.and_then(|h| h.succ());
        prev = Some(index);
    }
    match next {
        None => Ok(()),
        Some(w) => Err(CoverageError::Gap(w.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_and_closed_ranges() {
        let p = Interval::point(10);
        assert!(p.contains(&10));
        assert!(!p.contains(&9));
        assert!(!p.contains(&11));

        let r = Interval::closed(11, 13).unwrap();
        for v in 11..=13 { assert!(r.contains(&v)); }
        assert!(!r.contains(&10));
        assert!(!r.contains(&14));
    }

    #[test]
    fn exclusive_and_open_ends() {
        let iv = Interval::new(Some(Endpoint::exclusive(3)), Some(Endpoint::exclusive(7))).unwrap();
        assert!(!iv.contains(&3));
        assert!(iv.contains(&4));
        assert!(!iv.contains(&7));

        assert!(Interval::<i64>::unbounded().contains(&i64::MIN));
        assert!(Interval::at_least(51).contains(&u32::MAX));
        assert!(!Interval::at_least(51).contains(&50));
    }

    #[test]
    fn inverted_is_rejected() {
        let err = Interval::closed(5, 4).unwrap_err();
        assert_eq!(err, IntervalError::Inverted { min: s!("5"), max: s!("4") });
        // Touching exclusive ends are valid, just empty.
        let empty = Interval::new(Some(Endpoint::exclusive(5)), Some(Endpoint::exclusive(5))).unwrap();
        assert!(!empty.contains(&5));
        assert_eq!(empty.closed_bounds(), None);
    }

    #[test]
    fn structural_equality_keys_a_map() {
        use std::collections::HashMap;
        let mut m = HashMap::new();
        m.insert(Interval::closed(1, 3).unwrap(), "a");
        assert_eq!(m.get(&Interval::closed(1, 3).unwrap()), Some(&"a"));
        assert_ne!(Interval::closed(1, 3).unwrap(), Interval::new(Some(Endpoint::inclusive(1)), Some(Endpoint::exclusive(3))).unwrap());
    }

    #[test]
    fn notation_round_trips_through_display() {
        for text in ["[1,10]", "(-∞,5)", "[51,∞)", "(3,7]"] {
            let iv: Interval<i32> = text.parse().unwrap();
            assert_eq!(iv.to_string(), text);
        }
        let iv: Interval<u32> = " [ 51 , inf ) ".parse().unwrap();
        assert_eq!(iv, Interval::at_least(51));
        assert!("[1;2]".parse::<Interval<u32>>().is_err());
        assert!("1,2".parse::<Interval<u32>>().is_err());
        assert!(matches!("[9,2]".parse::<Interval<u32>>(), Err(IntervalError::Inverted { .. })));
    }

    #[test]
    fn partition_checks() {
        let a = Interval::closed(1u32, 3).unwrap();
        let b = Interval::new(Some(Endpoint::exclusive(3u32)), Some(Endpoint::inclusive(9))).unwrap();
        let c = Interval::at_least(10u32);
        assert_eq!(check_partition(&[&c, &a, &b], 1), Ok(()));

        assert_eq!(check_partition(&[&a, &c], 1), Err(CoverageError::Gap(s!("4"))));
        assert_eq!(check_partition(&[&a, &b], 1), Err(CoverageError::Gap(s!("10"))));

        let overlap = Interval::closed(3u32, 9).unwrap();
        assert_eq!(check_partition(&[&a, &overlap, &c], 1), Err(CoverageError::Overlap { first: 0, second: 1 }));

        let tail = Interval::at_least(5u32);
        assert_eq!(check_partition(&[&a, &b, &c, &tail], 1), Err(CoverageError::Overlap { first: 1, second: 3 }));

        let zero = Interval::closed(0u32, 3).unwrap();
        assert!(matches!(check_partition(&[&zero, &b, &c], 1), Err(CoverageError::BelowDomain { index: 0, .. })));
    }
}
