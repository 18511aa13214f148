use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use super::types::DecorationRange;

/// Makes styled ranges pairwise disjoint and disjoint from hide ranges.
///
/// Hide ranges pass through, with repeats of an identical hide collapsing to
/// the first, and claim their bytes first. Styled ranges then claim bytes
/// narrowest-first (ties go to the earlier range), so an inner construct keeps
/// its style and the enclosing range is split around it. Output keeps
/// extraction order; a split range contributes its pieces in offset order.
/// Ranges outside `0..=text_len` are dropped.
pub(crate) fn resolve(ranges: Vec<DecorationRange>, text_len: usize) -> Vec<DecorationRange> {
    let mut hidden = BTreeSet::new();
    let ranges: Vec<DecorationRange> = ranges
        .into_iter()
        .filter(|r| {
            if r.start >= r.end || r.end > text_len {
                log::trace!("dropping out-of-bounds range {r:?} (text len {text_len})");
                return false;
            }
            if !r.kind.is_styled() && !hidden.insert((r.start, r.end)) {
                log::trace!("dropping duplicate hide {}..{}", r.start, r.end);
                return false;
            }
            true
        })
        .collect();

    let mut claimed = Claimed::default();
    for r in ranges.iter().filter(|r| !r.kind.is_styled()) {
        claimed.claim(r.start..r.end);
    }

    let mut order: Vec<usize> = (0..ranges.len())
        .filter(|&i| ranges[i].kind.is_styled())
        .collect();
    order.sort_by_key(|&i| (ranges[i].len(), i));

    let mut pieces: Vec<Vec<Range<usize>>> = vec![Vec::new(); ranges.len()];
    for i in order {
        let free = claimed.free_pieces(ranges[i].start..ranges[i].end);
        for piece in &free {
            claimed.claim(piece.clone());
        }
        pieces[i] = free;
    }

    let mut out = Vec::with_capacity(ranges.len());
    for (range, split) in ranges.into_iter().zip(pieces) {
        if !range.kind.is_styled() {
            out.push(range);
            continue;
        }
        out.extend(split.into_iter().map(|piece| DecorationRange {
            start: piece.start,
            end: piece.end,
            ..range
        }));
    }
    out
}

/// Disjoint set of claimed byte intervals, keyed by start.
#[derive(Default)]
struct Claimed {
    intervals: BTreeMap<usize, usize>,
}

impl Claimed {
    /// Adds `range`, merging with any claimed intervals it touches.
    fn claim(&mut self, range: Range<usize>) {
        let mut start = range.start;
        let mut end = range.end;
        if let Some((&s, &e)) = self.intervals.range(..=start).next_back()
            && e >= start
        {
            start = s;
            end = end.max(e);
        }
        let absorbed: Vec<usize> = self
            .intervals
            .range(start..=end)
            .map(|(&s, _)| s)
            .collect();
        for s in absorbed {
            if let Some(e) = self.intervals.remove(&s) {
                end = end.max(e);
            }
        }
        self.intervals.insert(start, end);
    }

    /// Sub-ranges of `range` not covered by any claimed interval.
    fn free_pieces(&self, range: Range<usize>) -> Vec<Range<usize>> {
        let mut pieces = Vec::new();
        let mut pos = range.start;
        if let Some((_, &e)) = self.intervals.range(..=range.start).next_back() {
            pos = pos.max(e);
        }
        for (&s, &e) in self.intervals.range(range.start..range.end) {
            if s > pos {
                pieces.push(pos..s);
            }
            pos = pos.max(e);
            if pos >= range.end {
                break;
            }
        }
        if pos < range.end {
            pieces.push(pos..range.end);
        }
        pieces
    }
}
