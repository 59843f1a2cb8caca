//! Zero-copy candidate sequences.
//!
//! Each function yields the customer ids a route *would* have after a move,
//! as an iterator over the unchanged source slice. Candidates are evaluated
//! without ever duplicating a route; the move is applied to the route only
//! after it has been accepted. Every iterator is `Clone`, so a candidate
//! can be walked more than once when its departure is optimized.

/// `ids` with `id` inserted before position `pos` (`pos == ids.len()` appends).
pub fn inserted(ids: &[usize], pos: usize, id: usize) -> impl Iterator<Item = usize> + Clone + '_ {
    (0..=ids.len()).map(move |k| match k.cmp(&pos) {
        std::cmp::Ordering::Less => ids[k],
        std::cmp::Ordering::Equal => id,
        std::cmp::Ordering::Greater => ids[k - 1],
    })
}

/// `ids` without the element at `pos`.
pub fn removed(ids: &[usize], pos: usize) -> impl Iterator<Item = usize> + Clone + '_ {
    ids.iter()
        .enumerate()
        .filter(move |&(k, _)| k != pos)
        .map(|(_, &id)| id)
}

/// `ids` with positions `i` and `j` exchanged.
pub fn swapped(ids: &[usize], i: usize, j: usize) -> impl Iterator<Item = usize> + Clone + '_ {
    (0..ids.len()).map(move |k| {
        if k == i {
            ids[j]
        } else if k == j {
            ids[i]
        } else {
            ids[k]
        }
    })
}

/// `ids` with the element at `from` moved so that it ends up at index `to`.
pub fn relocated(ids: &[usize], from: usize, to: usize) -> impl Iterator<Item = usize> + Clone + '_ {
    (0..ids.len()).map(move |k| {
        if k == to {
            ids[from]
        } else if from < to && k >= from && k < to {
            ids[k + 1]
        } else if from > to && k > to && k <= from {
            ids[k - 1]
        } else {
            ids[k]
        }
    })
}

/// `ids` with the segment `[i..=j]` reversed.
pub fn reversed(ids: &[usize], i: usize, j: usize) -> impl Iterator<Item = usize> + Clone + '_ {
    (0..ids.len()).map(move |k| if k >= i && k <= j { ids[i + j - k] } else { ids[k] })
}

/// `ids` with the `len` elements starting at `from` moved so that the
/// segment starts at index `to` of the result.
pub fn segment_moved(
    ids: &[usize],
    from: usize,
    len: usize,
    to: usize,
) -> impl Iterator<Item = usize> + Clone + '_ {
    let rest = move |r: usize| if r < from { ids[r] } else { ids[r + len] };
    (0..ids.len()).map(move |k| {
        if k < to {
            rest(k)
        } else if k < to + len {
            ids[from + k - to]
        } else {
            rest(k - len)
        }
    })
}

/// `head` followed by `tail`.
pub fn spliced<'a>(head: &'a [usize], tail: &'a [usize]) -> impl Iterator<Item = usize> + Clone + 'a {
    head.iter().chain(tail).copied()
}
