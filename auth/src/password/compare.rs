use std::hint::black_box;

/// Compare two byte strings without leaking where they differ.
///
/// Every position of the longer operand is visited and differences are
/// accumulated without branching on content, so the running time depends only
/// on the operand lengths.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    compare(a, b).equal
}

pub(crate) struct Comparison {
    pub equal: bool,
    pub positions_visited: usize,
}

pub(crate) fn compare(a: &[u8], b: &[u8]) -> Comparison {
    let length = a.len().max(b.len());
    let mut difference = a.len() ^ b.len();
    let mut positions_visited = 0;

    for i in 0..length {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        difference |= usize::from(black_box(x ^ y));
        positions_visited += 1;
    }

    Comparison {
        equal: black_box(difference) == 0,
        positions_visited,
    }
}
