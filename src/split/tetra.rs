//! Subdivision of a single tetrahedron along region boundaries
//!
//! Corners are grouped by region (groups ordered by region id, corners
//! ascending by vertex id inside a group) and the tetrahedron is cut through
//! the split points of every edge joining two groups. Each case has a fixed
//! conforming decomposition: the sub-tetrahedra tile the parent exactly.
//!
//! Where a cut crosses a face between two same-region corners `x < y`, the
//! quad left on that face is always divided along `y - m(x, z)`. Neighboring
//! tetrahedra therefore cut a shared face identically, and the matching
//! faces cancel when a fragment is assembled.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::VertexId;
use crate::tet::{Tetrahedron, TET_EDGES};

/// How the corners of a tetrahedron divide among regions
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitCase {
    /// All corners in one region, nothing to cut
    Whole,
    /// One corner against three: 1 + 3 sub-tetrahedra
    OneThree,
    /// Two pairs: 3 + 3 sub-tetrahedra
    TwoTwo,
    /// Two lone corners and a pair: 2 + 2 + 3 sub-tetrahedra
    OneOneTwo,
    /// Four regions: 2 sub-tetrahedra each
    FourWay,
}

impl SplitCase {
    /// Number of split points the case synthesizes
    pub fn split_point_count(self) -> usize {
        match self {
            SplitCase::Whole => 0,
            SplitCase::OneThree => 3,
            SplitCase::TwoTwo => 4,
            SplitCase::OneOneTwo => 5,
            SplitCase::FourWay => 6,
        }
    }

    /// Number of sub-tetrahedra the case produces
    pub fn sub_tetrahedron_count(self) -> usize {
        match self {
            SplitCase::Whole => 0,
            SplitCase::OneThree => 4,
            SplitCase::TwoTwo => 6,
            SplitCase::OneOneTwo => 7,
            SplitCase::FourWay => 8,
        }
    }
}

/// A piece of a split tetrahedron, wholly inside one region
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubTetrahedron {
    /// Owning region (index into the seed sequence)
    pub region: usize,
    /// Corner ids; ids past the mesh vertex count are split points
    pub corners: [VertexId; 4],
}

/// Classify a tetrahedron by the regions of its corners
pub fn classify(regions: &[usize; 4]) -> SplitCase {
    let mut sorted = *regions;
    sorted.sort_unstable();
    let mut sizes = [0usize; 4];
    let mut groups = 0;
    for (i, region) in sorted.iter().enumerate() {
        if i > 0 && sorted[i - 1] != *region {
            groups += 1;
        }
        sizes[groups] += 1;
    }

    match groups + 1 {
        1 => SplitCase::Whole,
        2 if sizes[0] == 2 => SplitCase::TwoTwo,
        2 => SplitCase::OneThree,
        3 => SplitCase::OneOneTwo,
        _ => SplitCase::FourWay,
    }
}

/// Edges of `tet` whose endpoints lie in different regions
pub fn cut_edges<'a>(
    tet: &'a Tetrahedron,
    regions: &[usize; 4],
) -> impl Iterator<Item = (VertexId, VertexId)> + 'a {
    let regions = *regions;
    TET_EDGES
        .iter()
        .filter(move |&&(a, b)| regions[a] != regions[b])
        .map(move |&(a, b)| (tet[a], tet[b]))
}

/// Cut `tet` into sub-tetrahedra that each lie in one region
///
/// `split` returns the split point id of a cut edge. A tetrahedron with all
/// corners in one region yields nothing.
pub fn subdivide<F>(tet: &Tetrahedron, regions: &[usize; 4], split: F) -> Vec<SubTetrahedron>
where
    F: Fn(VertexId, VertexId) -> VertexId,
{
    let mut corners: [(usize, VertexId); 4] = [
        (regions[0], tet[0]),
        (regions[1], tet[1]),
        (regions[2], tet[2]),
        (regions[3], tet[3]),
    ];
    corners.sort_unstable();
    let region = |i: usize| corners[i].0;
    let id = |i: usize| corners[i].1;
    let same = |i: usize, j: usize| corners[i].0 == corners[j].0;

    let sub = |region: usize, corners: [VertexId; 4]| SubTetrahedron { region, corners };

    match classify(regions) {
        SplitCase::Whole => Vec::new(),

        SplitCase::OneThree => {
            // Lone corner first, then the other three ascending
            let (lone, rest) = if same(0, 1) { (3, [0, 1, 2]) } else { (0, [1, 2, 3]) };
            let (a, b, c, d) = (id(lone), id(rest[0]), id(rest[1]), id(rest[2]));
            let (ra, rb) = (region(lone), region(rest[0]));
            let (mab, mac, mad) = (split(a, b), split(a, c), split(a, d));
            vec![
                sub(ra, [a, mab, mac, mad]),
                sub(rb, [b, c, d, mab]),
                sub(rb, [c, d, mab, mac]),
                sub(rb, [d, mab, mac, mad]),
            ]
        }

        SplitCase::TwoTwo => {
            let (a0, a1, b0, b1) = (id(0), id(1), id(2), id(3));
            let (ra, rb) = (region(0), region(2));
            let m00 = split(a0, b0);
            let m01 = split(a0, b1);
            let m10 = split(a1, b0);
            let m11 = split(a1, b1);
            vec![
                sub(ra, [a0, m00, m01, a1]),
                sub(ra, [m00, m01, a1, m10]),
                sub(ra, [m01, a1, m10, m11]),
                sub(rb, [b0, m00, m10, b1]),
                sub(rb, [m00, m10, b1, m01]),
                sub(rb, [m10, b1, m01, m11]),
            ]
        }

        SplitCase::OneOneTwo => {
            // Lone corners in region order, then the pair
            let (a, b, (c, d)) = if same(0, 1) {
                (2, 3, (0, 1))
            } else if same(1, 2) {
                (0, 3, (1, 2))
            } else {
                (0, 1, (2, 3))
            };
            let (ra, rb, rc) = (region(a), region(b), region(c));
            let (a, b, c, d) = (id(a), id(b), id(c), id(d));
            let (mab, mac, mad) = (split(a, b), split(a, c), split(a, d));
            let (mbc, mbd) = (split(b, c), split(b, d));
            vec![
                sub(ra, [a, mab, mac, mad]),
                sub(ra, [mab, mac, mad, mbc]),
                sub(rb, [b, mab, mbc, mbd]),
                sub(rb, [mab, mad, mbc, mbd]),
                sub(rc, [c, mac, mbc, d]),
                sub(rc, [mac, mbc, d, mad]),
                sub(rc, [mbc, d, mad, mbd]),
            ]
        }

        SplitCase::FourWay => {
            let (a, b, c, d) = (id(0), id(1), id(2), id(3));
            let (mab, mac, mad) = (split(a, b), split(a, c), split(a, d));
            let (mbc, mbd, mcd) = (split(b, c), split(b, d), split(c, d));
            vec![
                sub(region(0), [a, mab, mac, mad]),
                sub(region(0), [mab, mcd, mac, mad]),
                sub(region(1), [b, mab, mbc, mbd]),
                sub(region(1), [mab, mcd, mbd, mbc]),
                sub(region(2), [c, mac, mbc, mcd]),
                sub(region(2), [mab, mcd, mbc, mac]),
                sub(region(3), [d, mad, mbd, mcd]),
                sub(region(3), [mab, mcd, mad, mbd]),
            ]
        }
    }
}
