// topology.rs - Periodic nearest-neighbour table for an L×L torus

/// Neighbour slot order inside each entry of the table.
pub const LEFT: usize = 0;
pub const RIGHT: usize = 1;
pub const UP: usize = 2;
pub const DOWN: usize = 3;

/// Four wrap-around neighbours of every site, row-major (row = i / L,
/// col = i % L). Built once per L and only read afterwards, so a single
/// table can be shared by every trial of that size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborTable {
    side: usize,
    table: Vec<[usize; 4]>,
}

impl NeighborTable {
    pub fn new(side: usize) -> Self {
        let n = side * side;
        let mut table = Vec::with_capacity(n);
        for i in 0..n {
            let (row, col) = (i / side, i % side);
            let left  = row * side + (col + side - 1) % side;
            let right = row * side + (col + 1) % side;
            let up    = ((row + side - 1) % side) * side + col;
            let down  = ((row + 1) % side) * side + col;
            table.push([left, right, up, down]);
        }
        Self { side, table }
    }

    /// Side length L.
    #[inline(always)]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of sites N.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// `[left, right, up, down]` of site `i`.
    #[inline(always)]
    pub fn neighbors(&self, i: usize) -> &[usize; 4] {
        &self.table[i]
    }

    #[inline(always)]
    pub fn left(&self, i: usize) -> usize {
        self.table[i][LEFT]
    }

    #[inline(always)]
    pub fn right(&self, i: usize) -> usize {
        self.table[i][RIGHT]
    }

    #[inline(always)]
    pub fn up(&self, i: usize) -> usize {
        self.table[i][UP]
    }

    #[inline(always)]
    pub fn down(&self, i: usize) -> usize {
        self.table[i][DOWN]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_wraps_to_opposite_edges() {
        // 4×4: site 0 is (0,0)
        let t = NeighborTable::new(4);
        assert_eq!(t.left(0), 3);
        assert_eq!(t.right(0), 1);
        assert_eq!(t.up(0), 12);
        assert_eq!(t.down(0), 4);

        // site 15 is (3,3)
        assert_eq!(t.left(15), 14);
        assert_eq!(t.right(15), 12);
        assert_eq!(t.up(15), 11);
        assert_eq!(t.down(15), 3);
    }
}
