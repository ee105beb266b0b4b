use glam::IVec2;

/// One of the four edges of a cell. Y-up: `Top` = (0, 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Edge {
    Right = 0,
    Left = 1,
    Top = 2,
    Bottom = 3,
}

/// One of the four corners of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Corner {
    TopRight = 0,
    TopLeft = 1,
    BottomRight = 2,
    BottomLeft = 3,
}

/// All 4 edges in blending order (right, left, top, bottom).
pub const ALL_EDGES: [Edge; 4] = [Edge::Right, Edge::Left, Edge::Top, Edge::Bottom];

/// All 4 corners.
pub const ALL_CORNERS: [Corner; 4] = [
    Corner::TopRight,
    Corner::TopLeft,
    Corner::BottomRight,
    Corner::BottomLeft,
];

/// The 8 neighbor offsets of a cell (edges first, then corners).
pub const NEIGHBOR_OFFSETS: [IVec2; 8] = [
    IVec2::new(1, 0),
    IVec2::new(-1, 0),
    IVec2::new(0, 1),
    IVec2::new(0, -1),
    IVec2::new(1, 1),
    IVec2::new(-1, 1),
    IVec2::new(1, -1),
    IVec2::new(-1, -1),
];

impl Edge {
    pub fn offset(self) -> IVec2 {
        match self {
            Edge::Right => IVec2::new(1, 0),
            Edge::Left => IVec2::new(-1, 0),
            Edge::Top => IVec2::new(0, 1),
            Edge::Bottom => IVec2::new(0, -1),
        }
    }

    pub fn opposite(self) -> Edge {
        match self {
            Edge::Right => Edge::Left,
            Edge::Left => Edge::Right,
            Edge::Top => Edge::Bottom,
            Edge::Bottom => Edge::Top,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Edge::Right | Edge::Left)
    }

    /// The two corners at either end of this edge.
    pub fn corners(self) -> [Corner; 2] {
        match self {
            Edge::Right => [Corner::TopRight, Corner::BottomRight],
            Edge::Left => [Corner::TopLeft, Corner::BottomLeft],
            Edge::Top => [Corner::TopRight, Corner::TopLeft],
            Edge::Bottom => [Corner::BottomRight, Corner::BottomLeft],
        }
    }
}

impl Corner {
    pub fn offset(self) -> IVec2 {
        let (h, v) = self.edges();
        h.offset() + v.offset()
    }

    /// The (horizontal, vertical) edges meeting at this corner.
    pub fn edges(self) -> (Edge, Edge) {
        match self {
            Corner::TopRight => (Edge::Right, Edge::Top),
            Corner::TopLeft => (Edge::Left, Edge::Top),
            Corner::BottomRight => (Edge::Right, Edge::Bottom),
            Corner::BottomLeft => (Edge::Left, Edge::Bottom),
        }
    }
}
