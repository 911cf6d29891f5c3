//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the single static
//! table of per-face geometry shared by face culling, ambient occlusion and
//! meshing. Keeping one table means the three can never disagree on what a
//! face index means.

use thiserror::Error;

/// Represents the six possible faces of a voxel block.
///
/// Each variant's discriminant is its face index, which is also the index into
/// [`FACE_TABLE`].
///
/// The order is: [FRONT, BACK, LEFT, RIGHT, TOP, BOTTOM]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, PartialOrd, Ord)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The left face (facing negative X)
    LEFT = 2,

    /// The right face (facing positive X)
    RIGHT = 3,

    /// The top face (facing positive Y)
    TOP = 4,

    /// The bottom face (facing negative Y)
    BOTTOM = 5,
}

/// Returned when a face index outside 0..6 is converted into a [`BlockSide`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid face index {0}, expected 0..6")]
pub struct InvalidFaceIndex(pub u8);

/// Static geometry for one block face, relative to the block's integer origin.
#[derive(Debug)]
pub struct FaceGeometry {
    /// Offset of the neighbouring cell that this face touches.
    pub neighbor_offset: [i32; 3],
    /// Outward unit normal.
    pub normal: [f32; 3],
    /// Corner positions in vertex order (lower-left, lower-right, upper-right,
    /// upper-left as seen from outside). Indices `0,1,2, 2,3,0` over these are
    /// counter-clockwise from outside on every face.
    pub corners: [[f32; 3]; 4],
    /// Per vertex: two edge probes followed by the diagonal corner probe.
    pub ao_probes: [[[i32; 3]; 3]; 4],
}

/// Face geometry indexed by `BlockSide as usize`.
#[rustfmt::skip]
pub static FACE_TABLE: [FaceGeometry; 6] = [
    // FRONT (+Z)
    FaceGeometry {
        neighbor_offset: [0, 0, 1],
        normal: [0.0, 0.0, 1.0],
        corners: [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
        ao_probes: [
            [[-1, 0, 1], [0, -1, 1], [-1, -1, 1]],
            [[1, 0, 1], [0, -1, 1], [1, -1, 1]],
            [[1, 0, 1], [0, 1, 1], [1, 1, 1]],
            [[-1, 0, 1], [0, 1, 1], [-1, 1, 1]],
        ],
    },
    // BACK (-Z)
    FaceGeometry {
        neighbor_offset: [0, 0, -1],
        normal: [0.0, 0.0, -1.0],
        corners: [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
        ao_probes: [
            [[1, 0, -1], [0, -1, -1], [1, -1, -1]],
            [[-1, 0, -1], [0, -1, -1], [-1, -1, -1]],
            [[-1, 0, -1], [0, 1, -1], [-1, 1, -1]],
            [[1, 0, -1], [0, 1, -1], [1, 1, -1]],
        ],
    },
    // LEFT (-X)
    FaceGeometry {
        neighbor_offset: [-1, 0, 0],
        normal: [-1.0, 0.0, 0.0],
        corners: [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
        ao_probes: [
            [[-1, 0, -1], [-1, -1, 0], [-1, -1, -1]],
            [[-1, 0, 1], [-1, -1, 0], [-1, -1, 1]],
            [[-1, 0, 1], [-1, 1, 0], [-1, 1, 1]],
            [[-1, 0, -1], [-1, 1, 0], [-1, 1, -1]],
        ],
    },
    // RIGHT (+X)
    FaceGeometry {
        neighbor_offset: [1, 0, 0],
        normal: [1.0, 0.0, 0.0],
        corners: [[1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
        ao_probes: [
            [[1, 0, 1], [1, -1, 0], [1, -1, 1]],
            [[1, 0, -1], [1, -1, 0], [1, -1, -1]],
            [[1, 0, -1], [1, 1, 0], [1, 1, -1]],
            [[1, 0, 1], [1, 1, 0], [1, 1, 1]],
        ],
    },
    // TOP (+Y)
    FaceGeometry {
        neighbor_offset: [0, 1, 0],
        normal: [0.0, 1.0, 0.0],
        corners: [[0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
        ao_probes: [
            [[-1, 1, 0], [0, 1, 1], [-1, 1, 1]],
            [[1, 1, 0], [0, 1, 1], [1, 1, 1]],
            [[1, 1, 0], [0, 1, -1], [1, 1, -1]],
            [[-1, 1, 0], [0, 1, -1], [-1, 1, -1]],
        ],
    },
    // BOTTOM (-Y)
    FaceGeometry {
        neighbor_offset: [0, -1, 0],
        normal: [0.0, -1.0, 0.0],
        corners: [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
        ao_probes: [
            [[-1, -1, 0], [0, -1, -1], [-1, -1, -1]],
            [[1, -1, 0], [0, -1, -1], [1, -1, -1]],
            [[1, -1, 0], [0, -1, 1], [1, -1, 1]],
            [[-1, -1, 0], [0, -1, 1], [-1, -1, 1]],
        ],
    },
];

/// Face-local coordinates of the four vertices, shared by every face.
pub const FACE_LOCAL_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

impl BlockSide {
    /// Returns an array containing all six block faces in face-index order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::LEFT,
            BlockSide::RIGHT,
            BlockSide::TOP,
            BlockSide::BOTTOM,
        ]
    }

    /// Converts a face index into a `BlockSide`.
    ///
    /// # Panics
    /// Panics if `index` is not in 0..6. An out-of-range face index is a bug in
    /// the caller, not something gameplay can produce.
    pub fn from_index(index: usize) -> Self {
        assert!(index < 6, "face index {index} out of range 0..6");
        Self::all()[index]
    }

    /// The face index (0..6).
    pub fn index(self) -> usize {
        self as usize
    }

    /// The static geometry for this face.
    pub fn geometry(self) -> &'static FaceGeometry {
        &FACE_TABLE[self as usize]
    }

    /// Offset of the neighbouring cell this face touches.
    pub fn neighbor_offset(self) -> [i32; 3] {
        self.geometry().neighbor_offset
    }

    /// Outward unit normal of this face.
    pub fn normal(self) -> [f32; 3] {
        self.geometry().normal
    }

    /// Maps a DDA step to the face it enters through.
    ///
    /// Stepping along +X enters a block through its left face, stepping along
    /// -X through its right face, and so on for Y and Z.
    ///
    /// # Arguments
    /// * `axis` - 0 for X, 1 for Y, 2 for Z
    /// * `step` - the sign of the step along that axis
    pub fn entered_by_step(axis: usize, step: i32) -> Self {
        match (axis, step > 0) {
            (0, true) => BlockSide::LEFT,
            (0, false) => BlockSide::RIGHT,
            (1, true) => BlockSide::BOTTOM,
            (1, false) => BlockSide::TOP,
            (2, true) => BlockSide::BACK,
            (2, false) => BlockSide::FRONT,
            _ => panic!("axis {axis} out of range 0..3"),
        }
    }
}

impl TryFrom<u8> for BlockSide {
    type Error = InvalidFaceIndex;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < 6 {
            Ok(Self::all()[value as usize])
        } else {
            Err(InvalidFaceIndex(value))
        }
    }
}
