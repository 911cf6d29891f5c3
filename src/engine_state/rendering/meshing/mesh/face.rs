use cgmath::{MetricSpace, Point3, Vector3};

use crate::engine_state::rendering::Vertex;
use crate::engine_state::voxels::block::block_side::{BlockSide, FACE_LOCAL_COORDS};
use crate::engine_state::voxels::block::Block;
use crate::engine_state::voxels::visibility::{self, BlockLookup};
use crate::engine_state::voxels::world::VisibleFace;

/// A visible block face together with its ambient occlusion weights.
///
/// The weights are computed once when meshes are rebuilt, so re-sorting
/// transparent faces every frame never touches the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadedFace {
    /// The block this face belongs to
    pub block: Block,
    /// Which side of the block this face represents
    pub side: BlockSide,
    /// Occlusion weight per vertex, in corner-table order
    pub ao: [f32; 4],
}

impl ShadedFace {
    /// Computes the occlusion weights of a visible face.
    ///
    /// # Arguments
    /// * `lookup` - Source of the neighbouring blocks
    /// * `face` - The visible face to shade
    pub fn shade<L: BlockLookup + ?Sized>(lookup: &L, face: &VisibleFace) -> Self {
        ShadedFace {
            block: face.block,
            side: face.side,
            ao: visibility::face_ao(lookup, &face.block, face.side),
        }
    }

    /// Builds the four vertices of this face.
    ///
    /// Corners come from the face table, so indices `0,1,2, 2,3,0` wind
    /// counter-clockwise when seen from outside the block.
    pub fn vertices(&self) -> [Vertex; 4] {
        let geometry = self.side.geometry();
        let region = self.block.block_type.texture_tile(self.side).region();
        let origin = self.block.position.to_f32();
        let type_id = self.block.block_type.id();

        std::array::from_fn(|i| {
            Vertex::new(
                origin + Vector3::from(geometry.corners[i]),
                region.vertex_uv(i),
                type_id,
                geometry.normal,
                FACE_LOCAL_COORDS[i],
                self.ao[i],
            )
        })
    }

    /// Squared distance from `camera` to the block's position, used for
    /// back-to-front ordering.
    pub fn squared_distance_to(&self, camera: Point3<f32>) -> f32 {
        self.block.position.to_f32().distance2(camera)
    }
}
