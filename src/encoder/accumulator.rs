use glam::{Vec2, Vec3};

use crate::resources::geometry::Geometry;
use crate::resources::material::Material;

/// What the materializer needs to know about one accumulated geometry.
#[derive(Debug, Clone)]
pub struct Batch {
    pub face_count: usize,
    /// The geometry carried a UV pool.
    pub has_uvs: bool,
    pub material: Material,
}

/// Flat mesh buffers merged from any number of geometries.
///
/// All indices are global: `connects` addresses `vertices`, `uv_connects`
/// addresses `uvs`. `uv_connects` only holds entries for faces flagged in
/// `face_has_uvs`, in face order.
#[derive(Debug, Clone, Default)]
pub struct AccumulatedMesh {
    pub vertices: Vec<Vec3>,
    pub face_counts: Vec<u32>,
    pub connects: Vec<u32>,
    pub uvs: Vec<Vec2>,
    pub uv_connects: Vec<u32>,
    pub face_has_uvs: Vec<bool>,
    pub batches: Vec<Batch>,
}

impl AccumulatedMesh {
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.face_counts.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.face_counts.is_empty()
    }
}

/// Merges leaf geometries into one [`AccumulatedMesh`].
///
/// Geometries must be fed in engine order; that order decides face numbering
/// and therefore the material ranges built later. Each geometry is consumed,
/// so none can be accumulated twice.
#[derive(Debug, Default)]
pub struct GeometryAccumulator {
    mesh: AccumulatedMesh,
    vertex_base: u32,
    uv_base: u32,
}

impl GeometryAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accumulate(&mut self, geometry: Geometry) {
        let (vertex_base, uv_base) = (self.vertex_base, self.uv_base);
        let mesh = &mut self.mesh;

        mesh.vertices.extend(
            geometry
                .vertices()
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0] as f32, p[1] as f32, p[2] as f32)),
        );
        mesh.uvs.extend(
            geometry
                .uvs()
                .chunks_exact(2)
                .map(|t| Vec2::new(t[0] as f32, t[1] as f32)),
        );

        for face in geometry.faces() {
            mesh.face_counts.push(face.index_count() as u32);
            mesh.connects
                .extend(face.vertex_indices().iter().map(|&i| vertex_base + i));

            let has_uvs = face.has_uvs();
            if has_uvs {
                mesh.uv_connects
                    .extend(face.uv_indices().iter().map(|&i| uv_base + i));
            }
            mesh.face_has_uvs.push(has_uvs);
        }

        log::trace!(
            "accumulated geometry #{}: {} faces, {} uvs, material '{}'",
            mesh.batches.len(),
            geometry.face_count(),
            geometry.uv_count(),
            geometry.material().name
        );

        let face_count = geometry.face_count();
        let has_uvs = geometry.has_uvs();
        mesh.batches.push(Batch {
            face_count,
            has_uvs,
            material: geometry.into_material(),
        });

        self.vertex_base = self.mesh.vertices.len() as u32;
        self.uv_base = self.mesh.uvs.len() as u32;
    }

    /// Offset added to the local vertex indices of the next geometry.
    #[inline]
    #[must_use]
    pub fn vertex_base(&self) -> u32 {
        self.vertex_base
    }

    /// Offset added to the local UV indices of the next geometry.
    #[inline]
    #[must_use]
    pub fn uv_base(&self) -> u32 {
        self.uv_base
    }

    #[inline]
    #[must_use]
    pub fn mesh(&self) -> &AccumulatedMesh {
        &self.mesh
    }

    #[must_use]
    pub fn finish(self) -> AccumulatedMesh {
        self.mesh
    }
}

impl Extend<Geometry> for GeometryAccumulator {
    fn extend<I: IntoIterator<Item = Geometry>>(&mut self, iter: I) {
        for geometry in iter {
            self.accumulate(geometry);
        }
    }
}

impl FromIterator<Geometry> for GeometryAccumulator {
    fn from_iter<I: IntoIterator<Item = Geometry>>(iter: I) -> Self {
        let mut acc = GeometryAccumulator::new();
        acc.extend(iter);
        acc
    }
}
