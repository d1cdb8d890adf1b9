//! Leaf geometry produced by rule evaluation.
//!
//! A [`Geometry`] is one terminal shape of a generation pass: a vertex pool,
//! an optional UV pool, polygonal [`Face`]s indexing into both, and the
//! [`Material`] the rule assigned. Indices are local to the geometry; the
//! encoder rebases them when several geometries are merged into one mesh.

use smallvec::SmallVec;

use crate::errors::{Error, Result};
use crate::resources::material::Material;

/// Index list of a single polygon. Quads and triangles stay inline.
pub type FaceIndices = SmallVec<[u32; 4]>;

/// A polygon of a [`Geometry`].
///
/// UV indices are either empty (the face has no texture coordinates) or
/// parallel to the vertex indices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Face {
    vertex_indices: FaceIndices,
    uv_indices: FaceIndices,
}

impl Face {
    /// Creates a face without texture coordinates.
    pub fn new(vertex_indices: impl IntoIterator<Item = u32>) -> Self {
        Self {
            vertex_indices: vertex_indices.into_iter().collect(),
            uv_indices: FaceIndices::new(),
        }
    }

    /// Creates a face with per-corner UV indices.
    ///
    /// An empty `uv_indices` list is accepted and means "no UVs".
    pub fn with_uvs(
        vertex_indices: impl IntoIterator<Item = u32>,
        uv_indices: impl IntoIterator<Item = u32>,
    ) -> Result<Self> {
        let vertex_indices: FaceIndices = vertex_indices.into_iter().collect();
        let uv_indices: FaceIndices = uv_indices.into_iter().collect();
        if !uv_indices.is_empty() && uv_indices.len() != vertex_indices.len() {
            return Err(Error::InvalidGeometry(format!(
                "face has {} vertex indices but {} uv indices",
                vertex_indices.len(),
                uv_indices.len()
            )));
        }
        Ok(Self {
            vertex_indices,
            uv_indices,
        })
    }

    #[inline]
    #[must_use]
    pub fn vertex_indices(&self) -> &[u32] {
        &self.vertex_indices
    }

    #[inline]
    #[must_use]
    pub fn uv_indices(&self) -> &[u32] {
        &self.uv_indices
    }

    /// Number of corners of this polygon.
    #[inline]
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.vertex_indices.len()
    }

    #[inline]
    #[must_use]
    pub fn has_uvs(&self) -> bool {
        !self.uv_indices.is_empty()
    }
}

/// One leaf shape's geometry as delivered by the rule engine.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    vertices: Vec<f64>,
    uvs: Vec<f64>,
    faces: Vec<Face>,
    material: Material,
}

impl Geometry {
    /// Validates and wraps engine output.
    ///
    /// `vertices` holds 3 coordinates per vertex, `uvs` 2 per texture
    /// coordinate. Every face index must address an existing vertex/UV.
    pub fn new(vertices: Vec<f64>, uvs: Vec<f64>, faces: Vec<Face>, material: Material) -> Result<Self> {
        if vertices.len() % 3 != 0 {
            return Err(Error::InvalidGeometry(format!(
                "vertex buffer length {} is not a multiple of 3",
                vertices.len()
            )));
        }
        if uvs.len() % 2 != 0 {
            return Err(Error::InvalidGeometry(format!(
                "uv buffer length {} is not a multiple of 2",
                uvs.len()
            )));
        }

        let vertex_count = vertices.len() / 3;
        let uv_count = uvs.len() / 2;
        for (fi, face) in faces.iter().enumerate() {
            if let Some(&bad) = face.vertex_indices().iter().find(|&&i| i as usize >= vertex_count) {
                return Err(Error::InvalidGeometry(format!(
                    "face {fi} references vertex {bad} but geometry has {vertex_count} vertices"
                )));
            }
            if let Some(&bad) = face.uv_indices().iter().find(|&&i| i as usize >= uv_count) {
                return Err(Error::InvalidGeometry(format!(
                    "face {fi} references uv {bad} but geometry has {uv_count} uvs"
                )));
            }
        }

        Ok(Self {
            vertices,
            uvs,
            faces,
            material,
        })
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Flat `xyz` coordinates.
    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &[f64] {
        &self.vertices
    }

    #[inline]
    #[must_use]
    pub fn uv_count(&self) -> usize {
        self.uvs.len() / 2
    }

    /// Flat `uv` coordinates.
    #[inline]
    #[must_use]
    pub fn uvs(&self) -> &[f64] {
        &self.uvs
    }

    #[inline]
    #[must_use]
    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    #[must_use]
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Splits the geometry into its material, dropping the buffers.
    #[must_use]
    pub fn into_material(self) -> Material {
        self.material
    }
}
