//! In-memory host implementations.

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};
use rustc_hash::FxHashMap;

use crate::errors::{Error, Result};
use crate::host::{EnumAttribute, MeshTarget};

/// Texture coordinates and their per-corner bindings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UvSet {
    pub uvs: Vec<Vec2>,
    /// One slot per face corner, in connectivity order.
    pub assignments: Vec<Option<u32>>,
}

/// A mesh held in plain buffers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vec3>,
    pub face_counts: Vec<u32>,
    pub connects: Vec<u32>,
    pub uv_sets: FxHashMap<String, UvSet>,
    face_offsets: Vec<usize>,
}

impl MeshData {
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.face_counts.len()
    }

    /// Vertex indices of face `face`.
    #[must_use]
    pub fn face(&self, face: usize) -> Option<&[u32]> {
        let start = *self.face_offsets.get(face)?;
        let count = self.face_counts[face] as usize;
        self.connects.get(start..start + count)
    }

    /// UV index bound to `corner` of `face` in `uv_set`.
    #[must_use]
    pub fn uv_of(&self, uv_set: &str, face: usize, corner: usize) -> Option<u32> {
        let start = *self.face_offsets.get(face)?;
        let set = self.uv_sets.get(uv_set)?;
        set.assignments.get(start + corner).copied().flatten()
    }
}

/// A [`MeshTarget`] producing [`MeshData`].
#[derive(Debug, Clone)]
pub struct MemoryMeshTarget {
    shading_connections: bool,
}

impl Default for MemoryMeshTarget {
    fn default() -> Self {
        Self::new(true)
    }
}

impl MemoryMeshTarget {
    #[must_use]
    pub fn new(shading_connections: bool) -> Self {
        Self { shading_connections }
    }
}

impl MeshTarget for MemoryMeshTarget {
    type Mesh = MeshData;

    fn create_mesh(&mut self, vertices: &[Vec3], face_counts: &[u32], connects: &[u32]) -> Result<MeshData> {
        let expected: usize = face_counts.iter().map(|&c| c as usize).sum();
        if expected != connects.len() {
            return Err(Error::external(
                "create mesh",
                format!("face counts sum to {expected} but {} connects given", connects.len()),
            ));
        }
        if let Some(&bad) = connects.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(Error::external(
                "create mesh",
                format!("vertex index {bad} out of range ({} vertices)", vertices.len()),
            ));
        }

        let mut face_offsets = Vec::with_capacity(face_counts.len());
        let mut offset = 0usize;
        for &count in face_counts {
            face_offsets.push(offset);
            offset += count as usize;
        }

        Ok(MeshData {
            vertices: vertices.to_vec(),
            face_counts: face_counts.to_vec(),
            connects: connects.to_vec(),
            uv_sets: FxHashMap::default(),
            face_offsets,
        })
    }

    fn set_uvs(&mut self, mesh: &mut MeshData, uv_set: &str, uvs: &[Vec2]) -> Result<()> {
        let corners = mesh.connects.len();
        let set = mesh.uv_sets.entry(uv_set.to_string()).or_default();
        set.uvs = uvs.to_vec();
        set.assignments = vec![None; corners];
        Ok(())
    }

    fn assign_uv(&mut self, mesh: &mut MeshData, face: u32, corner: u32, uv: u32, uv_set: &str) -> Result<()> {
        let face = face as usize;
        let corner = corner as usize;
        let Some(&start) = mesh.face_offsets.get(face) else {
            return Err(Error::external("assign uv", format!("face {face} out of range")));
        };
        if corner >= mesh.face_counts[face] as usize {
            return Err(Error::external(
                "assign uv",
                format!("corner {corner} out of range for face {face}"),
            ));
        }
        let Some(set) = mesh.uv_sets.get_mut(uv_set) else {
            return Err(Error::external("assign uv", format!("unknown uv set '{uv_set}'")));
        };
        if uv as usize >= set.uvs.len() {
            return Err(Error::external("assign uv", format!("uv {uv} out of range")));
        }
        set.assignments[start + corner] = Some(uv);
        Ok(())
    }

    fn has_shading_connections(&self) -> Result<bool> {
        Ok(self.shading_connections)
    }
}

/// An [`EnumAttribute`] backed by an ordered field table.
///
/// Counts every mutating call so callers can verify that an update was a
/// no-op.
#[derive(Debug, Clone, Default)]
pub struct MemoryEnumAttribute {
    name: String,
    fields: BTreeMap<i16, String>,
    mutations: usize,
}

impl MemoryEnumAttribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Number of `add_field`/`clear_fields` calls so far.
    #[must_use]
    pub fn mutations(&self) -> usize {
        self.mutations
    }

    /// `(index, name)` pairs in index order.
    pub fn fields(&self) -> impl Iterator<Item = (i16, &str)> {
        self.fields.iter().map(|(i, n)| (*i, n.as_str()))
    }
}

impl EnumAttribute for MemoryEnumAttribute {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_index(&self) -> Result<i16> {
        Ok(self.fields.keys().next_back().copied().unwrap_or(0))
    }

    fn field_name(&self, index: i16) -> Option<String> {
        self.fields.get(&index).cloned()
    }

    fn field_index(&self, name: &str) -> Option<i16> {
        self.fields.iter().find(|(_, n)| n.as_str() == name).map(|(i, _)| *i)
    }

    fn add_field(&mut self, name: &str, index: i16) -> Result<()> {
        self.mutations += 1;
        if let Some(existing) = self.fields.get(&index) {
            return Err(Error::external(
                "add enum field",
                format!("index {index} of '{}' already holds '{existing}'", self.name),
            ));
        }
        self.fields.insert(index, name.to_string());
        Ok(())
    }

    fn clear_fields(&mut self) -> Result<()> {
        self.mutations += 1;
        self.fields.clear();
        Ok(())
    }
}
