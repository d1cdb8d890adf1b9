use crate::assets::AssetCache;
use crate::encoder::accumulator::{AccumulatedMesh, Batch};
use crate::errors::{Error, Result};
use crate::host::{CommandExecutor, GroupId, MeshTarget};
use crate::settings::Settings;

/// A contiguous span of output faces sharing one shading group.
///
/// Both face indices are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialRange {
    pub start_face: u32,
    pub end_face: u32,
    pub shading_group: GroupId,
}

impl MaterialRange {
    #[must_use]
    pub fn face_count(&self) -> u32 {
        self.end_face - self.start_face + 1
    }

    #[must_use]
    pub fn contains(&self, face: u32) -> bool {
        (self.start_face..=self.end_face).contains(&face)
    }
}

/// Turns an [`AccumulatedMesh`] into a host mesh and its shading groups.
///
/// The materializer keeps the ranges of the last call; every call rebuilds
/// them from scratch.
#[derive(Debug, Clone)]
pub struct MeshMaterializer {
    uv_set_name: String,
    diffuse_slot: String,
    setup_materials: bool,
    ranges: Vec<MaterialRange>,
}

impl Default for MeshMaterializer {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl MeshMaterializer {
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            uv_set_name: settings.uv_set_name.clone(),
            diffuse_slot: settings.diffuse_slot.clone(),
            setup_materials: settings.setup_materials,
            ranges: Vec::new(),
        }
    }

    /// Ranges produced by the last [`materialize`](Self::materialize) call.
    #[must_use]
    pub fn ranges(&self) -> &[MaterialRange] {
        &self.ranges
    }

    /// Builds the mesh and, when the target feeds shading connections and the
    /// mesh carries UVs, binds them and creates one shading group per
    /// multi-face geometry.
    ///
    /// `assets` resolves texture URIs to locally staged files; unresolved
    /// URIs are used with their `file:` scheme stripped.
    ///
    /// Any failing host call aborts the whole operation. Shading groups
    /// created before the failure are not removed.
    pub fn materialize<'s, T, C>(
        &'s mut self,
        mesh: &AccumulatedMesh,
        target: &mut T,
        commands: &mut C,
        assets: Option<&AssetCache>,
    ) -> Result<(T::Mesh, &'s [MaterialRange])>
    where
        T: MeshTarget,
        C: CommandExecutor + ?Sized,
    {
        self.ranges.clear();

        let mut out = target.create_mesh(&mesh.vertices, &mesh.face_counts, &mesh.connects)?;

        log::trace!(
            "created mesh: {} vertices, {} faces, {} connects",
            mesh.vertices.len(),
            mesh.face_counts.len(),
            mesh.connects.len()
        );

        if !self.setup_materials {
            return Ok((out, &self.ranges));
        }

        let connected = target.has_shading_connections()?;
        log::trace!("mesh output has shading connections: {connected}");
        if !connected {
            return Ok((out, &self.ranges));
        }

        // Shading groups are only bound to textured meshes.
        if mesh.uv_connects.is_empty() {
            return Ok((out, &self.ranges));
        }
        target.set_uvs(&mut out, &self.uv_set_name, &mesh.uvs)?;
        log::trace!("uv connects: {}", mesh.uv_connects.len());

        let mut uv_cursor = 0usize;
        let mut cur_face = 0usize;
        for (gi, batch) in mesh.batches.iter().enumerate() {
            let texture_name = self.texture_name(batch, assets);
            log::trace!(
                "material {gi}: has_uvs = {}, face_count = {}, texture = '{texture_name}'",
                batch.has_uvs,
                batch.face_count
            );

            let start_face = cur_face;
            for _ in 0..batch.face_count {
                if mesh.face_has_uvs.get(cur_face).copied().unwrap_or(false) {
                    for corner in 0..mesh.face_counts[cur_face] {
                        let uv = *mesh.uv_connects.get(uv_cursor).ok_or_else(|| {
                            Error::InvariantViolation(format!(
                                "uv connectivity exhausted at face {cur_face}, corner {corner}"
                            ))
                        })?;
                        target.assign_uv(&mut out, cur_face as u32, corner, uv, &self.uv_set_name)?;
                        uv_cursor += 1;
                    }
                }
                cur_face += 1;
            }

            // Single-face geometries never get their own group.
            if cur_face > start_face + 1 {
                let shading_group = commands.create_shading_group(&texture_name)?;
                self.ranges.push(MaterialRange {
                    start_face: start_face as u32,
                    end_face: (cur_face - 1) as u32,
                    shading_group,
                });
            }
        }

        Ok((out, &self.ranges))
    }

    fn texture_name(&self, batch: &Batch, assets: Option<&AssetCache>) -> String {
        let Some(texture) = batch.material.first_texture(&self.diffuse_slot) else {
            return String::new();
        };
        assets
            .and_then(|cache| cache.lookup(&texture.uri))
            .map_or_else(|| texture.display_name().to_string(), |p| p.display().to_string())
    }
}
