//! Host Boundary
//!
//! Traits describing the host application (DCC) calls the bridge needs. The
//! encoder and the enum synchronizer only ever talk to the host through
//! these seams:
//!
//! - [`MeshTarget`]: build a mesh from flat buffers and bind texture coordinates
//! - [`CommandExecutor`]: create shading groups through the host's scripting layer
//! - [`EnumAttribute`]: inspect and rewrite the fields of an enum attribute
//!
//! [`memory`] provides in-memory implementations used for headless
//! evaluation and tests; [`script`] backs [`CommandExecutor`] with a script
//! runner.

pub mod memory;
pub mod script;

use glam::{Vec2, Vec3};

use crate::errors::Result;

pub use memory::{MemoryEnumAttribute, MemoryMeshTarget, MeshData, UvSet};
pub use script::{ScriptBuilder, ScriptCommandExecutor};

/// Identifier the host returns for a created shading group.
pub type GroupId = String;

/// Receives the encoded mesh.
pub trait MeshTarget {
    /// Host-side mesh handle.
    type Mesh;

    /// Creates a mesh from a vertex pool, one vertex count per face and the
    /// flattened face connectivity.
    fn create_mesh(&mut self, vertices: &[Vec3], face_counts: &[u32], connects: &[u32]) -> Result<Self::Mesh>;

    /// Replaces the texture coordinates of `uv_set`.
    fn set_uvs(&mut self, mesh: &mut Self::Mesh, uv_set: &str, uvs: &[Vec2]) -> Result<()>;

    /// Binds UV `uv` to corner `corner` of face `face`.
    fn assign_uv(&mut self, mesh: &mut Self::Mesh, face: u32, corner: u32, uv: u32, uv_set: &str) -> Result<()>;

    /// Whether the output feeds downstream shading connections. Materials
    /// are only set up when this is `true`.
    fn has_shading_connections(&self) -> Result<bool>;
}

/// Side-effecting host commands issued by the encoder.
pub trait CommandExecutor {
    fn create_shading_group(&mut self, texture_name: &str) -> Result<GroupId>;
}

/// An enum-typed attribute on a host node.
///
/// Field indices follow the host convention of small signed integers; index
/// `0` is reserved for a value that is not part of the enumerated options.
pub trait EnumAttribute {
    fn name(&self) -> &str;

    /// Highest field index declared on the attribute.
    fn max_index(&self) -> Result<i16>;

    fn field_name(&self, index: i16) -> Option<String>;

    fn field_index(&self, name: &str) -> Option<i16>;

    fn add_field(&mut self, name: &str, index: i16) -> Result<()>;

    /// Removes every field.
    fn clear_fields(&mut self) -> Result<()>;
}
