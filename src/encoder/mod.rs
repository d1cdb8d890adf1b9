//! Geometry Encoder
//!
//! Converts the rule engine's leaf geometries into a single host mesh.
//!
//! Encoding runs in two phases:
//!
//! 1. [`GeometryAccumulator`] merges every geometry into flat vertex, face
//!    and UV buffers, rebasing local indices as it goes.
//! 2. [`MeshMaterializer`] hands the buffers to a [`MeshTarget`], binds the
//!    UV set and creates one shading group per multi-face geometry.
//!
//! [`Encoder`] drives both phases for one evaluation.
//!
//! ```rust,ignore
//! let mut encoder = Encoder::new(&settings);
//! let encoded = encoder.encode(geometries, &mut target, &mut commands, Some(&cache))?;
//! for range in &encoded.ranges {
//!     println!("{}..={} -> {}", range.start_face, range.end_face, range.shading_group);
//! }
//! ```

pub mod accumulator;
pub mod materializer;

use std::time::Instant;

pub use accumulator::{AccumulatedMesh, Batch, GeometryAccumulator};
pub use materializer::{MaterialRange, MeshMaterializer};

use crate::assets::AssetCache;
use crate::errors::Result;
use crate::host::{CommandExecutor, MeshTarget};
use crate::resources::geometry::Geometry;
use crate::settings::Settings;

/// Output of one [`Encoder::encode`] call.
#[derive(Debug, Clone)]
pub struct EncodedMesh<M> {
    pub mesh: M,
    pub ranges: Vec<MaterialRange>,
    pub stats: EncodeStats,
}

/// Buffer sizes of an encoded mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeStats {
    pub geometries: usize,
    pub vertices: usize,
    pub faces: usize,
    pub connects: usize,
    pub uvs: usize,
    pub uv_connects: usize,
}

impl EncodeStats {
    fn of(mesh: &AccumulatedMesh) -> Self {
        Self {
            geometries: mesh.batches.len(),
            vertices: mesh.vertices.len(),
            faces: mesh.face_counts.len(),
            connects: mesh.connects.len(),
            uvs: mesh.uvs.len(),
            uv_connects: mesh.uv_connects.len(),
        }
    }
}

/// Runs accumulation and materialization for a node.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    materializer: MeshMaterializer,
}

impl Encoder {
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            materializer: MeshMaterializer::new(settings),
        }
    }

    /// Ranges of the last successful or partially failed encode.
    #[must_use]
    pub fn ranges(&self) -> &[MaterialRange] {
        self.materializer.ranges()
    }

    pub fn encode<I, T, C>(
        &mut self,
        geometries: I,
        target: &mut T,
        commands: &mut C,
        assets: Option<&AssetCache>,
    ) -> Result<EncodedMesh<T::Mesh>>
    where
        I: IntoIterator<Item = Geometry>,
        T: MeshTarget,
        C: CommandExecutor + ?Sized,
    {
        let timer = Instant::now();
        let accumulated = geometries.into_iter().collect::<GeometryAccumulator>().finish();
        let t_accumulate = timer.elapsed();

        let timer = Instant::now();
        let (mesh, ranges) = self.materializer.materialize(&accumulated, target, commands, assets)?;
        let ranges = ranges.to_vec();
        let t_materialize = timer.elapsed();

        let stats = EncodeStats::of(&accumulated);
        log::info!(
            "encode(): {} geometries, {} faces, {} shading groups; accumulation {:.3} s, materialization {:.3} s",
            stats.geometries,
            stats.faces,
            ranges.len(),
            t_accumulate.as_secs_f32(),
            t_materialize.as_secs_f32()
        );

        Ok(EncodedMesh { mesh, ranges, stats })
    }
}
