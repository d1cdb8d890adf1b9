#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod assets;
pub mod context;
pub mod encoder;
pub mod errors;
pub mod host;
pub mod resources;
pub mod rules;
pub mod settings;

pub use assets::{AssetCache, CacheStats, CacheStatus, PackageCache};
pub use context::{Context, EnumSyncReport, InitialShape, RuleEngine};
pub use encoder::{EncodedMesh, Encoder, GeometryAccumulator, MaterialRange, MeshMaterializer};
pub use errors::{Error, Result};
pub use host::{CommandExecutor, EnumAttribute, GroupId, MeshTarget};
pub use resources::{AttributeMap, AttributeValue, Face, Geometry, Material, TextureRef, color_string, parse_color};
pub use rules::{EnumSynchronizer, EnumUpdate, RuleAttribute, RuleAttributeRegistry};
pub use settings::Settings;
