pub mod attribute_map;
pub mod color;
pub mod geometry;
pub mod material;

pub use attribute_map::{AttributeMap, AttributeValue};
pub use color::{color_string, parse_color};
pub use geometry::{Face, FaceIndices, Geometry};
pub use material::{Material, TextureRef};
