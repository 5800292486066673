mod common;
mod facade;

pub use common::{fin_height, fin_offset, mullion_offset, FacadePalette, Group, FIN_COUNT, MULLION_COUNT};
pub use facade::create_facade_scene;
