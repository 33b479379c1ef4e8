pub use self::{geometry::*, track::*};

pub(crate) mod geometry;
pub(crate) mod track;
