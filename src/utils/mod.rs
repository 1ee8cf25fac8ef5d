//! Small helpers shared by the HTTP layer.

pub mod html;
pub mod mime;
