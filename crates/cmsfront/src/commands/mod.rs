//! CLI command implementations.

pub(crate) mod pages;
pub(crate) mod render;
pub(crate) mod serve;
mod source;

pub(crate) use pages::PagesArgs;
pub(crate) use render::RenderArgs;
pub(crate) use serve::ServeArgs;
