//! Update protocol codec.
//!
//! Maps the `/{action}/{kind}/{name}[/{value}]` wire form to storage
//! operations, and renders storage reads back into response bodies.

mod path;
mod render;

pub use path::{route, update_path, Route, UPDATE_PREFIX, VALUE_PREFIX};
pub use render::{render_listing, render_value};
