mod handlers;
mod path;
mod walker;

pub use handlers::{Handler, Handlers};
pub use path::{NodePath, Slot};
pub use walker::{TraversalStats, traverse};
