/*!
 * Permission Types Module
 * Value types for passes, nodes, and resolution results
 */

mod node;
mod pass;
mod resolved;
mod scoped;

pub use node::{normalize as normalize_node, Node};
pub use pass::Pass;
pub use resolved::Resolved;
pub use scoped::ScopedPass;
