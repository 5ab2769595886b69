/*!
 * Data Module
 * Persistence boundary for users and groups
 *
 * The resolution core only talks to [`DataSource`]; encoding lives entirely
 * in this module.
 */

pub mod errors;
pub mod memory;
pub mod record;
pub mod traits;
pub mod yaml;

pub use errors::{DataError, DataResult};
pub use memory::MemorySource;
pub use record::{GroupRecord, PassRecord, ScopedRecord, UserRecord};
pub use traits::DataSource;
pub use yaml::YamlSource;
