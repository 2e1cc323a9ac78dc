//! CLI command implementations.
//!
//! | Module   | Commands handled |
//! |----------|------------------|
//! | `sync`   | `Sync`           |
//! | `scan`   | `Scan`           |
//! | `readme` | `CheckReadme`    |

pub mod readme;
pub mod scan;
pub mod sync;

pub use readme::cmd_check_readme;
pub use scan::cmd_scan;
pub use sync::cmd_sync;
