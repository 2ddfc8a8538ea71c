//! Hierarchical job resource specifications ("jobspecs").
//!
//! A jobspec describes the resources a job needs as a tree of counted
//! resources (nodes, slots, cores, GPUs), the tasks to run in labeled slots,
//! and a nested mapping of attributes such as the duration and working
//! directory.
//!
//! ```
//! use fluxboot_jobspec::JobSpecV1;
//!
//! let mut jobspec = JobSpecV1::builder()
//!     .command(vec!["hostname".to_string()])
//!     .num_tasks(4)
//!     .cores_per_task(2)
//!     .build()
//!     .into_jobspec()
//!     .unwrap();
//! jobspec.set_duration("1h").unwrap();
//!
//! assert_eq!(jobspec.total_cores().unwrap(), 8);
//! assert_eq!(jobspec.duration(), Some(3600.0));
//! ```

mod duration;
mod error;
mod jobspec;
pub mod resource;
pub mod tree;
mod v1;

pub use duration::*;
pub use error::*;
pub use jobspec::*;
pub use resource::Resource;
pub use v1::*;
