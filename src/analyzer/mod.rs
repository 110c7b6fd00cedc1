//! Resolution engine: from branch topology to a semantic version

pub mod builder;
pub mod distance;
pub mod graph;
pub mod locator;
pub mod resolver;

pub use builder::build_version;
pub use distance::count_distance;
pub use graph::CommitGraph;
pub use locator::VersionPointLocator;
pub use resolver::{
    open_repository, skip_or_fail, Outcome, ResolvedVersion, SkipReason, VersionResolver,
};
