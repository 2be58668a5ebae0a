mod checksum;
mod dist;
mod index;
mod plan;
mod spec;

pub use checksum::Checksum;
pub use dist::{Dist, ARCHIVE_SUFFIX, CHANNEL_SEPARATOR, DEFAULT_CHANNEL};
pub use index::{ChannelIndex, IndexEntry};
pub use plan::{ActionPlan, PlanOp};
pub use spec::{parse_spec_line, ExplicitSpec, EXPLICIT_MARKER};
