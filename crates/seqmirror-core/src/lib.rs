//! Shared models + pure algorithms for the sequencer mirror client.

pub mod collapsed;
pub mod envelope;
pub mod equipment;
pub mod guider;
pub mod profile;
pub mod sequence;
pub mod snapshot;
pub mod version;

pub use collapsed::*;
pub use envelope::*;
pub use equipment::*;
pub use guider::*;
pub use profile::*;
pub use sequence::*;
pub use snapshot::*;
pub use version::*;
