pub mod money;
pub mod profile;
pub mod record;

pub use money::Amount;
pub use profile::{ConversionProfile, ProfileError, ReferenceSchema, SourceSchema};
pub use record::{OutputRecord, Record};
