mod leg_record;
mod mode_tag;
mod person_chain;
mod stop_record;
mod trip_key;
mod trip_record;

pub use leg_record::LegRecord;
pub use mode_tag::ModeTag;
pub use person_chain::PersonChain;
pub use stop_record::StopRecord;
pub use trip_key::TripKey;
pub use trip_record::{TripRecord, MODE_LIST_SEPARATORS};
