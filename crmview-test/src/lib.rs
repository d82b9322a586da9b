mod mock;

pub use mock::{record, records, MockApi, RecordedCall};
