//! Types and traits for handling incoming body data.

mod data;
mod data_stream;
mod net_stream;
mod from_data;

pub use self::data::Data;
pub use self::data_stream::DataStream;
pub use self::from_data::{FromData, FromDataSimple, Outcome, Transform, Transformed};
