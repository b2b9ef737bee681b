pub mod decode;
pub mod error;
pub mod record;
pub mod generic;
pub mod wyscout;

pub use decode::{decode_event, is_truthy};
pub use error::*;
pub use record::*;
pub use generic::Generic;
pub use wyscout::Wyscout;
