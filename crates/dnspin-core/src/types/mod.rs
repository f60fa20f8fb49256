mod plan;
mod record;
mod report;
mod tlsa;
mod zone;

pub use plan::*;
pub use record::*;
pub use report::*;
pub use tlsa::*;
pub use zone::*;
