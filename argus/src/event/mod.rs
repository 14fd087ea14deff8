mod record;
mod trx;

pub use record::*;
pub use trx::*;
