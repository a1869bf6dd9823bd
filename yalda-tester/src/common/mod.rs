pub mod scenario;
mod util;

pub use util::{run_stamp, split_csv};
