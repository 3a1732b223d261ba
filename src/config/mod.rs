//! all logic related to instantiating a running configuration

mod container;
mod utils;

pub use self::container::Configuration;
pub use self::utils::{parse_time_limit, split_header};
