pub mod article;
pub mod common;
pub mod pokemon;
pub mod trainer;
pub mod user;

pub use article::*;
pub use common::*;
pub use pokemon::*;
pub use trainer::*;
pub use user::*;
