mod dispatch;
pub mod plan;
pub mod run;

pub use dispatch::dispatch;
