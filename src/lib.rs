pub mod api;
pub mod chart;
pub mod command;
pub mod compiler;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod hand;

pub use api::{compile_chart, compile_chart_file, compile_hands, compile_score, CompiledChart};
pub use chart::*;
pub use command::{Command, Hand, Lane};
pub use compiler::{compile, compile_ordered};
pub use config::{CommandOrder, CompileOptions};
pub use dispatch::{ArmState, Dispatcher};
pub use error::*;
pub use hand::{split_by_hand, HandNote};
