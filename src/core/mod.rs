pub mod achievements;
pub mod bot;
pub mod commands;
pub mod handlers;
pub mod replies;
pub mod retry;

pub use crate::domain::model::{Command, GlobalStats, Player, Update};
pub use crate::domain::ports::{ChatApi, ConfigProvider, StatsRepository};
pub use crate::utils::error::Result;
