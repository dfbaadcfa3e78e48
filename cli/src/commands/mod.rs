mod badges;
mod demo;
mod entry;
mod export;
mod goals;
mod helpers;
mod summary;

pub(crate) use badges::cmd_badges;
pub(crate) use demo::cmd_demo;
pub(crate) use entry::{LogInput, cmd_delete, cmd_log, cmd_show};
pub(crate) use export::{cmd_export_csv, cmd_export_json, cmd_import_json};
pub(crate) use goals::{cmd_goals_clear, cmd_goals_set, cmd_goals_show};
pub(crate) use summary::{cmd_history, cmd_stats};
