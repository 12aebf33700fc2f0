use super::entry::TimeEntry;
use super::formatter::EntryGroup;
use anyhow::Result;
use chrono::{DateTime, Utc};
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn active_entries(entries: &Vec<TimeEntry>, now: DateTime<Utc>) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["#", "TASK", "STARTED", "STATE", "ELAPSED"]);
        for entry in entries.format(now) {
            table.add_row(row![entry.row, entry.task, entry.start, entry.state, entry.elapsed]);
        }
        table.printstd();

        Ok(())
    }
}
