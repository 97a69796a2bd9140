//! Worked Time Report

use std::{collections::BTreeMap, io};

use jiff::Timestamp;
use rust_decimal::{Decimal, RoundingStrategy};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::{technicians::TechUuid, timeclock::entry::TimeEntry};

/// Totals for one technician.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TechWorkedTime {
    /// Entries counted.
    pub entries: usize,

    /// Entries still open when the report was taken.
    pub open_entries: usize,

    /// Entries an administrator corrected.
    pub edited_entries: usize,

    /// Sum of per-entry worked minutes, unrounded.
    pub minutes: Decimal,
}

impl TechWorkedTime {
    /// Worked minutes rounded to the whole minute for display.
    #[must_use]
    pub fn whole_minutes(&self) -> Decimal {
        self.minutes
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Worked time per technician.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkedTimeReport {
    techs: BTreeMap<TechUuid, TechWorkedTime>,
}

impl WorkedTimeReport {
    /// Sum worked minutes per technician, evaluating open shifts at `now`.
    pub fn from_entries<'a>(
        entries: impl IntoIterator<Item = &'a TimeEntry>,
        now: Timestamp,
    ) -> Self {
        let mut techs: BTreeMap<TechUuid, TechWorkedTime> = BTreeMap::new();

        for entry in entries {
            let totals = techs.entry(entry.tech_uuid).or_default();

            totals.entries += 1;
            totals.minutes += entry.worked_minutes(now);

            if entry.is_open() {
                totals.open_entries += 1;
            }

            if entry.is_edited() {
                totals.edited_entries += 1;
            }
        }

        Self { techs }
    }

    /// Totals for one technician.
    #[must_use]
    pub fn tech(&self, tech_uuid: TechUuid) -> Option<&TechWorkedTime> {
        self.techs.get(&tech_uuid)
    }

    /// Iterate technicians in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TechUuid, &TechWorkedTime)> {
        self.techs.iter().map(|(tech, totals)| (*tech, totals))
    }

    /// Sum across all technicians, unrounded.
    #[must_use]
    pub fn total_minutes(&self) -> Decimal {
        self.techs.values().map(|totals| totals.minutes).sum()
    }

    /// Whether any entries were counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.techs.is_empty()
    }

    /// Render as a table, one row per technician.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> io::Result<()> {
        let mut builder = Builder::default();

        builder.push_record(["Technician", "Entries", "Open", "Edited", "Minutes", "Hours"]);

        for (tech, totals) in self.iter() {
            let minutes = totals.whole_minutes();

            builder.push_record([
                tech.to_string(),
                totals.entries.to_string(),
                totals.open_entries.to_string(),
                totals.edited_entries.to_string(),
                minutes.to_string(),
                hours(minutes).to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(1..), Alignment::right());

        writeln!(out, "{table}")
    }
}

fn hours(minutes: Decimal) -> Decimal {
    (minutes / Decimal::from(60)).round_dp(2)
}
