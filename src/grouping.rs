// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Year and month buckets for retained contribution records.
//!
//! Buckets are created lazily as records arrive. Iteration helpers walk them
//! most recent first, which is the order the report is rendered in.

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::record::ContributionRecord;

/// Month bucket key. Ordering follows the month number only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash,)]
pub struct MonthKey
{
    /// Calendar month number, `1..=12`.
    pub number: u32,
    /// English month name used for headings.
    pub name:   String,
}

/// Records bucketed by calendar year, then calendar month.
#[derive(Debug, Clone, Default, PartialEq,)]
pub struct ContributionsByDate
{
    years: BTreeMap<i32, BTreeMap<MonthKey, Vec<ContributionRecord,>,>,>,
}

impl ContributionsByDate
{
    /// Creates an empty set of buckets.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Appends the record to the bucket of its UTC creation month.
    pub fn insert(&mut self, record: ContributionRecord,)
    {
        let created = record.created_at;
        let key = MonthKey {
            number: created.month(),
            name:   created.format("%B",).to_string(),
        };

        self.years.entry(created.year(),).or_default().entry(key,).or_default().push(record,);
    }

    /// Total number of records across all buckets.
    pub fn len(&self,) -> usize
    {
        self.years.values().flat_map(BTreeMap::values,).map(Vec::len,).sum()
    }

    /// Returns `true` when no record was inserted.
    pub fn is_empty(&self,) -> bool
    {
        self.years.is_empty()
    }

    /// Years in descending order.
    pub fn years_descending(&self,) -> impl Iterator<Item = i32,> + '_
    {
        self.years.keys().rev().copied()
    }

    /// Month buckets of `year` in descending month order.
    pub fn months_descending(
        &self,
        year: i32,
    ) -> impl Iterator<Item = (&MonthKey, &[ContributionRecord],),> + '_
    {
        self.years
            .get(&year,)
            .into_iter()
            .flat_map(|months| months.iter().rev(),)
            .map(|(key, records,)| (key, records.as_slice(),),)
    }

    /// Records of one `(year, month)` bucket in insertion order.
    pub fn bucket(&self, year: i32, month: u32,) -> Option<&[ContributionRecord],>
    {
        self.years
            .get(&year,)?
            .iter()
            .find(|(key, _,)| key.number == month,)
            .map(|(_, records,)| records.as_slice(),)
    }
}

impl FromIterator<ContributionRecord,> for ContributionsByDate
{
    fn from_iter<I: IntoIterator<Item = ContributionRecord,>,>(iter: I,) -> Self
    {
        let mut grouped = Self::new();
        for record in iter {
            grouped.insert(record,);
        }
        grouped
    }
}
