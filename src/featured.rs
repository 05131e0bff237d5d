// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Featured repositories and their display priority.

use std::{cmp::Ordering, collections::HashMap};

/// Minimum declared `featured_order` per featured repository.
///
/// A repository is present only when at least one of its retained records was
/// explicitly marked featured. An absent order counts as `+∞`, the lowest
/// display priority. Identifiers are matched case-insensitively; the casing
/// seen first is the one displayed.
#[derive(Debug, Clone, Default, PartialEq,)]
pub struct FeaturedRepositories
{
    /// Lowercased identifier → (display identifier, minimum order).
    orders: HashMap<String, (String, f64,),>,
}

impl FeaturedRepositories
{
    /// Creates an empty tracker.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Records a featured contribution for `repository`.
    ///
    /// Keeps the smallest order observed so far for the repository.
    pub fn record(&mut self, repository: &str, order: Option<f64,>,)
    {
        let order = order.filter(|value| !value.is_nan(),).unwrap_or(f64::INFINITY,);
        self.orders
            .entry(repository.to_lowercase(),)
            .and_modify(|(_, current,)| {
                if order < *current {
                    *current = order;
                }
            },)
            .or_insert_with(|| (repository.to_owned(), order,),);
    }

    /// Returns the tracked order for `repository`, if it is featured.
    pub fn order_of(&self, repository: &str,) -> Option<f64,>
    {
        self.orders.get(&repository.to_lowercase(),).map(|(_, order,)| *order,)
    }

    /// Returns `true` when no repository is featured.
    pub fn is_empty(&self,) -> bool
    {
        self.orders.is_empty()
    }

    /// Number of featured repositories.
    pub fn len(&self,) -> usize
    {
        self.orders.len()
    }

    /// Featured repositories in display order: ascending order value, then
    /// case-insensitive repository identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use oscr::FeaturedRepositories;
    ///
    /// let mut featured = FeaturedRepositories::new();
    /// featured.record("a/a", Some(2.0,),);
    /// featured.record("b/b", Some(1.0,),);
    /// featured.record("c/c", None,);
    /// assert_eq!(featured.sorted(), vec!["b/b", "a/a", "c/c"]);
    /// ```
    pub fn sorted(&self,) -> Vec<&str,>
    {
        let mut entries: Vec<(&str, &str, f64,),> = self
            .orders
            .iter()
            .map(|(key, (name, order,),)| (key.as_str(), name.as_str(), *order,),)
            .collect();
        entries.sort_by(|(left_key, _, left_order,), (right_key, _, right_order,)| {
            left_order
                .partial_cmp(right_order,)
                .unwrap_or(Ordering::Equal,)
                .then_with(|| left_key.cmp(right_key,),)
        },);
        entries.into_iter().map(|(_, name, _,)| name,).collect()
    }
}

/// Parses a `FeaturedOrder` cell, returning `None` for blank or malformed
/// values.
pub fn parse_featured_order(value: &str,) -> Option<f64,>
{
    value.trim().parse::<f64,>().ok().filter(|order| !order.is_nan(),)
}
