// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Pull-request lifecycle status and the allow-list filter applied before
//! grouping.
//!
//! A status is resolved once per record from the raw state reported by GitHub
//! and the draft flag. The filter then decides whether the record takes part
//! in the report at all, so filtered records never reach the featured tracker
//! or the date buckets.

use std::{collections::BTreeSet, fmt};

/// Lifecycle status of a pull request at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Hash,)]
pub enum Status
{
    /// The pull request is open for review.
    Open,
    /// The pull request was merged.
    Merged,
    /// The pull request was closed without being merged.
    Closed,
    /// The pull request is still marked as a draft.
    Draft,
    /// Any other uppercased raw state reported upstream.
    Other(String,),
}

impl Status
{
    /// Resolves the status from the raw upstream state and the draft flag.
    ///
    /// The draft flag wins over the raw state. Otherwise the raw state is
    /// trimmed and uppercased; unknown values are preserved as
    /// [`Status::Other`].
    ///
    /// # Examples
    ///
    /// ```
    /// use oscr::Status;
    ///
    /// assert_eq!(Status::resolve("merged", false,), Status::Merged);
    /// assert_eq!(Status::resolve("OPEN", true,), Status::Draft);
    /// ```
    pub fn resolve(state: &str, is_draft: bool,) -> Self
    {
        if is_draft {
            return Self::Draft;
        }

        let upper = state.trim().to_uppercase();
        match upper.as_str() {
            "OPEN" => Self::Open,
            "MERGED" => Self::Merged,
            "CLOSED" => Self::Closed,
            "DRAFT" => Self::Draft,
            _ => Self::Other(upper,),
        }
    }

    /// Returns the uppercased status label used for filtering and display.
    pub fn as_str(&self,) -> &str
    {
        match self {
            Self::Open => "OPEN",
            Self::Merged => "MERGED",
            Self::Closed => "CLOSED",
            Self::Draft => "DRAFT",
            Self::Other(raw,) => raw.as_str(),
        }
    }

    /// Icon displayed in the status column of the report.
    ///
    /// Anything that is not merged, open, or draft renders as closed.
    pub fn icon(&self,) -> &'static str
    {
        match self {
            Self::Merged => MERGED_ICON,
            Self::Open => OPEN_ICON,
            Self::Draft => DRAFT_ICON,
            Self::Closed | Self::Other(_,) => CLOSED_ICON,
        }
    }
}

impl fmt::Display for Status
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.write_str(self.as_str(),)
    }
}

pub(crate) const OPEN_ICON: &str = "🟢";
pub(crate) const MERGED_ICON: &str = "🟣";
pub(crate) const DRAFT_ICON: &str = "⚪";
pub(crate) const CLOSED_ICON: &str = "🔴";

/// Allow-list of uppercased status labels.
///
/// An empty allow-list means no restriction was declared and keeps every
/// record, matching the behavior of an absent filter.
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct StatusFilter
{
    allowed: BTreeSet<String,>,
}

impl StatusFilter
{
    /// Builds a filter from status labels. Labels are trimmed and uppercased;
    /// blank labels are ignored.
    pub fn new<I, S,>(statuses: I,) -> Self
    where
        I: IntoIterator<Item = S,>,
        S: AsRef<str,>,
    {
        let allowed = statuses
            .into_iter()
            .map(|status| status.as_ref().trim().to_uppercase(),)
            .filter(|status| !status.is_empty(),)
            .collect();

        Self {
            allowed,
        }
    }

    /// Returns `true` when no status was declared.
    pub fn is_empty(&self,) -> bool
    {
        self.allowed.is_empty()
    }

    /// Iterates over the declared labels in alphabetical order.
    pub fn iter(&self,) -> impl Iterator<Item = &str,>
    {
        self.allowed.iter().map(String::as_str,)
    }

    /// Returns whether a record with the provided status is kept.
    pub fn allows(&self, status: &Status,) -> bool
    {
        self.allowed.is_empty() || self.allowed.contains(&status.as_str().to_uppercase(),)
    }
}

/// Decides whether a record with the provided status is retained.
///
/// An absent filter and an empty filter both keep every record.
///
/// # Examples
///
/// ```
/// use oscr::{Status, StatusFilter, retains_status};
///
/// let filter = StatusFilter::new(["OPEN", "MERGED",],);
/// assert!(retains_status(&Status::Open, Some(&filter),));
/// assert!(!retains_status(&Status::Closed, Some(&filter),));
/// assert!(retains_status(&Status::Closed, None,));
/// ```
pub fn retains_status(status: &Status, filter: Option<&StatusFilter,>,) -> bool
{
    filter.is_none_or(|filter| filter.allows(status,),)
}

#[cfg(test)]
mod tests
{
    use super::{Status, StatusFilter, retains_status};

    fn all_statuses() -> Vec<Status,>
    {
        vec![Status::Open, Status::Merged, Status::Closed, Status::Draft]
    }

    #[test]
    fn draft_flag_overrides_raw_state()
    {
        assert_eq!(Status::resolve("OPEN", true,), Status::Draft);
        assert_eq!(Status::resolve("CLOSED", true,), Status::Draft);
    }

    #[test]
    fn raw_state_is_uppercased()
    {
        assert_eq!(Status::resolve("open", false,), Status::Open);
        assert_eq!(Status::resolve(" Merged ", false,), Status::Merged);
        assert_eq!(Status::resolve("closed", false,), Status::Closed);
    }

    #[test]
    fn unknown_state_is_preserved_and_renders_closed_icon()
    {
        let status = Status::resolve("locked", false,);
        assert_eq!(status, Status::Other("LOCKED".to_owned(),));
        assert_eq!(status.as_str(), "LOCKED");
        assert_eq!(status.icon(), Status::Closed.icon());
    }

    #[test]
    fn icons_are_distinct_for_known_statuses()
    {
        assert_eq!(Status::Merged.icon(), "🟣");
        assert_eq!(Status::Open.icon(), "🟢");
        assert_eq!(Status::Draft.icon(), "⚪");
        assert_eq!(Status::Closed.icon(), "🔴");
    }

    #[test]
    fn allow_set_keeps_only_declared_statuses()
    {
        let filter = StatusFilter::new(["OPEN", "MERGED",],);
        let kept: Vec<Status,> = all_statuses()
            .into_iter()
            .filter(|status| retains_status(status, Some(&filter),),)
            .collect();

        assert_eq!(kept, vec![Status::Open, Status::Merged]);
    }

    #[test]
    fn empty_allow_set_keeps_everything()
    {
        let filter = StatusFilter::default();
        assert!(filter.is_empty());
        assert!(all_statuses().iter().all(|status| retains_status(status, Some(&filter),)));
    }

    #[test]
    fn absent_allow_set_keeps_everything()
    {
        assert!(all_statuses().iter().all(|status| retains_status(status, None,)));
    }

    #[test]
    fn filter_normalizes_declared_labels()
    {
        let filter = StatusFilter::new([" draft ", "", "closed",],);
        assert_eq!(filter.iter().collect::<Vec<_,>>(), vec!["CLOSED", "DRAFT"]);
        assert!(filter.allows(&Status::Draft));
        assert!(!filter.allows(&Status::Open));
    }
}
