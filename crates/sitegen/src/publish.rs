// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The publish window: which records are visible on a given day.
//!
//! A record is visible iff its status is `published` and its publish date is
//! absent or not after today. The same rule applies to products and posts.

use crate::records::{Publishable, RecordMeta, Status};
use chrono::NaiveDate;
use diagnostics::*;

/// Outcome of the visibility check for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    /// Status is not `published`
    NotPublished(Status),
    /// Published, but the date is still in the future
    Scheduled(NaiveDate),
}

/// Visibility rule evaluated against a fixed calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishWindow {
    pub today: NaiveDate,
}

impl PublishWindow {
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Window for the local calendar date.
    #[must_use]
    pub fn today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }

    #[must_use]
    pub fn visibility(&self, meta: &RecordMeta) -> Visibility {
        if meta.status != Status::Published {
            return Visibility::NotPublished(meta.status);
        }
        match meta.publish_date {
            Some(date) if date > self.today => Visibility::Scheduled(date),
            _ => Visibility::Visible,
        }
    }

    #[must_use]
    pub fn is_visible(&self, meta: &RecordMeta) -> bool {
        self.visibility(meta) == Visibility::Visible
    }

    /// Keep the visible records, in their original order.
    ///
    /// Returns the visible records and how many were hidden.
    pub fn filter<T: Publishable>(&self, records: Vec<T>) -> (Vec<T>, usize) {
        let total = records.len();
        let visible: Vec<T> = records
            .into_iter()
            .filter(|record| {
                let meta = record.meta();
                match self.visibility(meta) {
                    Visibility::Visible => true,
                    Visibility::NotPublished(status) => {
                        let id = meta.id.clone();
                        let status = status.as_str();
                        debug!("Skipping {id}: status is {status}", id: id, status: status);
                        false
                    }
                    Visibility::Scheduled(date) => {
                        let id = meta.id.clone();
                        let date = date.to_string();
                        debug!("Skipping {id}: scheduled for {date}", id: id, date: date);
                        false
                    }
                }
            })
            .collect();
        let hidden = total - visible.len();
        (visible, hidden)
    }
}
