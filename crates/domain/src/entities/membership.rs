use crate::entities::DateRange;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One continuous interval of group activity for a user. A user may hold
/// several non-overlapping intervals per group (left and rejoined), but at
/// most one open interval (left_on = None) at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub group_id: Uuid,
    pub joined_on: NaiveDate,
    pub left_on: Option<NaiveDate>,
}

impl Membership {
    pub fn new(user_id: Uuid, group_id: Uuid, joined_on: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            group_id,
            joined_on,
            left_on: None,
        }
    }

    pub fn with_id(
        id: Uuid,
        user_id: Uuid,
        group_id: Uuid,
        joined_on: NaiveDate,
        left_on: Option<NaiveDate>,
    ) -> Self {
        Self {
            id,
            user_id,
            group_id,
            joined_on,
            left_on,
        }
    }

    pub fn is_open(&self) -> bool {
        self.left_on.is_none()
    }

    /// Active during the range iff joined on or before its end and not left
    /// before its start.
    pub fn overlaps(&self, range: &DateRange) -> bool {
        self.joined_on <= range.to && self.left_on.map_or(true, |left| left >= range.from)
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.overlaps(&DateRange::on(date))
    }
}
