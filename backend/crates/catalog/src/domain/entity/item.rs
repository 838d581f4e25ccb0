//! Item Entity

use chrono::{DateTime, Utc};
use kernel::id::{CategoryId, ImageId, ItemId};

use crate::error::{CatalogError, CatalogResult};

pub const ITEM_TITLE_FIELD: &str = "item_title";
pub const EMPTY_ITEM_TITLE: &str = "Empty Item Title";

/// Trimmed, non-empty item title
pub fn validate_title(input: &str) -> CatalogResult<String> {
    let title = input.trim();
    if title.is_empty() {
        return Err(CatalogError::validation(ITEM_TITLE_FIELD, EMPTY_ITEM_TITLE));
    }
    Ok(title.to_string())
}

/// Item row
///
/// `image_id` is a loose reference: the image row may be gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    pub category_id: CategoryId,
    pub image_id: Option<ImageId>,
    pub updated_at: DateTime<Utc>,
}

/// Item not yet persisted
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub category_id: CategoryId,
    pub image_id: Option<ImageId>,
}

/// Partial update; `None` leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub image_id: Option<ImageId>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
            && self.image_id.is_none()
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(value) if *slot != value => {
            *slot = value;
            true
        }
        _ => false,
    }
}

impl Item {
    /// Apply the supplied fields; `updated_at` moves only if something
    /// actually changed. Returns whether anything changed.
    pub fn apply(&mut self, patch: ItemPatch, now: DateTime<Utc>) -> bool {
        let mut changed = replace(&mut self.title, patch.title);
        changed |= replace(&mut self.description, patch.description);
        changed |= replace(&mut self.category_id, patch.category_id);
        if let Some(image_id) = patch.image_id {
            changed |= replace(&mut self.image_id, Some(Some(image_id)));
        }

        if changed {
            self.updated_at = now;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn item() -> Item {
        Item {
            id: ItemId::from_i64(1),
            title: "Burton Custom".into(),
            description: "All-mountain board".into(),
            category_id: CategoryId::from_i64(2),
            image_id: Some(ImageId::from_i64(3)),
            updated_at: Utc::now() - Duration::minutes(1),
        }
    }

    #[test]
    fn test_title_only_patch() {
        let mut item = item();
        let before = item.clone();
        let now = Utc::now();

        let changed = item.apply(
            ItemPatch {
                title: Some("Burton Process".into()),
                ..Default::default()
            },
            now,
        );

        assert!(changed);
        assert_eq!(item.title, "Burton Process");
        assert_eq!(item.description, before.description);
        assert_eq!(item.category_id, before.category_id);
        assert_eq!(item.image_id, before.image_id);
        assert_eq!(item.updated_at, now);
    }

    #[test]
    fn test_empty_patch_keeps_timestamp() {
        let mut item = item();
        let before = item.clone();

        assert!(ItemPatch::default().is_empty());
        assert!(!item.apply(ItemPatch::default(), Utc::now()));
        assert_eq!(item, before);
    }

    #[test]
    fn test_same_values_keep_timestamp() {
        let mut item = item();
        let before = item.clone();

        let patch = ItemPatch {
            title: Some(before.title.clone()),
            description: Some(before.description.clone()),
            category_id: Some(before.category_id),
            image_id: before.image_id,
        };
        assert!(!item.apply(patch, Utc::now()));
        assert_eq!(item.updated_at, before.updated_at);
    }

    #[test]
    fn test_image_and_category_patch() {
        let mut item = item();
        let now = Utc::now();

        item.apply(
            ItemPatch {
                category_id: Some(CategoryId::from_i64(9)),
                image_id: Some(ImageId::from_i64(10)),
                ..Default::default()
            },
            now,
        );

        assert_eq!(item.category_id, CategoryId::from_i64(9));
        assert_eq!(item.image_id, Some(ImageId::from_i64(10)));
        assert_eq!(item.title, "Burton Custom");
    }

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title(" Goggles ").unwrap(), "Goggles");
        assert_eq!(validate_title("  ").unwrap_err().to_string(), EMPTY_ITEM_TITLE);
    }
}
