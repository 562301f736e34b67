//! Invariant Validator
//!
//! Answers whether a mutation may be sent to the tag store, and if not, which
//! rule it breaks. Every check runs against a [`TagIndex`] built from the
//! caller's current tree and never mutates anything.
//!
//! ## Rules
//!
//! 1. Names cannot be empty or whitespace only
//! 2. A tag cannot be moved under itself or any of its descendants
//! 3. Tertiary tags cannot have children
//! 4. A referenced parent must exist
//! 5. A moved subtree must still fit within three tiers
//! 6. Siblings cannot share a name (trimmed, case-insensitive)
//!
//! The `can_*` / `validate_name` functions answer yes or no; their `check_*`
//! counterparts return the [`ValidationError`] naming the failed rule.

use super::error::ValidationError;
use crate::models::{TagId, TagIndex, TagUpdate, MAX_TIER_DEPTH};

/// Whether `name` is acceptable as a tag name
pub fn validate_name(name: &str) -> bool {
    check_name(name).is_ok()
}

/// Validate a tag name, returning it trimmed
///
/// # Examples
///
/// ```
/// use taxonomy_core::services::validator::check_name;
///
/// assert_eq!(check_name("  Invoices ").unwrap(), "Invoices");
/// assert!(check_name("   ").is_err());
/// ```
pub fn check_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Normalize a name for sibling comparison
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Whether `parent_id` may receive a new child
pub fn can_add_child(index: &TagIndex, parent_id: TagId) -> bool {
    check_add_child(index, parent_id).is_ok()
}

pub fn check_add_child(index: &TagIndex, parent_id: TagId) -> Result<(), ValidationError> {
    let parent = index
        .get(parent_id)
        .ok_or(ValidationError::ParentNotFound { parent_id })?;

    if !parent.tier.accepts_children() {
        return Err(ValidationError::TertiaryParent { parent_id });
    }
    Ok(())
}

/// Whether `tag_id` may be moved under `candidate_parent`
pub fn can_reparent(index: &TagIndex, tag_id: TagId, candidate_parent: TagId) -> bool {
    check_reparent(index, tag_id, Some(candidate_parent)).is_ok()
}

/// Validate moving `tag_id` under `candidate_parent` (`None` = make it a root)
pub fn check_reparent(
    index: &TagIndex,
    tag_id: TagId,
    candidate_parent: Option<TagId>,
) -> Result<(), ValidationError> {
    if !index.contains(tag_id) {
        return Err(ValidationError::TagNotFound { tag_id });
    }

    let Some(parent_id) = candidate_parent else {
        return Ok(());
    };

    let parent = index
        .get(parent_id)
        .ok_or(ValidationError::ParentNotFound { parent_id })?;

    // The tag and everything under it are off limits as a new parent
    if index.descendant_ids(tag_id).contains(&parent_id) {
        return Err(ValidationError::cyclic_reparent(tag_id, parent_id));
    }

    if !parent.tier.accepts_children() {
        return Err(ValidationError::TertiaryParent { parent_id });
    }

    let deepest = parent.depth + 1 + index.subtree_height(tag_id);
    if deepest > MAX_TIER_DEPTH {
        return Err(ValidationError::DepthExceeded { tag_id, parent_id });
    }

    Ok(())
}

/// Reject `name` if another child of `parent` (other than `exclude`) already has it
pub fn check_unique_sibling(
    index: &TagIndex,
    parent: Option<TagId>,
    name: &str,
    exclude: Option<TagId>,
) -> Result<(), ValidationError> {
    let wanted = normalize_name(name);
    let clash = index
        .children_of(parent)
        .iter()
        .filter(|id| Some(**id) != exclude)
        .filter_map(|id| index.get(*id))
        .any(|sibling| normalize_name(&sibling.name) == wanted);

    if clash {
        return Err(ValidationError::duplicate_sibling(name.trim()));
    }
    Ok(())
}

/// Validate a create request, returning the trimmed name
pub fn check_create(
    index: &TagIndex,
    name: &str,
    parent_id: Option<TagId>,
) -> Result<String, ValidationError> {
    let name = check_name(name)?;
    if let Some(parent_id) = parent_id {
        check_add_child(index, parent_id)?;
    }
    check_unique_sibling(index, parent_id, &name, None)?;
    Ok(name)
}

/// Validate a combined update, returning it with the name trimmed
///
/// When both fields change, uniqueness is checked for the new name at the
/// destination parent.
pub fn check_update(
    index: &TagIndex,
    tag_id: TagId,
    update: &TagUpdate,
) -> Result<TagUpdate, ValidationError> {
    let tag = index
        .get(tag_id)
        .ok_or(ValidationError::TagNotFound { tag_id })?;

    let name = update.tag_name.as_deref().map(check_name).transpose()?;
    if let Some(new_parent) = update.parent_id {
        check_reparent(index, tag_id, new_parent)?;
    }

    let destination = update.parent_id.unwrap_or(tag.parent_id);
    let effective_name = name.as_deref().unwrap_or(&tag.name);
    check_unique_sibling(index, destination, effective_name, Some(tag_id))?;

    Ok(TagUpdate {
        tag_name: name,
        parent_id: update.parent_id,
    })
}

/// Validate a delete
pub fn check_delete(index: &TagIndex, tag_id: TagId) -> Result<(), ValidationError> {
    if !index.contains(tag_id) {
        return Err(ValidationError::TagNotFound { tag_id });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TagRecord, TagTree};
    use crate::services::tree_builder::build_tree;

    /// A(1) -> B(2) -> C(3); A(1) -> D(4); E(5) -> F(6)
    fn taxonomy() -> TagTree {
        build_tree(vec![
            TagRecord::new(1, "A", None),
            TagRecord::new(2, "B", Some(1)),
            TagRecord::new(3, "C", Some(2)),
            TagRecord::new(4, "D", Some(1)),
            TagRecord::new(5, "E", None),
            TagRecord::new(6, "F", Some(5)),
        ])
    }

    // ========================================================================
    // Names
    // ========================================================================

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Invoices"));
        assert!(!validate_name(""));
        assert!(!validate_name(" \t\n"));
    }

    #[test]
    fn test_empty_name_reports_name_required() {
        let err = check_name("").unwrap_err();
        assert_eq!(err, ValidationError::EmptyName);
        assert_eq!(err.to_string(), "name required");
        assert_eq!(err.rule(), "EMPTY_NAME");
    }

    // ========================================================================
    // Scenario A: A -> B -> C
    // ========================================================================

    #[test]
    fn test_tertiary_cannot_add_child() {
        let index = taxonomy().index();
        assert!(!can_add_child(&index, 3));
        assert_eq!(
            check_add_child(&index, 3),
            Err(ValidationError::TertiaryParent { parent_id: 3 })
        );
        assert!(can_add_child(&index, 1));
        assert!(can_add_child(&index, 2));
    }

    #[test]
    fn test_tier_comes_from_depth_not_from_input() {
        // Every node claims to be primary; C still sits at depth 2
        let tree: TagTree = serde_json::from_value(serde_json::json!([
            {"id": 1, "name": "A", "parent_id": null, "tier": "primary", "children": [
                {"id": 2, "name": "B", "parent_id": 1, "tier": "primary", "children": [
                    {"id": 3, "name": "C", "parent_id": 2, "tier": "primary", "children": []}
                ]}
            ]},
            {"id": 4, "name": "D", "parent_id": null, "tier": "primary", "children": []}
        ]))
        .unwrap();
        let index = tree.index();

        assert!(!can_add_child(&index, 3));
        assert_eq!(
            check_create(&index, "E", Some(3)),
            Err(ValidationError::TertiaryParent { parent_id: 3 })
        );
        assert!(!can_reparent(&index, 4, 3));
    }

    #[test]
    fn test_cannot_reparent_under_descendant() {
        let index = taxonomy().index();
        assert!(!can_reparent(&index, 1, 2));
        assert_eq!(
            check_reparent(&index, 1, Some(2)),
            Err(ValidationError::cyclic_reparent(1, 2))
        );
        assert_eq!(
            check_reparent(&index, 1, Some(3)),
            Err(ValidationError::cyclic_reparent(1, 3))
        );
    }

    #[test]
    fn test_cannot_reparent_under_self() {
        let index = taxonomy().index();
        assert_eq!(
            check_reparent(&index, 2, Some(2)),
            Err(ValidationError::cyclic_reparent(2, 2))
        );
    }

    #[test]
    fn test_every_descendant_is_rejected_as_parent() {
        let tree = taxonomy();
        let index = tree.index();
        for (_, node) in tree.iter() {
            for descendant in index.descendant_ids(node.id) {
                assert!(
                    !can_reparent(&index, node.id, descendant),
                    "{} under {} must be rejected",
                    node.id,
                    descendant
                );
            }
        }
    }

    #[test]
    fn test_reparent_checks() {
        let index = taxonomy().index();

        // Leaf D under B lands at depth 2
        assert!(check_reparent(&index, 4, Some(2)).is_ok());
        // Anything can become a root
        assert!(check_reparent(&index, 3, None).is_ok());

        assert_eq!(
            check_reparent(&index, 4, Some(3)),
            Err(ValidationError::TertiaryParent { parent_id: 3 })
        );
        assert_eq!(
            check_reparent(&index, 4, Some(42)),
            Err(ValidationError::ParentNotFound { parent_id: 42 })
        );
        assert_eq!(
            check_reparent(&index, 42, Some(1)),
            Err(ValidationError::TagNotFound { tag_id: 42 })
        );
    }

    #[test]
    fn test_reparent_subtree_must_fit_three_tiers() {
        let index = taxonomy().index();
        // E has a child; under B (depth 1) that child would sit at depth 3
        assert_eq!(
            check_reparent(&index, 5, Some(2)),
            Err(ValidationError::DepthExceeded {
                tag_id: 5,
                parent_id: 2
            })
        );
        // Under A (depth 0) the child lands at depth 2
        assert!(check_reparent(&index, 5, Some(1)).is_ok());
    }

    // ========================================================================
    // Composite checks
    // ========================================================================

    #[test]
    fn test_check_create() {
        let index = taxonomy().index();
        assert_eq!(check_create(&index, "  New  ", Some(1)).unwrap(), "New");
        assert_eq!(check_create(&index, "", Some(1)), Err(ValidationError::EmptyName));
        assert_eq!(
            check_create(&index, "Child", Some(3)),
            Err(ValidationError::TertiaryParent { parent_id: 3 })
        );
        assert_eq!(
            check_create(&index, "Child", Some(77)),
            Err(ValidationError::ParentNotFound { parent_id: 77 })
        );
    }

    #[test]
    fn test_duplicate_sibling_names_are_rejected() {
        let index = taxonomy().index();
        assert_eq!(
            check_create(&index, " b ", Some(1)),
            Err(ValidationError::duplicate_sibling("b"))
        );
        assert_eq!(
            check_create(&index, "a", None),
            Err(ValidationError::duplicate_sibling("a"))
        );
        // Same name under a different parent is fine
        assert!(check_create(&index, "B", Some(5)).is_ok());
    }

    #[test]
    fn test_rename_update() {
        let index = taxonomy().index();
        let checked = check_update(&index, 2, &TagUpdate::rename(" Renamed ")).unwrap();
        assert_eq!(checked.tag_name.as_deref(), Some("Renamed"));
        // Renaming to its own name (different case) is not a clash
        assert!(check_update(&index, 2, &TagUpdate::rename("b")).is_ok());
        assert_eq!(
            check_update(&index, 2, &TagUpdate::rename("D")),
            Err(ValidationError::duplicate_sibling("D"))
        );
        assert_eq!(
            check_update(&index, 99, &TagUpdate::rename("X")),
            Err(ValidationError::TagNotFound { tag_id: 99 })
        );
    }

    #[test]
    fn test_move_update_checks_destination_siblings() {
        let index = build_tree(vec![
            TagRecord::new(1, "A", None),
            TagRecord::new(2, "Shared", Some(1)),
            TagRecord::new(3, "B", None),
            TagRecord::new(4, "Shared", Some(3)),
        ])
        .index();

        assert_eq!(
            check_update(&index, 4, &TagUpdate::reparent(Some(1))),
            Err(ValidationError::duplicate_sibling("Shared"))
        );
        assert!(check_update(&index, 4, &TagUpdate::reparent(None)).is_ok());
    }

    #[test]
    fn test_check_update_combines_rules() {
        let index = taxonomy().index();

        let update = TagUpdate {
            tag_name: Some("  Moved ".to_string()),
            parent_id: Some(Some(5)),
        };
        let checked = check_update(&index, 4, &update).unwrap();
        assert_eq!(checked.tag_name.as_deref(), Some("Moved"));
        assert_eq!(checked.parent_id, Some(Some(5)));

        // New name clashes at the destination, not at the origin
        let clash = TagUpdate {
            tag_name: Some("F".to_string()),
            parent_id: Some(Some(5)),
        };
        assert_eq!(
            check_update(&index, 4, &clash),
            Err(ValidationError::duplicate_sibling("F"))
        );

        let cyclic = TagUpdate::reparent(Some(3));
        assert_eq!(
            check_update(&index, 1, &cyclic),
            Err(ValidationError::cyclic_reparent(1, 3))
        );
    }

    #[test]
    fn test_check_delete() {
        let index = taxonomy().index();
        assert!(check_delete(&index, 1).is_ok());
        assert_eq!(
            check_delete(&index, 1234),
            Err(ValidationError::TagNotFound { tag_id: 1234 })
        );
    }
}
