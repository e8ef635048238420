use std::ops::RangeInclusive;

use serde::Serialize;

use crate::engine::Mirror;

pub const DEFAULT_MAX_COMPARE_ITEMS: usize = 3;
pub const MAX_COMPARE_ITEMS_RANGE: RangeInclusive<usize> = 1..=5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoritesAction {
    ToggleLike(u64),
    /// Toggles membership in the comparison list; adding to a full list is a no-op.
    AddToCompare(u64),
    SetMaxCompareItems(usize),
    ClearAllLikes,
    ClearAllCompares,
}

/// Liked products and the bounded comparison list. Both keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesState {
    pub liked_products: Vec<u64>,
    pub compared_products: Vec<u64>,
    pub max_compare_items: usize,
}

impl Default for FavoritesState {
    fn default() -> Self {
        Self {
            liked_products: Vec::new(),
            compared_products: Vec::new(),
            max_compare_items: DEFAULT_MAX_COMPARE_ITEMS,
        }
    }
}

impl FavoritesState {
    pub const LIKED_KEY: &'static str = "likedProducts";
    pub const COMPARED_KEY: &'static str = "comparedProducts";

    pub fn rehydrate(mirror: &Mirror) -> Self {
        let mut state = Self::default();
        for id in mirror.load::<Vec<u64>>(Self::LIKED_KEY, Vec::new()) {
            if !state.is_liked(id) {
                state.liked_products.push(id);
            }
        }
        let mut compared: Vec<u64> = Vec::new();
        for id in mirror.load::<Vec<u64>>(Self::COMPARED_KEY, Vec::new()) {
            if !compared.contains(&id) {
                compared.push(id);
            }
        }
        // The max is not stored; restore it from the saved list length.
        state.max_compare_items = compared
            .len()
            .clamp(DEFAULT_MAX_COMPARE_ITEMS, *MAX_COMPARE_ITEMS_RANGE.end());
        compared.truncate(state.max_compare_items);
        state.compared_products = compared;
        state
    }

    pub fn apply(&mut self, action: &FavoritesAction) {
        match *action {
            FavoritesAction::ToggleLike(id) => {
                if self.is_liked(id) {
                    self.liked_products.retain(|x| *x != id);
                } else {
                    self.liked_products.push(id);
                }
            }
            FavoritesAction::AddToCompare(id) => {
                if self.is_compared(id) {
                    self.compared_products.retain(|x| *x != id);
                } else if self.compared_products.len() < self.max_compare_items {
                    self.compared_products.push(id);
                }
            }
            FavoritesAction::SetMaxCompareItems(n) => {
                if MAX_COMPARE_ITEMS_RANGE.contains(&n) {
                    self.max_compare_items = n;
                    self.compared_products.truncate(n);
                }
            }
            FavoritesAction::ClearAllLikes => self.liked_products.clear(),
            FavoritesAction::ClearAllCompares => self.compared_products.clear(),
        }
    }

    pub fn is_liked(&self, id: u64) -> bool {
        self.liked_products.contains(&id)
    }

    pub fn is_compared(&self, id: u64) -> bool {
        self.compared_products.contains(&id)
    }

    pub fn compare_is_full(&self) -> bool {
        self.compared_products.len() >= self.max_compare_items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_like_twice_restores() {
        let mut fav = FavoritesState::default();
        fav.apply(&FavoritesAction::ToggleLike(3));
        let before = fav.clone();

        fav.apply(&FavoritesAction::ToggleLike(8));
        fav.apply(&FavoritesAction::ToggleLike(8));
        assert_eq!(fav, before);

        fav.apply(&FavoritesAction::ToggleLike(3));
        assert!(!fav.is_liked(3));
    }

    #[test]
    fn test_compare_is_bounded() {
        let mut fav = FavoritesState::default();
        for id in 1..=5 {
            fav.apply(&FavoritesAction::AddToCompare(id));
        }
        assert_eq!(fav.compared_products, vec![1, 2, 3]);
        assert!(fav.compare_is_full());

        // Toggling an existing entry removes it and frees a slot.
        fav.apply(&FavoritesAction::AddToCompare(2));
        fav.apply(&FavoritesAction::AddToCompare(9));
        assert_eq!(fav.compared_products, vec![1, 3, 9]);
    }

    #[test]
    fn test_shrinking_max_truncates_to_earliest() {
        let mut fav = FavoritesState::default();
        fav.apply(&FavoritesAction::SetMaxCompareItems(5));
        for id in [10, 20, 30, 40] {
            fav.apply(&FavoritesAction::AddToCompare(id));
        }

        fav.apply(&FavoritesAction::SetMaxCompareItems(2));
        assert_eq!(fav.compared_products, vec![10, 20]);
        assert_eq!(fav.max_compare_items, 2);
    }

    #[test]
    fn test_out_of_range_max_is_ignored() {
        let mut fav = FavoritesState::default();
        fav.apply(&FavoritesAction::SetMaxCompareItems(0));
        fav.apply(&FavoritesAction::SetMaxCompareItems(6));
        assert_eq!(fav.max_compare_items, DEFAULT_MAX_COMPARE_ITEMS);
    }

    #[test]
    fn test_rehydrate_dedupes_and_bounds() {
        let mirror = Mirror::in_memory();
        mirror.save(FavoritesState::LIKED_KEY, &vec![5u64, 9, 5]);
        mirror.save(FavoritesState::COMPARED_KEY, &vec![1u64, 2, 1, 3, 4, 5, 6, 7]);

        let fav = FavoritesState::rehydrate(&mirror);
        assert_eq!(fav.liked_products, vec![5, 9]);
        assert_eq!(fav.compared_products, vec![1, 2, 3, 4, 5]);
        assert_eq!(fav.max_compare_items, 5);
    }

    #[test]
    fn test_rehydrate_keeps_list_saved_under_larger_max() {
        let mirror = Mirror::in_memory();
        mirror.save(FavoritesState::COMPARED_KEY, &vec![1u64, 2, 3, 4]);

        let fav = FavoritesState::rehydrate(&mirror);
        assert_eq!(fav.compared_products, vec![1, 2, 3, 4]);
        assert_eq!(fav.max_compare_items, 4);
        assert!(fav.compare_is_full());
    }

    #[test]
    fn test_rehydrate_short_list_uses_default_max() {
        let mirror = Mirror::in_memory();
        mirror.save(FavoritesState::COMPARED_KEY, &vec![8u64]);

        let fav = FavoritesState::rehydrate(&mirror);
        assert_eq!(fav.compared_products, vec![8]);
        assert_eq!(fav.max_compare_items, DEFAULT_MAX_COMPARE_ITEMS);
    }
}
