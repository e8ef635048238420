use std::sync::Arc;

use crate::engine::Mirror;
use crate::slices::{
    AuthAction, AuthState, CartState, FavoritesAction, FavoritesState, HistoryAction,
    HistoryState, ThemeState,
};
use crate::store::{Action, AppState, Subscriber};

/// A subscriber writing every persisted slice touched by an action.
pub fn persistence(mirror: Mirror) -> Subscriber {
    Arc::new(move |state: &AppState, action: &Action| mirror_action(&mirror, state, action))
}

/// Writes (or removes) the storage keys affected by `action`, reading the
/// already committed `state`.
pub fn mirror_action(mirror: &Mirror, state: &AppState, action: &Action) {
    match action {
        Action::Products(_) => {}
        Action::Likes(FavoritesAction::ToggleLike(_)) => {
            mirror.save(FavoritesState::LIKED_KEY, &state.likes.liked_products)
        }
        Action::Likes(FavoritesAction::ClearAllLikes) => mirror.remove(FavoritesState::LIKED_KEY),
        Action::Likes(FavoritesAction::ClearAllCompares) => {
            mirror.remove(FavoritesState::COMPARED_KEY)
        }
        Action::Likes(FavoritesAction::AddToCompare(_) | FavoritesAction::SetMaxCompareItems(_)) => {
            mirror.save(FavoritesState::COMPARED_KEY, &state.likes.compared_products)
        }
        Action::Cart(_) => mirror.save(CartState::STORAGE_KEY, &state.cart.items),
        Action::History(HistoryAction::Clear) => mirror.remove(HistoryState::STORAGE_KEY),
        Action::History(_) => {
            mirror.save(HistoryState::STORAGE_KEY, &state.product_history.viewed_products)
        }
        // loading and error are transient
        Action::Auth(AuthAction::Pending(_) | AuthAction::LogoutPending(_) | AuthAction::ClearError) => {}
        Action::Auth(_) => mirror.save(AuthState::STORAGE_KEY, &state.auth.snapshot()),
        Action::Theme(_) => mirror.save(ThemeState::STORAGE_KEY, &state.theme.dark_mode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slices::{CartAction, CatalogAction, RequestId, ThemeAction};
    use crate::User;
    use serde_json::json;

    fn committed(state: &mut AppState, mirror: &Mirror, action: Action) {
        state.apply(&action);
        mirror_action(mirror, state, &action);
    }

    #[test]
    fn test_clear_likes_removes_key() {
        let mirror = Mirror::in_memory();
        let mut state = AppState::default();

        committed(&mut state, &mirror, FavoritesAction::ToggleLike(4).into());
        assert_eq!(mirror.snapshot()["likedProducts"], json!([4]));

        committed(&mut state, &mirror, FavoritesAction::ToggleLike(4).into());
        assert_eq!(mirror.snapshot()["likedProducts"], json!([]));

        committed(&mut state, &mirror, FavoritesAction::ClearAllLikes.into());
        assert!(!mirror.snapshot().contains_key("likedProducts"));
    }

    #[test]
    fn test_compare_writes_list_and_clear_removes_key() {
        let mirror = Mirror::in_memory();
        let mut state = AppState::default();

        committed(&mut state, &mirror, FavoritesAction::SetMaxCompareItems(4).into());
        for id in [7, 8, 9, 10] {
            committed(&mut state, &mirror, FavoritesAction::AddToCompare(id).into());
        }
        assert_eq!(mirror.snapshot()["comparedProducts"], json!([7, 8, 9, 10]));

        committed(&mut state, &mirror, FavoritesAction::AddToCompare(8).into());
        assert_eq!(mirror.snapshot()["comparedProducts"], json!([7, 9, 10]));

        committed(&mut state, &mirror, FavoritesAction::SetMaxCompareItems(2).into());
        assert_eq!(mirror.snapshot()["comparedProducts"], json!([7, 9]));

        committed(&mut state, &mirror, FavoritesAction::ClearAllCompares.into());
        assert!(!mirror.snapshot().contains_key("comparedProducts"));
    }

    #[test]
    fn test_theme_writes_dark_mode() {
        let mirror = Mirror::in_memory();
        let mut state = AppState::default();

        committed(&mut state, &mirror, ThemeAction::Toggle.into());
        assert_eq!(mirror.snapshot()["darkMode"], json!(true));

        committed(&mut state, &mirror, ThemeAction::Set(false).into());
        assert_eq!(mirror.snapshot()["darkMode"], json!(false));

        committed(&mut state, &mirror, ThemeAction::Set(true).into());
        committed(&mut state, &mirror, ThemeAction::Toggle.into());
        assert_eq!(mirror.snapshot()["darkMode"], json!(false));
    }

    #[test]
    fn test_clear_cart_persists_empty_list() {
        let mirror = Mirror::in_memory();
        let mut state = AppState::default();
        committed(&mut state, &mirror, CartAction::Clear.into());
        assert_eq!(mirror.snapshot()["cartItems"], json!([]));
    }

    #[test]
    fn test_catalog_is_never_persisted() {
        let mirror = Mirror::in_memory();
        let mut state = AppState::default();
        committed(&mut state, &mirror, CatalogAction::FetchPending(RequestId(1)).into());
        committed(&mut state, &mirror, CatalogAction::IncreaseLimit.into());
        assert!(mirror.snapshot().is_empty());
    }

    #[test]
    fn test_auth_persists_only_user_and_flag() {
        let mirror = Mirror::in_memory();
        let mut state = AppState::default();
        let user = User {
            id: "u1".to_string(),
            email: None,
            display_name: None,
            photo_url: None,
        };

        committed(&mut state, &mirror, AuthAction::Pending(RequestId(1)).into());
        assert!(mirror.snapshot().is_empty());

        committed(&mut state, &mirror, AuthAction::Fulfilled(RequestId(1), user).into());
        let stored = &mirror.snapshot()["auth"];
        assert_eq!(stored["isAuthenticated"], json!(true));
        assert_eq!(stored["user"]["id"], json!("u1"));
        assert!(stored.get("loading").is_none());
        assert!(stored.get("error").is_none());
    }
}
