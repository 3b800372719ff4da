//! User-facing texts and choice menus.

use keydesk_core::config::ledger::PoolBinding;
use keydesk_core::traits::Choice;
use keydesk_core::types::allocation::IssuedKey;

/// Selection token for the "get a key" main-menu button.
pub const GET_KEY_TOKEN: &str = "get_key";
/// Selection token for the cancel button.
pub const CANCEL_TOKEN: &str = "cancel";

/// Main-menu prompt text.
pub const WELCOME: &str = "Welcome! Choose an action:";
/// Duration-menu prompt text.
pub const CHOOSE_DURATION: &str = "Choose the key duration:";
/// Rejection notice for requesters outside the allow-list.
pub const UNAUTHORIZED: &str = "You do not have access to this bot.";
/// Notice for a selection that is not valid in the current state.
pub const INVALID_SELECTION: &str = "Invalid selection.";
/// Notice shown when an operation is cancelled.
pub const CANCELLED: &str = "Operation cancelled.";
/// Notice shown when the selected pool has no keys left.
pub const EXHAUSTED: &str = "No free keys found.";
/// Generic notice for adapter or internal failures.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

/// Choices for the main menu.
pub fn main_menu() -> Vec<Choice> {
    vec![Choice::new("Get a key", GET_KEY_TOKEN)]
}

/// Choices for the duration menu, in configuration order, plus cancel.
pub fn duration_menu(pools: &[PoolBinding]) -> Vec<Choice> {
    let mut choices: Vec<Choice> = pools
        .iter()
        .map(|p| Choice::new(p.label.clone(), p.category.clone()))
        .collect();
    choices.push(Choice::new("Cancel", CANCEL_TOKEN));
    choices
}

/// Prompt confirming the selected duration and asking for the organization.
pub fn ask_organization(label: &str) -> String {
    format!("You chose a {label} key.\nEnter the organization name:")
}

/// Confirmation message for an issued key.
pub fn issued(key: &IssuedKey) -> String {
    format!(
        "Your key: {}\nOrganization: {}",
        key.key, key.organization
    )
}
