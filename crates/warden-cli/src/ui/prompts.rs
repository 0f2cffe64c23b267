//! Interactive prompt utilities.

use dialoguer::{Confirm, Password, theme::ColorfulTheme};

fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

/// Prompt for a new password (hidden input, entered twice).
pub fn new_password(prompt: &str) -> Result<String, dialoguer::Error> {
    Password::with_theme(&theme())
        .with_prompt(prompt)
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
}

/// Prompt for confirmation (yes/no), defaulting to no.
pub fn confirm(prompt: &str) -> Result<bool, dialoguer::Error> {
    Confirm::with_theme(&theme())
        .with_prompt(prompt)
        .default(false)
        .interact()
}
