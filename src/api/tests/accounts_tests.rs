//! Account creation input.

use crate::api::{ApiError, GENERATED_PASSWORD_LEN, NewAccount, generate_password};
use crate::task::domain::Role;
use eyre::ensure;
use rstest::rstest;

#[rstest]
fn generated_passwords_are_alphanumeric_and_fixed_length() {
    let password = generate_password();

    assert_eq!(password.chars().count(), GENERATED_PASSWORD_LEN);
    assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[rstest]
fn generated_passwords_differ() {
    assert_ne!(generate_password(), generate_password());
}

#[rstest]
fn worker_account_gets_generated_password() -> eyre::Result<()> {
    let account = NewAccount::worker_with_generated_password("  Wren  ", "wren@example.com")?;

    ensure!(account.name() == "Wren");
    ensure!(account.role() == Role::Worker);
    ensure!(account.password().len() == GENERATED_PASSWORD_LEN);
    Ok(())
}

#[rstest]
#[case("", "wren@example.com", "pw")]
#[case("Wren", "not-an-email", "pw")]
#[case("Wren", "wren@example", "pw")]
#[case("Wren", "wren @example.com", "pw")]
#[case("Wren", "wren@example.com", "")]
fn invalid_account_input_is_rejected(
    #[case] name: &str,
    #[case] email: &str,
    #[case] password: &str,
) {
    let result = NewAccount::new(name, email, password, Role::Worker);

    assert!(matches!(result, Err(ApiError::Validation(_))));
}
