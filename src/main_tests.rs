use super::require_confirmation;
use crate::app::AppError;

#[test]
fn destructive_commands_need_yes() {
    let err = require_confirmation(false, "reset").expect_err("missing --yes should fail");
    assert!(matches!(err, AppError::InvalidArgument(_)));
    assert_eq!(
        err.to_string(),
        "reset is destructive; re-run with --yes to confirm"
    );
    require_confirmation(true, "reset").expect("--yes should confirm");
}
