//! Shared utilities for use cases.

use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(on_cancel())` once the token is cancelled.
pub(crate) fn check_cancelled<E>(
    token: &CancellationToken,
    on_cancel: impl FnOnce() -> E,
) -> Result<(), E> {
    if token.is_cancelled() {
        return Err(on_cancel());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_cancelled() {
        let token = CancellationToken::new();
        assert_eq!(check_cancelled(&token, || "stop"), Ok(()));
        token.cancel();
        assert_eq!(check_cancelled(&token, || "stop"), Err("stop"));
    }
}
