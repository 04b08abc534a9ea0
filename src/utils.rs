//! Internal helper macros.

/// Early-returns with an error when a condition does not hold.
///
/// Like `assert!`, but produces an `Err` instead of panicking:
///
/// ```ignore
/// ensure!(tokens.len() == 3, HttpError::protocol(400, "bad request line"));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
