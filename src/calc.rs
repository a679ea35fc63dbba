use crate::err::EpochError;
use tokio_util::sync::CancellationToken;

pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Offset `now_epoch` by `days` whole days.
///
/// Returns `(now_epoch, future_epoch)`. Every arithmetic step is range checked
/// before it runs, so an unrepresentable result is reported as an error and
/// never wraps.
///
/// # Arguments
/// * `now_epoch` - The current instant in seconds since the Unix epoch
/// * `days` - Signed number of days to add
/// * `cancel` - Cancellation token of the enclosing request, checked once on entry
///
/// # Returns
/// * `Ok((now_epoch, future_epoch))`
/// * `EpochError::Canceled` if the token was already cancelled
/// * `EpochError::OutOfRange` if `days` in seconds does not fit an `i64`
/// * `EpochError::Overflow` if the sum does not fit an `i64`
pub fn calculate(
    now_epoch: i64,
    days: i64,
    cancel: Option<&CancellationToken>,
) -> Result<(i64, i64), EpochError> {
    if cancel.is_some_and(CancellationToken::is_cancelled) {
        return Err(EpochError::Canceled);
    }

    let delta = days_to_seconds(days)?;

    if (delta > 0 && now_epoch > i64::MAX - delta) || (delta < 0 && now_epoch < i64::MIN - delta)
    {
        return Err(EpochError::Overflow);
    }

    Ok((now_epoch, now_epoch + delta))
}

/// Whole days to seconds.
///
/// Integer division truncates toward zero, so `i64::MIN / SECONDS_PER_DAY` is the
/// smallest day count whose product still fits.
pub fn days_to_seconds(days: i64) -> Result<i64, EpochError> {
    if days > i64::MAX / SECONDS_PER_DAY || days < i64::MIN / SECONDS_PER_DAY {
        return Err(EpochError::OutOfRange);
    }
    Ok(days * SECONDS_PER_DAY)
}
