//! Order-preserving fan-in of task results

use crate::scheduler::{CancelToken, PendingResult};

/// Resolve `pending` strictly in submission order, dropping tasks that
/// produced no result.
///
/// Each handle is awaited in turn, so one slow task holds back the ones
/// behind it even if they are already done. Once `cancel` fires, the
/// remaining handles are not waited on.
pub fn collect_in_order<T>(mut pending: Vec<PendingResult<T>>, cancel: &CancelToken) -> Vec<T> {
    pending.sort_by_key(|handle| handle.index);

    let total = pending.len();
    let mut out = Vec::with_capacity(total);
    for handle in pending {
        let index = handle.index;
        if let Some(value) = handle.wait(cancel) {
            out.push(value);
        } else if cancel.is_cancelled() {
            log::debug!("stopped collecting at task {index} of {total}: cancelled");
            break;
        }
    }
    out
}
