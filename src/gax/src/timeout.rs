// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::future::Future;
use std::time::Duration;

/// Runs `work` as a background task and waits at most `timeout` for it.
///
/// Returns `Some(output)` if `work` completes before the deadline, and `None`
/// if the deadline elapses first. Timing out does **not** cancel `work`: the
/// task keeps running until it completes, and any side effects it produces
/// (such as publishing a result into shared state, or releasing a guard it
/// owns) happen after this function returns.
///
/// This function does not serialize invocations. Callers that need at most one
/// instance of `work` in flight must move an owned guard into `work`, so the
/// guard is held until the background task completes.
///
/// A panic in `work` is propagated to the caller if it happens before the
/// deadline.
///
/// # Example
/// ```
/// # use stratus_gax::timeout::run_with_timeout;
/// # use std::time::Duration;
/// # tokio_test::block_on(async {
/// let got = run_with_timeout(Duration::from_secs(5), async { 42 }).await;
/// assert_eq!(got, Some(42));
/// # });
/// ```
pub async fn run_with_timeout<F>(timeout: Duration, work: F) -> Option<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    // Dropping a `JoinHandle` detaches the task, it does not abort it.
    let handle = tokio::spawn(work);
    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(output)) => Some(output),
        Ok(Err(e)) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        // The runtime is shutting down, the work will never complete.
        Ok(Err(_)) => None,
        Err(_elapsed) => None,
    }
}
