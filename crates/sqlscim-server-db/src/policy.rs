// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-query timeout and bounded retry with exponential backoff.

use std::future::Future;
use std::time::Duration;

use sqlscim_server_config::DatabaseConfig;
use tracing::warn;

use crate::error::DbError;

#[derive(Debug, Clone)]
pub struct QueryPolicy {
	pub timeout: Duration,
	/// Extra attempts after the first, for transient errors only.
	pub max_retries: u32,
	pub base_delay: Duration,
	pub max_delay: Duration,
}

impl Default for QueryPolicy {
	fn default() -> Self {
		Self {
			timeout: Duration::from_secs(30),
			max_retries: 2,
			base_delay: Duration::from_millis(100),
			max_delay: Duration::from_secs(2),
		}
	}
}

impl From<&DatabaseConfig> for QueryPolicy {
	fn from(config: &DatabaseConfig) -> Self {
		Self {
			timeout: config.query_timeout,
			max_retries: config.max_retries,
			..Default::default()
		}
	}
}

impl QueryPolicy {
	fn delay(&self, attempt: u32) -> Duration {
		let factor = 2u32.saturating_pow(attempt);
		self.base_delay.saturating_mul(factor).min(self.max_delay)
	}

	/// Run `f` under the timeout, retrying transient failures.
	///
	/// A timed-out attempt is not retried.
	pub async fn run<T, F, Fut>(&self, operation: &'static str, mut f: F) -> Result<T, DbError>
	where
		F: FnMut() -> Fut,
		Fut: Future<Output = Result<T, sqlx::Error>>,
	{
		let mut attempt = 0;

		loop {
			let error = match tokio::time::timeout(self.timeout, f()).await {
				Ok(Ok(result)) => return Ok(result),
				Ok(Err(error)) => error,
				Err(_) => {
					warn!(operation, timeout_ms = self.timeout.as_millis(), "query timed out");
					return Err(DbError::Timeout {
						operation,
						after: self.timeout,
					});
				}
			};

			if !DbError::is_transient(&error) || attempt >= self.max_retries {
				return Err(DbError::Sqlx(error));
			}

			let delay = self.delay(attempt);
			attempt += 1;
			warn!(
				operation,
				error = %error,
				attempt,
				max_retries = self.max_retries,
				delay_ms = delay.as_millis(),
				"retrying query after transient error"
			);
			tokio::time::sleep(delay).await;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicU32, Ordering};
	use std::sync::Arc;

	fn fast_policy(max_retries: u32) -> QueryPolicy {
		QueryPolicy {
			timeout: Duration::from_millis(200),
			max_retries,
			base_delay: Duration::from_millis(1),
			max_delay: Duration::from_millis(5),
		}
	}

	#[tokio::test]
	async fn test_success_first_attempt() {
		let calls = Arc::new(AtomicU32::new(0));
		let counter = calls.clone();
		let result = fast_policy(2)
			.run("test", move || {
				let counter = counter.clone();
				async move {
					counter.fetch_add(1, Ordering::SeqCst);
					Ok::<_, sqlx::Error>(7)
				}
			})
			.await
			.unwrap();
		assert_eq!(result, 7);
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn test_transient_error_retried_then_succeeds() {
		let calls = Arc::new(AtomicU32::new(0));
		let counter = calls.clone();
		let result = fast_policy(2)
			.run("test", move || {
				let counter = counter.clone();
				async move {
					if counter.fetch_add(1, Ordering::SeqCst) == 0 {
						Err(sqlx::Error::PoolTimedOut)
					} else {
						Ok(1)
					}
				}
			})
			.await
			.unwrap();
		assert_eq!(result, 1);
		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn test_retries_are_bounded() {
		let calls = Arc::new(AtomicU32::new(0));
		let counter = calls.clone();
		let result: Result<(), DbError> = fast_policy(2)
			.run("test", move || {
				let counter = counter.clone();
				async move {
					counter.fetch_add(1, Ordering::SeqCst);
					Err(sqlx::Error::PoolTimedOut)
				}
			})
			.await;
		assert!(matches!(result, Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))));
		assert_eq!(calls.load(Ordering::SeqCst), 3);
	}

	#[tokio::test]
	async fn test_permanent_error_not_retried() {
		let calls = Arc::new(AtomicU32::new(0));
		let counter = calls.clone();
		let result: Result<(), DbError> = fast_policy(5)
			.run("test", move || {
				let counter = counter.clone();
				async move {
					counter.fetch_add(1, Ordering::SeqCst);
					Err(sqlx::Error::RowNotFound)
				}
			})
			.await;
		assert!(result.is_err());
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn test_slow_query_times_out() {
		let result: Result<(), DbError> = fast_policy(2)
			.run("slow", || async {
				tokio::time::sleep(Duration::from_secs(5)).await;
				Ok(())
			})
			.await;
		assert!(matches!(
			result,
			Err(DbError::Timeout {
				operation: "slow",
				..
			})
		));
	}

	#[test]
	fn test_delay_is_capped() {
		let policy = QueryPolicy::default();
		assert_eq!(policy.delay(0), Duration::from_millis(100));
		assert_eq!(policy.delay(1), Duration::from_millis(200));
		assert_eq!(policy.delay(10), Duration::from_secs(2));
	}
}
