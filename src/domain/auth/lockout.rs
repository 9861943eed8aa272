use chrono::{DateTime, Duration, Utc};

use super::entities::User;

/// Brute-force lockout policy.
///
/// Pure decision logic over `(failed_login_attempts, locked_until, now)`;
/// the stateful data lives on the user record. While locked, sign-in is
/// rejected before password verification and the counter does not advance,
/// so the lock window never extends past its fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct LockoutPolicy {
  max_failed_attempts: i32,
  lockout_minutes: i64,
}

impl LockoutPolicy {
  pub const DEFAULT_MAX_FAILED_ATTEMPTS: i32 = 5;
  pub const DEFAULT_LOCKOUT_MINUTES: i64 = 30;

  pub fn new(max_failed_attempts: i32, lockout_minutes: i64) -> Self {
    Self {
      max_failed_attempts,
      lockout_minutes,
    }
  }

  /// True iff a lock timestamp is set and still in the future
  pub fn is_locked(&self, user: &User, now: DateTime<Utc>) -> bool {
    matches!(user.locked_until, Some(until) if until > now)
  }

  /// Registers one failed attempt; crossing the threshold sets the lock.
  /// `locked_until` is set only here, never directly.
  pub fn on_failure(&self, user: &mut User, now: DateTime<Utc>) {
    user.failed_login_attempts += 1;

    if user.failed_login_attempts >= self.max_failed_attempts {
      user.locked_until = Some(now + Duration::minutes(self.lockout_minutes));
    }

    user.updated_at = now;
  }

  /// Clears the counter and any lock after a successful sign-in
  pub fn on_success(&self, user: &mut User, now: DateTime<Utc>) {
    user.failed_login_attempts = 0;
    user.locked_until = None;
    user.updated_at = now;
  }
}

impl Default for LockoutPolicy {
  fn default() -> Self {
    Self::new(
      Self::DEFAULT_MAX_FAILED_ATTEMPTS,
      Self::DEFAULT_LOCKOUT_MINUTES,
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::entities::NewUser;

  fn sample_user(now: DateTime<Utc>) -> User {
    User::new(
      NewUser {
        email: "lockout@example.com".to_string(),
        password_hash: "$argon2id$v=19$m=65536,t=3,p=4$salt$hash".to_string(),
        first_name: "Lock".to_string(),
        last_name: "Out".to_string(),
        gdpr_consent: true,
        marketing_consent: false,
      },
      now,
    )
  }

  #[test]
  fn test_failures_below_threshold_do_not_lock() {
    let policy = LockoutPolicy::default();
    let now = Utc::now();
    let mut user = sample_user(now);

    for expected in 1..=4 {
      policy.on_failure(&mut user, now);
      assert_eq!(user.failed_login_attempts, expected);
      assert!(user.locked_until.is_none());
      assert!(!policy.is_locked(&user, now));
    }
  }

  #[test]
  fn test_fifth_failure_locks_for_thirty_minutes() {
    let policy = LockoutPolicy::default();
    let now = Utc::now();
    let mut user = sample_user(now);

    for _ in 0..5 {
      policy.on_failure(&mut user, now);
    }

    assert_eq!(user.failed_login_attempts, 5);
    assert_eq!(user.locked_until, Some(now + Duration::minutes(30)));
    assert!(policy.is_locked(&user, now));

    // Still locked one second before expiry
    let almost = now + Duration::minutes(30) - Duration::seconds(1);
    assert!(policy.is_locked(&user, almost));

    // Unlocked once the window has passed
    let after = now + Duration::minutes(30);
    assert!(!policy.is_locked(&user, after));
  }

  #[test]
  fn test_success_resets_counter_and_lock_from_any_state() {
    let policy = LockoutPolicy::default();
    let now = Utc::now();
    let mut user = sample_user(now);

    for _ in 0..7 {
      policy.on_failure(&mut user, now);
    }
    assert!(policy.is_locked(&user, now));

    policy.on_success(&mut user, now);
    assert_eq!(user.failed_login_attempts, 0);
    assert!(user.locked_until.is_none());
    assert!(!policy.is_locked(&user, now));
  }

  #[test]
  fn test_custom_threshold() {
    let policy = LockoutPolicy::new(3, 10);
    let now = Utc::now();
    let mut user = sample_user(now);

    policy.on_failure(&mut user, now);
    policy.on_failure(&mut user, now);
    assert!(user.locked_until.is_none());

    policy.on_failure(&mut user, now);
    assert_eq!(user.locked_until, Some(now + Duration::minutes(10)));
  }
}
