//! AWS IAM access key rotation.
//!
//! IAM allows two access keys per user. Rotation is create-before-delete
//! with a grace window (`max_age`):
//!
//! ```text
//! keys  condition                                 action
//! ────────────────────────────────────────────────────────────────────
//!  0    -                                         mint
//!  1    -                                         mint
//!  2    elder <= max_age OR newer <= max_age      hold (return None)
//!  2    both older than max_age                   delete elder, mint
//! ```
//!
//! A key inside its grace window may still be cached by callers that read
//! it before the newer key existed, so nothing is deleted until both keys
//! have aged out. The boundary is inclusive: a key exactly `max_age` old is
//! still protected.
//!
//! Delete and create are not atomic. If the delete succeeds and the create
//! fails, the user is left with one key and the next run mints again.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::{Source, SourceKind};
use crate::core::constants::{
    AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, DEFAULT_MAX_AGE, MAX_ACCESS_KEYS,
};
use crate::core::{Context, CredentialSet};
use crate::error::SourceError;

#[cfg(feature = "aws")]
pub use sdk::AwsIam;

/// An existing access key as listed by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessKeyMetadata {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// A freshly minted access key.
pub struct AccessKey {
    pub id: String,
    pub secret: Zeroizing<String>,
}

impl std::fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessKey").field("id", &self.id).finish()
    }
}

/// Provider calls needed to rotate a user's keys.
///
/// Implemented by the AWS SDK client and by in-memory fakes in tests.
pub trait AccessKeyApi {
    fn list_access_keys(&self, user: &str) -> Result<Vec<AccessKeyMetadata>, SourceError>;
    fn create_access_key(&self, user: &str) -> Result<AccessKey, SourceError>;
    fn delete_access_key(&self, user: &str, key_id: &str) -> Result<(), SourceError>;
}

/// What a rotation pass should do, given the current keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationPlan {
    /// Below the key ceiling: mint a new key.
    Mint,
    /// At least one key is inside the grace window.
    Hold,
    /// Both keys aged out: delete `elder`, then mint.
    Replace { elder: String },
}

/// Decide what to do with `keys` at time `now`.
///
/// `keys` is expected to hold at most two entries; with more, the oldest and
/// newest are compared.
pub fn plan_rotation(
    keys: &[AccessKeyMetadata],
    max_age: Duration,
    now: DateTime<Utc>,
) -> RotationPlan {
    if keys.len() < MAX_ACCESS_KEYS {
        return RotationPlan::Mint;
    }

    let mut sorted: Vec<&AccessKeyMetadata> = keys.iter().collect();
    sorted.sort_by_key(|k| k.created_at);
    let elder = sorted[0];
    let newer = sorted[sorted.len() - 1];

    let max_age = chrono::Duration::from_std(max_age).unwrap_or(chrono::Duration::MAX);
    let within = |key: &AccessKeyMetadata| now - key.created_at <= max_age;

    if within(elder) || within(newer) {
        RotationPlan::Hold
    } else {
        RotationPlan::Replace {
            elder: elder.id.clone(),
        }
    }
}

/// Rotates the access keys of one IAM user.
pub struct IamKeySource {
    user_name: String,
    max_age: Duration,
    api: Box<dyn AccessKeyApi>,
}

impl IamKeySource {
    pub fn new(user_name: impl Into<String>, api: Box<dyn AccessKeyApi>) -> Self {
        Self {
            user_name: user_name.into(),
            max_age: DEFAULT_MAX_AGE,
            api,
        }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Rotate the user's keys as of `now`.
    ///
    /// Returns the new key, or `None` when a key is still inside the grace
    /// window.
    ///
    /// # Errors
    ///
    /// Any list, delete or create failure aborts the pass.
    pub fn rotate_keys(&self, now: DateTime<Utc>) -> Result<Option<AccessKey>, SourceError> {
        let keys = self.api.list_access_keys(&self.user_name)?;
        debug!(user = %self.user_name, keys = keys.len(), "listed access keys");

        if keys.len() > MAX_ACCESS_KEYS {
            return Err(SourceError::TooManyKeys {
                user: self.user_name.clone(),
                count: keys.len(),
            });
        }

        match plan_rotation(&keys, self.max_age, now) {
            RotationPlan::Hold => {
                debug!(user = %self.user_name, "access key within max age, nothing to rotate");
                return Ok(None);
            }
            RotationPlan::Replace { elder } => {
                info!(user = %self.user_name, key_id = %elder, "deleting elder access key");
                self.api.delete_access_key(&self.user_name, &elder)?;
            }
            RotationPlan::Mint => {}
        }

        let key = self.api.create_access_key(&self.user_name)?;
        info!(user = %self.user_name, key_id = %key.id, "created access key");
        Ok(Some(key))
    }
}

impl Source for IamKeySource {
    fn read(&self, _ctx: &Context) -> Result<Option<CredentialSet>, SourceError> {
        let Some(key) = self.rotate_keys(Utc::now())? else {
            return Ok(None);
        };

        let mut set = CredentialSet::new();
        set.insert(AWS_ACCESS_KEY_ID, key.id.clone());
        set.insert(AWS_SECRET_ACCESS_KEY, key.secret.as_str());
        Ok(Some(set))
    }

    fn kind(&self) -> SourceKind {
        SourceKind::AwsIam
    }
}

#[cfg(feature = "aws")]
mod sdk {
    use aws_sdk_iam::error::DisplayErrorContext;
    use chrono::DateTime;
    use zeroize::Zeroizing;

    use super::{AccessKey, AccessKeyApi, AccessKeyMetadata};
    use crate::core::aws::{load_config, AwsTarget};
    use crate::core::runtime::Blocking;
    use crate::error::SourceError;

    /// IAM client driven on a private runtime.
    pub struct AwsIam {
        rt: Blocking,
        client: aws_sdk_iam::Client,
    }

    impl AwsIam {
        pub fn connect(target: &AwsTarget) -> std::io::Result<Self> {
            let rt = Blocking::new()?;
            let config = load_config(&rt, target);
            let client = aws_sdk_iam::Client::new(&config);
            Ok(Self { rt, client })
        }
    }

    impl AccessKeyApi for AwsIam {
        fn list_access_keys(&self, user: &str) -> Result<Vec<AccessKeyMetadata>, SourceError> {
            let out = self
                .rt
                .block_on(self.client.list_access_keys().user_name(user).send())
                .map_err(|e| {
                    SourceError::provider("unable to list access keys", DisplayErrorContext(e))
                })?;

            out.access_key_metadata()
                .iter()
                .map(|meta| {
                    let id = meta.access_key_id().unwrap_or_default().to_string();
                    let created_at = meta
                        .create_date()
                        .and_then(|d| DateTime::from_timestamp(d.secs(), d.subsec_nanos()))
                        .ok_or_else(|| {
                            SourceError::provider(
                                "unable to list access keys",
                                format!("key {} has no creation date", id),
                            )
                        })?;
                    Ok(AccessKeyMetadata { id, created_at })
                })
                .collect()
        }

        fn create_access_key(&self, user: &str) -> Result<AccessKey, SourceError> {
            let out = self
                .rt
                .block_on(self.client.create_access_key().user_name(user).send())
                .map_err(|e| {
                    SourceError::provider("unable to create new access key", DisplayErrorContext(e))
                })?;

            let key = out.access_key().ok_or_else(|| {
                SourceError::provider("unable to create new access key", "no key returned")
            })?;
            Ok(AccessKey {
                id: key.access_key_id().to_string(),
                secret: Zeroizing::new(key.secret_access_key().to_string()),
            })
        }

        fn delete_access_key(&self, user: &str, key_id: &str) -> Result<(), SourceError> {
            self.rt
                .block_on(
                    self.client
                        .delete_access_key()
                        .user_name(user)
                        .access_key_id(key_id)
                        .send(),
                )
                .map_err(|e| {
                    SourceError::provider("unable to delete older access key", DisplayErrorContext(e))
                })?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// In-memory IAM user with call counters.
    #[derive(Default)]
    struct FakeIam {
        keys: RefCell<Vec<AccessKeyMetadata>>,
        created: RefCell<u32>,
        deleted: RefCell<Vec<String>>,
        fail_list: bool,
    }

    impl AccessKeyApi for Rc<FakeIam> {
        fn list_access_keys(&self, _user: &str) -> Result<Vec<AccessKeyMetadata>, SourceError> {
            if self.fail_list {
                return Err(SourceError::provider("unable to list access keys", "throttled"));
            }
            Ok(self.keys.borrow().clone())
        }

        fn create_access_key(&self, _user: &str) -> Result<AccessKey, SourceError> {
            let mut created = self.created.borrow_mut();
            *created += 1;
            let id = format!("AKIANEW{}", created);
            self.keys.borrow_mut().push(AccessKeyMetadata {
                id: id.clone(),
                created_at: Utc::now(),
            });
            Ok(AccessKey {
                id,
                secret: Zeroizing::new(format!("secret-{}", created)),
            })
        }

        fn delete_access_key(&self, _user: &str, key_id: &str) -> Result<(), SourceError> {
            self.keys.borrow_mut().retain(|k| k.id != key_id);
            self.deleted.borrow_mut().push(key_id.to_string());
            Ok(())
        }
    }

    fn aged(id: &str, minutes: i64) -> AccessKeyMetadata {
        AccessKeyMetadata {
            id: id.to_string(),
            created_at: Utc::now() - chrono::Duration::minutes(minutes),
        }
    }

    fn source_with(keys: Vec<AccessKeyMetadata>) -> (IamKeySource, Rc<FakeIam>) {
        let fake = Rc::new(FakeIam {
            keys: RefCell::new(keys),
            ..Default::default()
        });
        let src = IamKeySource::new("test-user", Box::new(fake.clone()))
            .with_max_age(Duration::from_secs(60 * 60));
        (src, fake)
    }

    #[test]
    fn test_no_keys_mints_one() {
        let (src, fake) = source_with(vec![]);
        let key = src.rotate_keys(Utc::now()).unwrap();
        assert!(key.is_some());
        assert_eq!(*fake.created.borrow(), 1);
        assert!(fake.deleted.borrow().is_empty());
    }

    #[test]
    fn test_one_key_mints_without_deleting() {
        let (src, fake) = source_with(vec![aged("AKIAOLD", 5000)]);
        let key = src.rotate_keys(Utc::now()).unwrap().unwrap();
        assert_ne!(key.id, "AKIAOLD");
        assert_eq!(*fake.created.borrow(), 1);
        assert!(fake.deleted.borrow().is_empty());
        assert_eq!(fake.keys.borrow().len(), 2);
    }

    #[test]
    fn test_two_young_keys_hold() {
        let (src, fake) = source_with(vec![aged("AKIA1", 0), aged("AKIA2", 0)]);
        assert!(src.rotate_keys(Utc::now()).unwrap().is_none());
        assert_eq!(*fake.created.borrow(), 0);
        assert!(fake.deleted.borrow().is_empty());
    }

    #[test]
    fn test_two_old_keys_replace_elder() {
        let (src, fake) = source_with(vec![aged("AKIA2", 500), aged("AKIA1", 1000)]);
        let key = src.rotate_keys(Utc::now()).unwrap().unwrap();
        assert_eq!(*fake.deleted.borrow(), vec!["AKIA1".to_string()]);
        assert_eq!(*fake.created.borrow(), 1);
        let ids: Vec<_> = fake.keys.borrow().iter().map(|k| k.id.clone()).collect();
        assert_eq!(ids, vec!["AKIA2".to_string(), key.id.clone()]);
    }

    #[test]
    fn test_one_young_one_old_holds() {
        let (src, fake) = source_with(vec![aged("AKIA1", 1000), aged("AKIA2", 0)]);
        assert!(src.rotate_keys(Utc::now()).unwrap().is_none());
        assert_eq!(*fake.created.borrow(), 0);
        assert!(fake.deleted.borrow().is_empty());
    }

    #[test]
    fn test_three_keys_is_error() {
        let (src, fake) = source_with(vec![aged("A", 900), aged("B", 800), aged("C", 700)]);
        let err = src.rotate_keys(Utc::now()).unwrap_err();
        assert!(matches!(err, SourceError::TooManyKeys { count: 3, .. }));
        assert_eq!(*fake.created.borrow(), 0);
    }

    #[test]
    fn test_list_failure_aborts_read() {
        let fake = Rc::new(FakeIam {
            fail_list: true,
            ..Default::default()
        });
        let src = IamKeySource::new("test-user", Box::new(fake.clone()));
        assert!(src.read(&Context::new()).is_err());
        assert_eq!(*fake.created.borrow(), 0);
    }

    #[test]
    fn test_read_returns_both_credential_keys() {
        let (src, _fake) = source_with(vec![]);
        let set = src.read(&Context::new()).unwrap().unwrap();
        assert_eq!(set.get(AWS_ACCESS_KEY_ID), Some("AKIANEW1"));
        assert_eq!(set.get(AWS_SECRET_ACCESS_KEY), Some("secret-1"));
    }

    #[test]
    fn test_plan_boundary_is_inclusive() {
        let now = Utc::now();
        let max_age = Duration::from_secs(3600);
        let at_limit = now - chrono::Duration::seconds(3600);
        let keys = vec![
            AccessKeyMetadata {
                id: "elder".into(),
                created_at: at_limit,
            },
            AccessKeyMetadata {
                id: "newer".into(),
                created_at: at_limit,
            },
        ];
        assert_eq!(plan_rotation(&keys, max_age, now), RotationPlan::Hold);

        let past = now + chrono::Duration::seconds(1);
        assert_eq!(
            plan_rotation(&keys, max_age, past),
            RotationPlan::Replace {
                elder: "elder".into()
            }
        );
    }

    #[test]
    fn test_plan_picks_elder_regardless_of_order() {
        let now = Utc::now();
        let keys = vec![aged("young-ish", 120), aged("oldest", 240)];
        assert_eq!(
            plan_rotation(&keys, Duration::from_secs(60), now),
            RotationPlan::Replace {
                elder: "oldest".into()
            }
        );
    }

    #[test]
    fn test_default_max_age() {
        let src = IamKeySource::new("test-user", Box::new(Rc::new(FakeIam::default())));
        assert_eq!(src.max_age(), DEFAULT_MAX_AGE);
        assert_eq!(src.user_name(), "test-user");
    }
}
