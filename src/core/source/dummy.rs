//! Random-value source for testing pipelines end to end.

use rand::distributions::Alphanumeric;
use rand::Rng;

use super::{Source, SourceKind};
use crate::core::constants::DUMMY_SECRET;
use crate::core::{Context, CredentialSet};
use crate::error::SourceError;

const SECRET_LEN: usize = 10;

/// Generates a random 10-character alphanumeric value on every read.
#[derive(Debug, Default)]
pub struct Dummy;

impl Source for Dummy {
    fn read(&self, _ctx: &Context) -> Result<Option<CredentialSet>, SourceError> {
        let value: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SECRET_LEN)
            .map(char::from)
            .collect();

        let mut set = CredentialSet::new();
        set.insert(DUMMY_SECRET, value);
        Ok(Some(set))
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Dummy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_always_produces_secret() {
        let set = Dummy.read(&Context::new()).unwrap().unwrap();
        let value = set.get(DUMMY_SECRET).unwrap();
        assert_eq!(value.len(), SECRET_LEN);
        assert!(value.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_dummy_values_differ() {
        let a = Dummy.read(&Context::new()).unwrap().unwrap();
        let b = Dummy.read(&Context::new()).unwrap().unwrap();
        assert_ne!(a.get(DUMMY_SECRET), b.get(DUMMY_SECRET));
    }
}
