//! VM configuration registry.
//!
//! Maps a profile name to an ordered list of component tags plus the name of
//! the environment file the platform build reads for that profile. The table
//! is append-only: profiles are validated at registration and never mutated.

use crate::component::ComponentTag;
use crate::error::{Result, SuiteError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A named, buildable variant of the platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VmProfile {
    /// Unique profile name (e.g. `bf-jvm-ce`).
    pub name: String,

    /// Component tags in feature-activation order.
    pub tags: Vec<ComponentTag>,

    /// Environment file the build reads for this profile.
    pub env_file: String,
}

/// Registry of VM profiles in registration order.
#[derive(Debug, Default)]
pub struct VmConfigRegistry {
    profiles: Vec<VmProfile>,
    index: HashMap<String, usize>,
}

impl VmConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the Brainf*ck build profiles.
    ///
    /// Each profile extends the JVM base group; native profiles add the
    /// ahead-of-time compiler on top of the JIT compiler.
    pub fn with_brainfck_profiles() -> Result<Self> {
        use ComponentTag::*;

        let base = [Java, Nfi, Sdk, Truffle];
        let with = |extra: &[ComponentTag]| -> Vec<ComponentTag> {
            base.iter().chain(extra.iter()).copied().collect()
        };

        let mut registry = Self::new();
        registry.register("bf-jvm", with(&[]), "jvm")?;
        registry.register("bf-jvm-ce", with(&[Compiler]), "jvm-ce")?;
        registry.register("bf-jvm-ee", with(&[Compiler, CompilerEe]), "jvm-ee")?;
        registry.register(
            "bf-native-ce",
            with(&[Compiler, SubstrateVm, TruffleMacro]),
            "native-ce",
        )?;
        registry.register(
            "bf-native-ee",
            with(&[Compiler, CompilerEe, SubstrateVm, SubstrateVmEe, TruffleMacro]),
            "native-ee",
        )?;
        Ok(registry)
    }

    /// Register a profile. Fails if the name is taken; the registry is left
    /// untouched in that case.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        tags: Vec<ComponentTag>,
        env_file: impl Into<String>,
    ) -> Result<&VmProfile> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(SuiteError::DuplicateProfile(name));
        }

        let env_file = env_file.into();
        debug!(profile = %name, env_file = %env_file, tags = tags.len(), "Registering VM profile");

        let slot = self.profiles.len();
        self.index.insert(name.clone(), slot);
        self.profiles.push(VmProfile {
            name,
            tags,
            env_file,
        });
        Ok(&self.profiles[slot])
    }

    /// Look up a profile by name.
    pub fn resolve(&self, name: &str) -> Result<&VmProfile> {
        self.index
            .get(name)
            .map(|&slot| &self.profiles[slot])
            .ok_or_else(|| SuiteError::UnknownProfile(name.to_string()))
    }

    /// Names of all registered profiles, in registration order.
    ///
    /// The iterator is cloneable, so callers can walk it more than once.
    pub fn list_profiles(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.profiles.iter().map(|p| p.name.as_str())
    }

    /// All registered profiles, in registration order.
    pub fn profiles(&self) -> &[VmProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ComponentTag::*;

    #[test]
    fn test_register_and_resolve() {
        let mut registry = VmConfigRegistry::new();
        registry
            .register("a", vec![Java, Truffle], "jvm")
            .expect("register a");
        registry
            .register("b", vec![Java, SubstrateVm], "native")
            .expect("register b");

        let a = registry.resolve("a").unwrap();
        assert_eq!(a.tags, vec![Java, Truffle]);
        assert_eq!(a.env_file, "jvm");

        let b = registry.resolve("b").unwrap();
        assert_eq!(b.tags, vec![Java, SubstrateVm]);
        assert_eq!(b.env_file, "native");
    }

    #[test]
    fn test_duplicate_leaves_first_registration() {
        let mut registry = VmConfigRegistry::new();
        registry.register("dup", vec![Java], "jvm").unwrap();

        let err = registry
            .register("dup", vec![SubstrateVm], "native")
            .unwrap_err();
        assert!(matches!(err, SuiteError::DuplicateProfile(ref n) if n == "dup"));

        let profile = registry.resolve("dup").unwrap();
        assert_eq!(profile.tags, vec![Java]);
        assert_eq!(profile.env_file, "jvm");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_profile() {
        let registry = VmConfigRegistry::with_brainfck_profiles().unwrap();
        let err = registry.resolve("bf-wasm").unwrap_err();
        assert!(matches!(err, SuiteError::UnknownProfile(_)));
    }

    #[test]
    fn test_tags_not_reordered_or_deduplicated() {
        let mut registry = VmConfigRegistry::new();
        registry
            .register("odd", vec![Truffle, Java, Truffle], "odd")
            .unwrap();
        assert_eq!(
            registry.resolve("odd").unwrap().tags,
            vec![Truffle, Java, Truffle]
        );
    }

    #[test]
    fn test_list_profiles_is_restartable() {
        let registry = VmConfigRegistry::with_brainfck_profiles().unwrap();
        let names = registry.list_profiles();
        let first: Vec<&str> = names.clone().collect();
        let second: Vec<&str> = names.collect();
        assert_eq!(first, second);
        assert_eq!(
            first,
            vec!["bf-jvm", "bf-jvm-ce", "bf-jvm-ee", "bf-native-ce", "bf-native-ee"]
        );
    }

    #[test]
    fn test_brainfck_profile_lattice() {
        let registry = VmConfigRegistry::with_brainfck_profiles().unwrap();

        assert_eq!(
            registry.resolve("bf-jvm").unwrap().tags,
            vec![Java, Nfi, Sdk, Truffle]
        );
        assert_eq!(
            registry.resolve("bf-native-ee").unwrap().tags,
            vec![
                Java,
                Nfi,
                Sdk,
                Truffle,
                Compiler,
                CompilerEe,
                SubstrateVm,
                SubstrateVmEe,
                TruffleMacro
            ]
        );
        assert_eq!(registry.resolve("bf-native-ce").unwrap().env_file, "native-ce");
    }
}
