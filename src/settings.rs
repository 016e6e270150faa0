use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::auth::hasher::{
    PasswordHasher, SaltGenerator, DEFAULT_HASH_BYTES, DEFAULT_ITERATIONS, DEFAULT_SALT_BYTES,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    pub hashing: Hashing,
}

/// Key-stretching parameters. Tunable per deployment, but changing them only
/// affects credentials stored afterwards; existing digests verify with the
/// parameters they were created under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hashing {
    /// PBKDF2 iteration count. Raising it slows every login attempt,
    /// attacker and legitimate user alike.
    pub iterations: u32,
    /// Derived-hash length in bytes.
    pub hash_bytes: usize,
    /// Generated-salt length in bytes.
    pub salt_bytes: usize,
}

impl Default for Hashing {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            hash_bytes: DEFAULT_HASH_BYTES,
            salt_bytes: DEFAULT_SALT_BYTES,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("hashing.iterations", i64::from(DEFAULT_ITERATIONS))
            .into_diagnostic()?
            .set_default("hashing.hash_bytes", DEFAULT_HASH_BYTES as i64)
            .into_diagnostic()?
            .set_default("hashing.salt_bytes", DEFAULT_SALT_BYTES as i64)
            .into_diagnostic()?;

        // Optional file
        if Path::new(path).exists() {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment overrides: APSIS__HASHING__ITERATIONS=50000, etc.
        builder = builder.add_source(config::Environment::with_prefix("APSIS").separator("__"));

        let settings: Settings = builder
            .build()
            .into_diagnostic()?
            .try_deserialize()
            .into_diagnostic()?;

        tracing::info!(
            iterations = settings.hashing.iterations,
            hash_bytes = settings.hashing.hash_bytes,
            salt_bytes = settings.hashing.salt_bytes,
            "Loaded hashing settings"
        );
        Ok(settings)
    }

    /// A hasher configured with these settings.
    pub fn hasher(&self) -> PasswordHasher {
        PasswordHasher::with_parameters(self.hashing.iterations, self.hashing.hash_bytes)
    }

    /// A salt generator configured with these settings.
    pub fn salt_generator(&self) -> SaltGenerator {
        SaltGenerator::with_len(self.hashing.salt_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::load("/nonexistent/apsis-config").unwrap();
        assert_eq!(settings.hashing.iterations, DEFAULT_ITERATIONS);
        assert_eq!(settings.hashing.hash_bytes, DEFAULT_HASH_BYTES);
        assert_eq!(settings.hashing.salt_bytes, DEFAULT_SALT_BYTES);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apsis.toml");
        std::fs::write(
            &path,
            r#"
[hashing]
iterations = 50000
"#,
        )
        .unwrap();

        let settings = Settings::load(path.to_str().unwrap()).unwrap();
        assert_eq!(settings.hashing.iterations, 50_000);
        // untouched keys keep their defaults
        assert_eq!(settings.hashing.hash_bytes, DEFAULT_HASH_BYTES);
    }

    #[test]
    fn test_configured_hasher_and_salt_generator() {
        let settings = Settings {
            hashing: Hashing {
                iterations: 100,
                hash_bytes: 32,
                salt_bytes: 16,
            },
        };
        assert_eq!(settings.hasher().iterations(), 100);
        assert_eq!(settings.hasher().hash_bytes(), 32);
        assert_eq!(settings.salt_generator().generate().len(), 16);
    }
}
