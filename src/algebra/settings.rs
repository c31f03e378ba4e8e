use crate::algebra::SettingsError;
use derive_builder::Builder;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Settings controlling the parallel decomposition of the multiply kernels.
///
/// Construct with [`MultiplySettingsBuilder`] to get validated defaults:
///
/// ```no_run
/// use diagmat::algebra::*;
///
/// let settings = MultiplySettingsBuilder::default()
///     .max_threads(4)
///     .min_parallel_len(256)
///     .build()
///     .unwrap();
/// ```

#[derive(Builder, Debug, Clone, PartialEq, Eq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MultiplySettings {
    ///maximum number of worker threads (0 = rayon default)
    #[builder(default = "0")]
    pub max_threads: u32,

    ///diagonals with fewer entries than this are processed serially
    #[builder(default = "1024")]
    pub min_parallel_len: usize,

    ///minimum number of diagonal entries handed to a single rayon task
    #[builder(default = "64")]
    pub min_task_len: usize,
}

impl Default for MultiplySettings {
    fn default() -> MultiplySettings {
        MultiplySettingsBuilder::default().build().unwrap()
    }
}

impl MultiplySettings {
    /// Checks that the settings are valid.
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_min_task_len(self.min_task_len)
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for MultiplySettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        MultiplySettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl MultiplySettingsBuilder {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(min_task_len) = self.min_task_len {
            validate_min_task_len(min_task_len)?;
        }
        Ok(())
    }
}

fn validate_min_task_len(min_task_len: usize) -> Result<(), SettingsError> {
    if min_task_len == 0 {
        Err(SettingsError::BadFieldValue("min_task_len"))
    } else {
        Ok(())
    }
}

#[test]
fn test_settings_validate() {
    // all standard settings
    let settings = MultiplySettingsBuilder::default().build().unwrap();
    assert_eq!(settings, MultiplySettings::default());
    assert_eq!(settings.max_threads, 0);

    // fail on zero task length
    assert!(MultiplySettingsBuilder::default()
        .min_task_len(0)
        .build()
        .is_err());

    // directly construct a bad MultiplySettings and manually check
    let settings = MultiplySettings {
        min_task_len: 0,
        ..MultiplySettings::default()
    };
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadFieldValue("min_task_len"))
    );
}
