//! Page readiness gate.
//!
//! The controller may only take its first snapshot once the page controls
//! exist and translations for the current language are loaded. Both are
//! reported by other subsystems without a completion signal, so the gate
//! polls on a fixed interval up to a bounded number of attempts.

use std::fmt;
use std::time::Duration;

use crate::config::schema::ReadinessConfig;
use crate::form::{ControlId, FormView};
use crate::i18n::I18n;

/// A readiness condition that did not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prerequisite {
    /// Save and/or reset controls are not on the page yet.
    Controls,
    /// The translation function or registry is not available.
    Translator,
    /// No translations loaded for the current language.
    Translations { language: String },
}

impl fmt::Display for Prerequisite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prerequisite::Controls => write!(f, "settings buttons not ready"),
            Prerequisite::Translator => write!(f, "translation system not ready"),
            Prerequisite::Translations { language } => {
                write!(f, "translations for `{}` not loaded", language)
            }
        }
    }
}

/// Bounded polling for page readiness.
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    interval: Duration,
    max_attempts: u32,
}

impl ReadinessGate {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_config(config: &ReadinessConfig) -> Self {
        Self::new(Duration::from_millis(config.poll_interval_ms), config.max_attempts)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Evaluate the three conditions once.
    pub fn check<F>(form: &F, i18n: &dyn I18n) -> Result<(), Prerequisite>
    where
        F: FormView + ?Sized,
    {
        if form.control(ControlId::SaveSettings).is_none()
            || form.control(ControlId::ResetSettings).is_none()
        {
            return Err(Prerequisite::Controls);
        }

        if !i18n.is_installed() {
            return Err(Prerequisite::Translator);
        }

        let language = i18n.language();
        if i18n.translation_count(&language) == 0 {
            return Err(Prerequisite::Translations { language });
        }

        Ok(())
    }

    /// Poll until ready. Returns the attempt on which readiness was observed,
    /// or the last unmet prerequisite once attempts are exhausted.
    pub async fn wait<F>(&self, form: &F, i18n: &dyn I18n) -> Result<u32, (u32, Prerequisite)>
    where
        F: FormView + ?Sized,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match Self::check(form, i18n) {
                Ok(()) => return Ok(attempt),
                Err(missing) if attempt >= self.max_attempts => {
                    tracing::error!(attempts = attempt, missing = %missing, "Settings page never became ready");
                    return Err((attempt, missing));
                }
                Err(missing) => {
                    tracing::debug!(attempt, missing = %missing, "Waiting for settings page");
                    tokio::time::sleep(self.interval).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::form::FormState;
    use crate::i18n::Catalog;
    use std::collections::HashMap;

    #[test]
    fn test_check_order() {
        let catalog = Catalog::new("en");
        let bare = FormState::new();
        assert_eq!(ReadinessGate::check(&bare, &catalog), Err(Prerequisite::Controls));

        let mut form = FormState::from_configuration(&Configuration::default());
        form.remove_control(ControlId::ResetSettings);
        assert_eq!(ReadinessGate::check(&form, &catalog), Err(Prerequisite::Controls));

        let form = FormState::from_configuration(&Configuration::default());
        assert_eq!(ReadinessGate::check(&form, &catalog), Err(Prerequisite::Translator));

        catalog.install();
        assert_eq!(
            ReadinessGate::check(&form, &catalog),
            Err(Prerequisite::Translations { language: "en".into() })
        );

        catalog.insert_language("en", HashMap::from([("k".into(), "v".into())]));
        assert_eq!(ReadinessGate::check(&form, &catalog), Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_gives_up_after_max_attempts() {
        let gate = ReadinessGate::new(Duration::from_millis(100), 5);
        let form = FormState::from_configuration(&Configuration::default());
        let catalog = Catalog::new("en");

        let result = gate.wait(&form, &catalog).await;
        assert_eq!(result, Err((5, Prerequisite::Translator)));
    }

    #[tokio::test]
    async fn test_wait_ready_on_first_attempt() {
        let gate = ReadinessGate::new(Duration::from_millis(10), 3);
        let form = FormState::from_configuration(&Configuration::default());
        assert_eq!(gate.wait(&form, &Catalog::english()).await, Ok(1));
    }

    #[test]
    fn test_zero_attempts_still_checks_once() {
        assert_eq!(ReadinessGate::new(Duration::from_millis(1), 0).max_attempts(), 1);
    }
}
