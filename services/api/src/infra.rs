use cleanquote::quotes::{PricingSettings, PricingSettingsError, PricingSettingsRepository};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local admin pricing settings; reset to defaults on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPricingSettingsRepository {
    settings: Arc<RwLock<PricingSettings>>,
}

impl PricingSettingsRepository for InMemoryPricingSettingsRepository {
    fn current(&self) -> Result<PricingSettings, PricingSettingsError> {
        let guard = self
            .settings
            .read()
            .map_err(|_| PricingSettingsError::Unavailable("settings lock poisoned".into()))?;
        Ok(*guard)
    }

    fn replace(&self, settings: PricingSettings) -> Result<(), PricingSettingsError> {
        let mut guard = self
            .settings
            .write()
            .map_err(|_| PricingSettingsError::Unavailable("settings lock poisoned".into()))?;
        *guard = settings;
        Ok(())
    }
}
