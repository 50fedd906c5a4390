//! Bridge between filtered markup and the external renderer
//!
//! [`MathJaxLoader`] owns the renderer handle plus the little state the
//! bridge needs: how far configuration has progressed and which locale the
//! renderer should use. The locale is resolved through the language mapper
//! on configuration and on every locale change, and is pushed to the
//! renderer once it reports itself initialized.
//!
//! ## Example
//!
//! ```rust
//! use mathjaxloader::loader::{ConfigState, MathJaxLoader};
//! use mathjaxloader::renderer::{RecordingRenderer, StaticLocaleProvider};
//! use mathjaxloader::LoaderConfig;
//!
//! let loader = MathJaxLoader::new(RecordingRenderer::ready(), LoaderConfig::default());
//! loader.configure(&StaticLocaleProvider::new("fr-ca", "en"));
//! assert_eq!(loader.state(), ConfigState::Configuring);
//! assert_eq!(loader.locale().as_deref(), Some("fr"));
//! ```

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::core::language::map_language_code;
use crate::core::markup::equation_nodes;
use crate::core::poller::{await_ready, Readiness};
use crate::core::renderer::{LocaleProvider, MathRenderer};
use crate::utils::config::LoaderConfig;

/// Configuration progress of the external renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigState {
    /// `configure` has not been called
    #[default]
    Uninitialized,
    /// Configuration handed over, renderer not yet seen initialized
    Configuring,
    /// Renderer initialized and locale applied
    Configured,
}

#[derive(Debug, Default)]
struct LoaderState {
    config: ConfigState,
    locale: Option<String>,
}

/// Outcome of typesetting one container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypesetReport {
    /// How the readiness wait ended
    pub readiness: Readiness,
    /// Equation nodes handed to the renderer
    pub typeset: usize,
    /// Equation nodes the renderer rejected
    pub failed: usize,
}

/// Renderer bridge with explicit, process-scoped state
pub struct MathJaxLoader<R> {
    renderer: R,
    config: LoaderConfig,
    // Never held across an await point.
    state: Mutex<LoaderState>,
}

impl<R: MathRenderer> MathJaxLoader<R> {
    pub fn new(renderer: R, config: LoaderConfig) -> Self {
        Self {
            renderer,
            config,
            state: Mutex::new(LoaderState::default()),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn state(&self) -> ConfigState {
        self.state.lock().config
    }

    /// Locale resolved for the renderer, if any
    pub fn locale(&self) -> Option<String> {
        self.state.lock().locale.clone()
    }

    /// Hand the renderer its configuration and the resolved locale
    ///
    /// Only the first call has an effect. A rejected configuration is logged
    /// and leaves the loader uninitialized.
    pub fn configure<P: LocaleProvider + ?Sized>(&self, provider: &P) {
        let locale = self.resolve_locale(provider);
        {
            let mut state = self.state.lock();
            if state.config != ConfigState::Uninitialized {
                debug!(state = ?state.config, "renderer already configured");
                return;
            }
            state.config = ConfigState::Configuring;
            state.locale = Some(locale.clone());
        }

        match self.renderer.configure(&locale, &self.config.mathjax_config) {
            Ok(()) => info!(locale = %locale, "renderer configured"),
            Err(err) => {
                warn!(error = %err, "renderer rejected configuration");
                self.state.lock().config = ConfigState::Uninitialized;
            }
        }
    }

    /// React to the host application switching locale
    ///
    /// A configured renderer is switched immediately; otherwise the new
    /// locale is applied once the renderer finishes initializing.
    pub fn locale_changed<P: LocaleProvider + ?Sized>(&self, provider: &P) {
        let locale = self.resolve_locale(provider);
        let apply_now = {
            let mut state = self.state.lock();
            if state.locale.as_deref() == Some(locale.as_str()) {
                return;
            }
            state.locale = Some(locale.clone());
            state.config == ConfigState::Configured
        };

        if apply_now {
            self.push_locale(&locale);
        } else {
            debug!(locale = %locale, "locale change pending renderer initialization");
        }
    }

    /// Typeset every equation node in `container` once the renderer is ready
    ///
    /// Typesetting goes ahead even when the readiness wait is exhausted; the
    /// renderer call may then do nothing.
    pub async fn typeset(&self, container: &str) -> TypesetReport {
        let renderer = &self.renderer;
        let readiness = await_ready(|| renderer.is_initialized(), &self.config.poll).await;
        if readiness.is_ready() {
            self.finish_configuration();
        }

        let mut report = TypesetReport {
            readiness,
            typeset: 0,
            failed: 0,
        };
        for node in equation_nodes(container) {
            match self.renderer.typeset(&node) {
                Ok(()) => report.typeset += 1,
                Err(err) => {
                    warn!(error = %err, offset = node.range.start, "typeset failed");
                    report.failed += 1;
                }
            }
        }

        debug!(
            typeset = report.typeset,
            failed = report.failed,
            attempts = readiness.attempts(),
            "container processed"
        );
        report
    }

    /// Typeset containers whose content was just updated, in order
    pub async fn content_updated(&self, containers: &[&str]) -> Vec<TypesetReport> {
        let mut reports = Vec::with_capacity(containers.len());
        for container in containers {
            reports.push(self.typeset(container).await);
        }
        reports
    }

    /// Resolve the provider's locale, falling back to the configured default
    /// when the provider has none
    fn resolve_locale<P: LocaleProvider + ?Sized>(&self, provider: &P) -> String {
        let default = provider.default_locale();
        let default = if default.trim().is_empty() {
            self.config.default_locale.clone()
        } else {
            default
        };
        map_language_code(&provider.current_locale(), &default)
    }

    /// Move Configuring to Configured and apply the pending locale
    fn finish_configuration(&self) {
        let locale = {
            let mut state = self.state.lock();
            if state.config != ConfigState::Configuring {
                return;
            }
            state.config = ConfigState::Configured;
            state.locale.clone()
        };

        if let Some(locale) = locale {
            self.push_locale(&locale);
        }
    }

    fn push_locale(&self, locale: &str) {
        match self.renderer.set_locale(locale) {
            Ok(()) => debug!(locale, "renderer locale set"),
            Err(err) => warn!(error = %err, locale, "renderer rejected locale"),
        }
    }
}
