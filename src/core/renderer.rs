//! External capabilities the loader talks to
//!
//! The math typesetting library and the host application's locale source are
//! owned elsewhere. They are reached only through the two traits below and
//! are injected explicitly into [`crate::core::loader::MathJaxLoader`].
//!
//! Implementations:
//! - `NoopRenderer`: always initialized, accepts everything
//! - `RecordingRenderer`: records calls, becomes ready after a set number of
//!   readiness checks (testing, CLI dry runs)
//! - `StaticLocaleProvider`: fixed default with a replaceable current locale

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::core::markup::EquationNode;
use crate::utils::error::{LoaderError, LoaderResult};

/// The math typesetting library, seen from the loader
pub trait MathRenderer: Send + Sync {
    /// Hand the renderer its configuration and initial locale
    fn configure(&self, locale: &str, config: &str) -> LoaderResult<()>;

    /// Switch the renderer's active locale
    fn set_locale(&self, locale: &str) -> LoaderResult<()>;

    /// Typeset the math inside one equation node
    fn typeset(&self, node: &EquationNode<'_>) -> LoaderResult<()>;

    /// True once the renderer has finished its lazy initialization
    fn is_initialized(&self) -> bool;
}

impl<R: MathRenderer + ?Sized> MathRenderer for Arc<R> {
    fn configure(&self, locale: &str, config: &str) -> LoaderResult<()> {
        (**self).configure(locale, config)
    }

    fn set_locale(&self, locale: &str) -> LoaderResult<()> {
        (**self).set_locale(locale)
    }

    fn typeset(&self, node: &EquationNode<'_>) -> LoaderResult<()> {
        (**self).typeset(node)
    }

    fn is_initialized(&self) -> bool {
        (**self).is_initialized()
    }
}

/// Source of the host application's locale
pub trait LocaleProvider {
    /// Locale currently active in the application
    fn current_locale(&self) -> String;

    /// Locale to fall back to when nothing better matches
    fn default_locale(&self) -> String;
}

/// Renderer that is always ready and does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRenderer;

impl MathRenderer for NoopRenderer {
    fn configure(&self, _locale: &str, _config: &str) -> LoaderResult<()> {
        Ok(())
    }

    fn set_locale(&self, _locale: &str) -> LoaderResult<()> {
        Ok(())
    }

    fn typeset(&self, _node: &EquationNode<'_>) -> LoaderResult<()> {
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        true
    }
}

/// A call received by [`RecordingRenderer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererCall {
    Configure { locale: String, config: String },
    SetLocale(String),
    /// Markup of the typeset node
    Typeset(String),
}

/// Renderer that records every call
pub struct RecordingRenderer {
    calls: Mutex<Vec<RendererCall>>,
    checks: AtomicU32,
    ready_after: u32,
    fail_typeset: bool,
    configure_failures: AtomicU32,
}

impl RecordingRenderer {
    /// Initialized from the first readiness check on
    pub fn ready() -> Self {
        Self::ready_after(1)
    }

    /// Reports initialized from the `checks`-th readiness check on
    pub fn ready_after(checks: u32) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            checks: AtomicU32::new(0),
            ready_after: checks,
            fail_typeset: false,
            configure_failures: AtomicU32::new(0),
        }
    }

    /// Never reports initialized
    pub fn never_ready() -> Self {
        Self::ready_after(u32::MAX)
    }

    /// Reject every typeset call
    pub fn with_failing_typeset(mut self) -> Self {
        self.fail_typeset = true;
        self
    }

    /// Reject the next `times` configure calls
    pub fn with_failing_configure(self, times: u32) -> Self {
        self.configure_failures.store(times, Ordering::SeqCst);
        self
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<RendererCall> {
        self.calls.lock().clone()
    }

    /// Number of readiness checks made so far
    pub fn readiness_checks(&self) -> u32 {
        self.checks.load(Ordering::SeqCst)
    }

    fn record(&self, call: RendererCall) {
        self.calls.lock().push(call);
    }
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::ready()
    }
}

impl MathRenderer for RecordingRenderer {
    fn configure(&self, locale: &str, config: &str) -> LoaderResult<()> {
        let rejected = self
            .configure_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if rejected {
            return Err(LoaderError::render("configure", "renderer rejected configuration"));
        }
        self.record(RendererCall::Configure {
            locale: locale.to_string(),
            config: config.to_string(),
        });
        Ok(())
    }

    fn set_locale(&self, locale: &str) -> LoaderResult<()> {
        self.record(RendererCall::SetLocale(locale.to_string()));
        Ok(())
    }

    fn typeset(&self, node: &EquationNode<'_>) -> LoaderResult<()> {
        if self.fail_typeset {
            return Err(LoaderError::render("typeset", "renderer rejected node"));
        }
        self.record(RendererCall::Typeset(node.html.to_string()));
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        let seen = self.checks.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        seen >= self.ready_after
    }
}

/// Locale provider with a fixed default and a replaceable current locale
pub struct StaticLocaleProvider {
    current: RwLock<String>,
    default: String,
}

impl StaticLocaleProvider {
    pub fn new(current: &str, default: &str) -> Self {
        Self {
            current: RwLock::new(current.to_string()),
            default: default.to_string(),
        }
    }

    /// Replace the current locale, as a "locale changed" notification would
    pub fn set_current(&self, locale: &str) {
        *self.current.write() = locale.to_string();
    }
}

impl LocaleProvider for StaticLocaleProvider {
    fn current_locale(&self) -> String {
        self.current.read().clone()
    }

    fn default_locale(&self) -> String {
        self.default.clone()
    }
}
