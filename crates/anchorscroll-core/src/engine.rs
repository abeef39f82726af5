//! Scroll engine strategies
//!
//! The enhancer only curates which links are eligible. Animation, click
//! interception and history updates belong to the engine it activates.

/// An external smooth-scroll engine
pub trait ScrollEngine {
    /// Start the engine with its default options
    fn initialize(&mut self);
}

impl<T: ScrollEngine + ?Sized> ScrollEngine for &mut T {
    fn initialize(&mut self) {
        (**self).initialize();
    }
}

impl<T: ScrollEngine + ?Sized> ScrollEngine for Box<T> {
    fn initialize(&mut self) {
        (**self).initialize();
    }
}

/// Engine that does nothing when activated
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEngine;

impl ScrollEngine for NoopEngine {
    fn initialize(&mut self) {}
}

/// Engine for server-side enhancement
///
/// Activation is recorded rather than executed. [`BootstrapScript::render`]
/// then produces the inline script that starts the real engine in the
/// browser, behind the same capability check so legacy browsers keep native
/// fragment navigation.
#[derive(Debug, Clone)]
pub struct BootstrapScript {
    init_call: String,
    activations: usize,
}

impl BootstrapScript {
    pub fn new(init_call: impl Into<String>) -> Self {
        Self {
            init_call: init_call.into(),
            activations: 0,
        }
    }

    pub fn is_activated(&self) -> bool {
        self.activations > 0
    }

    pub fn activations(&self) -> usize {
        self.activations
    }

    /// Script source, or `None` if the engine was never activated
    pub fn render(&self) -> Option<String> {
        if !self.is_activated() {
            return None;
        }

        let call = self.init_call.trim();
        let call = if call.ends_with(';') {
            call.to_string()
        } else {
            format!("{call};")
        };

        Some(format!(
            "if ('querySelector' in document && 'addEventListener' in window) {{ {call} }}"
        ))
    }
}

impl Default for BootstrapScript {
    fn default() -> Self {
        Self::new("smoothScroll.init();")
    }
}

impl ScrollEngine for BootstrapScript {
    fn initialize(&mut self) {
        self.activations += 1;
    }
}
