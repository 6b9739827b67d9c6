//! Carrying out an activation once the overlay has closed.

use std::io::{self, Write};

use tracing::{info, warn};

use crate::event_loop::ControlFlow;
use crate::nav::{Activation, ActivationTarget};

pub trait Navigator {
    /// Follow `url` (already resolved against the site). The returned flow
    /// tells the host whether the session continues.
    fn navigate(&mut self, url: &str, activation: &Activation) -> io::Result<ControlFlow>;

    /// Called after the terminal has been restored.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Opens links in the system browser and keeps the session running.
#[derive(Debug, Default)]
pub struct BrowserNavigator {
    last: Option<String>,
}

impl BrowserNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

impl Navigator for BrowserNavigator {
    fn navigate(&mut self, url: &str, activation: &Activation) -> io::Result<ControlFlow> {
        let detached = activation.target == ActivationTarget::Detached;
        match webbrowser::open(url) {
            Ok(()) => info!(url, detached, "opened link"),
            Err(err) => warn!(url, error = %err, "could not open link"),
        }
        self.last = Some(url.to_string());
        Ok(ControlFlow::Continue)
    }
}

/// Records the chosen link, ends the session and prints it once the
/// terminal is back to normal. Used for scripting (`--print`).
#[derive(Debug)]
pub struct PrintNavigator<W: Write> {
    out: W,
    chosen: Option<String>,
}

impl<W: Write> PrintNavigator<W> {
    pub fn new(out: W) -> Self {
        Self { out, chosen: None }
    }

    pub fn chosen(&self) -> Option<&str> {
        self.chosen.as_deref()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Navigator for PrintNavigator<W> {
    fn navigate(&mut self, url: &str, _activation: &Activation) -> io::Result<ControlFlow> {
        self.chosen = Some(url.to_string());
        Ok(ControlFlow::Quit)
    }

    fn finish(&mut self) -> io::Result<()> {
        if let Some(url) = self.chosen.take() {
            writeln!(self.out, "{url}")?;
            self.out.flush()?;
        }
        Ok(())
    }
}
