use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, error, info, warn};

use crate::error::Result;
use crate::figure::backend::{Backend, HeadlessBackend, NativeBackend};
use crate::figure::model::{Axes3d, Figure, DPI, FIGSIZE};
use crate::style::StyleCycle;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Configuration shared by every session a [`Plotter`] opens.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Show figures on exit instead of saving them.
    pub interactive: bool,
    /// Appended to the figure name when saving, including its leading dot.
    pub suffix: Option<String>,
    /// Figure size in inches when a session does not choose one.
    pub figsize: (f64, f64),
    pub dpi: u32,
    pub style_cycle: StyleCycle,
    /// Directory saved figures go to; the working directory when `None`.
    pub output_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interactive: true,
            suffix: None,
            figsize: FIGSIZE,
            dpi: DPI,
            style_cycle: StyleCycle::default(),
            output_dir: None,
        }
    }
}

impl Settings {
    /// Where a figure with this name is saved: `<output_dir>/<name><suffix>`.
    pub fn output_path(&self, name: &FigureName) -> PathBuf {
        let file = format!("{name}{}", self.suffix.as_deref().unwrap_or(""));
        match &self.output_dir {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        }
    }
}

// ---------------------------------------------------------------------------
// Names, options and outcomes
// ---------------------------------------------------------------------------

/// Name a figure is saved under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FigureName {
    /// Taken from the plotter's counter.
    Numbered(u64),
    /// Chosen by the caller; may contain a relative or absolute path.
    Given(String),
}

impl fmt::Display for FigureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FigureName::Numbered(n) => write!(f, "{n}"),
            FigureName::Given(s) => write!(f, "{s}"),
        }
    }
}

/// Per-session options; unset fields fall back to the plotter's settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FigureOptions {
    pub name: Option<String>,
    pub figsize: Option<(f64, f64)>,
    pub dpi: Option<u32>,
    pub title: Option<String>,
}

impl FigureOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn figsize(mut self, width: f64, height: f64) -> Self {
        self.figsize = Some((width, height));
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.dpi = Some(dpi);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// What happened to a figure when its session ended.
#[derive(Debug)]
pub enum Outcome {
    /// Displayed; the figure is handed back to the caller.
    Shown(Figure),
    /// Written to this path and closed.
    Saved(PathBuf),
}

impl Outcome {
    pub fn saved_path(&self) -> Option<&Path> {
        match self {
            Outcome::Saved(path) => Some(path),
            Outcome::Shown(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

/// Decides what entering a session yields.
pub trait Projection {
    type Target;

    fn enter(figure: &mut Figure) -> &mut Self::Target;
}

/// Entering yields the whole figure.
#[derive(Debug)]
pub enum Flat {}

impl Projection for Flat {
    type Target = Figure;

    fn enter(figure: &mut Figure) -> &mut Figure {
        figure
    }
}

/// Entering yields a single 3-D axes spanning the figure.
#[derive(Debug)]
pub enum ThreeD {}

impl Projection for ThreeD {
    type Target = Axes3d;

    fn enter(figure: &mut Figure) -> &mut Axes3d {
        figure.axes_3d()
    }
}

// ---------------------------------------------------------------------------
// Plotter: the session factory
// ---------------------------------------------------------------------------

/// Opens figure sessions and owns their shared configuration and name counter.
#[derive(Debug)]
pub struct Plotter<B: Backend = NativeBackend> {
    settings: Settings,
    counter: AtomicU64,
    backend: Mutex<B>,
}

impl Plotter<NativeBackend> {
    /// Plotter that shows figures in a native window.
    pub fn native() -> Self {
        Self::new(NativeBackend)
    }
}

impl Default for Plotter<NativeBackend> {
    fn default() -> Self {
        Self::native()
    }
}

impl Plotter<HeadlessBackend> {
    /// Plotter that only ever saves; starts in non-interactive mode.
    pub fn headless() -> Self {
        let mut plotter = Self::new(HeadlessBackend);
        plotter.set_interactive(false);
        plotter
    }
}

impl<B: Backend> Plotter<B> {
    pub fn new(backend: B) -> Self {
        Self::with_settings(backend, Settings::default())
    }

    pub fn with_settings(backend: B, settings: Settings) -> Self {
        Self {
            settings,
            counter: AtomicU64::new(0),
            backend: Mutex::new(backend),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Show figures on exit (`true`) or save them (`false`).
    pub fn set_interactive(&mut self, interactive: bool) {
        self.settings.interactive = interactive;
    }

    /// Extension appended to saved figure names. `None` or an empty string
    /// disables it; `"png"` and `".png"` both give `.png`.
    pub fn set_extension(&mut self, extension: Option<&str>) {
        self.settings.suffix = extension
            .map(|ext| ext.trim_start_matches('.'))
            .filter(|ext| !ext.is_empty())
            .map(|ext| format!(".{ext}"));
    }

    pub fn set_style_cycle(&mut self, cycle: StyleCycle) {
        self.settings.style_cycle = cycle;
    }

    pub fn set_output_dir(&mut self, dir: Option<PathBuf>) {
        self.settings.output_dir = dir;
    }

    /// Number the next anonymous session will get.
    pub fn next_number(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    /// Anonymous, auto-numbered session.
    pub fn figure(&self) -> Session<'_, B> {
        let name = self.take_number();
        self.open(name, self.default_figure())
    }

    /// Session saved under `name`.
    pub fn named(&self, name: impl Into<String>) -> Session<'_, B> {
        self.open(FigureName::Given(name.into()), self.default_figure())
    }

    /// Session with explicit options.
    pub fn figure_with(&self, options: FigureOptions) -> Result<Session<'_, B>> {
        self.open_with(options)
    }

    /// Session whose `enter` yields a full-figure 3-D axes.
    pub fn figure_3d(&self, options: FigureOptions) -> Result<Session<'_, B, ThreeD>> {
        self.open_with(options)
    }

    /// Plot every `(xs, ys)` pair on a fresh anonymous figure with default
    /// styling, then release it straight away.
    pub fn quick_plot<X, Y>(&self, series: impl IntoIterator<Item = (X, Y)>) -> Result<Outcome>
    where
        X: AsRef<[f64]>,
        Y: AsRef<[f64]>,
    {
        let mut session = self.figure();
        for (xs, ys) in series {
            session.enter().plot(xs.as_ref(), ys.as_ref())?;
        }
        session.finish()
    }

    fn open_with<P: Projection>(&self, options: FigureOptions) -> Result<Session<'_, B, P>> {
        let mut figure = Figure::new(
            options.figsize.unwrap_or(self.settings.figsize),
            options.dpi.unwrap_or(self.settings.dpi),
        )?
        .with_cycle(self.settings.style_cycle.clone());
        if let Some(title) = options.title {
            figure.set_title(title);
        }
        let name = match options.name {
            Some(name) => FigureName::Given(name),
            None => self.take_number(),
        };
        Ok(self.open(name, figure))
    }

    fn open<P: Projection>(&self, name: FigureName, figure: Figure) -> Session<'_, B, P> {
        debug!("Opening figure {name}");
        Session {
            plotter: self,
            name,
            figure,
            released: false,
            _projection: PhantomData,
        }
    }

    fn default_figure(&self) -> Figure {
        let figure = Figure::new(self.settings.figsize, self.settings.dpi).unwrap_or_else(|e| {
            warn!("{e}; using the default figure size");
            Figure::default()
        });
        figure.with_cycle(self.settings.style_cycle.clone())
    }

    fn take_number(&self) -> FigureName {
        FigureName::Numbered(self.counter.fetch_add(1, Ordering::SeqCst))
    }

    fn backend(&self) -> MutexGuard<'_, B> {
        self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the backend.
    pub fn with_backend<R>(&self, f: impl FnOnce(&mut B) -> R) -> R {
        f(&mut self.backend())
    }
}

// ---------------------------------------------------------------------------
// Session: one create-plot-release episode
// ---------------------------------------------------------------------------

/// Owns one figure and shows or saves it exactly once when it ends.
///
/// Ending happens through [`Session::finish`], [`Session::run`] or, failing
/// both, when the session is dropped, including during unwinding.
pub struct Session<'p, B: Backend, P: Projection = Flat> {
    plotter: &'p Plotter<B>,
    name: FigureName,
    figure: Figure,
    released: bool,
    _projection: PhantomData<P>,
}

impl<B: Backend, P: Projection> fmt::Debug for Session<'_, B, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("name", &self.name)
            .field("subplots", &self.figure.subplots().len())
            .field("released", &self.released)
            .finish()
    }
}

impl<'p, B: Backend, P: Projection> Session<'p, B, P> {
    pub fn name(&self) -> &FigureName {
        &self.name
    }

    /// The drawing surface, read-only.
    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    /// The plotting target: the figure, or its 3-D axes for 3-D sessions.
    pub fn enter(&mut self) -> &mut P::Target {
        P::enter(&mut self.figure)
    }

    /// End the session now and report what happened to the figure.
    pub fn finish(mut self) -> Result<Outcome> {
        self.release()
    }

    /// Run `body` on the plotting target, then end the session. The figure is
    /// released even when `body` fails; its error is returned afterwards.
    pub fn run<E>(
        mut self,
        body: impl FnOnce(&mut P::Target) -> std::result::Result<(), E>,
    ) -> std::result::Result<Outcome, E>
    where
        E: From<crate::error::Error>,
    {
        let result = body(self.enter());
        let outcome = self.release();
        if let (Err(_), Err(e)) = (&result, &outcome) {
            error!("Failed to release figure {}: {e}", self.name);
        }
        result?;
        Ok(outcome?)
    }

    fn release(&mut self) -> Result<Outcome> {
        self.released = true;
        let settings = &self.plotter.settings;
        let mut backend = self.plotter.backend();

        if settings.interactive {
            debug!("Showing figure {}", self.name);
            backend.show(&self.figure, &self.name.to_string())?;
            return Ok(Outcome::Shown(std::mem::take(&mut self.figure)));
        }

        let path = settings.output_path(&self.name);
        let saved = backend.save(&self.figure, &path);
        backend.close(&self.figure);
        saved?;
        info!("Saved figure {} to {}", self.name, path.display());
        Ok(Outcome::Saved(path))
    }
}

impl<B: Backend, P: Projection> Drop for Session<'_, B, P> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.release() {
            error!("Failed to release figure {}: {e}", self.name);
        }
    }
}
