/// Figure layer: drawing surfaces, sessions and the backend seam.
///
/// Architecture:
/// ```text
///   Plotter  (settings + name counter + backend)
///      │ figure() / named() / figure_3d() / quick_plot()
///      ▼
///   ┌─────────┐
///   │ Session │  owns one Figure, enter() → &mut Figure | &mut Axes3d
///   └─────────┘
///      │ finish() / run() / Drop   (exactly once)
///      ▼
///   interactive ? Backend::show : Backend::save + Backend::close
/// ```

pub mod backend;
pub mod model;
pub mod session;
