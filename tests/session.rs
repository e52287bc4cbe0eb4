use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use figscope::{
    Backend, Color, Error, Figure, FigureName, FigureOptions, Outcome, Plotter, Result,
    StyleCycle,
};
use tempfile::tempdir;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Show(String),
    Save(PathBuf),
    Close,
}

#[derive(Debug, Default)]
struct Recorder {
    events: Vec<Event>,
    fail_saves: bool,
}

impl Backend for Recorder {
    fn show(&mut self, _figure: &Figure, title: &str) -> Result<()> {
        self.events.push(Event::Show(title.to_string()));
        Ok(())
    }

    fn save(&mut self, _figure: &Figure, path: &Path) -> Result<()> {
        self.events.push(Event::Save(path.to_path_buf()));
        if self.fail_saves {
            return Err(Error::Render("disk full".into()));
        }
        Ok(())
    }

    fn close(&mut self, _figure: &Figure) {
        self.events.push(Event::Close);
    }
}

fn events(plotter: &Plotter<Recorder>) -> Vec<Event> {
    plotter.with_backend(|b| b.events.clone())
}

fn saving_plotter() -> Plotter<Recorder> {
    let mut plotter = Plotter::new(Recorder::default());
    plotter.set_interactive(false);
    plotter
}

#[test]
fn anonymous_figures_are_numbered_from_zero() {
    let plotter = Plotter::new(Recorder::default());
    for _ in 0..3 {
        plotter.figure().finish().unwrap();
    }
    assert_eq!(
        events(&plotter),
        vec![
            Event::Show("0".into()),
            Event::Show("1".into()),
            Event::Show("2".into()),
        ]
    );
    assert_eq!(plotter.next_number(), 3);
}

#[test]
fn saved_name_is_name_plus_suffix() {
    let mut plotter = saving_plotter();
    plotter.set_extension(Some("png"));
    let outcome = plotter.named("plot").finish().unwrap();
    assert_eq!(outcome.saved_path(), Some(Path::new("plot.png")));

    plotter.set_extension(None);
    let outcome = plotter.named("plot").finish().unwrap();
    assert_eq!(outcome.saved_path(), Some(Path::new("plot")));

    assert_eq!(
        events(&plotter),
        vec![
            Event::Save("plot.png".into()),
            Event::Close,
            Event::Save("plot".into()),
            Event::Close,
        ]
    );
}

#[test]
fn interactive_sessions_show_and_hand_back_the_figure() {
    let plotter = Plotter::new(Recorder::default());
    let mut session = plotter.figure();
    session.enter().plot(&[0.0, 1.0], &[1.0, 2.0]).unwrap();

    match session.finish().unwrap() {
        Outcome::Shown(figure) => assert_eq!(figure.subplots().len(), 1),
        Outcome::Saved(path) => panic!("unexpected save to {}", path.display()),
    }
    assert_eq!(events(&plotter), vec![Event::Show("0".into())]);
}

#[test]
fn headless_plotter_writes_exactly_one_file() {
    let dir = tempdir().unwrap();
    let mut plotter = Plotter::headless();
    plotter.set_extension(Some(".png"));
    plotter.set_output_dir(Some(dir.path().to_path_buf()));

    {
        let mut session = plotter.figure();
        session.enter().plot(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0]).unwrap();
    }

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(files, vec![std::ffi::OsString::from("0.png")]);

    let bytes = std::fs::read(dir.path().join("0.png")).unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
}

#[test]
fn headless_plotter_saves_without_suffix_as_png() {
    let dir = tempdir().unwrap();
    let mut plotter = Plotter::headless();
    plotter.set_output_dir(Some(dir.path().to_path_buf()));

    plotter.named("bare").finish().unwrap();
    let bytes = std::fs::read(dir.path().join("bare")).unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
}

#[test]
fn unsupported_extension_is_reported() {
    let dir = tempdir().unwrap();
    let mut plotter = Plotter::headless();
    plotter.set_output_dir(Some(dir.path().to_path_buf()));
    plotter.set_extension(Some("tiff"));

    let err = plotter.figure().finish().unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { .. }));
}

#[test]
fn run_releases_even_when_the_body_fails() {
    let plotter = saving_plotter();
    let result = plotter.figure().run(|fig| {
        fig.plot(&[1.0], &[1.0, 2.0])?;
        Ok::<_, Error>(())
    });

    assert!(matches!(result, Err(Error::LengthMismatch { x: 1, y: 2 })));
    assert_eq!(
        events(&plotter),
        vec![Event::Save("0".into()), Event::Close]
    );
}

#[test]
fn run_prefers_the_body_error_when_saving_also_fails() {
    let mut plotter = Plotter::new(Recorder {
        fail_saves: true,
        ..Recorder::default()
    });
    plotter.set_interactive(false);

    let result = plotter.named("both").run(|_fig| Err(Error::NoData));
    assert!(matches!(result, Err(Error::NoData)));
    assert_eq!(
        events(&plotter),
        vec![Event::Save("both".into()), Event::Close]
    );
}

#[test]
fn panicking_body_still_releases_once() {
    let plotter = saving_plotter();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut session = plotter.named("crash");
        session.enter().plot(&[0.0], &[0.0]).unwrap();
        panic!("plotting failed");
    }));

    assert!(result.is_err());
    assert_eq!(
        events(&plotter),
        vec![Event::Save("crash".into()), Event::Close]
    );
}

#[test]
fn failed_save_still_closes() {
    let mut plotter = Plotter::new(Recorder {
        fail_saves: true,
        ..Recorder::default()
    });
    plotter.set_interactive(false);

    let err = plotter.figure().finish().unwrap_err();
    assert!(matches!(err, Error::Render(_)));
    assert_eq!(
        events(&plotter),
        vec![Event::Save("0".into()), Event::Close]
    );
}

#[test]
fn three_d_sessions_enter_on_3d_axes() {
    let plotter = Plotter::new(Recorder::default());
    let mut session = plotter
        .figure_3d(FigureOptions::new().name("surface"))
        .unwrap();
    assert_eq!(session.name(), &FigureName::Given("surface".into()));

    session
        .enter()
        .plot(&[0.0, 1.0], &[0.0, 1.0], &[1.0, 0.0])
        .unwrap();
    // Entering again reuses the same axes.
    session.enter().scatter(&[0.5], &[0.5], &[0.5]).unwrap();
    assert_eq!(session.figure().subplots().len(), 1);

    let Outcome::Shown(figure) = session.finish().unwrap() else {
        panic!("expected an interactive show");
    };
    assert!(figure.has_3d());
    // Named sessions leave the counter alone.
    assert_eq!(plotter.next_number(), 0);
}

#[test]
fn quick_plot_takes_a_number_and_styles_from_the_settings() {
    let mut plotter = Plotter::new(Recorder::default());
    plotter.set_style_cycle(StyleCycle::monochrome());

    let outcome = plotter
        .quick_plot([(vec![0.0, 1.0], vec![0.0, 1.0]), (vec![0.0, 1.0], vec![1.0, 0.0])])
        .unwrap();
    let Outcome::Shown(mut figure) = outcome else {
        panic!("expected an interactive show");
    };
    let axes = figure.gca();
    assert_eq!(axes.series.len(), 2);
    assert_eq!(axes.series[0].style.color, Color::BLACK);
    assert_ne!(axes.series[0].style.line, axes.series[1].style.line);

    assert_eq!(events(&plotter), vec![Event::Show("0".into())]);
    assert_eq!(plotter.next_number(), 1);
}

#[test]
fn options_override_size_and_title() {
    let plotter = Plotter::new(Recorder::default());
    let session = plotter
        .figure_with(
            FigureOptions::new()
                .figsize(4.0, 3.0)
                .dpi(50)
                .title("overview"),
        )
        .unwrap();
    assert_eq!(session.name(), &FigureName::Numbered(0));
    assert_eq!(session.figure().pixel_size(), (200, 150));
    assert_eq!(session.figure().title(), Some("overview"));
}

#[test]
fn oversized_figures_are_rejected_up_front() {
    let plotter = Plotter::new(Recorder::default());
    let err = plotter
        .figure_with(FigureOptions::new().figsize(1e9, 1e9))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidFigureSize { .. }));
    // No session was opened, so nothing was shown or numbered.
    assert!(events(&plotter).is_empty());
    assert_eq!(plotter.next_number(), 0);
}
