/// Terminal front end for planar: command-line driver and a static ASCII
/// plot of a triangle surface and its projection
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};

pub mod cli;
pub mod plot;
pub mod renderer;

pub use plot::PlotData;
pub use renderer::{AsciiPlot, PlotCamera, Series};

/// Shows a [`PlotData`] once and waits for the user to close it
pub struct PlotApp {
    data: PlotData,
    camera: PlotCamera,
    plot: AsciiPlot,
}

impl PlotApp {
    pub fn new(data: PlotData, azimuth: f64, elevation: f64) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let target = centroid(&data.original);

        Ok(Self {
            data,
            camera: PlotCamera::new(azimuth, elevation, target),
            // Top two rows hold the title and legend
            plot: AsciiPlot::new(width as usize, (height as usize).saturating_sub(2)),
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.render().and_then(|()| wait_for_close());

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn render(&mut self) -> io::Result<()> {
        let query: Vec<_> = self.data.query.into_iter().collect();

        self.plot.clear();
        self.plot.plot(
            &[
                (Series::Original, self.data.original.as_slice()),
                (Series::Projected, self.data.projected.as_slice()),
                (Series::Query, query.as_slice()),
            ],
            &self.camera,
        );

        let verdict = if self.data.query_inside {
            "query point lies on the projected triangle"
        } else {
            "query point lies outside the projected triangle"
        };

        let mut stdout = stdout();
        queue!(
            stdout,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print("Original and projected triangle surfaces | q/Esc/Enter: close\r\n"),
            SetForegroundColor(Color::Red),
            Print("# original  "),
            SetForegroundColor(Color::Cyan),
            Print("+ projected  "),
            SetForegroundColor(Color::Green),
            Print(format!("X {verdict}\r\n")),
            ResetColor
        )?;

        self.plot.draw(&mut stdout)?;
        stdout.flush()?;
        Ok(())
    }
}

fn wait_for_close() -> io::Result<()> {
    loop {
        if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
            if kind != KeyEventKind::Press {
                continue;
            }
            if matches!(code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter) {
                return Ok(());
            }
        }
    }
}

fn centroid(points: &[planar_core::Point3D]) -> planar_core::Point3D {
    if points.is_empty() {
        return planar_core::Point3D::zeros();
    }
    points.iter().sum::<planar_core::Point3D>() / points.len() as f64
}
