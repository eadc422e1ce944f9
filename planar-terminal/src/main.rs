/// planar - project triangle surfaces onto planes through the origin
///
/// Commands:
///   - project: project a point onto a plane
///   - inside:  test a plane-local point against the projected triangle
///   - solve:   recover (u, v) from P = uB + vC
///   - render:  rasterize the projection to a PPM/PNG image
///   - plot:    static terminal plot (q/Esc/Enter closes it)
use clap::Parser;
use planar_terminal::cli::{self, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli::run(cli)
}
