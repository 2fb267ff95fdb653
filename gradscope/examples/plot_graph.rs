//! Renders the graph of `y = exp(x) * log(x) + x` with graphviz.
//!
//! Run with `cargo run -p gradscope --example plot_graph [output.png]`.

use eyre::Result;
use gradscope::{get_dot_graph, plot_dot_graph, DotOptions, PlotOptions};

#[path = "../tests/common/mod.rs"]
mod common;

use common::{apply1, named, Var};

fn main() -> Result<()> {
    let x = Var::leaf(Some("x"), &[2, 3]);
    let a = apply1("Exp", &[&x], &[2, 3]);
    let b = apply1("Log", &[&x], &[2, 3]);
    let c = apply1("Mul", &[&a, &b], &[2, 3]);
    let y = named("Add", &[&c, &x], &[2, 3], "y");

    println!("{}", get_dot_graph(&y, &DotOptions::default()));

    let to_file = std::env::args().nth(1).unwrap_or_else(|| "graph.png".to_owned());
    let rendered = plot_dot_graph(&y, &PlotOptions::default().with_to_file(to_file))?;
    println!("wrote {}", rendered.path.display());
    rendered.display();

    Ok(())
}
