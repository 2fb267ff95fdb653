use std::collections::HashSet;

use log::debug;
use smallstr::SmallString;

use crate::graph::{Function, NodeId, Variable};

type Label = SmallString<[u8; 32]>;

/// Options for [`get_dot_graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DotOptions {
    /// Append the shape and dtype to the label of every variable holding data
    pub verbose: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self { verbose: true }
    }
}

impl DotOptions {
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Types that can describe themselves as a Graphviz DOT graph.
pub trait ToDot {
    fn to_dot(&self) -> String;
}

impl<V: Variable> ToDot for V {
    fn to_dot(&self) -> String {
        get_dot_graph(self, &DotOptions::default())
    }
}

/// Render the graph that produced `output` as Graphviz DOT.
///
/// Walks backwards from `output` through the creators of every input,
/// depth first. Each function is emitted once together with its edges. A
/// variable feeding several functions is emitted once per use, which DOT
/// merges into a single node.
pub fn get_dot_graph<V: Variable>(output: &V, options: &DotOptions) -> String {
    let mut txt = String::new();
    let mut funcs: Vec<V::Creator> = Vec::new();
    let mut seen: HashSet<NodeId> = HashSet::new();

    let mut add_func = |f: V::Creator, funcs: &mut Vec<V::Creator>| {
        if seen.insert(f.id()) {
            funcs.push(f);
        }
    };

    if let Some(creator) = output.creator() {
        add_func(creator, &mut funcs);
    }
    txt.push_str(&dot_var(output, options.verbose));

    let mut emitted = 0;
    while let Some(func) = funcs.pop() {
        txt.push_str(&dot_func(&func));
        emitted += 1;

        for x in func.inputs() {
            txt.push_str(&dot_var(&x, options.verbose));

            if let Some(creator) = x.creator() {
                add_func(creator, &mut funcs);
            }
        }
    }

    debug!("rendered computation graph of {emitted} functions to dot");

    format!("digraph g {{\n{txt}}}")
}

fn dot_var<V: Variable>(v: &V, verbose: bool) -> String {
    let mut label = Label::new();
    if let Some(name) = v.name() {
        label.push_str(name);
    }

    if verbose {
        if let Some(shape) = v.shape() {
            if v.name().is_some() {
                label.push_str(": ");
            }
            label.push_str(&format_shape(&shape));
            label.push(' ');
            label.push_str(&v.dtype());
        }
    }

    format!(
        "{} [label=\"{}\", color=orange, style=filled]\n",
        v.id(),
        escape(&label).as_str()
    )
}

fn dot_func<F: Function>(f: &F) -> String {
    let mut ret = format!(
        "{} [label=\"{}\", color=lightblue, style=filled, shape=box]\n",
        f.id(),
        escape(f.name()).as_str()
    );

    for x in f.inputs() {
        ret.push_str(&format!("{} -> {}\n", x.id(), f.id()));
    }
    for y in f.outputs() {
        ret.push_str(&format!("{} -> {}\n", f.id(), y.id()));
    }

    ret
}

/// Shapes render as tuples: `(2, 3)`, `(3,)` and `()` for scalars.
fn format_shape(shape: &[usize]) -> String {
    match shape {
        [] => "()".to_owned(),
        [n] => format!("({n},)"),
        [first, rest @ ..] => {
            let mut s = format!("({first}");
            for n in rest {
                s.push_str(&format!(", {n}"));
            }
            s.push(')');
            s
        }
    }
}

/// Escape a label for use inside a quoted DOT string
fn escape(label: &str) -> Label {
    let mut out = Label::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}
