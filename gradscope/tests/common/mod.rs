//! A minimal define-by-run graph, standing in for an autodiff engine.
#![allow(dead_code)]

use std::{
    borrow::Cow,
    cell::RefCell,
    rc::{Rc, Weak},
};

use gradscope::{shape::Dim, Function, InputArray, NodeId, Variable};

pub struct VarNode {
    name: Option<String>,
    shape: Option<Dim>,
    creator: RefCell<Option<Func>>,
}

#[derive(Clone)]
pub struct Var(Rc<VarNode>);

pub struct FuncNode {
    kind: &'static str,
    inputs: Vec<Var>,
    outputs: RefCell<Vec<Weak<VarNode>>>,
}

#[derive(Clone)]
pub struct Func(Rc<FuncNode>);

impl Var {
    pub fn leaf(name: Option<&str>, shape: &[usize]) -> Self {
        Self::new(name, Some(Dim::from_slice(shape)))
    }

    pub fn empty(name: Option<&str>) -> Self {
        Self::new(name, None)
    }

    fn new(name: Option<&str>, shape: Option<Dim>) -> Self {
        Var(Rc::new(VarNode {
            name: name.map(str::to_owned),
            shape,
            creator: RefCell::new(None),
        }))
    }

    pub fn node_id(&self) -> NodeId {
        NodeId::of_rc(&self.0)
    }
}

/// Record `kind` applied to `inputs`, producing one output per entry of `output_shapes`
pub fn apply(kind: &'static str, inputs: &[&Var], output_shapes: &[&[usize]]) -> Vec<Var> {
    let outputs = output_shapes
        .iter()
        .map(|shape| Var::leaf(None, shape))
        .collect();
    record(kind, inputs, outputs)
}

pub fn apply1(kind: &'static str, inputs: &[&Var], shape: &[usize]) -> Var {
    apply(kind, inputs, &[shape]).remove(0)
}

/// Same as [`apply1`] but names the output
pub fn named(kind: &'static str, inputs: &[&Var], shape: &[usize], name: &str) -> Var {
    record(kind, inputs, vec![Var::leaf(Some(name), shape)]).remove(0)
}

fn record(kind: &'static str, inputs: &[&Var], outputs: Vec<Var>) -> Vec<Var> {
    let func = Func(Rc::new(FuncNode {
        kind,
        inputs: inputs.iter().map(|&v| v.clone()).collect(),
        outputs: RefCell::new(Vec::new()),
    }));

    for y in &outputs {
        *y.0.creator.borrow_mut() = Some(func.clone());
        func.0.outputs.borrow_mut().push(Rc::downgrade(&y.0));
    }

    outputs
}

impl Variable for Var {
    type Creator = Func;

    fn id(&self) -> NodeId {
        self.node_id()
    }

    fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    fn shape(&self) -> Option<Dim> {
        self.0.shape.clone()
    }

    fn dtype(&self) -> Cow<'_, str> {
        Cow::Borrowed("f32")
    }

    fn creator(&self) -> Option<Func> {
        self.0.creator.borrow().clone()
    }
}

impl Function for Func {
    type Var = Var;

    fn id(&self) -> NodeId {
        NodeId::of_rc(&self.0)
    }

    fn inputs(&self) -> InputArray<Var> {
        self.0.inputs.iter().cloned().collect()
    }

    fn outputs(&self) -> InputArray<Var> {
        self.0
            .outputs
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .map(Var)
            .collect()
    }

    fn name(&self) -> &str {
        self.0.kind
    }
}

/// `y = x * x` repeated `depth` times, starting from a leaf named `x`
pub fn chain(depth: usize) -> (Var, Var) {
    let x = Var::leaf(Some("x"), &[2, 3]);
    let mut y = x.clone();
    for _ in 0..depth {
        y = apply1("Square", &[&y], &[2, 3]);
    }
    (x, y)
}
