use std::{borrow::Cow, fmt, rc::Rc};

use gradscope_shape::Dim;
use smallvec::SmallVec;

/// Most functions take one or two inputs and produce a single output.
pub type InputArray<T> = SmallVec<[T; 2]>;

/// Identity of a node in the computation graph.
///
/// Two handles to the same variable or function must report the same id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Identify a node by the address of its allocation
    pub fn of_ptr<T: ?Sized>(ptr: *const T) -> Self {
        Self(ptr.cast::<()>() as usize)
    }

    pub fn of_rc<T: ?Sized>(rc: &Rc<T>) -> Self {
        Self::of_ptr(Rc::as_ptr(rc))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A value node: the data flowing between functions.
pub trait Variable: Sized {
    /// The function type that produces variables of this type
    type Creator: Function<Var = Self>;

    fn id(&self) -> NodeId;

    fn name(&self) -> Option<&str>;

    /// Shape of the held data, `None` if the variable holds no data yet.
    fn shape(&self) -> Option<Dim>;

    /// Element type of the held data, eg `f32`.
    fn dtype(&self) -> Cow<'_, str>;

    /// The function that produced this variable. Leaf variables have none.
    fn creator(&self) -> Option<Self::Creator>;
}

/// An operation node: consumes input variables and produces outputs.
pub trait Function: Sized {
    type Var: Variable<Creator = Self>;

    fn id(&self) -> NodeId;

    fn inputs(&self) -> InputArray<Self::Var>;

    /// Outputs that are still alive.
    ///
    /// Graphs usually hold their outputs weakly to avoid reference cycles,
    /// so outputs that have already been dropped are skipped.
    fn outputs(&self) -> InputArray<Self::Var>;

    /// Name shown for this function, defaults to the implementing type's name
    fn name(&self) -> &str {
        short_type_name::<Self>()
    }
}

/// [`std::any::type_name`] without the module path, eg `Mul` for `my_engine::ops::Mul`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::{short_type_name, NodeId};

    #[allow(dead_code)]
    struct Square;
    #[allow(dead_code)]
    struct Wrapper<T>(T);

    #[test]
    fn type_names() {
        assert_eq!(short_type_name::<Square>(), "Square");
        assert_eq!(short_type_name::<Wrapper<Square>>(), "Wrapper");
        assert_eq!(short_type_name::<u32>(), "u32");
    }

    #[test]
    fn rc_identity() {
        let a = Rc::new(1);
        let b = Rc::clone(&a);
        let c = Rc::new(1);

        assert_eq!(NodeId::of_rc(&a), NodeId::of_rc(&b));
        assert_ne!(NodeId::of_rc(&a), NodeId::of_rc(&c));
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(140_233).to_string(), "140233");
    }
}
