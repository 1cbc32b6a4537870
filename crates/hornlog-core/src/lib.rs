//! Term model, interning, and printing for the hornlog logic-programming
//! interpreter. Everything here is data: no unification, no search — those
//! live in `hornlog-resolver`.

pub mod indicator;
pub mod interner;
pub mod print;
pub mod term;

pub use indicator::Indicator;
pub use interner::{Interner, Symbol};
pub use print::Printer;
pub use term::{RefArena, RefId, Struct, StringConversionError, Term};

/// Atom/Struct/Var names the rest of the workspace treats specially:
/// list cons/nil, the `=/2` unification goal built by DCG expansion, the
/// anonymous variable name `_`, and the `directive/0` indicator that
/// `assertz/1` executes instead of storing. Interned once and threaded
/// through list/string helpers, DCG expansion, rule instantiation, the
/// printer, and the `assertz` built-in.
#[derive(Clone, Copy, Debug)]
pub struct WellKnownSymbols {
    pub dot: Symbol,
    pub nil: Symbol,
    pub eq: Symbol,
    pub anon: Symbol,
    pub directive: Symbol,
}

impl WellKnownSymbols {
    pub fn intern(interner: &mut Interner) -> Self {
        Self {
            dot: interner.intern("."),
            nil: interner.intern("[]"),
            eq: interner.intern("="),
            anon: interner.intern("_"),
            directive: interner.intern("directive"),
        }
    }
}
