pub use rustc_hash::FxHashSet as HashSet;
