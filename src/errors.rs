mod build;
mod instantiate;
mod register;
mod resolve;

pub use build::BuildErrorKind;
pub use instantiate::InstantiateErrorKind;
pub use register::RegisterErrorKind;
pub use resolve::ResolveErrorKind;
