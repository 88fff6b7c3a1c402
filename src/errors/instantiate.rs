use super::ResolveErrorKind;

/// Failure of a factory.
///
/// Factories usually return it through `?`: lookups in [`crate::Dependencies`] convert
/// from [`ResolveErrorKind`], anything else goes through [`anyhow::Error`].
#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error(transparent)]
    Dependency(#[from] ResolveErrorKind),
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}
