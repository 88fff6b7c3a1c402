use crate::key::ServiceKey;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Container has not been built")]
    NotBuilt,
    #[error("Service `{key}` not found")]
    NotFound { key: ServiceKey },
    #[error("Service `{key}` isn't a declared dependency of this factory")]
    NotDeclared { key: ServiceKey },
    #[error("Incorrect type of service `{key}`, expected: {expected}")]
    IncorrectType { key: ServiceKey, expected: &'static str },
}
