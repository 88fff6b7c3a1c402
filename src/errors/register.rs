use crate::key::ServiceKey;

#[derive(thiserror::Error, Debug)]
pub enum RegisterErrorKind {
    #[error("Service `{key}` already registered")]
    AlreadyRegistered { key: ServiceKey },
    #[error("Factory for `{key}` already registered")]
    FactoryAlreadyRegistered { key: ServiceKey },
    #[error("Can't register `{key}`: the container is already built or disposed")]
    RegistrationClosed { key: ServiceKey },
}

impl RegisterErrorKind {
    #[must_use]
    pub const fn key(&self) -> &ServiceKey {
        match self {
            Self::AlreadyRegistered { key } | Self::FactoryAlreadyRegistered { key } | Self::RegistrationClosed { key } => key,
        }
    }
}
