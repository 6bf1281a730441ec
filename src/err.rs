// Types

pub type Result<VALUE = ()> = std::result::Result<VALUE, Error>;

// Error

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("bcrypt error: {0}")]
    Bcrypt(
        #[from]
        #[source]
        bcrypt::BcryptError,
    ),
    #[error("setting is not a valid bcrypt prefix")]
    MalformedSetting,
    #[error("no usable bcrypt primitive")]
    PrimitiveUnavailable,
}
